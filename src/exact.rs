//! Exact combinatorics for small occupancy problems.
//!
//! These are the audit tools behind the Monte Carlo machinery: for small `M` and
//! `N` every reachable profile can be enumerated and its realization count computed
//! as an exact integer, so [`crate::log_probability`] can be verified against
//! `count / M^N` and the whole profile distribution checked to sum to 1.

#![forbid(unsafe_code)]

use crate::{OccupancyError, Profile, Result};

fn factorial_u128(n: usize) -> Result<u128> {
    (2..=n as u128)
        .try_fold(1u128, u128::checked_mul)
        .ok_or(OccupancyError::Invalid(
            "factorial exceeds u128; use log_probability for large inputs",
        ))
}

/// Exact number of ordered draw sequences (out of the \(M^N\) equally likely ones)
/// that realize `profile` when drawing from `num_items` items:
///
/// \[
/// \frac{N!}{\prod_i dd_i! \, \bigl((i+1)!\bigr)^{dd_i}} \cdot \frac{M!}{(M-U)!}
/// \]
///
/// The empty profile has exactly one realization (the empty sequence) for any
/// `num_items`.
///
/// Exact `u128` arithmetic limits this to small problems (roughly `N ≤ 30` and
/// modest `M`); larger inputs overflow and should use [`crate::log_probability`].
///
/// # Errors
///
/// Returns [`OccupancyError::Invalid`] if `num_items` is smaller than the
/// profile's distinct-item count, or if an intermediate value overflows `u128`.
///
/// # Examples
///
/// ```
/// use occupancy::{exact::realization_count, Profile};
///
/// // Of the 5^8 = 390625 sequences of 8 draws from 5 items, exactly 100800
/// // produce "one single, two pairs, one triple".
/// let p = Profile::from_multiplicity_counts(vec![1, 2, 1]);
/// assert_eq!(realization_count(&p, 5).unwrap(), 100_800);
/// ```
pub fn realization_count(profile: &Profile, num_items: usize) -> Result<u128> {
    let num_distinct = profile.num_distinct();
    if num_items < num_distinct {
        return Err(OccupancyError::Invalid(
            "num_items must be >= distinct items in the profile",
        ));
    }
    let num_draws = profile.num_draws();

    // Assemble the full denominator first: it divides N! exactly, so a single
    // division stays in integer arithmetic throughout.
    let mut denom: u128 = 1;
    for (i, &d) in profile.dd.iter().enumerate() {
        let group = factorial_u128(i + 1)?;
        denom = denom
            .checked_mul(factorial_u128(d)?)
            .ok_or(OccupancyError::Invalid("realization count exceeds u128"))?;
        for _ in 0..d {
            denom = denom
                .checked_mul(group)
                .ok_or(OccupancyError::Invalid("realization count exceeds u128"))?;
        }
    }

    let mut count = factorial_u128(num_draws)? / denom;

    // Falling factorial M (M-1) ... (M-U+1): which items got drawn at all.
    for k in 0..num_distinct {
        count = count
            .checked_mul((num_items - k) as u128)
            .ok_or(OccupancyError::Invalid("realization count exceeds u128"))?;
    }
    Ok(count)
}

/// Enumerate every profile reachable by `num_draws` draws from a collection of at
/// most `max_distinct` items: all `dd` with \(\sum_i (i+1) dd_i = N\) and
/// \(\sum_i dd_i \le\) `max_distinct`.
///
/// `num_draws == 0` yields exactly the empty profile. Profiles are emitted in a
/// deterministic order (lexicographic in `dd`).
///
/// # Examples
///
/// ```
/// use occupancy::exact::enumerate_profiles;
///
/// // 3 draws from >= 3 items: all-distinct, one pair, or one triple.
/// assert_eq!(enumerate_profiles(3, 3).len(), 3);
/// // With only 2 items the all-distinct profile is unreachable.
/// assert_eq!(enumerate_profiles(3, 2).len(), 2);
/// ```
#[must_use]
pub fn enumerate_profiles(num_draws: usize, max_distinct: usize) -> Vec<Profile> {
    let mut out = Vec::new();
    let mut prefix = Vec::new();
    extend(&mut out, &mut prefix, num_draws, max_distinct);
    out
}

fn extend(out: &mut Vec<Profile>, prefix: &mut Vec<usize>, remaining: usize, distinct_left: usize) {
    if remaining == 0 {
        out.push(Profile::from_multiplicity_counts(prefix.clone()));
        return;
    }
    let multiplicity = prefix.len() + 1;
    if remaining < multiplicity {
        return;
    }
    let max_here = (remaining / multiplicity).min(distinct_left);
    for d in 0..=max_here {
        prefix.push(d);
        extend(out, prefix, remaining - d * multiplicity, distinct_left - d);
        prefix.pop();
    }
}
