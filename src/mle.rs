//! Maximum-likelihood collection-size estimate from a profile's totals.
//!
//! The profile enters the likelihood of `M` only through `U` (distinct items
//! drawn) and `N` (total draws): maximizing over `M` reduces to solving
//!
//! \[
//! M \bigl(H_M - H_{M-U}\bigr) = N
//! \]
//!
//! where \(H_s = \gamma + \psi(s+1)\) is the harmonic number extended to real
//! arguments via the digamma function \(\psi\). The left side decreases from
//! \(U \cdot H_U\) at `M = U` toward `U` as `M` grows, so an interior root exists
//! exactly when `U < N < U·H_U`; it is located by bisection.
//!
//! This gives a fast point estimate to center a [`crate::montecarlo::pvalue_scan`]
//! on, rather than scanning blindly from `U` upward.

#![forbid(unsafe_code)]

use statrs::function::gamma::digamma;

use crate::{OccupancyError, Profile, Result};

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Harmonic number \(H_s = \gamma + \psi(s+1)\), valid for real `s >= 0`.
///
/// Agrees with \(\sum_{k=1}^{s} 1/k\) at non-negative integers (`H_0 = 0`).
///
/// # Examples
///
/// ```
/// use occupancy::mle::harmonic_number;
///
/// assert!(harmonic_number(0.0).abs() < 1e-12);
/// assert!((harmonic_number(2.0) - 1.5).abs() < 1e-9);
/// ```
#[must_use]
pub fn harmonic_number(s: f64) -> f64 {
    EULER_GAMMA + digamma(s + 1.0)
}

/// Maximum-likelihood estimate of the collection size from a profile.
///
/// Returns a real-valued estimate (the likelihood treats `M` continuously); it is
/// at least `num_distinct()`. When every candidate `M >= U` makes the observed
/// repeat rate *less* collided than expected — that is, `N >= U·H_U` — the
/// likelihood is maximized at the boundary and `U` itself is returned.
///
/// # Errors
///
/// - [`OccupancyError::EmptyProfile`] for the zero-draw profile.
/// - [`OccupancyError::Invalid`] when no item was drawn more than once
///   (`N == U`): the likelihood then increases without bound in `M` and no
///   finite estimate exists.
///
/// # Examples
///
/// ```
/// use occupancy::{mle::mle_num_items, Profile};
///
/// // 1974 songs heard once, 295 twice, 17 thrice, 2 four times.
/// let observed = Profile::from_multiplicity_counts(vec![1974, 295, 17, 2]);
/// let m_hat = mle_num_items(&observed).unwrap();
/// assert!(m_hat > observed.num_distinct() as f64);
/// ```
pub fn mle_num_items(profile: &Profile) -> Result<f64> {
    let num_distinct = profile.num_distinct();
    let num_draws = profile.num_draws();
    if num_distinct == 0 {
        return Err(OccupancyError::EmptyProfile);
    }
    if num_draws == num_distinct {
        return Err(OccupancyError::Invalid(
            "no repeated items; the size estimate diverges",
        ));
    }

    let u = num_distinct as f64;
    let n = num_draws as f64;
    // Expected draw total at size m, minus the observed total.
    let excess = |m: f64| m * (harmonic_number(m) - harmonic_number(m - u)) - n;

    if excess(u) <= 0.0 {
        // The sample is at least as collided as drawing from exactly U items;
        // the boundary is the maximizer.
        return Ok(u);
    }

    // Bracket the root, then bisect. excess() tends to U - N < 0, so some finite
    // upper bound always flips the sign.
    let mut lo = u;
    let mut hi = 2.0 * n;
    while excess(hi) > 0.0 {
        hi *= 2.0;
    }
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if excess(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(0.5 * (lo + hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::OccupancySampler;

    #[test]
    fn harmonic_number_matches_integer_sums() {
        assert!(harmonic_number(0.0).abs() < 1e-12);
        assert!((harmonic_number(1.0) - 1.0).abs() < 1e-9);
        assert!((harmonic_number(2.0) - 1.5).abs() < 1e-9);
        assert!((harmonic_number(3.0) - 11.0 / 6.0).abs() < 1e-9);
        assert!((harmonic_number(10.0) - 2.928_968_253_968_254).abs() < 1e-9);
    }

    #[test]
    fn estimate_solves_the_likelihood_equation() {
        let observed = Profile::from_multiplicity_counts(vec![1974, 295, 17, 2]);
        let u = observed.num_distinct() as f64;
        let n = observed.num_draws() as f64;

        let m_hat = mle_num_items(&observed).unwrap();
        let residual = m_hat * (harmonic_number(m_hat) - harmonic_number(m_hat - u)) - n;
        assert!(residual.abs() < 1e-6, "residual = {residual}");
        // The same profile's p-value scan in the original analysis peaks near 9300.
        assert!((9_000.0..9_700.0).contains(&m_hat), "m_hat = {m_hat}");
    }

    #[test]
    fn more_distinct_items_mean_a_larger_estimate() {
        // Same number of draws, fewer collisions: the collection must look bigger.
        let collided = Profile::from_multiplicity_counts(vec![10, 5]); // U=15, N=20
        let spread = Profile::from_multiplicity_counts(vec![16, 2]); // U=18, N=20
        let m_collided = mle_num_items(&collided).unwrap();
        let m_spread = mle_num_items(&spread).unwrap();
        assert!(m_spread > m_collided);
    }

    #[test]
    fn fully_collided_sample_estimates_the_boundary() {
        // One item drawn five times: the best explanation is a single-item
        // collection.
        let p = Profile::from_multiplicity_counts(vec![0, 0, 0, 0, 1]);
        assert_eq!(mle_num_items(&p).unwrap(), 1.0);
    }

    #[test]
    fn rejects_degenerate_profiles() {
        assert!(matches!(
            mle_num_items(&Profile::empty()),
            Err(OccupancyError::EmptyProfile)
        ));
        // All singletons: no collision information at all.
        let singles = Profile::from_multiplicity_counts(vec![25]);
        assert!(mle_num_items(&singles).is_err());
    }

    #[test]
    fn recovers_a_known_size_from_a_simulated_sample() {
        // Draw heavily from a known collection and check the estimate lands in a
        // plausible band around the truth.
        let mut sampler = OccupancySampler::new(500, 17).unwrap();
        let sample = sampler.draw(1_000);
        let m_hat = mle_num_items(&sample).unwrap();
        assert!(
            (300.0..800.0).contains(&m_hat),
            "m_hat = {m_hat} for true size 500"
        );
    }
}
