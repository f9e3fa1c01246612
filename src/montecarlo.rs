//! Monte Carlo comparison of an observed profile against the occupancy model.
//!
//! Two modes built from the same primitives:
//!
//! - [`simulate`]: generate trials and report each profile with its exact
//!   log-probability, no aggregation — for exploring what a hypothesized
//!   collection size actually produces.
//! - [`estimate_pvalue`]: the hypothesis test. Repeatedly simulate the same number
//!   of draws the reference profile represents, and count how often the simulated
//!   profile is at least as improbable as the reference. Small values mean the
//!   observed profile is atypically unlikely for that collection size.
//!
//! All trials in one call share a single evolving random stream, so trial order is
//! part of reproducibility: the same (parameters, seed) always give the same
//! estimate. [`pvalue_scan`] derives a fresh seed per candidate size so that scans
//! are reproducible too.

#![forbid(unsafe_code)]

use crate::sampler::OccupancySampler;
use crate::{log_probability, OccupancyError, Profile, Result};

/// Tie tolerance used by [`estimate_pvalue`]: log-probability differences smaller
/// than this count as exact ties (half weight), absorbing floating-point noise in
/// the lgamma evaluation.
pub const DEFAULT_TIE_TOLERANCE: f64 = 1e-10;

/// One simulated trial: a profile and its exact log-probability under the
/// collection size it was drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub profile: Profile,
    pub log_probability: f64,
}

/// Run `num_trials` independent simulations of `num_draws` draws from `num_items`
/// items, returning each profile paired with its exact log-probability.
///
/// # Errors
///
/// Returns [`OccupancyError::Invalid`] if `num_items == 0`.
///
/// # Examples
///
/// ```
/// use occupancy::simulate;
///
/// let trials = simulate(100, 200, 50, 0).unwrap();
/// assert_eq!(trials.len(), 50);
/// for t in &trials {
///     assert_eq!(t.profile.num_draws(), 200);
///     assert!(t.log_probability <= 0.0);
/// }
/// ```
pub fn simulate(
    num_items: usize,
    num_draws: usize,
    num_trials: usize,
    seed: u64,
) -> Result<Vec<Trial>> {
    let mut sampler = OccupancySampler::new(num_items, seed)?;
    let mut trials = Vec::with_capacity(num_trials);
    for _ in 0..num_trials {
        let profile = sampler.draw(num_draws);
        let log_probability = log_probability(&profile, num_items)?;
        trials.push(Trial {
            profile,
            log_probability,
        });
    }
    Ok(trials)
}

/// Monte Carlo estimate of the one-sided p-value for the hypothesis "the
/// collection has `num_items` items", given the observed `ref_profile`.
///
/// Runs `num_trials` simulations of `ref_profile.num_draws()` draws each and
/// returns the fraction of trials whose profile is at least as improbable as the
/// reference; a trial whose log-probability matches the reference's within
/// [`DEFAULT_TIE_TOLERANCE`] contributes half weight.
///
/// The estimate lies in `[0, 1]`. Values near 0 mean the reference profile is
/// atypically improbable for this collection size; values near 1 mean it is among
/// the most plausible outcomes.
///
/// # Errors
///
/// Returns [`OccupancyError::Invalid`] if `num_trials == 0` (the estimate would be
/// `0/0`), if `num_items == 0`, or if `num_items` is smaller than the reference
/// profile's distinct-item count.
///
/// # Examples
///
/// ```
/// use occupancy::{estimate_pvalue, Profile};
///
/// // 3 draws that all hit different items is a typical outcome for 30 items.
/// let spread = Profile::from_multiplicity_counts(vec![3]);
/// let p = estimate_pvalue(&spread, 30, 500, 1).unwrap();
/// assert!(p > 0.5);
/// ```
pub fn estimate_pvalue(
    ref_profile: &Profile,
    num_items: usize,
    num_trials: usize,
    seed: u64,
) -> Result<f64> {
    estimate_pvalue_with_tolerance(ref_profile, num_items, num_trials, seed, DEFAULT_TIE_TOLERANCE)
}

/// [`estimate_pvalue`] with an explicit tie tolerance.
///
/// The default tolerance assumes both log-probabilities come from the same
/// double-precision evaluation; callers mixing precisions can widen it.
///
/// # Errors
///
/// Same conditions as [`estimate_pvalue`].
pub fn estimate_pvalue_with_tolerance(
    ref_profile: &Profile,
    num_items: usize,
    num_trials: usize,
    seed: u64,
    tie_tolerance: f64,
) -> Result<f64> {
    if num_trials == 0 {
        return Err(OccupancyError::Invalid("num_trials must be >= 1"));
    }
    let ref_log_p = log_probability(ref_profile, num_items)?;
    let num_draws = ref_profile.num_draws();

    let mut sampler = OccupancySampler::new(num_items, seed)?;
    let mut sim = Profile::empty();
    let mut score = 0.0;
    for _ in 0..num_trials {
        sampler.draw_into(&mut sim, num_draws);
        let sim_log_p = log_probability(&sim, num_items)?;

        let diff = ref_log_p - sim_log_p;
        if diff.abs() < tie_tolerance {
            // Equally probable: split the difference.
            score += 0.5;
        } else if diff > 0.0 {
            // The simulated trial is more extreme than the reference.
            score += 1.0;
        }
    }
    Ok(score / num_trials as f64)
}

/// Estimate p-values for a range of hypothesized collection sizes.
///
/// This is the workhorse for actually bracketing a playlist's length: scan
/// candidate sizes and look for the plateau of sizes whose p-value is not small.
/// Each candidate size gets its own random stream, deterministically derived from
/// `seed` and the candidate's position, so results are reproducible and
/// independent of which candidates share the scan.
///
/// Returns `(candidate, p-value)` pairs in input order.
///
/// # Errors
///
/// Fails on the first invalid candidate (`0` or smaller than the reference
/// profile's distinct-item count), or if `num_trials == 0`.
///
/// # Examples
///
/// ```
/// use occupancy::{montecarlo::pvalue_scan, Profile};
///
/// let observed = Profile::from_multiplicity_counts(vec![4, 3]);
/// let scan = pvalue_scan(&observed, 7..=20, 200, 9).unwrap();
/// assert_eq!(scan.len(), 14);
/// assert!(scan.iter().all(|&(_, p)| (0.0..=1.0).contains(&p)));
/// ```
pub fn pvalue_scan<I>(
    ref_profile: &Profile,
    candidate_sizes: I,
    num_trials: usize,
    seed: u64,
) -> Result<Vec<(usize, f64)>>
where
    I: IntoIterator<Item = usize>,
{
    let mut out = Vec::new();
    for (idx, num_items) in candidate_sizes.into_iter().enumerate() {
        let candidate_seed = seed.wrapping_add(idx as u64);
        let p = estimate_pvalue(ref_profile, num_items, num_trials, candidate_seed)?;
        out.push((num_items, p));
    }
    Ok(out)
}
