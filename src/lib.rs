//! `occupancy`: collection-size inference from repeat-count profiles.
//!
//! Motivating scenario: an Internet radio station plays songs from a playlist of
//! unknown length. After listening for a while, some songs have recurred once, a few
//! twice, and so on. The multiplicity histogram of those repeats — the **profile** —
//! carries everything the sample can say about the playlist's true size.
//!
//! The model is the classical occupancy urn: `N` independent uniform draws **with
//! replacement** from `M` labeled items. This crate provides:
//!
//! - [`Profile`]: the multiplicity-count vector (`dd[i]` = number of distinct items
//!   drawn exactly `i + 1` times), the sufficient statistic of the sample.
//! - [`log_probability`]: the exact closed-form log-probability of a profile under
//!   uniform sampling with replacement from `M` items.
//! - [`sampler::OccupancySampler`]: simulates draws **without materializing an
//!   `M`-sized structure**, using only the profile itself.
//! - [`montecarlo`]: Monte Carlo estimation of how typical an observed profile is
//!   for a hypothesized `M` (a one-sided p-value), and a scan over candidate sizes.
//! - [`mle`]: the closed-form maximum-likelihood estimate of `M` from the profile's
//!   draw and distinct-item totals.
//! - [`exact`]: exact enumeration and integer counting for small cases, used to
//!   cross-check the probability model.
//!
//! ## Quick example
//!
//! ```rust
//! use occupancy::{estimate_pvalue, log_probability, Profile};
//!
//! // 27 songs heard once, 22 twice, 25 thrice, 8 four times, 2 five, 2 six.
//! let observed = Profile::from_multiplicity_counts(vec![27, 22, 25, 8, 2, 2]);
//! assert_eq!(observed.num_draws(), 200);
//! assert_eq!(observed.num_distinct(), 86);
//!
//! // How probable is this exact profile if the playlist holds 100 songs?
//! let log_p = log_probability(&observed, 100).unwrap();
//! assert!(log_p < 0.0);
//!
//! // How typical is it, relative to what 100 songs would actually generate?
//! let p = estimate_pvalue(&observed, 100, 2_000, 7).unwrap();
//! assert!((0.0..=1.0).contains(&p));
//! ```
//!
//! ## References (orientation)
//!
//! - Feller (1968), *An Introduction to Probability Theory*, vol. I, ch. II & IV
//!   (occupancy problems, balls into cells)
//! - Good (1953), "The population frequencies of species and the estimation of
//!   population parameters" — the same counts-of-counts statistic, there called
//!   the frequency-of-frequencies vector

#![forbid(unsafe_code)]

use statrs::function::gamma::ln_gamma;
use thiserror::Error;

pub mod exact;
pub mod mle;
pub mod montecarlo;
pub mod sampler;

pub use montecarlo::{estimate_pvalue, simulate};
pub use sampler::OccupancySampler;

/// Errors for the occupancy model and its estimators.
#[derive(Debug, Error)]
pub enum OccupancyError {
    #[error("empty profile")]
    EmptyProfile,

    #[error("invalid input: {0}")]
    Invalid(&'static str),
}

pub type Result<T> = core::result::Result<T, OccupancyError>;

/// A multiplicity-count profile: `dd[i]` is the number of distinct items that were
/// drawn exactly `i + 1` times.
///
/// Items never drawn are not represented; they are implicit as `M − Σ dd` for a
/// hypothesized collection size `M`. Trailing zero bins are never stored, so
/// `dd.len()` is the maximum multiplicity observed.
///
/// Invariants for any profile produced by `N` draws from `M` items:
///
/// - \(\sum_i dd_i \le M\) (distinct items drawn cannot exceed the collection size);
/// - \(\sum_i (i+1) \cdot dd_i = N\) (every draw raises exactly one item's
///   multiplicity by one).
///
/// # Examples
///
/// ```
/// use occupancy::Profile;
///
/// // Four items with per-item repeat counts [5, 3, 1, 1]:
/// let p = Profile::from_counts([5, 3, 1, 1]);
/// assert_eq!(p.num_draws(), 10);
/// assert_eq!(p.num_distinct(), 4);
/// assert_eq!(p.count_of(1), 2); // two items heard exactly once
/// assert_eq!(p.max_multiplicity(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    /// Multiplicity counts, index `i` meaning "drawn exactly `i + 1` times".
    pub dd: Vec<usize>,
}

impl Profile {
    /// The empty profile: zero draws, zero distinct items, probability 1 under any
    /// collection size.
    #[must_use]
    pub fn empty() -> Self {
        Self { dd: Vec::new() }
    }

    /// Build a profile from a raw multiplicity-count vector (`dd[i]` = items drawn
    /// exactly `i + 1` times). Trailing zero bins are trimmed so the representation
    /// is canonical.
    ///
    /// # Examples
    ///
    /// ```
    /// use occupancy::Profile;
    ///
    /// let p = Profile::from_multiplicity_counts(vec![2, 1, 0, 0]);
    /// assert_eq!(p.dd, vec![2, 1]);
    /// ```
    #[must_use]
    pub fn from_multiplicity_counts(mut dd: Vec<usize>) -> Self {
        while dd.last() == Some(&0) {
            dd.pop();
        }
        Self { dd }
    }

    /// Build a profile from per-item repeat counts. Zero counts are ignored (they
    /// correspond to items never drawn); an empty iterator yields the empty profile.
    ///
    /// Example: counts `[5, 3, 1, 1]` produce `dd = [2, 0, 1, 0, 1]`.
    #[must_use]
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let counts: Vec<usize> = counts.into_iter().filter(|&c| c > 0).collect();
        let max_c = counts.iter().copied().max().unwrap_or(0);
        let mut dd = vec![0usize; max_c];
        for c in counts {
            dd[c - 1] += 1;
        }
        Self { dd }
    }

    /// Total number of draws represented: \(N = \sum_i (i+1) \cdot dd_i\).
    #[must_use]
    pub fn num_draws(&self) -> usize {
        self.dd.iter().enumerate().map(|(i, &d)| (i + 1) * d).sum()
    }

    /// Number of distinct items drawn at least once: \(U = \sum_i dd_i\).
    #[must_use]
    pub fn num_distinct(&self) -> usize {
        self.dd.iter().sum()
    }

    /// Number of distinct items drawn exactly `multiplicity` times.
    ///
    /// Returns 0 for `multiplicity == 0` and for multiplicities beyond the observed
    /// maximum.
    #[must_use]
    pub fn count_of(&self, multiplicity: usize) -> usize {
        if multiplicity == 0 {
            return 0;
        }
        self.dd.get(multiplicity - 1).copied().unwrap_or(0)
    }

    /// Largest multiplicity observed (0 for the empty profile).
    #[must_use]
    pub fn max_multiplicity(&self) -> usize {
        self.dd.len()
    }

    /// True for the zero-draw profile.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dd.is_empty()
    }
}

/// Exact natural-log probability of observing `profile` after `N` uniform draws
/// with replacement from `num_items` labeled items, where `N` is the profile's own
/// draw total.
///
/// This is the probability of the profile as a *type*: it sums over every
/// assignment of specific item identities that realizes the same multiplicity
/// counts. With \(N = \sum_i (i+1)\,dd_i\) and \(U = \sum_i dd_i\):
///
/// \[
/// \log P = \ln\Gamma(1+N)
///        - \sum_i \bigl[\ln\Gamma(1+dd_i) + dd_i \ln\Gamma(2+i)\bigr]
///        + \ln\Gamma(1+M) - \ln\Gamma(1+M-U) - N \ln M
/// \]
///
/// The leading gamma terms count the ways to allot the `N` ordered draws to
/// multiplicity groups; \(\ln\Gamma(1+M)-\ln\Gamma(1+M-U)\) is the log falling
/// factorial \(M!/(M-U)!\), the ways to pick which items were drawn at all; the
/// \(dd_i!\) denominators remove permutations of interchangeable items within a
/// multiplicity group; and \(M^N\) is the total outcome space.
///
/// The empty profile has probability exactly 1 (`0.0` returned) for any
/// `num_items`, including 0; the \(N \ln M\) term is only applied when `N > 0`.
///
/// # Errors
///
/// Returns [`OccupancyError::Invalid`] if `num_items` is smaller than the number of
/// distinct items the profile records — such a profile cannot arise from that
/// collection, and silently returning a value would be meaningless.
///
/// # Examples
///
/// ```
/// use occupancy::{log_probability, Profile};
///
/// // 3 draws from 3 items, outcome "one pair and one single":
/// let p = Profile::from_multiplicity_counts(vec![1, 1]);
/// let log_p = log_probability(&p, 3).unwrap();
/// // 18 of the 27 equally likely draw sequences realize this profile.
/// assert!((log_p - (18.0f64 / 27.0).ln()).abs() < 1e-12);
///
/// // Zero draws: probability 1.
/// assert_eq!(log_probability(&occupancy::Profile::empty(), 100).unwrap(), 0.0);
/// ```
pub fn log_probability(profile: &Profile, num_items: usize) -> Result<f64> {
    let num_distinct = profile.num_distinct();
    if num_items < num_distinct {
        return Err(OccupancyError::Invalid(
            "num_items must be >= distinct items in the profile",
        ));
    }

    let mut num_draws = 0usize;
    let mut log_denom = 0.0;
    for (i, &d) in profile.dd.iter().enumerate() {
        let mult = i + 1;
        num_draws += d * mult;
        log_denom += ln_gamma(1.0 + d as f64) + (d as f64) * ln_gamma(1.0 + mult as f64);
    }

    let m = num_items as f64;
    let mut log_p = ln_gamma(1.0 + num_draws as f64) - log_denom + ln_gamma(1.0 + m)
        - ln_gamma(1.0 + (num_items - num_distinct) as f64);
    if num_draws > 0 {
        log_p -= (num_draws as f64) * m.ln();
    }
    Ok(log_p)
}
