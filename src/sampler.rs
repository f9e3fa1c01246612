//! Incremental occupancy sampling: simulate `N` uniform draws with replacement from
//! `M` items, producing only the multiplicity-count profile.
//!
//! The sampler never tracks items individually. Because items sharing a multiplicity
//! are exchangeable, a uniform integer `r` in `[0, M)` can be interpreted directly
//! against the *current* profile: the first \(U = \sum_i dd_i\) of the `M` equally
//! likely slots belong, in increasing multiplicity order, to the existing groups
//! `dd[0], dd[1], ...` (each group spanning as many slots as its count), and the
//! remaining `M − U` slots belong to never-drawn items. A draw therefore moves one
//! anonymous item up a multiplicity group, or starts a fresh item at multiplicity 1.
//!
//! Space is proportional to the maximum multiplicity observed (typically small),
//! never to `M`; time is `O(N · max_multiplicity)`. The probability model in
//! [`crate::log_probability`] is exact for profiles generated by this process.

#![forbid(unsafe_code)]

use rand::distributions::Uniform;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{OccupancyError, Profile, Result};

/// Simulates uniform draws with replacement from a collection of fixed size,
/// tallying outcomes as a [`Profile`].
///
/// One sampler owns one seeded random stream; the stream evolves across calls, so
/// successive [`draw`](Self::draw) calls yield independent trials while the whole
/// sequence stays reproducible for a given seed.
///
/// # Examples
///
/// ```
/// use occupancy::OccupancySampler;
///
/// let mut sampler = OccupancySampler::new(100, 42).unwrap();
/// let profile = sampler.draw(200);
/// assert_eq!(profile.num_draws(), 200);
/// assert!(profile.num_distinct() <= 100);
/// ```
#[derive(Debug, Clone)]
pub struct OccupancySampler {
    num_items: usize,
    slot: Uniform<usize>,
    rng: ChaCha8Rng,
}

impl OccupancySampler {
    /// Create a sampler for a collection of `num_items` distinct items, with a
    /// reproducible stream derived from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`OccupancyError::Invalid`] if `num_items` is zero: there is nothing
    /// to draw from, and the slot range `[0, 0)` is empty.
    pub fn new(num_items: usize, seed: u64) -> Result<Self> {
        if num_items == 0 {
            return Err(OccupancyError::Invalid("num_items must be >= 1"));
        }
        Ok(Self {
            num_items,
            slot: Uniform::from(0..num_items),
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Collection size this sampler draws from.
    #[must_use]
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// Simulate `num_draws` draws and return the resulting profile.
    ///
    /// `num_draws == 0` yields the empty profile.
    #[must_use]
    pub fn draw(&mut self, num_draws: usize) -> Profile {
        let mut profile = Profile::empty();
        self.draw_into(&mut profile, num_draws);
        profile
    }

    /// Simulate `num_draws` draws into an existing profile, reusing its allocation.
    ///
    /// The profile is cleared first; on return it satisfies
    /// `profile.num_draws() == num_draws` and
    /// `profile.num_distinct() <= self.num_items()`.
    pub fn draw_into(&mut self, profile: &mut Profile, num_draws: usize) {
        let dd = &mut profile.dd;
        dd.clear();

        for _ in 0..num_draws {
            let r = self.rng.sample(self.slot);

            // Scan multiplicity groups in increasing order until the cumulative
            // group size passes r.
            let mut bin = 0;
            let mut sum = 0;
            while bin < dd.len() {
                sum += dd[bin];
                if r < sum {
                    break;
                }
                bin += 1;
            }

            if bin == dd.len() {
                // r landed past every existing group: a never-drawn item enters
                // at multiplicity 1.
                bin = 0;
            } else {
                // The hit item leaves its group and joins the next one.
                dd[bin] -= 1;
                bin += 1;
            }

            if bin == dd.len() {
                dd.push(0);
            }
            dd[bin] += 1;
        }

        // The top bin was just incremented, so no trailing zeros can remain;
        // intermediate bins may legitimately hold zeros.
        debug_assert_ne!(dd.last(), Some(&0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn conservation_holds_for_any_draw(
            num_items in 1usize..60,
            num_draws in 0usize..300,
            seed in 0u64..1_000,
        ) {
            let mut sampler = OccupancySampler::new(num_items, seed).unwrap();
            let p = sampler.draw(num_draws);
            prop_assert_eq!(p.num_draws(), num_draws);
            prop_assert!(p.num_distinct() <= num_items);
            prop_assert_ne!(p.dd.last(), Some(&0));
        }

        #[test]
        fn same_seed_same_profile(
            num_items in 1usize..40,
            num_draws in 0usize..200,
            seed in 0u64..1_000,
        ) {
            let mut a = OccupancySampler::new(num_items, seed).unwrap();
            let mut b = OccupancySampler::new(num_items, seed).unwrap();
            prop_assert_eq!(a.draw(num_draws), b.draw(num_draws));
        }

        #[test]
        fn draw_into_matches_draw(
            num_items in 1usize..40,
            num_draws in 0usize..200,
            seed in 0u64..1_000,
        ) {
            let mut a = OccupancySampler::new(num_items, seed).unwrap();
            let mut b = OccupancySampler::new(num_items, seed).unwrap();
            let fresh = a.draw(num_draws);
            // A dirty, reused buffer must give the identical result.
            let mut reused = Profile::from_multiplicity_counts(vec![9, 9, 9]);
            b.draw_into(&mut reused, num_draws);
            prop_assert_eq!(fresh, reused);
        }
    }

    #[test]
    fn rejects_empty_collection() {
        assert!(OccupancySampler::new(0, 1).is_err());
    }

    #[test]
    fn zero_draws_yield_empty_profile() {
        let mut sampler = OccupancySampler::new(100, 0).unwrap();
        let p = sampler.draw(0);
        assert!(p.is_empty());
        assert_eq!(p.num_draws(), 0);
    }

    #[test]
    fn single_item_always_collides() {
        // M = 1: every draw hits the same item, so dd must be [0, ..., 0, 1].
        let mut sampler = OccupancySampler::new(1, 7).unwrap();
        for n in 1..8 {
            let p = sampler.draw(n);
            let mut expected = vec![0usize; n];
            expected[n - 1] = 1;
            assert_eq!(p.dd, expected);
        }
    }

    #[test]
    fn only_reachable_shapes_for_three_from_three() {
        // M = 3, N = 3: exactly three profile shapes exist.
        let all_distinct = Profile::from_multiplicity_counts(vec![3]);
        let one_pair = Profile::from_multiplicity_counts(vec![1, 1]);
        let triple = Profile::from_multiplicity_counts(vec![0, 0, 1]);

        let mut sampler = OccupancySampler::new(3, 42).unwrap();
        let mut seen = [false; 3];
        for _ in 0..1_000 {
            let p = sampler.draw(3);
            assert_eq!(p.num_draws(), 3);
            assert!(p.num_distinct() <= 3);
            if p == all_distinct {
                seen[0] = true;
            } else if p == one_pair {
                seen[1] = true;
            } else if p == triple {
                seen[2] = true;
            } else {
                panic!("unreachable profile shape: {:?}", p.dd);
            }
        }
        // Over 1000 trials every shape shows up (the rarest has probability 1/9).
        assert!(seen.iter().all(|&s| s), "shapes seen: {seen:?}");
    }

    #[test]
    fn stream_evolves_across_draws() {
        // Two consecutive draws on one sampler come from one evolving stream and
        // are (almost surely) different for these parameters.
        let mut sampler = OccupancySampler::new(10, 3).unwrap();
        let first = sampler.draw(1_000);
        let second = sampler.draw(1_000);
        assert_ne!(first, second);
    }
}
