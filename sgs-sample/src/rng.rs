//! PRNG & Mask Selector (component B).
//!
//! The generator is xoshiro256++, chosen for its 256-bit state and good
//! linear complexity in the high bits; the low 11 bits of every draw are
//! discarded before use, per the algorithm's own guidance.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Acceptance probability expressed as a bitmask test: `(w >> 11) & mask == mask`.
/// A `mask` of `0` means "always accept" (used when `p` is large enough that
/// `numerator >= denominator` in the derivation formula).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskSelector {
    mask: u64,
}

impl MaskSelector {
    pub fn always_accept() -> MaskSelector {
        MaskSelector { mask: 0 }
    }

    /// Build the selector for a target acceptance probability `p`.
    /// `n = ceil(log2(1/p))`, `mask = (1 << n) - 1`.
    pub fn from_probability(p: f64) -> MaskSelector {
        if p >= 1.0 {
            return MaskSelector::always_accept();
        }
        if p <= 0.0 {
            // smallest representable acceptance chance under a 53-bit draw
            return MaskSelector { mask: (1u64 << 53) - 1 };
        }
        let n = (1.0 / p).log2().ceil() as u32;
        let n = n.min(53);
        MaskSelector { mask: (1u64 << n) - 1 }
    }

    /// Derive the target acceptance probability from the spec's formula:
    /// `p = (samples * safety_factor * mindist_factor * access_ratio) / (width * height)`.
    /// Returns `1.0` (always-accept) if the numerator already meets or exceeds
    /// the denominator.
    pub fn derive_probability(
        samples: usize,
        width: usize,
        height: usize,
        safety_factor: f64,
        mindist_factor: f64,
        access_ratio: f64,
    ) -> f64 {
        let numerator = samples as f64 * safety_factor * mindist_factor * access_ratio;
        let denominator = (width * height) as f64;
        if numerator >= denominator || denominator == 0.0 {
            1.0
        } else {
            numerator / denominator
        }
    }

    #[inline]
    pub fn accept(&self, draw: u64) -> bool {
        if self.mask == 0 {
            return true;
        }
        ((draw >> 11) & self.mask) == self.mask
    }
}

/// Safety factor per spec: 4 for ordinary pools, 32 for Queinnec pools
/// (the focal-window eligibility test rejects far more candidates than a
/// plain per-pixel test, so the pool needs a higher oversampling margin).
pub fn safety_factor(is_queinnec: bool) -> f64 {
    if is_queinnec {
        32.0
    } else {
        4.0
    }
}

pub fn mindist_factor(mindist: f64) -> f64 {
    if mindist > 0.0 {
        3.0
    } else {
        1.0
    }
}

/// A per-thread PRNG stream. New streams are derived from a root stream via
/// the generator's own `long_jump`, which is the splittable-seeding rule
/// spec §4.B and §5 both call for: disjoint, non-overlapping sequences
/// without needing to agree on a counter between threads.
pub struct StreamSource {
    root: Xoshiro256PlusPlus,
}

impl StreamSource {
    pub fn from_seed(seed: u64) -> StreamSource {
        StreamSource {
            root: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> StreamSource {
        StreamSource {
            root: Xoshiro256PlusPlus::from_entropy(),
        }
    }

    /// Split off the next disjoint stream. Each call advances the root
    /// generator by a long jump so repeated calls never overlap.
    pub fn next_stream(&mut self) -> Xoshiro256PlusPlus {
        let stream = self.root.clone();
        self.root.long_jump();
        stream
    }
}

/// Precomputes a block's worth of accept/reject decisions so the inner
/// pixel loop is a simple vector index rather than a PRNG call, per
/// spec §4.B's precomputation contract.
pub struct BlockMask {
    decisions: Vec<bool>,
    cursor: usize,
}

impl BlockMask {
    pub fn fill(rng: &mut Xoshiro256PlusPlus, selector: &MaskSelector, len: usize) -> BlockMask {
        let decisions = (0..len).map(|_| selector.accept(rng.gen::<u64>())).collect();
        BlockMask { decisions, cursor: 0 }
    }

    #[inline]
    pub fn next(&mut self) -> bool {
        let v = self.decisions[self.cursor];
        self.cursor += 1;
        v
    }

    pub fn refill(&mut self, rng: &mut Xoshiro256PlusPlus, selector: &MaskSelector, len: usize) {
        self.decisions.clear();
        self.decisions
            .extend((0..len).map(|_| selector.accept(rng.gen::<u64>())));
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_accept_mask_accepts_everything() {
        let sel = MaskSelector::always_accept();
        assert!(sel.accept(0));
        assert!(sel.accept(u64::MAX));
    }

    #[test]
    fn derive_probability_saturates_at_one() {
        let p = MaskSelector::derive_probability(1000, 10, 10, 4.0, 1.0, 1.0);
        assert_eq!(p, 1.0);
    }

    #[test]
    fn derive_probability_is_fractional_for_large_rasters() {
        let p = MaskSelector::derive_probability(10, 1000, 1000, 4.0, 1.0, 1.0);
        assert!(p > 0.0 && p < 1.0);
    }

    #[test]
    fn streams_from_same_seed_differ_after_split() {
        let mut src = StreamSource::from_seed(0xC0FFEE);
        let mut a = src.next_stream();
        let mut b = src.next_stream();
        assert_ne!(a.gen::<u64>(), b.gen::<u64>());
    }

    #[test]
    fn block_mask_replays_same_decision_per_index() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let sel = MaskSelector::from_probability(0.5);
        let mut mask = BlockMask::fill(&mut rng, &sel, 16);
        for _ in 0..16 {
            mask.next();
        }
    }
}
