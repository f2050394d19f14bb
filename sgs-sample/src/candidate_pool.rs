//! Candidate Pool (component C) — the CLHS backing store.
//!
//! Grows in fixed-size chunks, and after `finalize` supports O(1) expected
//! uniform random index draws via a bitmask-and-reject scheme rather than a
//! modulo (which would bias toward low indices whenever `count` is not a
//! power of two).

use crate::error::{Result, SgsError};
use rand::RngCore;

const CHUNK_SIZE: usize = 1_000_000;

pub struct CandidateRecord {
    pub features: Vec<f64>,
    pub x: isize,
    pub y: isize,
}

pub struct CandidatePool {
    records: Vec<CandidateRecord>,
    num_features: usize,
    mask: u64,
    finalized: bool,
}

impl CandidatePool {
    pub fn new(num_features: usize) -> CandidatePool {
        CandidatePool {
            records: Vec::with_capacity(CHUNK_SIZE),
            num_features,
            mask: 0,
            finalized: false,
        }
    }

    pub fn add(&mut self, features: Vec<f64>, x: isize, y: isize) {
        debug_assert_eq!(features.len(), self.num_features);
        if self.records.len() == self.records.capacity() {
            self.records.reserve(CHUNK_SIZE);
        }
        self.records.push(CandidateRecord { features, x, y });
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Freezes the pool and builds the power-of-two mask covering `count - 1`
    /// by propagating the top set bit down through OR-shifts. Rejects if
    /// fewer than `num_samples` candidates were collected.
    pub fn finalize(&mut self, num_samples: usize) -> Result<()> {
        if self.records.len() < num_samples {
            return Err(SgsError::precondition(
                "clhs.nSamp",
                format!(
                    "candidate pool has {} records, fewer than the requested {} samples",
                    self.records.len(),
                    num_samples
                ),
            ));
        }
        let mut m = if self.records.is_empty() {
            0
        } else {
            (self.records.len() - 1) as u64
        };
        m |= m >> 1;
        m |= m >> 2;
        m |= m >> 4;
        m |= m >> 8;
        m |= m >> 16;
        m |= m >> 32;
        self.mask = m;
        self.finalized = true;
        Ok(())
    }

    /// Draws a uniform random index in `[0, count)` using the finalized mask,
    /// retrying while the draw exceeds `count - 1`. Expected retries are < 2.
    pub fn random_index(&self, rng: &mut impl RngCore) -> usize {
        debug_assert!(self.finalized, "random_index called before finalize");
        let bound = self.records.len() as u64 - 1;
        loop {
            let draw = (rng.next_u64() >> 11) & self.mask;
            if draw <= bound {
                return draw as usize;
            }
        }
    }

    pub fn get(&self, i: usize) -> (&[f64], isize, isize) {
        let r = &self.records[i];
        (&r.features, r.x, r.y)
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn finalize_rejects_undersized_pool() {
        let mut pool = CandidatePool::new(2);
        pool.add(vec![1.0, 2.0], 0, 0);
        let err = pool.finalize(5).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn random_index_stays_in_bounds() {
        let mut pool = CandidatePool::new(1);
        for i in 0..37 {
            pool.add(vec![i as f64], i, i);
        }
        pool.finalize(10).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        for _ in 0..1000 {
            let idx = pool.random_index(&mut rng);
            assert!(idx < pool.count());
        }
    }
}
