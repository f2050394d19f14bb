//! Streaming ε-approximate quantile estimation (the P² algorithm, Jain & Chlamtac
//! 1985). One estimator instance tracks one probability level `p` in O(1) memory;
//! the Stratifier and CLHS pass 1 (SPEC_FULL.md §4.I/§4.J) each run one estimator
//! per `(band, probe level)` pair.

/// A single P² marker-based streaming quantile estimator for one probability `p`.
#[derive(Debug, Clone)]
pub struct QuantileEstimator {
    p: f64,
    /// Marker heights (the running quantile estimate lives in `heights[2]`).
    heights: [f64; 5],
    /// Marker positions (integer counts, stored as f64 for arithmetic convenience).
    positions: [f64; 5],
    /// Desired (ideal, fractional) marker positions.
    desired: [f64; 5],
    /// Per-observation increment to the desired positions.
    increments: [f64; 5],
    /// Buffer for the first five observations, before the markers are initialized.
    startup: Vec<f64>,
    count: u64,
}

impl QuantileEstimator {
    pub fn new(p: f64) -> QuantileEstimator {
        assert!(p > 0.0 && p < 1.0, "quantile probability must be in (0,1)");
        QuantileEstimator {
            p,
            heights: [0.0; 5],
            positions: [0.0; 5],
            desired: [0.0; 5],
            increments: [0.0; 5],
            startup: Vec::with_capacity(5),
            count: 0,
        }
    }

    pub fn probability(&self) -> f64 {
        self.p
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Feed one observation into the estimator.
    pub fn update(&mut self, x: f64) {
        self.count += 1;
        if self.startup.len() < 5 {
            self.startup.push(x);
            if self.startup.len() == 5 {
                self.startup.sort_by(|a, b| a.partial_cmp(b).unwrap());
                for i in 0..5 {
                    self.heights[i] = self.startup[i];
                    self.positions[i] = (i + 1) as f64;
                }
                let p = self.p;
                self.desired = [1.0, 1.0 + 2.0 * p, 1.0 + 4.0 * p, 3.0 + 2.0 * p, 5.0];
                self.increments = [0.0, p / 2.0, p, (1.0 + p) / 2.0, 1.0];
            }
            return;
        }

        // locate cell k such that heights[k] <= x < heights[k+1]
        let mut k: usize;
        if x < self.heights[0] {
            self.heights[0] = x;
            k = 0;
        } else {
            k = 3;
            for i in 0..4 {
                if x < self.heights[i + 1] {
                    k = i;
                    break;
                }
            }
            if x >= self.heights[4] {
                self.heights[4] = x;
                k = 3;
            }
        }

        for i in (k + 1)..5 {
            self.positions[i] += 1.0;
        }
        for i in 0..5 {
            self.desired[i] += self.increments[i];
        }

        for i in 1..4 {
            let d = self.desired[i] - self.positions[i];
            if (d >= 1.0 && self.positions[i + 1] - self.positions[i] > 1.0)
                || (d <= -1.0 && self.positions[i - 1] - self.positions[i] < -1.0)
            {
                let sign = if d >= 0.0 { 1.0 } else { -1.0 };
                let parabolic = self.parabolic(i, sign);
                let new_height = if self.heights[i - 1] < parabolic && parabolic < self.heights[i + 1]
                {
                    parabolic
                } else {
                    self.linear(i, sign)
                };
                self.heights[i] = new_height;
                self.positions[i] += sign;
            }
        }
    }

    fn parabolic(&self, i: usize, d: f64) -> f64 {
        let (qm1, q, qp1) = (self.heights[i - 1], self.heights[i], self.heights[i + 1]);
        let (nm1, n, np1) = (self.positions[i - 1], self.positions[i], self.positions[i + 1]);
        q + d / (np1 - nm1)
            * ((n - nm1 + d) * (qp1 - q) / (np1 - n) + (np1 - n - d) * (q - qm1) / (n - nm1))
    }

    fn linear(&self, i: usize, d: f64) -> f64 {
        let j = if d >= 0.0 { i + 1 } else { i - 1 };
        self.heights[i] + d * (self.heights[j] - self.heights[i]) / (self.positions[j] - self.positions[i])
    }

    /// Current estimate of the `p`-quantile. Exact for `count < 5`.
    pub fn estimate(&self) -> f64 {
        if self.startup.len() < 5 {
            if self.startup.is_empty() {
                return 0.0;
            }
            let mut sorted = self.startup.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let idx = ((sorted.len() as f64 - 1.0) * self.p).round() as usize;
            return sorted[idx];
        }
        self.heights[2]
    }
}

/// Convenience wrapper tracking several probability levels over the same stream in
/// one pass (one `QuantileEstimator` per level internally).
#[derive(Debug, Clone)]
pub struct MultiQuantileEstimator {
    estimators: Vec<QuantileEstimator>,
}

impl MultiQuantileEstimator {
    pub fn new(levels: &[f64]) -> MultiQuantileEstimator {
        MultiQuantileEstimator {
            estimators: levels.iter().map(|&p| QuantileEstimator::new(p)).collect(),
        }
    }

    pub fn update(&mut self, x: f64) {
        for e in &mut self.estimators {
            e.update(x);
        }
    }

    /// Cut points, one per level, guaranteed non-decreasing (spec P9) by a final
    /// monotonic clamp over the (already near-monotone) per-level estimates.
    pub fn cut_points(&self) -> Vec<f64> {
        let mut out: Vec<f64> = self.estimators.iter().map(|e| e.estimate()).collect();
        for i in 1..out.len() {
            if out[i] < out[i - 1] {
                out[i] = out[i - 1];
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_of_uniform_sequence() {
        let mut est = QuantileEstimator::new(0.5);
        for i in 0..1000 {
            est.update(i as f64);
        }
        let m = est.estimate();
        assert!((m - 499.5).abs() < 20.0, "median estimate {} too far off", m);
    }

    #[test]
    fn cut_points_are_non_decreasing() {
        let mut multi = MultiQuantileEstimator::new(&[0.25, 0.5, 0.75]);
        for i in 0..100 {
            multi.update((i % 37) as f64);
        }
        let cuts = multi.cut_points();
        assert!(cuts.windows(2).all(|w| w[0] <= w[1]));
    }
}
