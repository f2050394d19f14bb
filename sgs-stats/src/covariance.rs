//! Streaming covariance/correlation accumulator (multivariate Welford update).
//!
//! Consumed by CLHS pass 1 (SPEC_FULL.md §4.I) to build `Corr_pop`, and by pass 2
//! to recompute `Corr_sample` whenever the working sample is mutated.

use nalgebra::DMatrix;

/// Numerically stable single-pass mean/covariance accumulator over `k` features.
#[derive(Debug, Clone)]
pub struct CovarianceAccumulator {
    k: usize,
    n: u64,
    mean: Vec<f64>,
    /// Upper-triangular running sum of co-moments, `m2[i*k+j]` for `j >= i`.
    m2: Vec<f64>,
}

impl CovarianceAccumulator {
    pub fn new(num_features: usize) -> CovarianceAccumulator {
        CovarianceAccumulator {
            k: num_features,
            n: 0,
            mean: vec![0.0; num_features],
            m2: vec![0.0; num_features * num_features],
        }
    }

    pub fn num_features(&self) -> usize {
        self.k
    }

    pub fn count(&self) -> u64 {
        self.n
    }

    /// Feed one row of `k` feature values.
    pub fn update(&mut self, row: &[f64]) {
        assert_eq!(row.len(), self.k);
        self.n += 1;
        let n = self.n as f64;
        let mut delta = vec![0.0; self.k];
        for i in 0..self.k {
            delta[i] = row[i] - self.mean[i];
            self.mean[i] += delta[i] / n;
        }
        for i in 0..self.k {
            for j in i..self.k {
                self.m2[i * self.k + j] += delta[i] * (row[j] - self.mean[j]);
            }
        }
    }

    /// Population covariance matrix (`k x k`, symmetric).
    pub fn covariance(&self) -> DMatrix<f64> {
        let mut cov = DMatrix::<f64>::zeros(self.k, self.k);
        let denom = if self.n > 1 { self.n as f64 } else { 1.0 };
        for i in 0..self.k {
            for j in i..self.k {
                let v = self.m2[i * self.k + j] / denom;
                cov[(i, j)] = v;
                cov[(j, i)] = v;
            }
        }
        cov
    }

    /// Pearson correlation matrix derived from the running covariance.
    pub fn correlation(&self) -> DMatrix<f64> {
        let cov = self.covariance();
        let mut corr = DMatrix::<f64>::zeros(self.k, self.k);
        let stdev: Vec<f64> = (0..self.k).map(|i| cov[(i, i)].sqrt()).collect();
        for i in 0..self.k {
            for j in 0..self.k {
                let denom = stdev[i] * stdev[j];
                corr[(i, j)] = if denom > 0.0 { cov[(i, j)] / denom } else { 0.0 };
            }
        }
        corr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_of_identical_features_is_one() {
        let mut acc = CovarianceAccumulator::new(2);
        for i in 0..50 {
            let v = i as f64;
            acc.update(&[v, v]);
        }
        let corr = acc.correlation();
        assert!((corr[(0, 1)] - 1.0).abs() < 1e-9);
        assert!((corr[(0, 0)] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn correlation_of_independent_constant_offset_features() {
        let mut acc = CovarianceAccumulator::new(2);
        for i in 0..50 {
            let v = i as f64;
            acc.update(&[v, -v + 10.0]);
        }
        let corr = acc.correlation();
        assert!((corr[(0, 1)] + 1.0).abs() < 1e-9);
    }
}
