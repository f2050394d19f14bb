//! Dense PCA trainer over a small number of input bands.
//!
//! Grounded on the teacher's `tools/math_stat_analysis/principal_component_analysis.rs`:
//! build a covariance (or correlation, if `standardized`) matrix with `nalgebra`,
//! take its symmetric eigendecomposition, and rank components by explained variance.

use crate::covariance::CovarianceAccumulator;
use log::warn;
use nalgebra::DMatrix;

#[derive(Debug, Clone)]
pub struct PcaResult {
    /// Eigenvalues, ordered from highest to lowest explained variance.
    pub eigenvalues: Vec<f64>,
    /// Row-major `k x k` eigenvectors; `eigenvectors[pc * k + j]` is component
    /// `pc`'s loading on input feature `j`.
    pub eigenvectors: Vec<f64>,
    /// Percentage of total variance explained by each component, same order as
    /// `eigenvalues`.
    pub explained_variance: Vec<f64>,
    pub num_features: usize,
}

pub struct PcaTrainer {
    standardized: bool,
}

impl PcaTrainer {
    pub fn new(standardized: bool) -> PcaTrainer {
        PcaTrainer { standardized }
    }

    /// Train on an already-accumulated covariance/correlation source.
    pub fn fit(&self, acc: &CovarianceAccumulator) -> PcaResult {
        let k = acc.num_features();
        let m = if self.standardized {
            acc.correlation()
        } else {
            acc.covariance()
        };
        self.fit_matrix(&m, k)
    }

    fn fit_matrix(&self, m: &DMatrix<f64>, k: usize) -> PcaResult {
        let eig = m.clone().symmetric_eigen();
        let raw_eigenvalues = eig.eigenvalues.as_slice().to_vec();
        let raw_eigenvectors = eig.eigenvectors.as_slice().to_vec();

        let total: f64 = raw_eigenvalues.iter().sum();
        if total <= 0.0 {
            warn!("PCA input has zero total variance across {} feature(s); explained variance is undefined and reported as 0%", k);
        }
        let mut order: Vec<usize> = (0..k).collect();
        order.sort_by(|&a, &b| raw_eigenvalues[b].partial_cmp(&raw_eigenvalues[a]).unwrap());

        let mut eigenvalues = Vec::with_capacity(k);
        let mut explained_variance = Vec::with_capacity(k);
        let mut eigenvectors = vec![0.0; k * k];
        for (rank, &src) in order.iter().enumerate() {
            eigenvalues.push(raw_eigenvalues[src]);
            explained_variance.push(if total > 0.0 {
                100.0 * raw_eigenvalues[src] / total
            } else {
                0.0
            });
            for j in 0..k {
                // nalgebra stores eigenvectors column-major in `eigenvectors.as_slice()`.
                eigenvectors[rank * k + j] = raw_eigenvectors[src * k + j];
            }
        }

        PcaResult {
            eigenvalues,
            eigenvectors,
            explained_variance,
            num_features: k,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfectly_correlated_features_yield_one_dominant_component() {
        let mut acc = CovarianceAccumulator::new(2);
        for i in 0..100 {
            let v = i as f64;
            acc.update(&[v, 2.0 * v]);
        }
        let trainer = PcaTrainer::new(true);
        let result = trainer.fit(&acc);
        assert!(result.explained_variance[0] > 99.0);
    }
}
