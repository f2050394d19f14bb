//! Conditioned Latin Hypercube Sampling (component I).
//!
//! Pass 1 streams quantiles and correlation over the full raster; pass 2
//! anneals a fixed-size sample drawn from the candidate pool to match those
//! population statistics. The per-step correlation matrix is recomputed
//! from the current sample rather than updated incrementally (the teacher's
//! own streaming accumulators are built for a single forward pass, not
//! point-mutation); for `nSamp` in the hundreds this recomputation is cheap
//! relative to the I/O pass and keeps the annealing step easy to verify.

use crate::candidate_pool::CandidatePool;
use crate::error::Result;
use crate::rng::{mindist_factor, safety_factor, MaskSelector};
use nalgebra::DMatrix;
use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;
use sgs_raster::Raster;
use sgs_stats::{CovarianceAccumulator, QuantileEstimator};

pub struct ClhsOptions {
    pub n_samp: usize,
    pub iterations: usize,
}

pub struct ClhsResult {
    pub coords: Vec<(isize, isize)>,
    pub objective_trace: Vec<f64>,
}

struct QuantileBand {
    probes: Vec<QuantileEstimator>,
}

impl QuantileBand {
    fn new(n_samp: usize) -> QuantileBand {
        let probes = (1..n_samp)
            .map(|i| QuantileEstimator::new(i as f64 / n_samp as f64))
            .collect();
        QuantileBand { probes }
    }

    fn update(&mut self, x: f64) {
        for e in &mut self.probes {
            e.update(x);
        }
    }

    fn cut_points(&self) -> Vec<f64> {
        let mut out: Vec<f64> = self.probes.iter().map(|e| e.estimate()).collect();
        for i in 1..out.len() {
            if out[i] < out[i - 1] {
                out[i] = out[i - 1];
            }
        }
        out
    }

    /// Bucket index of `x` in `[0, n_samp)` via lower-bound on the cut points.
    fn bucket(&self, x: f64) -> usize {
        let cuts = self.cut_points();
        cuts.iter().filter(|&&c| x > c).count()
    }
}

/// Pass 1: stream quantiles (one `QuantileBand` per input band) and the
/// full correlation matrix, and assemble the candidate pool in the same
/// pass per spec §4.I.
fn run_pass1(raster_bands: &[&Raster], opts: &ClhsOptions, mut rng: Xoshiro256PlusPlus) -> (CandidatePool, Vec<QuantileBand>, DMatrix<f64>) {
    let k = raster_bands.len();
    let width = raster_bands[0].configs.columns;
    let height = raster_bands[0].configs.rows;

    let p = MaskSelector::derive_probability(opts.n_samp, width, height, safety_factor(false), mindist_factor(0.0), 1.0);
    let selector = MaskSelector::from_probability(p);

    let mut quantiles: Vec<QuantileBand> = (0..k).map(|_| QuantileBand::new(opts.n_samp)).collect();
    let mut cov = CovarianceAccumulator::new(k);
    let mut pool = CandidatePool::new(k);

    for row in 0..height as isize {
        for col in 0..width as isize {
            let mut values = Vec::with_capacity(k);
            let mut nodata = false;
            for b in raster_bands {
                let v = b.get_value(row, col);
                if v == b.configs.nodata || (b.configs.data_type.is_float() && v.is_nan()) {
                    nodata = true;
                }
                values.push(v);
            }
            if nodata {
                continue;
            }
            for (band_idx, v) in values.iter().enumerate() {
                quantiles[band_idx].update(*v);
            }
            cov.update(&values);
            if selector.accept(rng.gen::<u64>()) {
                pool.add(values, col, row);
            }
        }
    }

    (pool, quantiles, cov.correlation())
}

fn objective(
    counts: &[Vec<usize>],
    corr_sample: &DMatrix<f64>,
    corr_pop: &DMatrix<f64>,
) -> f64 {
    let mut o = 0.0;
    for band_counts in counts {
        for &c in band_counts {
            o += (c as f64 - 1.0).abs();
        }
    }
    let n = corr_pop.nrows();
    for i in 0..n {
        for j in 0..n {
            o += (corr_sample[(i, j)] - corr_pop[(i, j)]).abs();
        }
    }
    o
}

fn recompute_correlation(features: &[Vec<f64>], k: usize) -> DMatrix<f64> {
    let mut cov = CovarianceAccumulator::new(k);
    for row in features {
        cov.update(row);
    }
    cov.correlation()
}

pub fn run_clhs(raster_bands: &[&Raster], opts: &ClhsOptions, mut rng: Xoshiro256PlusPlus) -> Result<ClhsResult> {
    let k = raster_bands.len();
    let (mut pool, quantiles, corr_pop) = run_pass1(raster_bands, opts, rng.clone());
    pool.finalize(opts.n_samp)?;

    // Initial sample: draw nSamp distinct indices from the pool.
    let mut chosen_indices: Vec<usize> = Vec::with_capacity(opts.n_samp);
    while chosen_indices.len() < opts.n_samp {
        let idx = pool.random_index(&mut rng);
        if !chosen_indices.contains(&idx) {
            chosen_indices.push(idx);
        }
    }

    let mut features: Vec<Vec<f64>> = chosen_indices
        .iter()
        .map(|&i| pool.get(i).0.to_vec())
        .collect();
    let mut coords: Vec<(isize, isize)> = chosen_indices
        .iter()
        .map(|&i| {
            let (_, x, y) = pool.get(i);
            (x, y)
        })
        .collect();

    let mut counts: Vec<Vec<usize>> = (0..k).map(|_| vec![0usize; opts.n_samp]).collect();
    for (feat_idx, row) in features.iter().enumerate() {
        for band_idx in 0..k {
            let bucket = quantiles[band_idx].bucket(row[band_idx]);
            counts[band_idx][bucket.min(opts.n_samp - 1)] += 1;
        }
        let _ = feat_idx;
    }

    let mut corr_sample = recompute_correlation(&features, k);
    let mut current_o = objective(&counts, &corr_sample, &corr_pop);
    let mut trace = vec![current_o];

    for t in 0..opts.iterations {
        let temperature = 1.0 - t as f64 / opts.iterations as f64;
        if temperature <= 0.0 {
            break;
        }
        let quantile_part: f64 = counts
            .iter()
            .flat_map(|c| c.iter())
            .map(|&c| (c as f64 - 1.0).abs())
            .sum();
        if quantile_part == 0.0 {
            break;
        }

        // Choose a sample member to replace.
        let target = if rng.gen::<f64>() < 0.5 {
            rng.gen_range(0..opts.n_samp)
        } else {
            worst_sample_member(&counts, &features, &quantiles)
        };

        // Draw a replacement index, distinct from the current pool membership.
        let mut new_idx;
        loop {
            new_idx = pool.random_index(&mut rng);
            if !chosen_indices.contains(&new_idx) {
                break;
            }
        }

        let old_features = features[target].clone();
        let old_coord = coords[target];
        let old_index = chosen_indices[target];

        let new_features = pool.get(new_idx).0.to_vec();
        let (_, nx, ny) = pool.get(new_idx);

        // Remove old bucket membership, install the new row.
        for band_idx in 0..k {
            let old_bucket = quantiles[band_idx].bucket(old_features[band_idx]).min(opts.n_samp - 1);
            counts[band_idx][old_bucket] -= 1;
        }
        features[target] = new_features.clone();
        coords[target] = (nx, ny);
        chosen_indices[target] = new_idx;
        for band_idx in 0..k {
            let new_bucket = quantiles[band_idx].bucket(new_features[band_idx]).min(opts.n_samp - 1);
            counts[band_idx][new_bucket] += 1;
        }

        let candidate_corr = recompute_correlation(&features, k);
        let candidate_o = objective(&counts, &candidate_corr, &corr_pop);
        let delta = candidate_o - current_o;

        let accept = delta <= 0.0 || rng.gen::<f64>() < (-delta / temperature).exp();
        if accept {
            current_o = candidate_o;
            corr_sample = candidate_corr;
        } else {
            // revert
            for band_idx in 0..k {
                let new_bucket = quantiles[band_idx].bucket(features[target][band_idx]).min(opts.n_samp - 1);
                counts[band_idx][new_bucket] -= 1;
            }
            features[target] = old_features.clone();
            coords[target] = old_coord;
            chosen_indices[target] = old_index;
            for band_idx in 0..k {
                let old_bucket = quantiles[band_idx].bucket(old_features[band_idx]).min(opts.n_samp - 1);
                counts[band_idx][old_bucket] += 1;
            }
        }
        trace.push(current_o);
    }

    Ok(ClhsResult { coords, objective_trace: trace })
}

/// Picks the member belonging to the quantile with the largest count, in
/// the first feature that has an over-filled quantile — one fixed policy
/// among several the spec leaves open (§9 "CLHS worst sample selection").
fn worst_sample_member(counts: &[Vec<usize>], features: &[Vec<f64>], quantiles: &[QuantileBand]) -> usize {
    for (band_idx, band_counts) in counts.iter().enumerate() {
        if let Some((worst_bucket, _)) = band_counts.iter().enumerate().max_by_key(|&(_, &c)| c) {
            if band_counts[worst_bucket] > 1 {
                for (i, row) in features.iter().enumerate() {
                    if quantiles[band_idx].bucket(row[band_idx]).min(band_counts.len() - 1) == worst_bucket {
                        return i;
                    }
                }
            }
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use sgs_raster::RasterConfigs;

    fn fixture(width: usize, height: usize, seed_offset: f64) -> Raster {
        let mut cfg = RasterConfigs::default();
        cfg.columns = width;
        cfg.rows = height;
        cfg.nodata = -9999.0;
        cfg.data_type = sgs_raster::DataType::F64;
        let mut r = Raster::initialize_using_config("/tmp/unused_clhs.tif", &cfg);
        for row in 0..height as isize {
            for col in 0..width as isize {
                r.set_value(row, col, (row * width as isize + col) as f64 + seed_offset);
            }
        }
        r
    }

    #[test]
    fn clhs_returns_requested_sample_count() {
        let b1 = fixture(10, 10, 0.0);
        let b2 = fixture(10, 10, 100.0);
        let opts = ClhsOptions { n_samp: 8, iterations: 20 };
        let rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let result = run_clhs(&[&b1, &b2], &opts, rng).unwrap();
        assert_eq!(result.coords.len(), 8);
    }

    #[test]
    fn clhs_fails_precondition_when_pool_too_small() {
        let b1 = fixture(2, 2, 0.0);
        let opts = ClhsOptions { n_samp: 50, iterations: 5 };
        let rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let err = run_clhs(&[&b1], &opts, rng).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
