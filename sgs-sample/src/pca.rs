//! PCA orchestration (spec §6's `pca` op).
//!
//! The trainer itself (`sgs_stats::PcaTrainer`) is an out-of-scope opaque
//! building block (spec §1); this module is the thin block-streaming glue
//! around it — accumulate covariance over the input bands, fit, then
//! project every pixel onto the top `nComp` components through the Output
//! Dataset Builder (§4.K), which this op shares with the Stratifier.

use crate::error::Result;
use crate::output::OutputDataset;
use sgs_raster::Raster;
use sgs_stats::{CovarianceAccumulator, PcaResult, PcaTrainer};

pub struct PcaOptions {
    pub num_components: usize,
    pub standardized: bool,
}

pub struct PcaOutput {
    pub dataset: OutputDataset,
    pub result: PcaResult,
}

pub fn run_pca(
    raster_bands: &[&Raster],
    opts: &PcaOptions,
    large_raster: bool,
    filename: &str,
    temp_dir: Option<&std::path::Path>,
) -> Result<PcaOutput> {
    let k = raster_bands.len();
    let height = raster_bands[0].configs.rows as isize;
    let width = raster_bands[0].configs.columns as isize;

    let mut acc = CovarianceAccumulator::new(k);
    for row in 0..height {
        for col in 0..width {
            let mut values = Vec::with_capacity(k);
            let mut nodata = false;
            for b in raster_bands {
                let v = b.get_value(row, col);
                if v == b.configs.nodata || (b.configs.data_type.is_float() && v.is_nan()) {
                    nodata = true;
                }
                values.push(v);
            }
            if !nodata {
                acc.update(&values);
            }
        }
    }

    let trainer = PcaTrainer::new(opts.standardized);
    let result = trainer.fit(&acc);
    let num_components = opts.num_components.min(k);

    let mut dataset = OutputDataset::new(
        num_components,
        raster_bands[0],
        large_raster,
        filename,
        temp_dir,
        "pca",
    )?;
    for band in &mut dataset.bands {
        band.configs.data_type = sgs_raster::DataType::F32;
    }

    for row in 0..height {
        for col in 0..width {
            let mut values = Vec::with_capacity(k);
            let mut nodata = false;
            for b in raster_bands {
                let v = b.get_value(row, col);
                if v == b.configs.nodata || (b.configs.data_type.is_float() && v.is_nan()) {
                    nodata = true;
                }
                values.push(v);
            }
            for (pc, band) in dataset.bands.iter_mut().enumerate().take(num_components) {
                let out = if nodata {
                    band.configs.nodata
                } else {
                    (0..k)
                        .map(|j| values[j] * result.eigenvectors[pc * k + j])
                        .sum()
                };
                band.set_value(row, col, out);
            }
        }
    }

    Ok(PcaOutput { dataset, result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgs_raster::RasterConfigs;

    fn fixture(scale: f64) -> Raster {
        let mut cfg = RasterConfigs::default();
        cfg.columns = 5;
        cfg.rows = 5;
        cfg.nodata = -9999.0;
        cfg.data_type = sgs_raster::DataType::F64;
        let mut r = Raster::initialize_using_config("/tmp/unused_pca.tif", &cfg);
        for row in 0..5 {
            for col in 0..5 {
                r.set_value(row, col, (row * 5 + col) as f64 * scale);
            }
        }
        r
    }

    #[test]
    fn first_component_dominates_for_perfectly_correlated_bands() {
        let a = fixture(1.0);
        let b = fixture(2.0);
        let opts = PcaOptions { num_components: 2, standardized: true };
        let out = run_pca(&[&a, &b], &opts, false, "", None).unwrap();
        assert!(out.result.explained_variance[0] > 99.0);
        assert_eq!(out.dataset.bands.len(), 2);
    }
}
