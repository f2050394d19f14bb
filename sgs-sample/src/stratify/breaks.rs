//! Breaks stratification flavour (component J, "breaks" mode).
//!
//! Per band: for each pixel find `idx = upper_bound(breaks, v)` and write
//! `idx` as the strata value; no-data in propagates to no-data out.

use crate::error::Result;
use crate::output::{strata_pixel_type, OutputDataset};
use sgs_raster::Raster;

/// `idx = upper_bound(breaks, v)`: the count of break points strictly less
/// than `v`. With `breaks = [b0, b1, ..., bn-1]` this yields `n + 1` strata
/// (`0..=n`).
fn upper_bound(breaks: &[f64], v: f64) -> i64 {
    breaks.iter().filter(|&&b| v >= b).count() as i64
}

pub struct BreaksSpec {
    pub band: usize,
    pub breaks: Vec<f64>,
}

pub fn run_breaks(
    raster_bands: &[&Raster],
    specs: &[BreaksSpec],
    large_raster: bool,
    filename: &str,
    temp_dir: Option<&std::path::Path>,
) -> Result<OutputDataset> {
    let template = raster_bands[0];
    let max_strata = specs.iter().map(|s| s.breaks.len() as i64).max().unwrap_or(0);
    let mut dataset = OutputDataset::new(
        specs.len(),
        template,
        large_raster,
        filename,
        temp_dir,
        "breaks",
    )?;
    for band in &mut dataset.bands {
        band.configs.data_type = strata_pixel_type(max_strata);
        band.configs.nodata = -1.0;
    }

    let height = template.configs.rows as isize;
    let width = template.configs.columns as isize;
    for (out_idx, spec) in specs.iter().enumerate() {
        let src = raster_bands[spec.band];
        for row in 0..height {
            for col in 0..width {
                let v = src.get_value(row, col);
                let nodata = v == src.configs.nodata || (src.configs.data_type.is_float() && v.is_nan());
                let strata = if nodata { -1.0 } else { upper_bound(&spec.breaks, v) as f64 };
                dataset.bands[out_idx].set_value(row, col, strata);
            }
        }
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgs_raster::RasterConfigs;

    fn fixture() -> Raster {
        let mut cfg = RasterConfigs::default();
        cfg.columns = 10;
        cfg.rows = 10;
        cfg.nodata = -9999.0;
        cfg.data_type = sgs_raster::DataType::F64;
        let mut r = Raster::initialize_using_config("/tmp/unused_breaks.tif", &cfg);
        for row in 0..10 {
            for col in 0..10 {
                r.set_value(row, col, (row * 10 + col) as f64);
            }
        }
        r
    }

    #[test]
    fn upper_bound_buckets_values() {
        let breaks = vec![25.0, 50.0, 75.0];
        assert_eq!(upper_bound(&breaks, 0.0), 0);
        assert_eq!(upper_bound(&breaks, 25.0), 1);
        assert_eq!(upper_bound(&breaks, 99.0), 3);
    }

    #[test]
    fn run_breaks_preserves_nodata() {
        let mut r = fixture();
        r.set_value(0, 0, r.configs.nodata);
        let specs = vec![BreaksSpec { band: 0, breaks: vec![25.0, 50.0, 75.0] }];
        let dataset = run_breaks(&[&r], &specs, false, "", None).unwrap();
        assert_eq!(dataset.bands[0].get_value(0, 0), -1.0);
    }
}
