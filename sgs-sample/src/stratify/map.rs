//! Map stratification flavour (component J, "map" mode).
//!
//! Combines already-stratified input bands into one composite strata band:
//! `m = Σ_i s_i · Π_{j<i} count_j`. No-data in any input band propagates to
//! no-data in the output.

use crate::error::Result;
use crate::output::{strata_pixel_type, OutputDataset};
use sgs_raster::Raster;

pub struct MapInput<'a> {
    pub band: &'a Raster,
    pub num_strata: i64,
}

pub fn run_map(
    inputs: &[MapInput],
    large_raster: bool,
    filename: &str,
    temp_dir: Option<&std::path::Path>,
) -> Result<OutputDataset> {
    let template = inputs[0].band;
    let height = template.configs.rows as isize;
    let width = template.configs.columns as isize;

    let max_strata: i64 = inputs.iter().map(|i| i.num_strata).product();
    let mut dataset = OutputDataset::new(1, template, large_raster, filename, temp_dir, "map")?;
    dataset.bands[0].configs.data_type = strata_pixel_type(max_strata);
    dataset.bands[0].configs.nodata = -1.0;

    for row in 0..height {
        for col in 0..width {
            let mut composite = 0i64;
            let mut multiplier = 1i64;
            let mut any_nodata = false;
            for input in inputs {
                let v = input.band.get_value(row, col);
                let nodata = v == input.band.configs.nodata
                    || (input.band.configs.data_type.is_float() && v.is_nan());
                if nodata {
                    any_nodata = true;
                    break;
                }
                composite += (v as i64) * multiplier;
                multiplier *= input.num_strata;
            }
            let out = if any_nodata { -1.0 } else { composite as f64 };
            dataset.bands[0].set_value(row, col, out);
        }
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgs_raster::RasterConfigs;

    fn fixture(value: f64) -> Raster {
        let mut cfg = RasterConfigs::default();
        cfg.columns = 2;
        cfg.rows = 2;
        cfg.nodata = -1.0;
        cfg.data_type = sgs_raster::DataType::F64;
        let mut r = Raster::initialize_using_config("/tmp/unused_map.tif", &cfg);
        for row in 0..2 {
            for col in 0..2 {
                r.set_value(row, col, value);
            }
        }
        r
    }

    #[test]
    fn composite_strata_combines_two_bands() {
        let a = fixture(1.0);
        let b = fixture(2.0);
        let inputs = vec![
            MapInput { band: &a, num_strata: 3 },
            MapInput { band: &b, num_strata: 3 },
        ];
        let dataset = run_map(&inputs, false, "", None).unwrap();
        // m = s0 + s1 * count0 = 1 + 2*3 = 7
        assert_eq!(dataset.bands[0].get_value(0, 0), 7.0);
    }

    #[test]
    fn nodata_in_any_band_propagates() {
        let mut a = fixture(1.0);
        a.set_value(0, 0, a.configs.nodata);
        let b = fixture(2.0);
        let inputs = vec![
            MapInput { band: &a, num_strata: 3 },
            MapInput { band: &b, num_strata: 3 },
        ];
        let dataset = run_map(&inputs, false, "", None).unwrap();
        assert_eq!(dataset.bands[0].get_value(0, 0), -1.0);
    }
}
