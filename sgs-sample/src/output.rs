//! Output Dataset Builder (component K).
//!
//! Three shapes, chosen by `(large_raster, filename)` exactly as spec §4.K
//! specifies. The teacher's `Raster` type models one band as one in-memory
//! handle (there is no native multi-band container in `sgs-raster`), so a
//! multi-band stratification output is represented here as a `Vec<Raster>`
//! sharing one geotransform/projection — each element is one of the three
//! shapes' "per band" unit.

use crate::error::{Result, SgsError};
use sgs_raster::{Raster, RasterConfigs};
use std::path::{Path, PathBuf};

pub enum OutputShape {
    /// `!large_raster && filename == ""`: bands live only in memory.
    InMemory,
    /// `large_raster && filename == ""`: each band is its own on-disk tile
    /// in `temp_dir`, composed by reference once all writes complete.
    Virtual { temp_dir: PathBuf },
    /// `filename != ""`: a single direct file, `.tif` only.
    DirectFile { path: PathBuf },
}

pub struct OutputDataset {
    pub bands: Vec<Raster>,
    shape: OutputShape,
}

impl OutputDataset {
    /// Chooses the shape per spec §4.K and allocates one `Raster` per band,
    /// all stamped with `template`'s geotransform/projection before any
    /// pixel is written.
    pub fn new(
        num_bands: usize,
        template: &Raster,
        large_raster: bool,
        filename: &str,
        temp_dir: Option<&Path>,
        strata_key: &str,
    ) -> Result<OutputDataset> {
        let shape = if !filename.is_empty() {
            let path = PathBuf::from(filename);
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_ascii_lowercase();
            if ext != "tif" {
                return Err(SgsError::UnsupportedExtension { ext });
            }
            OutputShape::DirectFile { path }
        } else if large_raster {
            let temp_dir = temp_dir
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir);
            OutputShape::Virtual { temp_dir }
        } else {
            OutputShape::InMemory
        };

        let mut cfg = template.configs.clone();
        let bands = (0..num_bands)
            .map(|i| {
                let file_name = match &shape {
                    OutputShape::InMemory => String::new(),
                    OutputShape::Virtual { temp_dir } => temp_dir
                        .join(format!("strat_{}_{}.tif", strata_key, i))
                        .to_string_lossy()
                        .into_owned(),
                    OutputShape::DirectFile { path } => {
                        if num_bands == 1 {
                            path.to_string_lossy().into_owned()
                        } else {
                            path.with_file_name(format!(
                                "{}_{}.tif",
                                path.file_stem()
                                    .unwrap_or_else(|| std::ffi::OsStr::new("strat"))
                                    .to_string_lossy(),
                                i
                            ))
                            .to_string_lossy()
                            .into_owned()
                        }
                    }
                };
                cfg.bands = 1;
                Raster::initialize_using_config(&file_name, &cfg)
            })
            .collect();

        Ok(OutputDataset { bands, shape })
    }

    /// Commit writes for every file-backed band. In-memory mode is a no-op
    /// (spec: "write nothing if the run fails" applies only here, since
    /// there is nothing on disk to leave behind).
    pub fn commit(&mut self) -> Result<()> {
        match &self.shape {
            OutputShape::InMemory => Ok(()),
            OutputShape::Virtual { .. } | OutputShape::DirectFile { .. } => {
                for band in &mut self.bands {
                    band.write()?;
                }
                Ok(())
            }
        }
    }

    pub fn is_in_memory(&self) -> bool {
        matches!(self.shape, OutputShape::InMemory)
    }
}

/// Smallest signed-integer `DataType` that can hold `max_strata` distinct
/// labels plus the `-1` no-data sentinel, per spec §3's stratification
/// result rule.
pub fn strata_pixel_type(max_strata: i64) -> sgs_raster::DataType {
    use sgs_raster::DataType;
    if max_strata <= i8::MAX as i64 {
        DataType::I8
    } else if max_strata <= i16::MAX as i64 {
        DataType::I16
    } else {
        DataType::I32
    }
}

pub fn strata_raster_configs(template: &Raster, max_strata: i64) -> RasterConfigs {
    let mut cfg = template.configs.clone();
    cfg.data_type = strata_pixel_type(max_strata);
    cfg.nodata = -1.0;
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgs_raster::RasterConfigs;

    fn fixture() -> Raster {
        let mut cfg = RasterConfigs::default();
        cfg.columns = 4;
        cfg.rows = 4;
        cfg.nodata = -9999.0;
        Raster::initialize_using_config("/tmp/unused_template.tif", &cfg)
    }

    #[test]
    fn empty_filename_and_small_raster_is_in_memory() {
        let template = fixture();
        let dataset = OutputDataset::new(1, &template, false, "", None, "k").unwrap();
        assert!(dataset.is_in_memory());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let template = fixture();
        let err = OutputDataset::new(1, &template, false, "out.png", None, "k").unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn strata_pixel_type_widens_as_needed() {
        assert!(matches!(strata_pixel_type(5), sgs_raster::DataType::I8));
        assert!(matches!(strata_pixel_type(500), sgs_raster::DataType::I16));
        assert!(matches!(strata_pixel_type(100_000), sgs_raster::DataType::I32));
    }
}
