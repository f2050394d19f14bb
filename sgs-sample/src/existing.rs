//! Existing-Sample Set (component E).
//!
//! A hash map keyed by `y*width + x`, built once from a point-typed vector
//! layer and queried by index or by world coordinate for the lifetime of a
//! run. No geometry operations happen at query time.

use crate::error::{Result, SgsError};
use sgs_raster::Raster;
use sgs_vector::{Geometry, VectorLayer};
use std::collections::HashMap;

pub struct ExistingSampleSet {
    width: usize,
    points: HashMap<usize, (f64, f64)>,
}

impl ExistingSampleSet {
    pub fn build(layer: &VectorLayer, raster: &Raster) -> Result<ExistingSampleSet> {
        if !layer.is_point_layer() {
            return Err(SgsError::InvalidGeometry {
                layer: "existing".to_string(),
                expected: "Point/MultiPoint".to_string(),
                found: "non-point geometry".to_string(),
            });
        }
        if layer.crs_wkt != raster.configs.coordinate_ref_system_wkt {
            return Err(SgsError::CrsMismatch {
                left: layer.crs_wkt.clone(),
                right: raster.configs.coordinate_ref_system_wkt.clone(),
            });
        }

        let width = raster.configs.columns;
        let height = raster.configs.rows;
        let mut points = HashMap::new();
        for geom in &layer.geometries {
            for (x, y) in geom.points() {
                let col = raster.get_column_from_x(x);
                let row = raster.get_row_from_y(y);
                if col < 0 || row < 0 || col as usize >= width || row as usize >= height {
                    continue;
                }
                let idx = row as usize * width + col as usize;
                points.insert(idx, (x, y));
            }
        }
        Ok(ExistingSampleSet { width, points })
    }

    #[inline]
    fn index_of(&self, x: isize, y: isize) -> usize {
        y as usize * self.width + x as usize
    }

    pub fn contains_index(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.points.contains_key(&self.index_of(x, y))
    }

    pub fn contains_coord(&self, raster: &Raster, x: f64, y: f64) -> bool {
        let col = raster.get_column_from_x(x);
        let row = raster.get_row_from_y(y);
        self.contains_index(col, row)
    }

    pub fn get_point(&self, x: isize, y: isize) -> Option<(f64, f64)> {
        if x < 0 || y < 0 {
            return None;
        }
        self.points.get(&self.index_of(x, y)).copied()
    }

    pub fn count(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgs_raster::RasterConfigs;
    use sgs_vector::Feature;

    fn fixture_raster() -> Raster {
        let mut cfg = RasterConfigs::default();
        cfg.columns = 10;
        cfg.rows = 10;
        cfg.north = 10.0;
        cfg.south = 0.0;
        cfg.west = 0.0;
        cfg.east = 10.0;
        cfg.resolution_x = 1.0;
        cfg.resolution_y = 1.0;
        cfg.nodata = -9999.0;
        cfg.coordinate_ref_system_wkt = "TEST".to_string();
        Raster::initialize_using_config("/tmp/unused_existing.tif", &cfg)
    }

    #[test]
    fn lookup_is_index_based_not_geometric() {
        let raster = fixture_raster();
        let mut layer = VectorLayer::new("TEST");
        layer.push(Geometry::Point((1.5, 8.5)), Feature::default());
        let set = ExistingSampleSet::build(&layer, &raster).unwrap();
        assert_eq!(set.count(), 1);
        let col = raster.get_column_from_x(1.5);
        let row = raster.get_row_from_y(8.5);
        assert!(set.contains_index(col, row));
        assert!(!set.contains_index(col + 1, row));
    }

    #[test]
    fn rejects_non_point_layers() {
        let raster = fixture_raster();
        let mut layer = VectorLayer::new("TEST");
        layer.push(
            Geometry::LineString(vec![(0.0, 0.0), (1.0, 1.0)]),
            Feature::default(),
        );
        let err = ExistingSampleSet::build(&layer, &raster).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
