//! Access Mask (component D).
//!
//! spec §4.D describes a buffer → union → (optional inner-buffer subtract)
//! → intersect-with-extent → invert → rasterize pipeline built on general
//! polygon boolean algebra, which belongs to the out-of-scope
//! georeferenced-dataset/geometry layer (spec §1). That algebra is
//! equivalent, under all-touched rasterization, to testing each pixel
//! directly against the buffered lines: a pixel is accessible iff it falls
//! within `outer` of at least one input line and not within `inner` of any
//! of them. This core takes that direct route, using the same per-pixel
//! distance primitive (`LineSegment::dist_to_segment`) the teacher's own
//! line-processing tools use, rather than re-deriving buffer polygons only
//! to rasterize them.

use crate::error::{Result, SgsError};
use sgs_common::structures::{LineSegment, Point2D};
use sgs_raster::Raster;
use sgs_vector::{Geometry, VectorLayer};

pub struct AccessMask {
    width: usize,
    height: usize,
    mask: Vec<bool>,
    accessible_area: f64,
}

impl AccessMask {
    /// Builds the mask from a line-typed vector layer, co-registered with
    /// `raster`. `outer` and `inner` are buffer distances in world units;
    /// `inner == 0.0` disables the inner exclusion.
    pub fn build(layer: &VectorLayer, outer: f64, inner: f64, raster: &Raster) -> Result<AccessMask> {
        if !layer.is_line_layer() {
            return Err(SgsError::InvalidGeometry {
                layer: "access".to_string(),
                expected: "LineString/MultiLineString".to_string(),
                found: "non-line geometry".to_string(),
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
        let segments = collect_segments(layer);

        let mut mask = vec![false; width * height];
        let mut accessible_count = 0usize;
        for row in 0..height as isize {
            let y = raster.get_y_from_row(row);
            for col in 0..width as isize {
                let x = raster.get_x_from_column(col);
                let p = Point2D::new(x, y);
                let min_dist = segments
                    .iter()
                    .map(|s| s.dist_to_segment(p))
                    .fold(f64::INFINITY, f64::min);
                let accessible = min_dist <= outer && (inner <= 0.0 || min_dist > inner);
                if accessible {
                    accessible_count += 1;
                }
                mask[row as usize * width + col as usize] = accessible;
            }
        }

        let cell_area = raster.configs.resolution_x.abs() * raster.configs.resolution_y.abs();
        let accessible_area = accessible_count as f64 * cell_area;

        Ok(AccessMask {
            width,
            height,
            mask,
            accessible_area,
        })
    }

    #[inline]
    pub fn is_accessible(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.mask[y as usize * self.width + x as usize]
    }

    pub fn accessible_area(&self) -> f64 {
        self.accessible_area
    }

    /// Ratio `total_area / accessible_area`, used to calibrate the mask
    /// selector's probability (spec §4.B); returns `1.0` when nothing is
    /// restricted.
    pub fn access_ratio(&self, total_area: f64) -> f64 {
        if self.accessible_area <= 0.0 {
            1.0
        } else {
            total_area / self.accessible_area
        }
    }
}

fn collect_segments(layer: &VectorLayer) -> Vec<LineSegment> {
    let mut segments = Vec::new();
    for geom in &layer.geometries {
        if let Geometry::LineString(_) | Geometry::MultiLineString(_) = geom {
            for (a, b) in geom.segments() {
                segments.push(LineSegment::new(
                    Point2D::new(a.0, a.1),
                    Point2D::new(b.0, b.1),
                ));
            }
        }
    }
    segments
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
        Raster::initialize_using_config("/tmp/unused_access.tif", &cfg)
    }

    #[test]
    fn pixels_near_the_line_are_accessible() {
        let raster = fixture_raster();
        let mut layer = VectorLayer::new("TEST");
        layer.push(
            Geometry::LineString(vec![(0.0, 5.0), (10.0, 5.0)]),
            Feature::default(),
        );
        let mask = AccessMask::build(&layer, 1.5, 0.0, &raster).unwrap();
        assert!(mask.is_accessible(5, 5));
        assert!(!mask.is_accessible(5, 0));
    }

    #[test]
    fn inner_buffer_excludes_pixels_immediately_on_the_line() {
        let raster = fixture_raster();
        let mut layer = VectorLayer::new("TEST");
        layer.push(
            Geometry::LineString(vec![(0.0, 5.0), (10.0, 5.0)]),
            Feature::default(),
        );
        let mask = AccessMask::build(&layer, 3.0, 1.0, &raster).unwrap();
        assert!(!mask.is_accessible(5, 5));
        assert!(mask.is_accessible(5, 3));
    }

    #[test]
    fn rejects_non_line_layers() {
        let raster = fixture_raster();
        let mut layer = VectorLayer::new("TEST");
        layer.push(Geometry::Point((1.0, 1.0)), Feature::default());
        let err = AccessMask::build(&layer, 1.0, 0.0, &raster).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
