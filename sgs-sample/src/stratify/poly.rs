//! Poly stratification flavour — the supplemented fourth flavour
//! (SPEC_FULL.md §B), grounded in `original_source/sgs/stratify/poly/poly.h`.
//!
//! Rasterizes a vector layer's resolved per-feature stratum value onto the
//! raster grid. A SQL dialect is out of scope (spec §1), so resolution is a
//! caller-supplied closure over each feature rather than a query string.

use crate::error::{Result, SgsError};
use crate::output::{strata_pixel_type, OutputDataset};
use sgs_raster::Raster;
use sgs_vector::{Feature, VectorLayer};

pub fn run_poly(
    template: &Raster,
    layer: &VectorLayer,
    resolver: impl Fn(&Feature) -> i32,
    num_strata: i64,
    large_raster: bool,
    filename: &str,
    temp_dir: Option<&std::path::Path>,
) -> Result<OutputDataset> {
    if !layer.is_polygon_layer() {
        return Err(SgsError::InvalidGeometry {
            layer: "poly".to_string(),
            expected: "Polygon/MultiPolygon".to_string(),
            found: layer
                .geometries
                .first()
                .map(|g| g.type_name().to_string())
                .unwrap_or_else(|| "empty".to_string()),
        });
    }
    if layer.crs_wkt != template.configs.coordinate_ref_system_wkt {
        return Err(SgsError::CrsMismatch {
            left: template.configs.coordinate_ref_system_wkt.clone(),
            right: layer.crs_wkt.clone(),
        });
    }

    let mut dataset = OutputDataset::new(1, template, large_raster, filename, temp_dir, "poly")?;
    dataset.bands[0].configs.data_type = strata_pixel_type(num_strata);
    dataset.bands[0].configs.nodata = -1.0;

    let height = template.configs.rows as isize;
    let width = template.configs.columns as isize;
    for row in 0..height {
        for col in 0..width {
            let x = template.get_x_from_column(col);
            let y = template.get_y_from_row(row);
            let mut value = -1.0;
            for (geom, feature) in layer.geometries.iter().zip(layer.features.iter()) {
                if geom.contains_point((x, y)) {
                    value = resolver(feature) as f64;
                    break;
                }
            }
            dataset.bands[0].set_value(row, col, value);
        }
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgs_raster::RasterConfigs;
    use sgs_vector::Geometry;

    fn fixture() -> Raster {
        let mut cfg = RasterConfigs::default();
        cfg.columns = 10;
        cfg.rows = 10;
        cfg.north = 10.0;
        cfg.south = 0.0;
        cfg.west = 0.0;
        cfg.east = 10.0;
        cfg.resolution_x = 1.0;
        cfg.resolution_y = 1.0;
        cfg.nodata = -1.0;
        cfg.data_type = sgs_raster::DataType::F64;
        cfg.coordinate_ref_system_wkt = "EPSG:4326".to_string();
        Raster::initialize_using_config("/tmp/unused_poly.tif", &cfg)
    }

    #[test]
    fn pixels_inside_feature_take_its_resolved_value() {
        let template = fixture();
        let mut layer = VectorLayer::new("EPSG:4326");
        let mut feature = Feature::default();
        feature
            .properties
            .insert("class".to_string(), sgs_vector::PropertyValue::Int(5));
        layer.push(
            Geometry::Polygon(vec![vec![
                (0.0, 0.0),
                (5.0, 0.0),
                (5.0, 5.0),
                (0.0, 5.0),
                (0.0, 0.0),
            ]]),
            feature,
        );
        let dataset = run_poly(
            &template,
            &layer,
            |f| f.properties.get("class").and_then(|v| v.as_i64()).unwrap_or(-1) as i32,
            1,
            false,
            "",
            None,
        )
        .unwrap();
        assert_eq!(dataset.bands[0].get_value(8, 2), 5.0);
        assert_eq!(dataset.bands[0].get_value(1, 8), -1.0);
    }

    #[test]
    fn rejects_non_polygon_layers() {
        let template = fixture();
        let mut layer = VectorLayer::new("EPSG:4326");
        layer.push(Geometry::Point((1.0, 1.0)), Feature::default());
        let err = run_poly(&template, &layer, |_| 0, 1, false, "", None).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
