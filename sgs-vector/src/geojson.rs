//! Minimal GeoJSON (RFC 7946) reader/writer, enough to round-trip the geometry
//! classifications SPEC_FULL.md §6 requires. Hand-built `serde_json::Value` trees
//! rather than a derived schema, since a `FeatureCollection`'s geometry field is
//! genuinely heterogeneous across features.

use crate::geometry::{Coord, Feature, Geometry, PropertyValue, VectorLayer};
use serde_json::{json, Value};
use std::fs;
use std::io::{Error, ErrorKind};
use std::path::Path;

fn coord_to_json((x, y): Coord) -> Value {
    json!([x, y])
}

fn ring_to_json(ring: &[Coord]) -> Value {
    Value::Array(ring.iter().map(|&c| coord_to_json(c)).collect())
}

fn geometry_to_json(geom: &Geometry) -> Value {
    match geom {
        Geometry::Point(p) => json!({"type": "Point", "coordinates": coord_to_json(*p)}),
        Geometry::MultiPoint(pts) => json!({
            "type": "MultiPoint",
            "coordinates": Value::Array(pts.iter().map(|&c| coord_to_json(c)).collect()),
        }),
        Geometry::LineString(pts) => json!({"type": "LineString", "coordinates": ring_to_json(pts)}),
        Geometry::MultiLineString(lines) => json!({
            "type": "MultiLineString",
            "coordinates": Value::Array(lines.iter().map(|l| ring_to_json(l)).collect()),
        }),
        Geometry::Polygon(rings) => json!({
            "type": "Polygon",
            "coordinates": Value::Array(rings.iter().map(|r| ring_to_json(r)).collect()),
        }),
        Geometry::MultiPolygon(polys) => json!({
            "type": "MultiPolygon",
            "coordinates": Value::Array(
                polys.iter()
                    .map(|rings| Value::Array(rings.iter().map(|r| ring_to_json(r)).collect()))
                    .collect()
            ),
        }),
    }
}

fn property_to_json(v: &PropertyValue) -> Value {
    match v {
        PropertyValue::Int(i) => json!(i),
        PropertyValue::Real(r) => json!(r),
        PropertyValue::Text(s) => json!(s),
        PropertyValue::Bool(b) => json!(b),
    }
}

pub fn write_layer(path: &Path, layer: &VectorLayer) -> Result<(), Error> {
    let features: Vec<Value> = layer
        .geometries
        .iter()
        .zip(layer.features.iter())
        .map(|(geom, feat)| {
            let mut props = serde_json::Map::new();
            for (k, v) in &feat.properties {
                props.insert(k.clone(), property_to_json(v));
            }
            json!({
                "type": "Feature",
                "geometry": geometry_to_json(geom),
                "properties": Value::Object(props),
            })
        })
        .collect();

    let fc = json!({
        "type": "FeatureCollection",
        "crs": {"type": "name", "properties": {"name": layer.crs_wkt}},
        "features": features,
    });
    fs::write(path, serde_json::to_string_pretty(&fc)?)
}

fn json_to_coord(v: &Value) -> Result<Coord, Error> {
    let arr = v
        .as_array()
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, "expected coordinate array"))?;
    let x = arr
        .get(0)
        .and_then(Value::as_f64)
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, "missing x coordinate"))?;
    let y = arr
        .get(1)
        .and_then(Value::as_f64)
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, "missing y coordinate"))?;
    Ok((x, y))
}

fn json_to_ring(v: &Value) -> Result<Vec<Coord>, Error> {
    v.as_array()
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, "expected ring array"))?
        .iter()
        .map(json_to_coord)
        .collect()
}

fn json_to_geometry(v: &Value) -> Result<Geometry, Error> {
    let type_name = v
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, "geometry missing type"))?;
    let coords = v
        .get("coordinates")
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, "geometry missing coordinates"))?;
    match type_name {
        "Point" => Ok(Geometry::Point(json_to_coord(coords)?)),
        "MultiPoint" => Ok(Geometry::MultiPoint(
            coords
                .as_array()
                .ok_or_else(|| Error::new(ErrorKind::InvalidData, "bad MultiPoint"))?
                .iter()
                .map(json_to_coord)
                .collect::<Result<_, _>>()?,
        )),
        "LineString" => Ok(Geometry::LineString(json_to_ring(coords)?)),
        "MultiLineString" => Ok(Geometry::MultiLineString(
            coords
                .as_array()
                .ok_or_else(|| Error::new(ErrorKind::InvalidData, "bad MultiLineString"))?
                .iter()
                .map(json_to_ring)
                .collect::<Result<_, _>>()?,
        )),
        "Polygon" => Ok(Geometry::Polygon(
            coords
                .as_array()
                .ok_or_else(|| Error::new(ErrorKind::InvalidData, "bad Polygon"))?
                .iter()
                .map(json_to_ring)
                .collect::<Result<_, _>>()?,
        )),
        "MultiPolygon" => {
            let polys = coords
                .as_array()
                .ok_or_else(|| Error::new(ErrorKind::InvalidData, "bad MultiPolygon"))?
                .iter()
                .map(|p| {
                    p.as_array()
                        .ok_or_else(|| Error::new(ErrorKind::InvalidData, "bad MultiPolygon ring set"))?
                        .iter()
                        .map(json_to_ring)
                        .collect::<Result<Vec<_>, _>>()
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Geometry::MultiPolygon(polys))
        }
        other => Err(Error::new(
            ErrorKind::InvalidData,
            format!("unsupported geometry type '{}'", other),
        )),
    }
}

fn json_to_property(v: &Value) -> PropertyValue {
    match v {
        Value::Bool(b) => PropertyValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                PropertyValue::Int(i)
            } else {
                PropertyValue::Real(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => PropertyValue::Text(s.clone()),
        other => PropertyValue::Text(other.to_string()),
    }
}

pub fn read_layer(path: &Path) -> Result<VectorLayer, Error> {
    let contents = fs::read_to_string(path)?;
    let root: Value = serde_json::from_str(&contents)
        .map_err(|e| Error::new(ErrorKind::InvalidData, e.to_string()))?;
    let crs_wkt = root
        .get("crs")
        .and_then(|c| c.get("properties"))
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let features = root
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, "missing features array"))?;

    let mut layer = VectorLayer::new(crs_wkt);
    for f in features {
        let geom = f
            .get("geometry")
            .ok_or_else(|| Error::new(ErrorKind::InvalidData, "feature missing geometry"))?;
        let geometry = json_to_geometry(geom)?;
        let mut feature = Feature::default();
        if let Some(props) = f.get("properties").and_then(Value::as_object) {
            for (k, v) in props {
                feature.properties.insert(k.clone(), json_to_property(v));
            }
        }
        layer.push(geometry, feature);
    }
    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn tempfile_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("sgs_vector_test_{}_{}", std::process::id(), name))
    }

    #[test]
    fn round_trips_points_with_properties() {
        let mut layer = VectorLayer::new("EPSG:4326");
        let mut props = HashMap::new();
        props.insert("strata".to_string(), PropertyValue::Int(3));
        layer.push(Geometry::Point((1.5, -2.5)), Feature { properties: props });

        let path = tempfile_path("points.geojson");
        write_layer(&path, &layer).unwrap();
        let read_back = read_layer(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(read_back.len(), 1);
        match &read_back.geometries[0] {
            Geometry::Point((x, y)) => {
                assert!((x - 1.5).abs() < 1e-12);
                assert!((y + 2.5).abs() < 1e-12);
            }
            _ => panic!("expected Point"),
        }
        assert_eq!(
            read_back.features[0].properties.get("strata"),
            Some(&PropertyValue::Int(3))
        );
    }
}
