//! Minimal geometry model covering the classification "input vector" handles must
//! expose per SPEC_FULL.md §6: Point, MultiPoint, LineString, MultiLineString,
//! Polygon, MultiPolygon.

use std::collections::HashMap;

pub type Coord = (f64, f64);

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coord),
    MultiPoint(Vec<Coord>),
    LineString(Vec<Coord>),
    MultiLineString(Vec<Vec<Coord>>),
    /// Rings: the first is the outer ring, any remaining are holes.
    Polygon(Vec<Vec<Coord>>),
    MultiPolygon(Vec<Vec<Vec<Coord>>>),
}

impl Geometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    pub fn is_point_like(&self) -> bool {
        matches!(self, Geometry::Point(_) | Geometry::MultiPoint(_))
    }

    pub fn is_line_like(&self) -> bool {
        matches!(self, Geometry::LineString(_) | Geometry::MultiLineString(_))
    }

    pub fn is_polygon_like(&self) -> bool {
        matches!(self, Geometry::Polygon(_) | Geometry::MultiPolygon(_))
    }

    /// All individual line segments making up this geometry's boundary, as
    /// consecutive coordinate pairs. Used by the Access Mask's line-buffer
    /// rasterization (SPEC_FULL.md §4.D) and is a no-op for point geometries.
    pub fn segments(&self) -> Vec<(Coord, Coord)> {
        fn line_segments(pts: &[Coord]) -> Vec<(Coord, Coord)> {
            pts.windows(2).map(|w| (w[0], w[1])).collect()
        }
        match self {
            Geometry::LineString(pts) => line_segments(pts),
            Geometry::MultiLineString(lines) => lines.iter().flat_map(|l| line_segments(l)).collect(),
            Geometry::Polygon(rings) => rings.iter().flat_map(|r| line_segments(r)).collect(),
            Geometry::MultiPolygon(polys) => polys
                .iter()
                .flat_map(|rings| rings.iter().flat_map(|r| line_segments(r)))
                .collect(),
            Geometry::Point(_) | Geometry::MultiPoint(_) => Vec::new(),
        }
    }

    /// All vertex coordinates, point-like geometries included.
    pub fn points(&self) -> Vec<Coord> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::MultiPoint(pts) => pts.clone(),
            Geometry::LineString(pts) => pts.clone(),
            Geometry::MultiLineString(lines) => lines.iter().flatten().cloned().collect(),
            Geometry::Polygon(rings) => rings.iter().flatten().cloned().collect(),
            Geometry::MultiPolygon(polys) => {
                polys.iter().flat_map(|r| r.iter().flatten()).cloned().collect()
            }
        }
    }

    /// Point-in-polygon test via the standard even-odd ray-casting rule, ignoring
    /// holes (adequate for the poly-stratification "is this pixel inside feature
    /// i" test; the original project's rasterizer similarly treats holes via the
    /// ring's own winding rather than a separate containment pass).
    pub fn contains_point(&self, pt: Coord) -> bool {
        match self {
            Geometry::Polygon(rings) => rings.first().map_or(false, |r| ring_contains(r, pt)),
            Geometry::MultiPolygon(polys) => polys
                .iter()
                .any(|rings| rings.first().map_or(false, |r| ring_contains(r, pt))),
            _ => false,
        }
    }
}

fn ring_contains(ring: &[Coord], (px, py): Coord) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > py) != (yj > py) {
            let x_intersect = xi + (py - yi) * (xj - xi) / (yj - yi);
            if px < x_intersect {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Int(i64),
    Real(f64),
    Text(String),
    Bool(bool),
}

impl PropertyValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            PropertyValue::Real(v) => Some(*v as i64),
            PropertyValue::Bool(v) => Some(*v as i64),
            PropertyValue::Text(s) => s.parse().ok(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Int(v) => Some(*v as f64),
            PropertyValue::Real(v) => Some(*v),
            PropertyValue::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            PropertyValue::Text(s) => s.parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Feature {
    pub properties: HashMap<String, PropertyValue>,
}

#[derive(Debug, Clone)]
pub struct VectorLayer {
    pub crs_wkt: String,
    pub geometries: Vec<Geometry>,
    pub features: Vec<Feature>,
}

impl VectorLayer {
    pub fn new(crs_wkt: impl Into<String>) -> VectorLayer {
        VectorLayer {
            crs_wkt: crs_wkt.into(),
            geometries: Vec::new(),
            features: Vec::new(),
        }
    }

    pub fn push(&mut self, geometry: Geometry, feature: Feature) {
        self.geometries.push(geometry);
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// True iff every geometry in the layer is point-like (spec §4.E's precondition
    /// on the Existing-Sample Set's source layer).
    pub fn is_point_layer(&self) -> bool {
        !self.geometries.is_empty() && self.geometries.iter().all(|g| g.is_point_like())
    }

    /// True iff every geometry is line-like (spec §4.D's precondition on the Access
    /// Mask's source layer).
    pub fn is_line_layer(&self) -> bool {
        !self.geometries.is_empty() && self.geometries.iter().all(|g| g.is_line_like())
    }

    /// True iff every geometry is polygon-like (the poly-stratification flavour's
    /// precondition, SPEC_FULL.md §B).
    pub fn is_polygon_layer(&self) -> bool {
        !self.geometries.is_empty() && self.geometries.iter().all(|g| g.is_polygon_like())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_casting_unit_square() {
        let square = Geometry::Polygon(vec![vec![
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (0.0, 0.0),
        ]]);
        assert!(square.contains_point((5.0, 5.0)));
        assert!(!square.contains_point((15.0, 5.0)));
    }

    #[test]
    fn layer_classification() {
        let mut layer = VectorLayer::new("EPSG:4326");
        layer.push(Geometry::LineString(vec![(0.0, 0.0), (1.0, 1.0)]), Feature::default());
        assert!(layer.is_line_layer());
        assert!(!layer.is_point_layer());
    }
}
