/*
Vector geometry and I/O surface consumed by the sampling engine as its "input
vector" / "output vector" collaborator (SPEC_FULL.md §6). Deliberately minimal:
this is the out-of-scope georeferenced-vector-library stand-in, not a full GDAL/OGR
equivalent.
*/

pub mod geojson;
pub mod geometry;
pub mod point_shapefile;

pub use geometry::{Feature, Geometry, PropertyValue, VectorLayer};
pub use point_shapefile::PointShapefileWriter;
