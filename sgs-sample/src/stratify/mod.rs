//! Stratifier (component J): quantiles/breaks/map, plus the supplemented
//! poly flavour (SPEC_FULL.md §B). All four share the Output Dataset
//! Builder (`crate::output`).

pub mod breaks;
pub mod map;
pub mod poly;
pub mod quantiles;

pub use breaks::{run_breaks, BreaksSpec};
pub use map::{run_map, MapInput};
pub use poly::run_poly;
pub use quantiles::{run_quantiles, QuantilesSpec};
