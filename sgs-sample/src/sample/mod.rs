//! Samplers (components F–I): SRS, Stratified (random/Queinnec), Systematic
//! (square/hexagon), and CLHS.

pub mod clhs;
pub mod srs;
pub mod stratified;
pub mod systematic;

pub use clhs::{run_clhs, ClhsOptions, ClhsResult};
pub use srs::{run_srs, SrsOptions, SrsResult};
pub use stratified::{run_stratified, Allocation, Method, StratifiedOptions, StratifiedResult};
pub use systematic::{run_systematic, Location, Shape, SystematicOptions};
