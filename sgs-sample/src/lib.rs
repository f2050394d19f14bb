//! Geospatial sampling and stratification engine core.
//!
//! Operates on georeferenced raster grids via the block-streaming pixel
//! pipeline (`pipeline`), a PRNG/mask selector (`rng`), a candidate pool
//! (`candidate_pool`), an access mask and existing-sample set (`access`,
//! `existing`), and the output dataset builder (`output`). `sample` holds
//! the four samplers (SRS, Stratified, Systematic, CLHS); `stratify` holds
//! the four stratifier flavours (breaks, quantiles, map, poly).
//!
//! Georeferenced dataset I/O, stats/linalg primitives, language bindings,
//! CLI, and logging configuration are out of scope for this crate (they
//! are consumed as opaque collaborators via `sgs_raster`, `sgs_vector`,
//! and `sgs_stats`).

pub mod access;
pub mod candidate_pool;
pub mod error;
pub mod existing;
pub mod output;
pub mod pca;
pub mod pipeline;
pub mod rng;
pub mod sample;
pub mod stratify;

pub use error::{Result, SgsError};
