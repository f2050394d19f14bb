//! Opaque statistics/linear-algebra primitives consumed by the sampling engine.
//!
//! These are the building blocks `SPEC_FULL.md` §1 calls out as out-of-scope for the
//! core's own algorithm design (the core treats them as a fixed interface), but which
//! still need a real, working implementation for the workspace to compile and run.

pub mod covariance;
pub mod matmul;
pub mod pca;
pub mod quantile;

pub use covariance::CovarianceAccumulator;
pub use pca::{PcaResult, PcaTrainer};
pub use quantile::QuantileEstimator;
