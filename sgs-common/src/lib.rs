pub mod configs;
pub mod spatial_ref_system;
pub mod structures;
pub mod utils;

use nalgebra as na;