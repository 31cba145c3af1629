pub mod constraints;
pub mod types;

pub use constraints::{validate_bounds, validate_config, validate_velocity_cap};
pub use types::*;
