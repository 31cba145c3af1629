//! Particle swarm optimization over bounded real-valued search spaces.
//!
//! A [`Swarm`] is built from a [`SwarmConfig`] and an [`Objective`], then run
//! to completion:
//!
//! ```
//! use swarm_optimizer::{from_fn, Swarm, SwarmConfig};
//!
//! let config = SwarmConfig::uniform(2, -10.0, 10.0).with_max_iterations(200);
//! let objective = from_fn(|x: &[f64]| (x[0] - 3.0).powi(2) + (x[1] + 2.0).powi(2));
//! let result = Swarm::new(config, objective)?.run()?;
//! assert!(result.cost < 1e-6);
//! # Ok::<(), swarm_optimizer::SwarmError>(())
//! ```

mod config;
mod error;
pub mod objectives;
mod optimization;

pub use config::*;
pub use error::{ObjectiveError, SwarmError, SwarmResult};
pub use optimization::*;
