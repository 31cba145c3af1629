mod particle;
mod swarm;
pub mod traits;

pub use particle::{Coefficients, Particle};
pub use swarm::Swarm;
pub use traits::{IterationView, NoopCallback, OptimizationCallback, Snapshot, SolverResult, StopReason};
