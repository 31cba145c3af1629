pub mod callback;
pub mod problem;
pub mod solvers;

pub use callback::{Frame, FrameRecorder, ProgressLogger};
pub use problem::{from_fallible_fn, from_fn, improves, FallibleFnObjective, FnObjective, Objective};
pub use solvers::{Coefficients, Particle, Swarm};
pub use solvers::{IterationView, NoopCallback, OptimizationCallback, Snapshot, SolverResult, StopReason};
