//! Objectives the swarm is usually pointed at.

pub mod benchmarks;
pub mod detection;

pub use benchmarks::{Rastrigin, Rosenbrock, Sphere};
pub use detection::{detect, Detection, GrayImage, TemplateMatcher};
