use super::particle::Particle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Global best recorded at the end of one iteration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub iteration: usize,
    pub position: Vec<f64>,
    pub cost: f64,
}

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    MaxIterations,
    TargetReached,
    Stalled,
    /// Particle positions collapsed below the position tolerance.
    Converged,
    StoppedByCallback,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::MaxIterations => "Max iterations reached",
            Self::TargetReached => "Target cost reached",
            Self::Stalled => "Stagnated",
            Self::Converged => "Converged",
            Self::StoppedByCallback => "Stopped by callback",
        };
        f.write_str(reason)
    }
}

/// Final state handed back by a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverResult {
    pub position: Vec<f64>,
    pub cost: f64,
    pub iterations: usize,
    pub stop_reason: StopReason,
    pub cost_evals: usize,
    /// Resolved seed, replays the run when fed back as `Seed::Fixed`.
    pub seed: u64,
    /// Empty unless history recording was enabled.
    pub history: Vec<Snapshot>,
}

impl SolverResult {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SolverResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        writeln!(f, "OPTIMIZATION SUMMARY")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Stop Reason: {}", self.stop_reason)?;
        writeln!(f, "Total Iterations: {}", self.iterations)?;
        writeln!(f, "Cost Evaluations: {}", self.cost_evals)?;
        writeln!(f, "Seed: {}", self.seed)?;
        writeln!(f, "Final Cost: {:.6e}", self.cost)?;
        writeln!(f, "Best Position:")?;
        for (dimension, value) in self.position.iter().enumerate() {
            writeln!(f, "  x{} = {:.6e}", dimension, value)?;
        }

        if !self.history.is_empty() {
            writeln!(f, "Iteration History:")?;
            writeln!(f, "{:<8} {:<20}", "Iter", "Cost")?;
            writeln!(f, "{}", "-".repeat(30))?;
            for snapshot in &self.history {
                writeln!(f, "{:<8} {:<20.6e}", snapshot.iteration, snapshot.cost)?;
            }
        }
        write!(f, "{}", rule)
    }
}

/// Read-only view of the swarm handed to callbacks after each iteration.
#[derive(Clone, Copy, Debug)]
pub struct IterationView<'a> {
    pub iteration: usize,
    pub best_position: &'a [f64],
    pub best_cost: f64,
    pub particles: &'a [Particle],
}

/// Callback interface for optimization progress
pub trait OptimizationCallback {
    /// Called after each iteration's global-best reduction
    fn on_iteration(&mut self, view: &IterationView<'_>) -> Result<(), String>;

    /// Check if optimization should stop early
    fn should_stop(&self) -> bool {
        false
    }
}

/// Callback that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopCallback;

impl OptimizationCallback for NoopCallback {
    fn on_iteration(&mut self, _view: &IterationView<'_>) -> Result<(), String> {
        Ok(())
    }
}
