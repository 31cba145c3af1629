use super::solvers::traits::{IterationView, OptimizationCallback};
use tracing::info;

/// Logs periodic progress through `tracing`.
pub struct ProgressLogger {
    verbose: bool,
    every: usize,
    iteration_count: usize,
    best_cost: f64,
}

impl ProgressLogger {
    /// Log every `every`-th iteration when `verbose` is set.
    pub fn new(verbose: bool, every: usize) -> Self {
        Self {
            verbose,
            every: every.max(1),
            iteration_count: 0,
            best_cost: f64::INFINITY,
        }
    }

    pub fn iterations_seen(&self) -> usize {
        self.iteration_count
    }

    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }
}

impl OptimizationCallback for ProgressLogger {
    fn on_iteration(&mut self, view: &IterationView<'_>) -> Result<(), String> {
        self.iteration_count = view.iteration;
        self.best_cost = view.best_cost;

        if self.verbose && view.iteration % self.every == 0 {
            info!(
                iteration = view.iteration,
                best_cost = view.best_cost,
                best_position = ?view.best_position,
                "swarm progress"
            );
        }
        Ok(())
    }
}

/// Every particle's position and current cost at one iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub iteration: usize,
    pub positions: Vec<Vec<f64>>,
    pub costs: Vec<f64>,
}

/// Collects one [`Frame`] per iteration for animation layers.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    frames: Vec<Frame>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl OptimizationCallback for FrameRecorder {
    fn on_iteration(&mut self, view: &IterationView<'_>) -> Result<(), String> {
        self.frames.push(Frame {
            iteration: view.iteration,
            positions: view.particles.iter().map(|p| p.position().to_vec()).collect(),
            costs: view.particles.iter().map(|p| p.cost()).collect(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SwarmConfig;
    use crate::optimization::problem::from_fn;
    use crate::optimization::solvers::{StopReason, Swarm};

    fn sphere(x: &[f64]) -> f64 {
        x.iter().map(|v| v * v).sum()
    }

    #[test]
    fn progress_logger_tracks_the_run() {
        let config = SwarmConfig::uniform(2, -3.0, 3.0).with_max_iterations(12);
        let mut logger = ProgressLogger::new(true, 5);
        let result = Swarm::new(config, from_fn(sphere))
            .unwrap()
            .run_with_callback(&mut logger)
            .unwrap();
        assert!(!logger.should_stop());
        assert_eq!(result.stop_reason, StopReason::MaxIterations);
        assert_eq!(logger.iterations_seen(), 12);
        assert_eq!(logger.best_cost(), result.cost);
    }

    #[test]
    fn frames_capture_every_particle() {
        let config = SwarmConfig::uniform(2, -3.0, 3.0)
            .with_population_size(8)
            .with_max_iterations(5);
        let mut recorder = FrameRecorder::new();
        Swarm::new(config, from_fn(sphere))
            .unwrap()
            .run_with_callback(&mut recorder)
            .unwrap();

        let frames = recorder.into_frames();
        assert_eq!(frames.len(), 5);
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.iteration, i + 1);
            assert_eq!(frame.positions.len(), 8);
            for (position, cost) in frame.positions.iter().zip(&frame.costs) {
                assert_eq!(sphere(position), *cost);
            }
        }
    }
}
