use super::particle::{Coefficients, Particle};
use super::traits::{IterationView, NoopCallback, OptimizationCallback, Snapshot, SolverResult, StopReason};
use crate::config::{validate_config, SwarmConfig, Topology};
use crate::error::{SwarmError, SwarmResult};
use crate::optimization::problem::{improves, Objective};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info, trace};

/// Particle swarm minimizing an [`Objective`] inside box bounds.
///
/// Updates are synchronous: every particle in an iteration is guided by the
/// bests frozen at the end of the previous iteration, and the global best
/// is recomputed once all particles have moved.
pub struct Swarm<O: Objective> {
    config: SwarmConfig,
    v_max: Vec<f64>,
    objective: O,
    particles: Vec<Particle>,
    global_best_position: Vec<f64>,
    global_best_cost: f64,
    rng: StdRng,
    seed: u64,
    iteration: usize,
    stall: usize,
    cost_evals: usize,
    history: Option<Vec<Snapshot>>,
}

impl<O: Objective> Swarm<O> {
    /// Validate `config`, seed the generator and sample the initial population.
    pub fn new(config: SwarmConfig, objective: O) -> SwarmResult<Self> {
        let v_max = validate_config(&config)?;
        if let Some(expected) = objective.dimensions() {
            if expected != config.dimensions() {
                return Err(SwarmError::DimensionMismatch {
                    expected,
                    actual: config.dimensions(),
                });
            }
        }

        let seed = config.seed.resolve();
        let mut rng = StdRng::seed_from_u64(seed);
        let streams = draw_streams(&mut rng, config.num_particles);

        let particles = {
            let bounds = config.bounds.as_slice();
            let caps = v_max.as_slice();
            let target: &dyn Objective = &objective;
            let init = |mut stream: StdRng| Particle::initialize(bounds, caps, &mut stream, target);
            let sampled: Vec<SwarmResult<Particle>> = if config.parallel {
                streams.into_par_iter().map(init).collect()
            } else {
                streams.into_iter().map(init).collect()
            };
            sampled
                .into_iter()
                .enumerate()
                .map(|(index, particle)| particle.map_err(|e| at_particle(e, index)))
                .collect::<SwarmResult<Vec<_>>>()?
        };

        let mut best = 0;
        for (index, particle) in particles.iter().enumerate().skip(1) {
            if improves(particle.best_cost(), particles[best].best_cost()) {
                best = index;
            }
        }
        let global_best_position = particles[best].best_position().to_vec();
        let global_best_cost = particles[best].best_cost();

        info!(
            particles = config.num_particles,
            dimensions = config.dimensions(),
            topology = ?config.topology,
            seed,
            best_cost = global_best_cost,
            "swarm initialized"
        );

        Ok(Self {
            cost_evals: config.num_particles,
            history: config.record_history.then(Vec::new),
            config,
            v_max,
            objective,
            particles,
            global_best_position,
            global_best_cost,
            rng,
            seed,
            iteration: 0,
            stall: 0,
        })
    }

    /// Run until the iteration budget or a configured stopping rule ends it.
    pub fn run(self) -> SwarmResult<SolverResult> {
        self.run_with_callback(&mut NoopCallback)
    }

    /// Run, reporting every completed iteration to `callback`.
    pub fn run_with_callback(
        mut self,
        callback: &mut dyn OptimizationCallback,
    ) -> SwarmResult<SolverResult> {
        let mut stop_reason = StopReason::MaxIterations;

        while self.iteration < self.config.max_iterations {
            self.step()?;

            callback
                .on_iteration(&self.view())
                .map_err(SwarmError::Interrupted)?;

            if callback.should_stop() {
                stop_reason = StopReason::StoppedByCallback;
                break;
            }
            if let Some(reason) = self.stop_condition() {
                stop_reason = reason;
                break;
            }
        }

        info!(
            iterations = self.iteration,
            cost_evals = self.cost_evals,
            best_cost = self.global_best_cost,
            reason = %stop_reason,
            "swarm finished"
        );

        Ok(SolverResult {
            position: self.global_best_position,
            cost: self.global_best_cost,
            iterations: self.iteration,
            stop_reason,
            cost_evals: self.cost_evals,
            seed: self.seed,
            history: self.history.unwrap_or_default(),
        })
    }

    /// Advance one iteration. Returns whether the global best improved.
    pub fn step(&mut self) -> SwarmResult<bool> {
        let iteration = self.iteration + 1;
        let guides = self.neighbourhood_guides();
        let streams = draw_streams(&mut self.rng, self.particles.len());

        let coefficients = Coefficients {
            inertia: self.config.inertia,
            cognitive: self.config.cognitive,
            social: self.config.social,
        };
        let bounds = self.config.bounds.as_slice();
        let v_max = self.v_max.as_slice();
        let boundary = self.config.boundary;
        let objective: &dyn Objective = &self.objective;
        let global = self.global_best_position.as_slice();

        let outcomes = update_particles(
            self.config.parallel,
            &mut self.particles,
            streams,
            |index, particle, mut stream| {
                let guide = guides.as_ref().map_or(global, |guides| guides[index].as_slice());
                particle.update(guide, &coefficients, &mut stream, bounds, v_max, boundary, objective)
            },
        );
        self.cost_evals += outcomes.len();
        self.iteration = iteration;

        let mut any_personal = false;
        for (particle, outcome) in outcomes.into_iter().enumerate() {
            any_personal |= outcome.map_err(|source| SwarmError::Objective {
                iteration,
                particle,
                source,
            })?;
        }

        let improved = any_personal && self.reduce_global_best();
        if improved {
            self.stall = 0;
        } else {
            self.stall += 1;
        }

        if let Some(history) = self.history.as_mut() {
            history.push(Snapshot {
                iteration,
                position: self.global_best_position.clone(),
                cost: self.global_best_cost,
            });
        }

        debug!(iteration, best_cost = self.global_best_cost, improved, "iteration complete");
        Ok(improved)
    }

    /// Replace the global best with the lowest personal best that beats it.
    ///
    /// Ties keep the first particle in population order.
    fn reduce_global_best(&mut self) -> bool {
        let mut best = None;
        let mut best_cost = self.global_best_cost;
        for (index, particle) in self.particles.iter().enumerate() {
            if improves(particle.best_cost(), best_cost) {
                best = Some(index);
                best_cost = particle.best_cost();
            }
        }

        let Some(index) = best else {
            return false;
        };
        trace!(particle = index, cost = best_cost, "new global best");
        self.global_best_cost = best_cost;
        self.global_best_position
            .copy_from_slice(self.particles[index].best_position());
        true
    }

    /// Social guide per particle for ring topology, `None` for global.
    ///
    /// The guide of particle `i` is the best personal best among `i`, `i - 1`
    /// and `i + 1` (ring indices), preferring `i` on ties.
    fn neighbourhood_guides(&self) -> Option<Vec<Vec<f64>>> {
        if self.config.topology != Topology::Ring {
            return None;
        }

        let n = self.particles.len();
        let guides = (0..n)
            .map(|i| {
                let mut best = i;
                for neighbour in [(i + n - 1) % n, (i + 1) % n] {
                    if improves(
                        self.particles[neighbour].best_cost(),
                        self.particles[best].best_cost(),
                    ) {
                        best = neighbour;
                    }
                }
                self.particles[best].best_position().to_vec()
            })
            .collect();
        Some(guides)
    }

    fn stop_condition(&self) -> Option<StopReason> {
        if let Some(target) = self.config.target_cost {
            if self.global_best_cost < target {
                return Some(StopReason::TargetReached);
            }
        }
        if let Some(window) = self.config.stall_iterations {
            if self.stall >= window {
                return Some(StopReason::Stalled);
            }
        }
        if let Some(tolerance) = self.config.position_tolerance {
            if self.spread() <= tolerance {
                return Some(StopReason::Converged);
            }
        }
        None
    }

    /// Euclidean norm of the per-dimension population variance of positions.
    pub fn spread(&self) -> f64 {
        let n = self.particles.len() as f64;
        (0..self.config.dimensions())
            .map(|d| {
                let mean = self.particles.iter().map(|p| p.position()[d]).sum::<f64>() / n;
                let variance = self
                    .particles
                    .iter()
                    .map(|p| (p.position()[d] - mean).powi(2))
                    .sum::<f64>()
                    / n;
                variance * variance
            })
            .sum::<f64>()
            .sqrt()
    }

    pub fn view(&self) -> IterationView<'_> {
        IterationView {
            iteration: self.iteration,
            best_position: &self.global_best_position,
            best_cost: self.global_best_cost,
            particles: &self.particles,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn global_best(&self) -> (&[f64], f64) {
        (&self.global_best_position, self.global_best_cost)
    }

    pub fn history(&self) -> &[Snapshot] {
        self.history.as_deref().unwrap_or(&[])
    }

    /// Completed iterations.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn cost_evals(&self) -> usize {
        self.cost_evals
    }

    /// Resolved seed of this run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    /// Per-dimension velocity cap in effect.
    pub fn velocity_cap(&self) -> &[f64] {
        &self.v_max
    }
}

/// One independent stream per particle, drawn from the master generator.
///
/// Keeps serial and parallel runs bit-identical.
fn draw_streams(rng: &mut StdRng, count: usize) -> Vec<StdRng> {
    (0..count)
        .map(|_| StdRng::seed_from_u64(rng.next_u64()))
        .collect()
}

fn update_particles<T, F>(
    parallel: bool,
    particles: &mut [Particle],
    streams: Vec<StdRng>,
    update: F,
) -> Vec<T>
where
    T: Send,
    F: Fn(usize, &mut Particle, StdRng) -> T + Sync + Send,
{
    if parallel {
        particles
            .par_iter_mut()
            .zip(streams)
            .enumerate()
            .map(|(index, (particle, stream))| update(index, particle, stream))
            .collect()
    } else {
        particles
            .iter_mut()
            .zip(streams)
            .enumerate()
            .map(|(index, (particle, stream))| update(index, particle, stream))
            .collect()
    }
}

fn at_particle(error: SwarmError, index: usize) -> SwarmError {
    match error {
        SwarmError::Objective { source, .. } => SwarmError::Objective {
            iteration: 0,
            particle: index,
            source,
        },
        other => other,
    }
}
