use crate::config::{validate_bounds, BoundaryPolicy};
use crate::error::{ObjectiveError, SwarmError, SwarmResult};
use crate::optimization::problem::{improves, Objective};
use rand::Rng;

/// Coefficients of the velocity update: w, c1, c2.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coefficients {
    pub inertia: f64,
    pub cognitive: f64,
    pub social: f64,
}

/// One candidate solution with its own velocity and personal best.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    position: Vec<f64>,
    velocity: Vec<f64>,
    cost: f64,
    best_position: Vec<f64>,
    best_cost: f64,
}

impl Particle {
    /// Sample a particle uniformly inside `bounds` and evaluate it once.
    ///
    /// Velocity components are drawn from `[-v_max_d, v_max_d]`.
    pub fn initialize<R: Rng>(
        bounds: &[(f64, f64)],
        v_max: &[f64],
        rng: &mut R,
        objective: &dyn Objective,
    ) -> SwarmResult<Self> {
        validate_bounds(bounds)?;
        if v_max.len() != bounds.len() {
            return Err(SwarmError::DimensionMismatch {
                expected: bounds.len(),
                actual: v_max.len(),
            });
        }

        let position: Vec<f64> = bounds
            .iter()
            .map(|&(min, max)| rng.gen_range(min..=max))
            .collect();
        let velocity: Vec<f64> = v_max
            .iter()
            .map(|&cap| rng.gen_range(-cap..=cap))
            .collect();

        let cost = objective.evaluate(&position).map_err(|source| SwarmError::Objective {
            iteration: 0,
            particle: 0,
            source,
        })?;

        Ok(Self {
            best_position: position.clone(),
            best_cost: cost,
            position,
            velocity,
            cost,
        })
    }

    /// Move the particle one step toward `guide` and its personal best.
    ///
    /// Per dimension: `v' = w v + c1 r1 (p - x) + c2 r2 (g - x)` with fresh
    /// `r1, r2` in `[0, 1)`, clamped to `v_max`, then `x' = x + v'` under the
    /// boundary policy. Returns whether the personal best improved.
    #[allow(clippy::too_many_arguments)]
    pub fn update<R: Rng>(
        &mut self,
        guide: &[f64],
        coefficients: &Coefficients,
        rng: &mut R,
        bounds: &[(f64, f64)],
        v_max: &[f64],
        boundary: BoundaryPolicy,
        objective: &dyn Objective,
    ) -> Result<bool, ObjectiveError> {
        for d in 0..self.position.len() {
            let r1: f64 = rng.gen_range(0.0..1.0);
            let r2: f64 = rng.gen_range(0.0..1.0);

            let velocity = coefficients.inertia * self.velocity[d]
                + coefficients.cognitive * r1 * (self.best_position[d] - self.position[d])
                + coefficients.social * r2 * (guide[d] - self.position[d]);
            // opposing pulls can overflow to inf - inf; drop the component
            self.velocity[d] = if velocity.is_nan() {
                0.0
            } else {
                velocity.clamp(-v_max[d], v_max[d])
            };

            let (min, max) = bounds[d];
            let moved = self.position[d] + self.velocity[d];
            if !(min..=max).contains(&moved) {
                self.position[d] = moved.clamp(min, max);
                if boundary == BoundaryPolicy::ClampAndZero {
                    self.velocity[d] = 0.0;
                }
            } else {
                self.position[d] = moved;
            }
        }

        self.cost = objective.evaluate(&self.position)?;
        if improves(self.cost, self.best_cost) {
            self.best_cost = self.cost;
            self.best_position.copy_from_slice(&self.position);
            return Ok(true);
        }
        Ok(false)
    }

    pub fn position(&self) -> &[f64] {
        &self.position
    }

    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    /// Cost at the current position.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn best_position(&self) -> &[f64] {
        &self.best_position
    }

    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }
}
