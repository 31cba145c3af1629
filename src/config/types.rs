use crate::error::{SwarmError, SwarmResult};
use serde::{Deserialize, Serialize};

/// Seed used by [`SwarmConfig`] when none is given.
pub const DEFAULT_SEED: u64 = 42;

// ===== ENUMS =====

/// Source of the swarm's random stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seed {
    /// Reproducible runs.
    Fixed(u64),
    /// Drawn from the thread-local generator at construction.
    Entropy,
}

impl Default for Seed {
    fn default() -> Self {
        Self::Fixed(DEFAULT_SEED)
    }
}

impl Seed {
    /// Resolve to the concrete value fed to the generator.
    pub fn resolve(self) -> u64 {
        match self {
            Self::Fixed(seed) => seed,
            Self::Entropy => rand::random(),
        }
    }
}

/// How the per-dimension velocity cap is derived.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityCap {
    /// `v_max_d = fraction * (upper_d - lower_d)`
    FractionOfRange(f64),
    /// Explicit cap for each dimension.
    PerDimension(Vec<f64>),
}

impl Default for VelocityCap {
    fn default() -> Self {
        Self::FractionOfRange(0.2)
    }
}

impl VelocityCap {
    pub fn resolve(&self, bounds: &[(f64, f64)]) -> Vec<f64> {
        match self {
            Self::FractionOfRange(fraction) => bounds
                .iter()
                .map(|&(lower, upper)| (upper - lower) * fraction)
                .collect(),
            Self::PerDimension(caps) => caps.clone(),
        }
    }
}

/// What happens to a coordinate that leaves its bounds after a move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Clamp the coordinate and zero that velocity component.
    #[default]
    ClampAndZero,
    /// Clamp the coordinate, keep the velocity.
    Clamp,
}

/// Which personal bests a particle is pulled toward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Every particle follows the swarm-wide best.
    #[default]
    Global,
    /// Each particle follows the best of itself and its two ring neighbours.
    Ring,
}

// ===== CONFIGURATION =====

/// Everything needed to build a [`crate::Swarm`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    pub num_particles: usize,
    /// `(lower, upper)` for each dimension; its length is the dimensionality.
    pub bounds: Vec<(f64, f64)>,
    pub max_iterations: usize,
    pub inertia: f64,   // w
    pub cognitive: f64, // c1
    pub social: f64,    // c2
    pub velocity_cap: VelocityCap,
    pub boundary: BoundaryPolicy,
    pub topology: Topology,
    pub seed: Seed,
    /// Stop once the global best drops below this cost.
    pub target_cost: Option<f64>,
    /// Stop after this many consecutive iterations without global improvement.
    pub stall_iterations: Option<usize>,
    /// Stop once the norm of the per-dimension position variance falls to this value.
    pub position_tolerance: Option<f64>,
    pub record_history: bool,
    pub parallel: bool,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            num_particles: 20,
            bounds: Vec::new(),
            max_iterations: 1000,
            inertia: 0.7,
            cognitive: 1.5,
            social: 1.5,
            velocity_cap: VelocityCap::default(),
            boundary: BoundaryPolicy::default(),
            topology: Topology::default(),
            seed: Seed::default(),
            target_cost: None,
            stall_iterations: None,
            position_tolerance: None,
            record_history: false,
            parallel: false,
        }
    }
}

impl SwarmConfig {
    pub fn new(bounds: Vec<(f64, f64)>) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    /// Same `(lower, upper)` interval on every dimension.
    pub fn uniform(dimensions: usize, lower: f64, upper: f64) -> Self {
        Self::new(vec![(lower, upper); dimensions])
    }

    /// Ring topology with Clerc constriction (c1 = c2 = 2.05) and 50 particles,
    /// after Bratton & Kennedy's "standard PSO".
    pub fn standard(bounds: Vec<(f64, f64)>) -> Self {
        const ACCELERATION: f64 = 2.05;
        let chi = clerc_chi(2.0 * ACCELERATION);
        Self {
            num_particles: 50,
            max_iterations: 2000,
            inertia: chi,
            cognitive: chi * ACCELERATION,
            social: chi * ACCELERATION,
            topology: Topology::Ring,
            ..Self::new(bounds)
        }
    }

    /// Parse a JSON document; absent fields take their defaults.
    pub fn from_json(json: &str) -> SwarmResult<Self> {
        serde_json::from_str(json).map_err(|e| SwarmError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> SwarmResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SwarmError::Parse(e.to_string()))
    }

    pub fn dimensions(&self) -> usize {
        self.bounds.len()
    }

    /// Configure swarm size (default: 20)
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.num_particles = size;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Configure PSO parameters (defaults: w=0.7, c1=1.5, c2=1.5)
    pub fn with_pso_params(mut self, inertia: f64, cognitive: f64, social: f64) -> Self {
        self.inertia = inertia;
        self.cognitive = cognitive;
        self.social = social;
        self
    }

    /// Fold the constriction factor into w, c1 and c2.
    ///
    /// Fails when `c1 + c2 <= 4`, where the factor is undefined.
    pub fn with_constriction(mut self, cognitive: f64, social: f64) -> SwarmResult<Self> {
        let (chi, c1, c2) = constriction_coefficients(cognitive, social)?;
        self.inertia = chi;
        self.cognitive = c1;
        self.social = c2;
        Ok(self)
    }

    pub fn with_velocity_cap(mut self, cap: VelocityCap) -> Self {
        self.velocity_cap = cap;
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_target_cost(mut self, target: f64) -> Self {
        self.target_cost = Some(target);
        self
    }

    pub fn with_stall_iterations(mut self, iterations: usize) -> Self {
        self.stall_iterations = Some(iterations);
        self
    }

    pub fn with_position_tolerance(mut self, tolerance: f64) -> Self {
        self.position_tolerance = Some(tolerance);
        self
    }

    pub fn with_history(mut self, record: bool) -> Self {
        self.record_history = record;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Clerc's constriction factor `chi` for `phi = c1 + c2 > 4`.
///
/// Returns `(chi, chi * c1, chi * c2)`: the update
/// `v' = chi * (v + c1 r1 (p - x) + c2 r2 (g - x))` expressed as an
/// inertia-weight update.
pub fn constriction_coefficients(cognitive: f64, social: f64) -> SwarmResult<(f64, f64, f64)> {
    let phi = cognitive + social;
    if !(phi > 4.0) {
        return Err(SwarmError::InvalidConfig(format!(
            "constriction needs c1 + c2 > 4, got {}",
            phi
        )));
    }
    let chi = clerc_chi(phi);
    Ok((chi, chi * cognitive, chi * social))
}

// only defined for phi > 4
fn clerc_chi(phi: f64) -> f64 {
    2.0 / (2.0 - phi - (phi * phi - 4.0 * phi).sqrt()).abs()
}
