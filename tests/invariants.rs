use proptest::prelude::*;
use swarm_optimizer::objectives::Rastrigin;
use swarm_optimizer::{
    BoundaryPolicy, Objective, Seed, Swarm, SwarmConfig, Topology,
};

fn config(
    seed: u64,
    particles: usize,
    dimensions: usize,
    ring: bool,
    clamp_only: bool,
) -> SwarmConfig {
    SwarmConfig::uniform(dimensions, -5.12, 5.12)
        .with_population_size(particles)
        .with_seed(Seed::Fixed(seed))
        .with_topology(if ring { Topology::Ring } else { Topology::Global })
        .with_boundary(if clamp_only {
            BoundaryPolicy::Clamp
        } else {
            BoundaryPolicy::ClampAndZero
        })
        .with_history(true)
}

/// Checks every per-particle invariant and returns the global best cost.
fn check_state<O: Objective>(swarm: &Swarm<O>, objective: &Rastrigin) -> Result<f64, TestCaseError> {
    let bounds = &swarm.config().bounds;
    let caps = swarm.velocity_cap();

    for particle in swarm.particles() {
        for (d, &(lower, upper)) in bounds.iter().enumerate() {
            let x = particle.position()[d];
            prop_assert!(lower <= x && x <= upper, "x[{}] = {} outside [{}, {}]", d, x, lower, upper);
            prop_assert!(particle.velocity()[d].abs() <= caps[d]);
        }
        prop_assert_eq!(
            particle.best_cost(),
            objective.evaluate(particle.best_position()).unwrap()
        );
    }

    let min = swarm
        .particles()
        .iter()
        .map(|p| p.best_cost())
        .fold(f64::INFINITY, f64::min);
    let (_, best) = swarm.global_best();
    prop_assert_eq!(best, min);
    Ok(best)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn invariants_hold_every_iteration(
        seed in any::<u64>(),
        particles in 1..12usize,
        dimensions in 1..4usize,
        ring in any::<bool>(),
        clamp_only in any::<bool>(),
    ) {
        let objective = Rastrigin::new(dimensions);
        let mut swarm = Swarm::new(config(seed, particles, dimensions, ring, clamp_only), objective).unwrap();

        let mut previous = check_state(&swarm, &objective)?;
        for _ in 0..25 {
            swarm.step().unwrap();
            let best = check_state(&swarm, &objective)?;
            prop_assert!(best <= previous, "global best rose from {} to {}", previous, best);
            previous = best;
        }
        prop_assert_eq!(swarm.history().len(), 25);
    }

    #[test]
    fn identical_seeds_reproduce_runs(
        seed in any::<u64>(),
        particles in 1..12usize,
        ring in any::<bool>(),
    ) {
        let run = || {
            let config = config(seed, particles, 2, ring, false).with_max_iterations(20);
            Swarm::new(config, Rastrigin::new(2)).unwrap().run().unwrap()
        };
        let (first, second) = (run(), run());
        prop_assert_eq!(first.position, second.position);
        prop_assert_eq!(first.cost.to_bits(), second.cost.to_bits());
        prop_assert_eq!(first.history, second.history);
    }
}

#[test]
fn history_is_monotone() {
    let config = config(7, 15, 3, false, false).with_max_iterations(100);
    let result = Swarm::new(config, Rastrigin::new(3)).unwrap().run().unwrap();
    assert!(result
        .history
        .windows(2)
        .all(|pair| pair[1].cost <= pair[0].cost));
}

#[test]
fn single_particle_swarm_runs() {
    let config = config(3, 1, 2, true, false).with_max_iterations(30);
    let result = Swarm::new(config, Rastrigin::new(2)).unwrap().run().unwrap();
    assert_eq!(result.iterations, 30);
    assert_eq!(result.cost_evals, 31);
}
