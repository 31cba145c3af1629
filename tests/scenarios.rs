use swarm_optimizer::objectives::{Rastrigin, Rosenbrock, Sphere};
use swarm_optimizer::{
    from_fn, BoundaryPolicy, Seed, StopReason, Swarm, SwarmConfig, VelocityCap,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn one_dimensional_parabola_converges_to_zero() {
    init_tracing();
    let config = SwarmConfig::uniform(1, -10.0, 10.0)
        .with_population_size(20)
        .with_max_iterations(50)
        .with_seed(Seed::Fixed(42));
    let result = Swarm::new(config, from_fn(|x: &[f64]| x[0] * x[0]))
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(result.iterations, 50);
    assert_eq!(result.stop_reason, StopReason::MaxIterations);
    assert!(result.cost < 1e-4, "cost = {}", result.cost);
}

#[test]
fn shifted_bowl_converges_to_its_center() {
    init_tracing();
    let config = SwarmConfig::uniform(2, -10.0, 10.0)
        .with_population_size(30)
        .with_max_iterations(200);
    let result = Swarm::new(config, Sphere::shifted(vec![3.0, -2.0]))
        .unwrap()
        .run()
        .unwrap();

    assert!((result.position[0] - 3.0).abs() < 1e-3, "{:?}", result.position);
    assert!((result.position[1] + 2.0).abs() < 1e-3, "{:?}", result.position);
}

fn needle(x: &[f64]) -> Option<f64> {
    (x[0] == 10.0).then_some(0.0)
}

#[test]
fn infinite_costs_never_beat_the_single_finite_point() {
    init_tracing();
    let config = SwarmConfig::uniform(1, 0.0, 10.0)
        .with_population_size(30)
        .with_max_iterations(100)
        .with_velocity_cap(VelocityCap::PerDimension(vec![10.0]));
    let result = Swarm::new(config, from_fn(|x: &[f64]| needle(x).unwrap_or(f64::INFINITY)))
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(result.cost, 0.0);
    assert_eq!(result.position, vec![10.0]);
}

#[test]
fn nan_costs_never_beat_the_single_finite_point() {
    init_tracing();
    let config = SwarmConfig::uniform(1, 0.0, 10.0)
        .with_population_size(30)
        .with_max_iterations(100)
        .with_velocity_cap(VelocityCap::PerDimension(vec![10.0]));
    let result = Swarm::new(config, from_fn(|x: &[f64]| needle(x).unwrap_or(f64::NAN)))
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(result.cost, 0.0);
    assert_eq!(result.position, vec![10.0]);
}

#[test]
fn zero_budget_returns_initial_best() {
    init_tracing();
    let config = SwarmConfig::uniform(3, -5.0, 5.0)
        .with_max_iterations(0)
        .with_history(true);
    let swarm = Swarm::new(config, Sphere::new(3)).unwrap();
    let (position, cost) = swarm.global_best();
    let (position, cost) = (position.to_vec(), cost);

    let result = swarm.run().unwrap();
    assert_eq!(result.iterations, 0);
    assert_eq!(result.cost_evals, 20);
    assert_eq!(result.position, position);
    assert_eq!(result.cost, cost);
    assert!(result.history.is_empty());
}

#[test]
fn standard_swarm_escapes_rastrigin_local_minima() {
    init_tracing();
    let f = Rastrigin::new(2);
    let config = SwarmConfig::standard(f.suggested_bounds()).with_max_iterations(1000);
    let result = Swarm::new(config, f).unwrap().run().unwrap();
    assert!(result.cost < 0.5, "cost = {}", result.cost);
}

#[test]
fn standard_swarm_follows_rosenbrock_valley() {
    init_tracing();
    let f = Rosenbrock::new(2);
    let config = SwarmConfig::standard(f.suggested_bounds());
    let result = Swarm::new(config, f).unwrap().run().unwrap();
    assert!(result.cost < 1e-3, "cost = {}", result.cost);
    assert!((result.position[0] - 1.0).abs() < 0.1);
    assert!((result.position[1] - 1.0).abs() < 0.2);
}

#[test]
fn clamp_only_policy_still_converges() {
    let config = SwarmConfig::uniform(2, -10.0, 10.0)
        .with_boundary(BoundaryPolicy::Clamp)
        .with_max_iterations(200);
    let result = Swarm::new(config, Sphere::shifted(vec![9.5, -9.5]))
        .unwrap()
        .run()
        .unwrap();
    assert!(result.cost < 1e-6, "cost = {}", result.cost);
}

#[test]
fn config_from_json_drives_a_run() {
    let config = SwarmConfig::from_json(
        r#"{
            "bounds": [[-10.0, 10.0], [-10.0, 10.0]],
            "num_particles": 25,
            "max_iterations": 500,
            "target_cost": 1e-8,
            "record_history": true
        }"#,
    )
    .unwrap();
    let result = Swarm::new(config, Sphere::new(2)).unwrap().run().unwrap();
    assert_eq!(result.stop_reason, StopReason::TargetReached);
    assert_eq!(result.history.len(), result.iterations);

    let summary = result.to_string();
    assert!(summary.contains("OPTIMIZATION SUMMARY"));
    assert!(result.to_json().unwrap().contains("\"target_reached\""));
}
