use super::types::{SwarmConfig, VelocityCap};
use crate::error::{SwarmError, SwarmResult};

/// Check that every dimension has finite bounds with `lower <= upper`.
///
/// The width must also stay samplable: uniform sampling over an inclusive
/// range scales the width by `1 / (1 - EPSILON)`, which overflows for widths
/// within a hair of `f64::MAX`. Fails on the first offending dimension,
/// reported by index.
pub fn validate_bounds(bounds: &[(f64, f64)]) -> SwarmResult<()> {
    if bounds.is_empty() {
        return Err(SwarmError::InvalidConfig(
            "search space needs at least one dimension".into(),
        ));
    }

    for (dimension, &(lower, upper)) in bounds.iter().enumerate() {
        // a finite width rules out infinite and NaN endpoints
        if !samplable_width(upper - lower) || !(lower <= upper) {
            return Err(SwarmError::InvalidBounds {
                dimension,
                lower,
                upper,
            });
        }
    }

    Ok(())
}

fn samplable_width(width: f64) -> bool {
    (width / (1.0 - f64::EPSILON)).is_finite()
}

/// Check a velocity cap against the bounds and resolve it per dimension.
pub fn validate_velocity_cap(cap: &VelocityCap, bounds: &[(f64, f64)]) -> SwarmResult<Vec<f64>> {
    match cap {
        VelocityCap::FractionOfRange(fraction) if !(fraction.is_finite() && *fraction > 0.0) => {
            return Err(SwarmError::InvalidConfig(format!(
                "velocity cap fraction must be positive and finite, got {}",
                fraction
            )));
        }
        VelocityCap::PerDimension(caps) if caps.len() != bounds.len() => {
            return Err(SwarmError::DimensionMismatch {
                expected: bounds.len(),
                actual: caps.len(),
            });
        }
        _ => {}
    }

    let caps = cap.resolve(bounds);
    if let Some((dimension, cap)) = caps
        .iter()
        .enumerate()
        .find(|(_, cap)| !(samplable_width(2.0 * **cap) && **cap >= 0.0))
    {
        return Err(SwarmError::InvalidConfig(format!(
            "velocity cap for dimension {} must be finite, non-negative and below half of f64::MAX, got {}",
            dimension, cap
        )));
    }

    Ok(caps)
}

/// Validate a whole configuration
///
/// Checks population, bounds, coefficients, velocity cap and stopping rules.
/// Returns the resolved per-dimension velocity cap.
pub fn validate_config(config: &SwarmConfig) -> SwarmResult<Vec<f64>> {
    if config.num_particles == 0 {
        return Err(SwarmError::InvalidConfig(
            "swarm needs at least one particle".into(),
        ));
    }

    validate_bounds(&config.bounds)?;

    for (name, value) in [
        ("inertia", config.inertia),
        ("cognitive", config.cognitive),
        ("social", config.social),
    ] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(SwarmError::InvalidConfig(format!(
                "{} coefficient must be finite and non-negative, got {}",
                name, value
            )));
        }
    }

    if config.stall_iterations == Some(0) {
        return Err(SwarmError::InvalidConfig(
            "stall window must be at least one iteration".into(),
        ));
    }
    if let Some(tolerance) = config.position_tolerance {
        if !(tolerance >= 0.0) {
            return Err(SwarmError::InvalidConfig(format!(
                "position tolerance must be non-negative, got {}",
                tolerance
            )));
        }
    }
    if let Some(target) = config.target_cost {
        if target.is_nan() {
            return Err(SwarmError::InvalidConfig("target cost is NaN".into()));
        }
    }

    validate_velocity_cap(&config.velocity_cap, &config.bounds)
}
