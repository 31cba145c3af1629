//! Synthetic landscapes with known minima.

use crate::error::ObjectiveError;
use crate::optimization::Objective;
use std::f64::consts::PI;

/// `f(x) = sum (x_i - c_i)^2`, minimum 0 at `c`.
#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    center: Vec<f64>,
}

impl Sphere {
    /// Centered at the origin.
    pub fn new(dimensions: usize) -> Self {
        Self {
            center: vec![0.0; dimensions],
        }
    }

    pub fn shifted(center: Vec<f64>) -> Self {
        Self { center }
    }

    pub fn minimum(&self) -> &[f64] {
        &self.center
    }
}

impl Objective for Sphere {
    fn evaluate(&self, position: &[f64]) -> Result<f64, ObjectiveError> {
        check_dimensions(self.center.len(), position)?;
        Ok(position
            .iter()
            .zip(&self.center)
            .map(|(x, c)| (x - c).powi(2))
            .sum())
    }

    fn dimensions(&self) -> Option<usize> {
        Some(self.center.len())
    }
}

/// Rastrigin: `10 n + sum (x_i^2 - 10 cos(2 pi x_i))`.
///
/// Global minimum 0 at the origin, surrounded by a lattice of local minima.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rastrigin {
    dimensions: usize,
}

impl Rastrigin {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    pub fn suggested_bounds(&self) -> Vec<(f64, f64)> {
        vec![(-5.0, 5.0); self.dimensions]
    }
}

impl Objective for Rastrigin {
    fn evaluate(&self, position: &[f64]) -> Result<f64, ObjectiveError> {
        check_dimensions(self.dimensions, position)?;
        Ok(10.0 * position.len() as f64
            + position
                .iter()
                .map(|x| x * x - 10.0 * (2.0 * PI * x).cos())
                .sum::<f64>())
    }

    fn dimensions(&self) -> Option<usize> {
        Some(self.dimensions)
    }
}

/// Rosenbrock: `sum 100 (x_{i+1} - x_i^2)^2 + (1 - x_i)^2`.
///
/// Minimum 0 at `(1, ..., 1)` inside a long flat parabolic valley.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rosenbrock {
    dimensions: usize,
}

impl Rosenbrock {
    /// Needs at least two dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    pub fn suggested_bounds(&self) -> Vec<(f64, f64)> {
        let mut bounds = vec![(-1.5, 2.0); self.dimensions];
        for bound in bounds.iter_mut().skip(1) {
            *bound = (-0.5, 3.0);
        }
        bounds
    }
}

impl Objective for Rosenbrock {
    fn evaluate(&self, position: &[f64]) -> Result<f64, ObjectiveError> {
        check_dimensions(self.dimensions, position)?;
        if position.len() < 2 {
            return Err(ObjectiveError::Failed(
                "rosenbrock needs at least two dimensions".into(),
            ));
        }
        Ok(position
            .windows(2)
            .map(|pair| 100.0 * (pair[1] - pair[0] * pair[0]).powi(2) + (1.0 - pair[0]).powi(2))
            .sum())
    }

    fn dimensions(&self) -> Option<usize> {
        Some(self.dimensions)
    }
}

fn check_dimensions(expected: usize, position: &[f64]) -> Result<(), ObjectiveError> {
    if position.len() != expected {
        return Err(ObjectiveError::Dimension {
            expected,
            actual: position.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minima_evaluate_to_zero() {
        assert_eq!(Sphere::shifted(vec![3.0, -2.0]).evaluate(&[3.0, -2.0]), Ok(0.0));
        assert!(Rastrigin::new(2).evaluate(&[0.0, 0.0]).unwrap().abs() < 1e-12);
        assert_eq!(Rosenbrock::new(3).evaluate(&[1.0, 1.0, 1.0]), Ok(0.0));
    }

    #[test]
    fn rastrigin_has_local_minimum_near_integer_lattice() {
        let f = Rastrigin::new(1);
        let at_one = f.evaluate(&[1.0]).unwrap();
        assert!((at_one - 1.0).abs() < 1e-9);
        assert!(f.evaluate(&[0.5]).unwrap() > at_one);
    }

    #[test]
    fn rosenbrock_matches_two_dimensional_formula() {
        let (x, y): (f64, f64) = (-1.2, 1.0);
        let expected = (1.0 - x).powi(2) + 100.0 * (y - x * x).powi(2);
        assert!((Rosenbrock::new(2).evaluate(&[x, y]).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn wrong_dimensionality_is_an_error() {
        assert_eq!(
            Rastrigin::new(2).evaluate(&[1.0]),
            Err(ObjectiveError::Dimension {
                expected: 2,
                actual: 1
            })
        );
        assert!(Rosenbrock::new(1).evaluate(&[1.0]).is_err());
    }

    #[test]
    fn suggested_bounds_contain_minimum() {
        let bounds = Rosenbrock::new(2).suggested_bounds();
        assert_eq!(bounds, vec![(-1.5, 2.0), (-0.5, 3.0)]);
        assert!(Rastrigin::new(4)
            .suggested_bounds()
            .iter()
            .all(|&(lo, hi)| lo <= 0.0 && 0.0 <= hi));
    }
}
