use crate::error::ObjectiveError;

/// Cost function minimized by the swarm.
///
/// Must be deterministic for identical input. `Sync` so particles can be
/// evaluated from worker threads.
pub trait Objective: Sync {
    /// Evaluate the cost at `position`.
    fn evaluate(&self, position: &[f64]) -> Result<f64, ObjectiveError>;

    /// Dimensionality this objective expects, if it is fixed.
    fn dimensions(&self) -> Option<usize> {
        None
    }
}

impl<T: Objective + ?Sized> Objective for &T {
    fn evaluate(&self, position: &[f64]) -> Result<f64, ObjectiveError> {
        (**self).evaluate(position)
    }

    fn dimensions(&self) -> Option<usize> {
        (**self).dimensions()
    }
}

impl<T: Objective + ?Sized> Objective for Box<T> {
    fn evaluate(&self, position: &[f64]) -> Result<f64, ObjectiveError> {
        (**self).evaluate(position)
    }

    fn dimensions(&self) -> Option<usize> {
        (**self).dimensions()
    }
}

/// Infallible closure adapter, see [`from_fn`].
#[derive(Clone, Copy, Debug)]
pub struct FnObjective<F> {
    f: F,
}

impl<F> Objective for FnObjective<F>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    fn evaluate(&self, position: &[f64]) -> Result<f64, ObjectiveError> {
        Ok((self.f)(position))
    }
}

/// Fallible closure adapter, see [`from_fallible_fn`].
#[derive(Clone, Copy, Debug)]
pub struct FallibleFnObjective<F> {
    f: F,
}

impl<F> Objective for FallibleFnObjective<F>
where
    F: Fn(&[f64]) -> Result<f64, ObjectiveError> + Sync,
{
    fn evaluate(&self, position: &[f64]) -> Result<f64, ObjectiveError> {
        (self.f)(position)
    }
}

/// Wrap a plain cost closure.
pub fn from_fn<F>(f: F) -> FnObjective<F>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    FnObjective { f }
}

/// Wrap a closure that may reject a position.
pub fn from_fallible_fn<F>(f: F) -> FallibleFnObjective<F>
where
    F: Fn(&[f64]) -> Result<f64, ObjectiveError> + Sync,
{
    FallibleFnObjective { f }
}

/// A candidate replaces an incumbent only on a strict decrease.
///
/// NaN never improves anything; any number improves a NaN incumbent.
#[inline]
pub fn improves(candidate: f64, incumbent: f64) -> bool {
    candidate < incumbent || (incumbent.is_nan() && !candidate.is_nan())
}
