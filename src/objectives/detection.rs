//! Object detection by template matching.
//!
//! A model image is compared against every equally sized window of a target
//! image; the swarm searches for the window (and optionally the scale) with
//! the lowest dissimilarity.

use crate::config::SwarmConfig;
use crate::error::{ObjectiveError, SwarmError, SwarmResult};
use crate::optimization::{Objective, SolverResult, Swarm};

/// Row-major grayscale image.
#[derive(Clone, Debug, PartialEq)]
pub struct GrayImage {
    width: usize,
    height: usize,
    pixels: Vec<f64>,
}

impl GrayImage {
    pub fn new(width: usize, height: usize, pixels: Vec<f64>) -> SwarmResult<Self> {
        check_size(width, height)?;
        if pixels.len() != width * height {
            return Err(SwarmError::DimensionMismatch {
                expected: width * height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build an image from a pixel function of `(x, y)`.
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> f64) -> SwarmResult<Self> {
        check_size(width, height)?;
        Ok(Self::generate(width, height, f))
    }

    // callers guarantee a non-empty size
    fn generate(width: usize, height: usize, f: impl Fn(usize, usize) -> f64) -> Self {
        let pixels = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.pixels[y * self.width + x]
    }

    /// Copy of the `width x height` window with top-left corner `(x, y)`.
    pub fn crop(&self, x: usize, y: usize, width: usize, height: usize) -> Option<Self> {
        if width == 0 || height == 0 || x + width > self.width || y + height > self.height {
            return None;
        }
        Some(Self::generate(width, height, |i, j| self.get(x + i, y + j)))
    }

    /// Nearest-neighbour resampling.
    pub fn resized(&self, width: usize, height: usize) -> Self {
        Self::generate(width.max(1), height.max(1), |i, j| {
            self.get(i * self.width / width.max(1), j * self.height / height.max(1))
        })
    }
}

fn check_size(width: usize, height: usize) -> SwarmResult<()> {
    if width == 0 || height == 0 {
        return Err(SwarmError::InvalidConfig(format!(
            "image must not be empty, got {}x{}",
            width, height
        )));
    }
    Ok(())
}

/// Dissimilarity between a model image and windows of a target image.
///
/// Positions are `[x, y]` (top-left corner, floored to pixels) or
/// `[x, y, scale]` when a scale range is configured.
#[derive(Clone, Debug)]
pub struct TemplateMatcher {
    model: GrayImage,
    target: GrayImage,
    scale: Option<(f64, f64)>,
}

impl TemplateMatcher {
    pub fn new(model: GrayImage, target: GrayImage) -> SwarmResult<Self> {
        if model.width > target.width || model.height > target.height {
            return Err(SwarmError::InvalidConfig(format!(
                "model {}x{} does not fit in target {}x{}",
                model.width, model.height, target.width, target.height
            )));
        }
        Ok(Self {
            model,
            target,
            scale: None,
        })
    }

    /// Also search over the model's scale in `[min, max]`.
    pub fn with_scale_range(mut self, min: f64, max: f64) -> SwarmResult<Self> {
        if !(min > 0.0 && min <= max && max.is_finite()) {
            return Err(SwarmError::InvalidConfig(format!(
                "invalid scale range [{}, {}]",
                min, max
            )));
        }
        let (width, height) = self.scaled_size(max);
        if width > self.target.width || height > self.target.height {
            return Err(SwarmError::InvalidConfig(format!(
                "model at scale {} ({}x{}) does not fit in target {}x{}",
                max, width, height, self.target.width, self.target.height
            )));
        }
        self.scale = Some((min, max));
        Ok(self)
    }

    /// Feasible search region: every window fits inside the target.
    pub fn search_bounds(&self) -> Vec<(f64, f64)> {
        let (width, height) = match self.scale {
            Some((_, max)) => self.scaled_size(max),
            None => (self.model.width, self.model.height),
        };
        let mut bounds = vec![
            (0.0, (self.target.width - width) as f64),
            (0.0, (self.target.height - height) as f64),
        ];
        if let Some(range) = self.scale {
            bounds.push(range);
        }
        bounds
    }

    fn scaled_size(&self, scale: f64) -> (usize, usize) {
        let width = (self.model.width as f64 * scale).round().max(1.0) as usize;
        let height = (self.model.height as f64 * scale).round().max(1.0) as usize;
        (width, height)
    }

    /// Frobenius norm of the pixel-wise difference between `model` and the window at `(x, y)`.
    fn frobenius(&self, model: &GrayImage, x: usize, y: usize) -> f64 {
        (0..model.height)
            .flat_map(|j| (0..model.width).map(move |i| (i, j)))
            .map(|(i, j)| (self.target.get(x + i, y + j) - model.get(i, j)).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

impl Objective for TemplateMatcher {
    fn evaluate(&self, position: &[f64]) -> Result<f64, ObjectiveError> {
        let expected = self.dimensions().unwrap_or(2);
        if position.len() != expected {
            return Err(ObjectiveError::Dimension {
                expected,
                actual: position.len(),
            });
        }
        if !(position[0] >= 0.0 && position[1] >= 0.0) {
            return Err(ObjectiveError::OutOfDomain(format!(
                "negative window corner ({}, {})",
                position[0], position[1]
            )));
        }
        let (x, y) = (position[0].floor() as usize, position[1].floor() as usize);

        let scaled;
        let model = match self.scale {
            Some(_) => {
                let (width, height) = self.scaled_size(position[2]);
                scaled = self.model.resized(width, height);
                &scaled
            }
            None => &self.model,
        };
        if x + model.width > self.target.width || y + model.height > self.target.height {
            return Err(ObjectiveError::OutOfDomain(format!(
                "{}x{} window at ({}, {}) exceeds target {}x{}",
                model.width, model.height, x, y, self.target.width, self.target.height
            )));
        }

        let norm = self.frobenius(model, x, y);
        // sizes differ across scales, so compare per-pixel error
        Ok(match self.scale {
            Some(_) => norm / ((model.width * model.height) as f64).sqrt(),
            None => norm,
        })
    }

    fn dimensions(&self) -> Option<usize> {
        Some(if self.scale.is_some() { 3 } else { 2 })
    }
}

/// Best-matching window found by [`detect`].
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub x: usize,
    pub y: usize,
    /// `1.0` unless a scale range was searched.
    pub scale: f64,
    pub cost: f64,
    pub result: SolverResult,
}

/// Locate the model inside the target with a swarm.
///
/// `config.bounds` is replaced by [`TemplateMatcher::search_bounds`].
pub fn detect(matcher: &TemplateMatcher, config: SwarmConfig) -> SwarmResult<Detection> {
    let config = SwarmConfig {
        bounds: matcher.search_bounds(),
        ..config
    };
    let result = Swarm::new(config, matcher)?.run()?;

    Ok(Detection {
        x: result.position[0].floor() as usize,
        y: result.position[1].floor() as usize,
        scale: result.position.get(2).copied().unwrap_or(1.0),
        cost: result.cost,
        result,
    })
}
