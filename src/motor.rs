use nalgebra::Vector3;

use crate::config::MotorModelConfig;
use crate::error::{CommandError, Result};

/// Polynomial model mapping commanded thrust to throttle fraction.
///
/// The curve is evaluated with Horner's scheme:
///
/// throttle = c0 + c1 * T + c2 * T² + ...
///
/// and clamped to `[min_bound, max_bound]` when `max_bound > min_bound`.
/// Equal bounds leave the output unclamped, which is how the legacy
/// `(0, 0)` configuration reads.
///
/// Thrust components may be negative (reverse or no-thrust regions); the
/// polynomial is evaluated on them unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct MotorModel {
    coefficients: Vec<f64>,
    min_bound: f64,
    max_bound: f64,
}

impl MotorModel {
    /// Creates a motor model.
    ///
    /// # Arguments
    ///
    /// * `coefficients` - Polynomial coefficients, constant term first
    /// * `min_bound` - Lowest throttle returned when clamping is enabled
    /// * `max_bound` - Highest throttle returned when clamping is enabled
    ///
    /// # Errors
    ///
    /// * `EmptyCoefficients` - No coefficients were given
    /// * `NonFiniteInput` - A coefficient or bound is NaN or infinite
    /// * `InvalidBounds` - `min_bound > max_bound`
    ///
    /// # Example
    ///
    /// // Linear curve, 0.3 throttle per newton, clamped to [0, 1]
    /// let motor = MotorModel::new(vec![0.0, 0.3], 0.0, 1.0)?;
    /// assert_eq!(motor.throttle(2.0), 0.6);
    pub fn new(coefficients: Vec<f64>, min_bound: f64, max_bound: f64) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(CommandError::EmptyCoefficients);
        }
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(CommandError::NonFiniteInput {
                what: "motor coefficients",
            });
        }
        if !min_bound.is_finite() || !max_bound.is_finite() {
            return Err(CommandError::NonFiniteInput {
                what: "motor bounds",
            });
        }
        if min_bound > max_bound {
            return Err(CommandError::InvalidBounds {
                min: min_bound,
                max: max_bound,
            });
        }

        Ok(Self {
            coefficients,
            min_bound,
            max_bound,
        })
    }

    pub fn from_config(config: &MotorModelConfig) -> Result<Self> {
        Self::new(
            config.coefficients.clone(),
            config.min_bound,
            config.max_bound,
        )
    }

    /// Throttle for a single thrust value.
    pub fn throttle(&self, thrust: f64) -> f64 {
        let value = self
            .coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * thrust + c);

        if self.is_clamped() {
            value.clamp(self.min_bound, self.max_bound)
        } else {
            value
        }
    }

    /// Evaluates the curve on each thrust component.
    pub fn thrust_to_throttle(&self, thrust: &Vector3<f64>) -> Vector3<f64> {
        thrust.map(|t| self.throttle(t))
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Clamp range as (min, max).
    pub fn bounds(&self) -> (f64, f64) {
        (self.min_bound, self.max_bound)
    }

    pub fn is_clamped(&self) -> bool {
        self.max_bound > self.min_bound
    }
}

/// Linear thrust-to-throttle mapping, elementwise `slope * thrust + intercept`.
///
/// Kept as an independent formula to cross-check two-coefficient motor models.
pub fn thrust_to_throttle_linear(
    thrust: &Vector3<f64>,
    slope: f64,
    intercept: f64,
) -> Vector3<f64> {
    thrust.map(|t| slope * t + intercept)
}
