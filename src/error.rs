use thiserror::Error;

/// Errors raised when a command-path component is built or called with
/// arguments it cannot act on.
///
/// Every variant carries only `Copy` data so that returning an error never
/// allocates inside the control loop.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CommandError {
    /// Integration step size was zero, negative, or not finite
    #[error("time step must be positive and finite, got {dt}")]
    NonPositiveTimeStep {
        /// Offending step size (seconds)
        dt: f64,
    },

    /// A runtime-sized vector did not match the integrator dimension
    #[error("dimension mismatch: expected {expected} components, got {actual}")]
    DimensionMismatch {
        /// Dimension of the integrator state
        expected: usize,
        /// Length of the supplied vector
        actual: usize,
    },

    /// A motor model was given no polynomial coefficients
    #[error("motor model needs at least one polynomial coefficient")]
    EmptyCoefficients,

    /// Lower bound above upper bound, or a NaN bound
    #[error("invalid bounds: min {min}, max {max}")]
    InvalidBounds {
        /// Requested lower bound
        min: f64,
        /// Requested upper bound
        max: f64,
    },

    /// A NaN or infinite value reached an input that must be finite
    #[error("non-finite value in {what}")]
    NonFiniteInput {
        /// Name of the input that carried the value
        what: &'static str,
    },

    /// The adaptive reference solver stopped before the requested end time
    #[error("reference solver did not reach t = {t_end}")]
    ReferenceSolver {
        /// End time that was requested
        t_end: f64,
    },
}

/// Type alias for Result with CommandError
pub type Result<T> = std::result::Result<T, CommandError>;

/// Rejects step sizes that are not strictly positive and finite.
pub(crate) fn check_time_step(dt: f64) -> Result<()> {
    if dt > 0.0 && dt.is_finite() {
        Ok(())
    } else {
        Err(CommandError::NonPositiveTimeStep { dt })
    }
}

/// Rejects `min > max` and NaN bounds. Equal bounds are accepted.
pub(crate) fn check_bounds(min: f64, max: f64) -> Result<()> {
    if min.is_nan() || max.is_nan() || min > max {
        Err(CommandError::InvalidBounds { min, max })
    } else {
        Ok(())
    }
}
