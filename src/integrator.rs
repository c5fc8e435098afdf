use nalgebra::SVector;

use crate::error::{check_bounds, check_time_step, CommandError, Result};

/// Saturation range applied to every component of an integrated state.
///
/// Built through [`Saturation::new`], which guarantees `min <= max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Saturation {
    min: f64,
    max: f64,
}

impl Saturation {
    /// Creates a saturation range.
    ///
    /// # Arguments
    ///
    /// * `min` - Lower bound applied to each component
    /// * `max` - Upper bound applied to each component
    ///
    /// # Returns
    ///
    /// * `Ok(Saturation)` - When `min <= max` and neither bound is NaN
    /// * `Err(CommandError::InvalidBounds)` - Otherwise
    pub fn new(min: f64, max: f64) -> Result<Self> {
        check_bounds(min, max)?;
        Ok(Self { min, max })
    }

    /// A range that never clips a finite value.
    pub fn unbounded() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamps one value into the range.
    pub fn apply(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Fixed-dimension discrete-time integrator with per-component saturation.
///
/// The caller evaluates the state derivative at the current state and hands it
/// to [`StateIntegrator::integrate_one_step`], which advances the state with a
/// forward Euler step and clamps every component into the saturation range:
///
/// x[k+1] = clamp(x[k] + dt * dx/dt, min, max)
///
/// The state lives on the stack (`SVector`), so a step never allocates.
/// Stepping needs `&mut self`; share an instance across control threads only
/// behind a lock.
///
/// # Example
///
/// let saturation = Saturation::new(-100.0, 100.0)?;
/// let mut integrator = StateIntegrator::new(Vector2::zeros(), saturation);
/// let system = AffineSystem::spring_mass();
/// let x = integrator.integrate_one_step(0.005, system.derivative(integrator.state()))?;
#[derive(Clone, Debug)]
pub struct StateIntegrator<const N: usize> {
    state: SVector<f64, N>,
    saturation: Saturation,
}

impl<const N: usize> StateIntegrator<N> {
    /// Creates an integrator holding `initial_state`.
    ///
    /// The initial state is stored as given; saturation applies from the
    /// first step on.
    pub fn new(initial_state: SVector<f64, N>, saturation: Saturation) -> Self {
        Self {
            state: initial_state,
            saturation,
        }
    }

    /// Advances the state by one forward Euler step.
    ///
    /// # Arguments
    ///
    /// * `dt` - Step size in seconds, strictly positive
    /// * `derivative` - State derivative evaluated at the current state
    ///
    /// # Returns
    ///
    /// The new saturated state, which is also kept for the next call.
    ///
    /// # Errors
    ///
    /// * `NonPositiveTimeStep` - `dt` is not strictly positive and finite
    /// * `NonFiniteInput` - `derivative` holds a NaN or infinite component
    ///
    /// On error the internal state is left untouched.
    pub fn integrate_one_step(
        &mut self,
        dt: f64,
        derivative: SVector<f64, N>,
    ) -> Result<SVector<f64, N>> {
        check_time_step(dt)?;
        if derivative.iter().any(|v| !v.is_finite()) {
            return Err(CommandError::NonFiniteInput { what: "derivative" });
        }

        let unclamped = self.state + derivative * dt;
        let next = unclamped.map(|v| self.saturation.apply(v));

        if next != unclamped {
            log::trace!("integrator state saturated: {:?}", unclamped.as_slice());
        }

        self.state = next;
        Ok(next)
    }

    /// Same as [`integrate_one_step`](Self::integrate_one_step) for a derivative
    /// held as a runtime-length slice.
    ///
    /// Fails with `DimensionMismatch` when `derivative.len() != N`.
    pub fn integrate_one_step_slice(
        &mut self,
        dt: f64,
        derivative: &[f64],
    ) -> Result<SVector<f64, N>> {
        if derivative.len() != N {
            return Err(CommandError::DimensionMismatch {
                expected: N,
                actual: derivative.len(),
            });
        }
        self.integrate_one_step(dt, SVector::from_column_slice(derivative))
    }

    /// Evaluates `f` at the current state and steps with the result.
    pub fn integrate_with<F>(&mut self, dt: f64, f: F) -> Result<SVector<f64, N>>
    where
        F: FnOnce(&SVector<f64, N>) -> SVector<f64, N>,
    {
        let derivative = f(&self.state);
        self.integrate_one_step(dt, derivative)
    }

    pub fn state(&self) -> &SVector<f64, N> {
        &self.state
    }

    pub fn saturation(&self) -> Saturation {
        self.saturation
    }

    /// Replaces the internal state, unclamped.
    pub fn reset(&mut self, state: SVector<f64, N>) {
        self.state = state;
    }
}
