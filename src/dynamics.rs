use nalgebra::{Matrix2, SMatrix, SVector, Vector2};

use crate::error::{check_time_step, CommandError, Result};

/// Standard gravitational acceleration (m/s²)
pub const GRAVITY: f64 = 9.81;

/// Linear time-invariant system with a constant forcing term.
///
/// The model is dx/dt = A * x + b. It is the regression plant for the
/// discrete integrator: its derivative feeds fixed-step integration, and the
/// same system solved with an adaptive Runge-Kutta scheme provides the
/// reference trajectory the fixed-step result is compared against.
///
/// # Fields
///
/// * `a` - State matrix A
/// * `b` - Constant forcing vector b
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineSystem<const N: usize> {
    pub a: SMatrix<f64, N, N>,
    pub b: SVector<f64, N>,
}

impl<const N: usize> AffineSystem<N> {
    pub fn new(a: SMatrix<f64, N, N>, b: SVector<f64, N>) -> Self {
        Self { a, b }
    }

    /// Evaluates A * x + b.
    pub fn derivative(&self, x: &SVector<f64, N>) -> SVector<f64, N> {
        self.a * x + self.b
    }
}

impl AffineSystem<2> {
    /// Damped spring-mass under gravity, state [position, velocity].
    ///
    /// A = [0, 1; -2, -3], b = [0, -9.81]
    ///
    /// Starting at rest in the origin it settles at position -g/2.
    pub fn spring_mass() -> Self {
        Self {
            a: Matrix2::new(0.0, 1.0, -2.0, -3.0),
            b: Vector2::new(0.0, -GRAVITY),
        }
    }
}

impl<const N: usize> fast_ode::DifferentialEquation<N> for AffineSystem<N> {
    fn ode_dot_y(&self, _t: f64, y: &fast_ode::Coord<N>) -> (fast_ode::Coord<N>, bool) {
        let x = SVector::<f64, N>::from(y.0);
        let dot_y: [f64; N] = self.derivative(&x).into();

        (fast_ode::Coord(dot_y), true)
    }
}

/// Solves an affine system over a time interval with an adaptive ODE solver.
///
/// This is the continuous-time reference used to check fixed-step
/// integration. It is not meant for the control loop.
///
/// # Arguments
///
/// * `system` - The system to solve
/// * `initial_state` - State at `time_span.0`
/// * `time_span` - Tuple (t_start, t_end) in seconds
/// * `tolerance` - Absolute tolerance for the solver
///
/// # Returns
///
/// * `Ok(SVector)` - State at `time_span.1`
/// * `Err(CommandError::ReferenceSolver)` - The solver stopped early
///
/// # Example
///
/// let system = AffineSystem::spring_mass();
/// let x = reference_solution(&system, Vector2::zeros(), (0.0, 5.0), 1e-9)?;
/// // x ≈ [-4.8391, -0.0656]
pub fn reference_solution<const N: usize>(
    system: &AffineSystem<N>,
    initial_state: SVector<f64, N>,
    time_span: (f64, f64),
    tolerance: f64,
) -> Result<SVector<f64, N>> {
    if time_span.1 == time_span.0 {
        return Ok(initial_state);
    }
    check_time_step(time_span.1 - time_span.0)?;

    let initial_coord = fast_ode::Coord(initial_state.into());

    let result = fast_ode::solve_ivp(
        system,
        time_span,
        initial_coord,
        |_, _| true,
        tolerance,
        tolerance * 10.0,
    );

    match result {
        fast_ode::IvpResult::FinalTimeReached(final_coord) => {
            Ok(SVector::<f64, N>::from(final_coord.0))
        }
        _ => {
            log::warn!("reference solver stopped before t = {}", time_span.1);
            Err(CommandError::ReferenceSolver { t_end: time_span.1 })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;

    /// Closed-form trajectory of the spring-mass system from rest.
    ///
    /// x'' + 3x' + 2x = -g has roots -1 and -2, so
    /// x(t) = -g/2 + g e^-t - g/2 e^-2t.
    fn spring_mass_exact(t: f64) -> Vector2<f64> {
        let g = GRAVITY;
        Vector2::new(
            -g / 2.0 + g * (-t).exp() - g / 2.0 * (-2.0 * t).exp(),
            -g * (-t).exp() + g * (-2.0 * t).exp(),
        )
    }

    #[test]
    fn test_spring_mass_derivative() {
        let system = AffineSystem::spring_mass();

        assert_eq!(
            system.derivative(&Vector2::zeros()),
            Vector2::new(0.0, -GRAVITY)
        );
        assert_eq!(
            system.derivative(&Vector2::new(1.0, 2.0)),
            Vector2::new(2.0, -2.0 - 6.0 - GRAVITY)
        );
    }

    #[test]
    fn test_reference_solution_matches_closed_form() {
        let system = AffineSystem::spring_mass();

        for t in [0.5, 1.0019067405092255, 4.0807629, 5.0] {
            let x = reference_solution(&system, Vector2::zeros(), (0.0, t), 1e-9).unwrap();
            assert_abs_diff_eq!(x, spring_mass_exact(t), epsilon = 1e-4);
        }
    }

    #[test]
    fn test_reference_solution_constant_drift() {
        // A = 0 reduces to x(t) = x0 + b t
        let system = AffineSystem::new(nalgebra::Matrix3::zeros(), Vector3::new(1.0, -2.0, 0.5));

        let x0 = Vector3::new(1.0, 1.0, 1.0);
        let x = reference_solution(&system, x0, (0.0, 2.0), 1e-9).unwrap();

        assert_abs_diff_eq!(x, Vector3::new(3.0, -3.0, 2.0), epsilon = 1e-6);
    }

    #[test]
    fn test_reference_solution_empty_span() {
        let system = AffineSystem::spring_mass();
        let x0 = Vector2::new(0.3, -0.1);

        assert_eq!(
            reference_solution(&system, x0, (1.0, 1.0), 1e-9).unwrap(),
            x0
        );
        assert!(reference_solution(&system, x0, (1.0, 0.0), 1e-9).is_err());
    }
}
