//! Command generation core of a multirotor flight controller.
//!
//! - [`control`]: desired thrust vector and yaw reference to attitude
//!   setpoint and throttle
//! - [`motor`]: polynomial thrust-to-throttle motor model
//! - [`integrator`]: saturating discrete-time state integrator
//! - [`dynamics`]: affine reference system and its adaptive ODE solution
//!
//! Everything here is synchronous and deterministic. The per-call paths
//! (`convert`, `thrust_to_throttle`, `integrate_one_step`) do not allocate.

pub mod config;
pub mod control;
pub mod dynamics;
pub mod error;
pub mod integrator;
pub mod motor;

pub use config::{ConverterConfig, MotorModelConfig};
pub use control::{AttitudeSetpoint, AttitudeThrottleConverter};
pub use error::{CommandError, Result};
pub use integrator::{Saturation, StateIntegrator};
pub use motor::{thrust_to_throttle_linear, MotorModel};
