use nalgebra::{Matrix3, Quaternion, Rotation3, UnitQuaternion, Vector3};

use crate::config::ConverterConfig;
use crate::error::{check_bounds, CommandError, Result};
use crate::motor::MotorModel;

/// Thrust axis z-components smaller than this count as horizontal thrust.
const HORIZONTAL_THRUST_EPS: f64 = 1e-6;

/// Thrust magnitudes below sqrt(f64::EPSILON) select the level fallback.
const MIN_THRUST_MAGNITUDE: f64 = 1.4901161193847656e-8;

/// Attitude and throttle command produced from one thrust vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttitudeSetpoint {
    /// Desired attitude, body to world, scalar part non-negative
    pub attitude: UnitQuaternion<f64>,
    /// Throttle command within the converter's throttle range
    pub throttle: f64,
    /// Desired attitude as [roll, pitch, yaw] in radians, for logging only
    pub euler: Vector3<f64>,
    /// True when the thrust vector was degenerate and the level fallback was used
    pub fallback: bool,
}

/// Converts a desired thrust vector into an attitude setpoint and throttle.
///
/// This is the last stage between a position or path-following controller
/// and the attitude controller. The thrust vector fixes the direction of the
/// body thrust axis; the yaw reference fixes the rotation about it.
///
/// # Conventions
///
/// - World frame is ENU, body frame is FLU. Body +z is aligned with the
///   normalized thrust vector.
/// - With y_C = [-sin(yaw), cos(yaw), 0] the body axes are
///   x_B = normalize(y_C × z_B) and y_B = z_B × x_B. x_B is negated when
///   z_B points below the horizon, keeping the nose forward while inverted.
/// - Thrust within the horizontal plane has no usable yaw reference; x_B then
///   points straight down (nose down).
/// - The quaternion is canonicalized to a non-negative scalar part.
///
/// Throttle is the thrust magnitude, passed through the optional motor model
/// and clamped to [throttle_min, throttle_max].
///
/// A zero or non-finite thrust vector never produces NaN: the setpoint falls
/// back to a level attitude at the requested yaw with minimum throttle.
///
/// The converter is immutable after construction and can be shared between
/// threads by reference.
#[derive(Clone, Debug)]
pub struct AttitudeThrottleConverter {
    throttle_min: f64,
    throttle_max: f64,
    motor: Option<MotorModel>,
}

impl AttitudeThrottleConverter {
    /// Creates a converter from its configuration.
    ///
    /// # Errors
    ///
    /// * `NonFiniteInput` - A throttle bound is NaN or infinite
    /// * `InvalidBounds` - `throttle_min > throttle_max`
    /// * Any error of [`MotorModel::new`] for the configured curve
    pub fn new(config: ConverterConfig) -> Result<Self> {
        if !config.throttle_min.is_finite() || !config.throttle_max.is_finite() {
            return Err(CommandError::NonFiniteInput {
                what: "throttle bounds",
            });
        }
        check_bounds(config.throttle_min, config.throttle_max)?;

        let motor = config
            .motor
            .as_ref()
            .map(MotorModel::from_config)
            .transpose()?;

        Ok(Self {
            throttle_min: config.throttle_min,
            throttle_max: config.throttle_max,
            motor,
        })
    }

    /// Computes the attitude setpoint and throttle for a desired thrust vector.
    ///
    /// # Arguments
    ///
    /// * `thrust` - Desired thrust vector in the world frame (ENU)
    /// * `yaw` - Yaw reference in radians, counter-clockwise from east
    ///
    /// # Returns
    ///
    /// The [`AttitudeSetpoint`]. This never fails; degenerate thrust selects
    /// the fallback described on the type.
    ///
    /// # Example
    ///
    /// let converter = AttitudeThrottleConverter::new(ConverterConfig::default())?;
    /// // Hover thrust, heading north
    /// let setpoint = converter.convert(&Vector3::new(0.0, 0.0, 0.6), FRAC_PI_2);
    /// assert!((setpoint.euler[2] - FRAC_PI_2).abs() < 1e-9);
    pub fn convert(&self, thrust: &Vector3<f64>, yaw: f64) -> AttitudeSetpoint {
        // Scaled by the largest component so huge thrusts do not overflow the norm
        let scale = thrust.amax();
        let finite = thrust.iter().all(|v| v.is_finite()) && yaw.is_finite();
        let (direction, magnitude) = if finite && scale > 0.0 {
            let scaled = thrust / scale;
            let norm = scaled.norm();
            (scaled / norm, scale * norm)
        } else {
            (Vector3::z(), 0.0)
        };

        if !finite || magnitude < MIN_THRUST_MAGNITUDE {
            log::debug!(
                "degenerate thrust command {:?} (yaw {}), holding level attitude",
                thrust.as_slice(),
                yaw
            );
            let yaw = if yaw.is_finite() { yaw } else { 0.0 };
            let attitude = attitude_from_thrust_axis(&Vector3::z(), yaw);

            return AttitudeSetpoint {
                attitude,
                throttle: self.throttle_min,
                euler: euler_from_quaternion(&attitude),
                fallback: true,
            };
        }

        let attitude = attitude_from_thrust_axis(&direction, yaw);

        AttitudeSetpoint {
            attitude,
            throttle: self.throttle(magnitude),
            euler: euler_from_quaternion(&attitude),
            fallback: false,
        }
    }

    /// Throttle for a thrust magnitude.
    pub fn throttle(&self, magnitude: f64) -> f64 {
        let throttle = match &self.motor {
            Some(motor) => motor.throttle(magnitude),
            None => magnitude,
        };

        throttle.clamp(self.throttle_min, self.throttle_max)
    }

    /// Throttle range as (min, max).
    pub fn throttle_range(&self) -> (f64, f64) {
        (self.throttle_min, self.throttle_max)
    }

    pub fn motor(&self) -> Option<&MotorModel> {
        self.motor.as_ref()
    }
}

/// Builds the attitude whose body z-axis points along `axis`.
///
/// `axis` must be a unit vector. The rotation about it is fixed by `yaw` as
/// described on [`AttitudeThrottleConverter`].
pub fn attitude_from_thrust_axis(axis: &Vector3<f64>, yaw: f64) -> UnitQuaternion<f64> {
    let body_z = *axis;

    let body_x = if body_z.z.abs() < HORIZONTAL_THRUST_EPS {
        -Vector3::z()
    } else {
        // Desired yaw direction in the XY plane, rotated by pi/2
        let y_c = Vector3::new(-yaw.sin(), yaw.cos(), 0.0);
        let x = y_c.cross(&body_z);
        let x = if body_z.z < 0.0 { -x } else { x };
        x.normalize()
    };
    let body_y = body_z.cross(&body_x);

    let rotation =
        Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[body_x, body_y, body_z]));
    canonicalize(UnitQuaternion::from_rotation_matrix(&rotation))
}

/// Flips the quaternion into the hemisphere with a non-negative scalar part.
fn canonicalize(q: UnitQuaternion<f64>) -> UnitQuaternion<f64> {
    if q.w < 0.0 {
        UnitQuaternion::new_unchecked(-q.into_inner())
    } else {
        q
    }
}

/// Extract yaw angle from quaternion (ZYX Euler convention)
pub fn yaw_from_quaternion(quaternion: &UnitQuaternion<f64>) -> f64 {
    quaternion.euler_angles().2
}

fn euler_from_quaternion(quaternion: &UnitQuaternion<f64>) -> Vector3<f64> {
    let (roll, pitch, yaw) = quaternion.euler_angles();
    Vector3::new(roll, pitch, yaw)
}

/// Quaternion from (w, x, y, z) components, normalized.
pub fn quaternion_wxyz(w: f64, x: f64, y: f64, z: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z))
}
