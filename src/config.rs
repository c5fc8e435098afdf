//! Parameter structs for the command-path components.
//!
//! These are plain data, deserializable with serde so that a host process can
//! load them from whatever file format it already uses. Validation happens when
//! a component is built from them, not at parse time.

use serde::{Deserialize, Serialize};

/// Polynomial thrust-to-throttle curve of one motor.
///
/// `coefficients[i]` multiplies `thrust^i`. Equal bounds (the default `0, 0`)
/// mean the output is not clamped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorModelConfig {
    pub coefficients: Vec<f64>,
    pub min_bound: f64,
    pub max_bound: f64,
}

impl Default for MotorModelConfig {
    /// Identity curve, unclamped.
    fn default() -> Self {
        Self {
            coefficients: vec![0.0, 1.0],
            min_bound: 0.0,
            max_bound: 0.0,
        }
    }
}

/// Settings of the thrust-vector to attitude/throttle conversion.
///
/// # Fields
///
/// * `throttle_min` - Lowest throttle ever commanded, also the zero-thrust output
/// * `throttle_max` - Highest throttle ever commanded
/// * `motor` - Curve applied to the thrust magnitude; identity when `None`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub throttle_min: f64,
    pub throttle_max: f64,
    pub motor: Option<MotorModelConfig>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            throttle_min: 0.0,
            throttle_max: 1.0,
            motor: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let converter = ConverterConfig::default();
        assert_eq!(converter.throttle_min, 0.0);
        assert_eq!(converter.throttle_max, 1.0);
        assert!(converter.motor.is_none());

        let motor = MotorModelConfig::default();
        assert_eq!(motor.coefficients, vec![0.0, 1.0]);
        assert_eq!(motor.min_bound, motor.max_bound);
    }

    #[test]
    fn test_parse_converter_config() {
        let json = r#"{
            "throttle_min": 0.05,
            "throttle_max": 0.9,
            "motor": { "coefficients": [0.0, 0.3], "min_bound": 0.0, "max_bound": 1.0 }
        }"#;

        let config: ConverterConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.throttle_min, 0.05);
        assert_eq!(config.throttle_max, 0.9);
        let motor = config.motor.unwrap();
        assert_eq!(motor.coefficients, vec![0.0, 0.3]);
        assert_eq!(motor.max_bound, 1.0);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let json = r#"{ "throttle_max": 0.8 }"#;
        let config: ConverterConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.throttle_min, 0.0);
        assert_eq!(config.throttle_max, 0.8);
        assert!(config.motor.is_none());

        let json = r#"{ "coefficients": [0.1, 0.2, 0.05] }"#;
        let motor: MotorModelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(motor.coefficients.len(), 3);
        assert_eq!(motor.min_bound, 0.0);
        assert_eq!(motor.max_bound, 0.0);
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = ConverterConfig {
            motor: Some(MotorModelConfig::default()),
            ..ConverterConfig::default()
        };

        let text = serde_json::to_string(&config).unwrap();
        let parsed: ConverterConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
