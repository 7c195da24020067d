//! Global configuration constants and the serializable simulation setup.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::dynamics::{gravity::GravityModel, integrator::IntegrationMethod};

/// Default fixed tick length (in seconds).
pub const DEFAULT_FIXED_TIME_STEP: f32 = 0.0025;

/// Default uniform gravity vector (Y-up).
pub const DEFAULT_LINEAR_GRAVITY: [f32; 3] = [0.0, -9.81, 0.0];

/// Default constant used by inverse-square gravity.
pub const DEFAULT_GRAVITY_CONSTANT: f32 = 1.0;

/// Work lists shorter than this run on the calling thread.
pub const PARALLEL_MIN_ITEMS: usize = 64;

/// Setup chosen once by the host before the first tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub fixed_time_step: f32,
    pub integration_method: IntegrationMethod,
    pub gravity_model: GravityModel,
    pub linear_gravity: Vec3,
    pub gravity_constant: f32,
    /// Runtime switch for the fork-join kernels. Ignored without the `parallel` feature.
    pub parallel: bool,
    /// Emit a warning whenever a tick takes longer than this many milliseconds.
    pub tick_budget_ms: Option<f32>,
    pub profiling: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_time_step: DEFAULT_FIXED_TIME_STEP,
            integration_method: IntegrationMethod::default(),
            gravity_model: GravityModel::default(),
            linear_gravity: Vec3::from_array(DEFAULT_LINEAR_GRAVITY),
            gravity_constant: DEFAULT_GRAVITY_CONSTANT,
            parallel: true,
            tick_budget_ms: None,
            profiling: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{ "integration_method": "ExplicitEuler", "parallel": false }"#)
                .unwrap();

        assert_eq!(config.integration_method, IntegrationMethod::ExplicitEuler);
        assert!(!config.parallel);
        assert_eq!(config.fixed_time_step, DEFAULT_FIXED_TIME_STEP);
        assert_eq!(config.gravity_model, GravityModel::Linear);
        assert_eq!(config.linear_gravity, Vec3::new(0.0, -9.81, 0.0));
    }

    #[test]
    fn config_survives_json() {
        let config = SimulationConfig {
            gravity_model: GravityModel::Spherical,
            gravity_constant: 6.5,
            tick_budget_ms: Some(2.0),
            ..SimulationConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
