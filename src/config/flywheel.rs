//! Flywheel controller configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::error::{CoreError, CoreResult};

/// Gains, voltage compensation and tolerance band for the flywheel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlywheelSection {
    /// Battery voltage the gains were tuned at
    #[serde(default = "defaults::nominal_voltage")]
    pub nominal_voltage: f64,

    /// Readings below this are treated as this value
    #[serde(default = "defaults::min_voltage")]
    pub min_voltage: f64,

    /// Weight of each new voltage sample in the low-pass filter
    #[serde(default = "defaults::voltage_alpha")]
    pub voltage_alpha: f64,

    #[serde(default = "defaults::kv")]
    pub kv: f64,
    #[serde(default = "defaults::ka")]
    pub ka: f64,
    #[serde(default = "defaults::ks")]
    pub ks: f64,
    #[serde(default = "defaults::kp")]
    pub kp: f64,
    #[serde(default = "defaults::ki")]
    pub ki: f64,
    #[serde(default = "defaults::kd")]
    pub kd: f64,

    /// Output power ceiling, strictly below full power
    #[serde(default = "defaults::max_power")]
    pub max_power: f64,

    /// How far below the target still counts as at speed
    #[serde(default = "defaults::tolerance_below")]
    pub tolerance_below: f64,

    /// How far above the target still counts as at speed
    #[serde(default = "defaults::tolerance_above")]
    pub tolerance_above: f64,

    #[serde(default = "defaults::enabled")]
    pub compensation_enabled: bool,
}

impl Default for FlywheelSection {
    fn default() -> Self {
        Self {
            nominal_voltage: defaults::nominal_voltage(),
            min_voltage: defaults::min_voltage(),
            voltage_alpha: defaults::voltage_alpha(),
            kv: defaults::kv(),
            ka: defaults::ka(),
            ks: defaults::ks(),
            kp: defaults::kp(),
            ki: defaults::ki(),
            kd: defaults::kd(),
            max_power: defaults::max_power(),
            tolerance_below: defaults::tolerance_below(),
            tolerance_above: defaults::tolerance_above(),
            compensation_enabled: defaults::enabled(),
        }
    }
}

impl FlywheelSection {
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.nominal_voltage > 0.0) {
            return Err(CoreError::InvalidConfig(
                "flywheel.nominal_voltage must be positive".to_string(),
            ));
        }
        if !(self.min_voltage > 0.0) {
            return Err(CoreError::InvalidConfig(
                "flywheel.min_voltage must be positive".to_string(),
            ));
        }
        if self.min_voltage > self.nominal_voltage {
            return Err(CoreError::InvalidConfig(
                "flywheel.min_voltage must not exceed nominal_voltage".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.voltage_alpha) {
            return Err(CoreError::InvalidConfig(
                "flywheel.voltage_alpha must be within [0, 1]".to_string(),
            ));
        }
        if !(self.max_power > 0.0 && self.max_power < 1.0) {
            return Err(CoreError::InvalidConfig(
                "flywheel.max_power must be within (0, 1)".to_string(),
            ));
        }
        if !(self.tolerance_below >= 0.0 && self.tolerance_above >= 0.0) {
            return Err(CoreError::InvalidConfig(
                "flywheel tolerances must be non-negative".to_string(),
            ));
        }
        let gains = [self.kv, self.ka, self.ks, self.kp, self.ki, self.kd];
        if gains.iter().any(|g| !g.is_finite()) {
            return Err(CoreError::InvalidConfig(
                "flywheel gains must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
