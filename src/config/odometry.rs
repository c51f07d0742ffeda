//! Odometry configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::error::{CoreError, CoreResult};

/// Dead-wheel geometry and estimator tuning
///
/// Offsets are measured from the robot's tracking center in inches, robot
/// frame: +x forward, +y left.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OdometrySection {
    /// Encoder ticks per inch of wheel travel
    #[serde(default = "defaults::ticks_per_inch")]
    pub ticks_per_inch: f64,

    /// Lateral (y) offset of the left forward wheel
    #[serde(default = "defaults::left_offset")]
    pub left_offset: f64,

    /// Lateral (y) offset of the right forward wheel
    #[serde(default = "defaults::right_offset")]
    pub right_offset: f64,

    /// Longitudinal (x) offset of the strafe wheel
    #[serde(default = "defaults::strafe_offset")]
    pub strafe_offset: f64,

    /// Remove the arc each wheel sweeps while the robot turns
    #[serde(default = "defaults::enabled")]
    pub skew_correction: bool,

    /// Weight of each new velocity sample in the smoothing filter
    #[serde(default = "defaults::velocity_alpha")]
    pub velocity_alpha: f64,

    /// Wheel travel (inches) above which a delta is treated as a counter reset,
    /// regardless of elapsed time
    #[serde(default = "defaults::max_wheel_delta")]
    pub max_wheel_delta: f64,

    /// Fastest plausible wheel speed (inches/s); the reset threshold grows to
    /// `max_wheel_speed * dt` when more time has passed since the last update
    #[serde(default = "defaults::max_wheel_speed")]
    pub max_wheel_speed: f64,

    /// Distance of the shooter from the tracking center along the heading
    #[serde(default = "defaults::shooter_offset")]
    pub shooter_offset: f64,
}

impl Default for OdometrySection {
    fn default() -> Self {
        Self {
            ticks_per_inch: defaults::ticks_per_inch(),
            left_offset: defaults::left_offset(),
            right_offset: defaults::right_offset(),
            strafe_offset: defaults::strafe_offset(),
            skew_correction: defaults::enabled(),
            velocity_alpha: defaults::velocity_alpha(),
            max_wheel_delta: defaults::max_wheel_delta(),
            max_wheel_speed: defaults::max_wheel_speed(),
            shooter_offset: defaults::shooter_offset(),
        }
    }
}

impl OdometrySection {
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.ticks_per_inch.is_finite() && self.ticks_per_inch > 0.0) {
            return Err(CoreError::InvalidConfig(
                "odometry.ticks_per_inch must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.velocity_alpha) {
            return Err(CoreError::InvalidConfig(
                "odometry.velocity_alpha must be within [0, 1]".to_string(),
            ));
        }
        if !(self.max_wheel_delta > 0.0) {
            return Err(CoreError::InvalidConfig(
                "odometry.max_wheel_delta must be positive".to_string(),
            ));
        }
        if !(self.max_wheel_speed > 0.0 && self.max_wheel_speed.is_finite()) {
            return Err(CoreError::InvalidConfig(
                "odometry.max_wheel_speed must be positive".to_string(),
            ));
        }
        let offsets = [
            self.left_offset,
            self.right_offset,
            self.strafe_offset,
            self.shooter_offset,
        ];
        if offsets.iter().any(|o| !o.is_finite()) {
            return Err(CoreError::InvalidConfig(
                "odometry offsets must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
