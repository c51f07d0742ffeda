//! Actuator and supply interfaces consumed by the control stack

use crate::error::SensorError;

/// A flywheel motor (or a group of motors driven with the same power)
pub trait FlywheelMotor: Send {
    /// Measured angular velocity, in the same unit as the targets
    fn velocity(&mut self) -> Result<f64, SensorError>;

    /// Apply a normalized power in `[-1, 1]`
    fn set_power(&mut self, power: f64);
}

/// Main battery voltage
pub trait VoltageSensor: Send {
    fn voltage(&mut self) -> Result<f64, SensorError>;
}
