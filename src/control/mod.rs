//! Control module for the arena robot
pub mod command;
pub mod controllers;
pub mod hardware;

use log::{debug, info, warn};

use self::command::FlywheelCommand;
use self::controllers::{FlywheelDiagnostics, VelocityController};
use self::hardware::{FlywheelMotor, VoltageSensor};
use crate::config::FlywheelSection;
use crate::error::{CoreResult, SensorError};
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};

/// Control stack for the robot
///
/// Owns the flywheel motor, the battery sensor and the velocity controller.
pub struct ControlStack<M: FlywheelMotor, V: VoltageSensor> {
    base: LifecycleNodeBase,
    motor: M,
    battery: V,
    flywheel: VelocityController,
}

impl<M: FlywheelMotor, V: VoltageSensor> ControlStack<M, V> {
    /// Create a new control stack
    pub fn new(motor: M, battery: V, config: FlywheelSection) -> Self {
        ControlStack {
            base: LifecycleNodeBase::new("control_stack"),
            motor,
            battery,
            flywheel: VelocityController::new(config),
        }
    }

    /// Apply a flywheel command through the controller's mutators
    pub fn apply(&mut self, command: FlywheelCommand) {
        debug!("flywheel command {:?}", command);
        match command {
            FlywheelCommand::Stop => {
                let power = self.flywheel.stop();
                self.motor.set_power(power);
            }
            FlywheelCommand::SetVelocity(velocity) => self.flywheel.set_target(velocity),
            FlywheelCommand::Preset(preset) => self.flywheel.set_target(preset.velocity()),
            FlywheelCommand::SetCompensation(enabled) => {
                self.flywheel.set_compensation_enabled(enabled)
            }
        }
    }

    pub fn set_target(&mut self, velocity: f64) {
        self.apply(FlywheelCommand::SetVelocity(velocity));
    }

    pub fn stop(&mut self) {
        self.apply(FlywheelCommand::Stop);
    }

    /// Run one control cycle; returns the power written to the motor
    pub fn periodic(&mut self, dt: f64) -> Option<f64> {
        if !self.base.is_active() {
            return None;
        }
        let voltage = self
            .battery
            .voltage()
            .and_then(|v| SensorError::require_finite("battery", v))
            .unwrap_or_else(|e| {
                warn!("Battery read failed, holding filtered voltage: {}", e);
                self.flywheel.filtered_voltage()
            });
        let measured = self
            .motor
            .velocity()
            .and_then(|v| SensorError::require_finite("flywheel", v))
            .unwrap_or_else(|e| {
                warn!("Flywheel velocity read failed, holding last measurement: {}", e);
                self.flywheel.measured()
            });
        let power = self.flywheel.update(measured, voltage, dt);
        self.motor.set_power(power);

        let diag = self.flywheel.diagnostics();
        debug!(
            "flywheel target={:.0} actual={:.0} voltage={:.2} ratio={:.3} power={:.3}",
            diag.target, diag.measured, diag.filtered_voltage, diag.compensation_ratio, diag.power
        );
        Some(power)
    }

    pub fn is_at_target(&self) -> bool {
        self.flywheel.is_at_target()
    }

    pub fn diagnostics(&self) -> FlywheelDiagnostics {
        self.flywheel.diagnostics()
    }

    pub fn controller(&self) -> &VelocityController {
        &self.flywheel
    }

    pub fn state(&self) -> State {
        self.base.get_state()
    }
}

impl<M: FlywheelMotor, V: VoltageSensor> LifecycleNode for ControlStack<M, V> {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn on_configure(&mut self) -> CoreResult<()> {
        self.flywheel.config().validate()?;
        self.stop();
        self.base.transition(State::Unconfigured, State::Inactive)
    }

    fn on_activate(&mut self) -> CoreResult<()> {
        self.base.transition(State::Inactive, State::Active)
    }

    fn on_deactivate(&mut self) -> CoreResult<()> {
        info!("Stopping flywheel on deactivate");
        self.stop();
        self.base.transition(State::Active, State::Inactive)
    }

    fn on_cleanup(&mut self) -> CoreResult<()> {
        self.base.transition(State::Inactive, State::Unconfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::command::VelocityPreset;
    use super::controllers::FlywheelState;
    use super::*;

    #[derive(Default)]
    struct BenchMotor {
        velocity: f64,
        power: Option<f64>,
        fail: bool,
    }

    impl FlywheelMotor for BenchMotor {
        fn velocity(&mut self) -> Result<f64, SensorError> {
            if self.fail {
                Err(SensorError::Disconnected("flywheel".to_string()))
            } else {
                Ok(self.velocity)
            }
        }

        fn set_power(&mut self, power: f64) {
            self.power = Some(power);
        }
    }

    struct Battery(Result<f64, SensorError>);

    impl VoltageSensor for Battery {
        fn voltage(&mut self) -> Result<f64, SensorError> {
            self.0.clone()
        }
    }

    fn active_stack(voltage: Result<f64, SensorError>) -> ControlStack<BenchMotor, Battery> {
        let mut stack = ControlStack::new(
            BenchMotor::default(),
            Battery(voltage),
            FlywheelSection::default(),
        );
        stack.on_configure().unwrap();
        stack.on_activate().unwrap();
        stack
    }

    #[test]
    fn inactive_stack_leaves_motor_alone() {
        let mut stack = ControlStack::new(
            BenchMotor::default(),
            Battery(Ok(12.0)),
            FlywheelSection::default(),
        );
        assert_eq!(stack.periodic(0.02), None);
        assert_eq!(stack.motor.power, None);
    }

    #[test]
    fn preset_runs_and_stop_zeroes_immediately() {
        let mut stack = active_stack(Ok(12.0));
        stack.apply(FlywheelCommand::Preset(VelocityPreset::Far));
        assert_eq!(stack.diagnostics().state, FlywheelState::Running);
        assert_eq!(stack.diagnostics().target, 1500.0);

        let power = stack.periodic(0.02).unwrap();
        assert!(power > 0.0 && power <= 0.85);
        assert_eq!(stack.motor.power, Some(power));

        stack.stop();
        assert_eq!(stack.motor.power, Some(0.0));
        assert_eq!(stack.diagnostics().state, FlywheelState::Stopped);
        assert_eq!(stack.periodic(0.02), Some(0.0));
    }

    #[test]
    fn deactivate_stops_flywheel() {
        let mut stack = active_stack(Ok(12.0));
        stack.set_target(1000.0);
        stack.periodic(0.02);
        stack.on_deactivate().unwrap();
        assert_eq!(stack.motor.power, Some(0.0));
        assert_eq!(stack.controller().state(), FlywheelState::Stopped);
    }

    #[test]
    fn battery_fault_holds_filtered_voltage() {
        let mut stack = active_stack(Err(SensorError::Disconnected("battery".to_string())));
        stack.set_target(1000.0);
        stack.periodic(0.02);
        assert_eq!(stack.diagnostics().filtered_voltage, 12.0);
        assert_eq!(stack.diagnostics().compensation_ratio, 1.0);
    }

    #[test]
    fn non_finite_readings_are_treated_as_faults() {
        let mut stack = active_stack(Ok(f64::NAN));
        stack.set_target(1000.0);
        stack.motor.velocity = 1010.0;
        stack.periodic(0.02);
        assert_eq!(stack.diagnostics().filtered_voltage, 12.0);
        assert_eq!(stack.diagnostics().measured, 1010.0);

        stack.motor.velocity = f64::INFINITY;
        let power = stack.periodic(0.02).unwrap();
        assert!(power.is_finite());
        assert_eq!(stack.diagnostics().measured, 1010.0);
        assert!(stack.is_at_target());
    }

    #[test]
    fn at_target_tracks_motor_feedback() {
        let mut stack = active_stack(Ok(12.0));
        stack.set_target(1000.0);
        stack.motor.velocity = 1010.0;
        stack.periodic(0.02);
        assert!(stack.is_at_target());
        stack.motor.velocity = 970.0;
        stack.periodic(0.02);
        assert!(!stack.is_at_target());
    }

    #[test]
    fn velocity_fault_keeps_last_measurement() {
        let mut stack = active_stack(Ok(12.0));
        stack.set_target(1000.0);
        stack.motor.velocity = 1005.0;
        stack.periodic(0.02);
        stack.motor.fail = true;
        let power = stack.periodic(0.02).unwrap();
        assert!(power.abs() <= 0.85);
        assert_eq!(stack.diagnostics().measured, 1005.0);
    }
}
