//! Controllers for the robot

use log::warn;

use crate::config::FlywheelSection;
use crate::perception::filters::{Filter, LowPassFilter};

/// PID feedback on a scalar error
#[derive(Debug, Clone)]
pub struct PidController {
    kp: f64,
    ki: f64,
    kd: f64,
    integral: f64,
    integral_limit: f64,
    previous_error: Option<f64>,
}

impl PidController {
    /// Create a new controller; the integral term is bounded so that
    /// `ki * integral` never exceeds `output_limit` on its own
    pub fn new(kp: f64, ki: f64, kd: f64, output_limit: f64) -> Self {
        let integral_limit = if ki != 0.0 {
            output_limit.abs() / ki.abs()
        } else {
            f64::INFINITY
        };
        PidController {
            kp,
            ki,
            kd,
            integral: 0.0,
            integral_limit,
            previous_error: None,
        }
    }

    /// Compute the feedback term; `dt <= 0` drops the I and D contributions
    pub fn calculate(&mut self, error: f64, dt: f64) -> f64 {
        let mut derivative = 0.0;
        if dt > 0.0 {
            self.integral = (self.integral + error * dt).clamp(-self.integral_limit, self.integral_limit);
            if let Some(previous) = self.previous_error {
                derivative = (error - previous) / dt;
            }
        }
        self.previous_error = Some(error);
        self.kp * error + self.ki * self.integral + self.kd * derivative
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = None;
    }

    /// Forget the last error so the next call has no derivative term
    pub fn clear_derivative(&mut self) {
        self.previous_error = None;
    }
}

/// Open-loop term: `kv * v + ka * a + ks * sign(v)`
#[derive(Debug, Clone, Copy)]
pub struct Feedforward {
    pub kv: f64,
    pub ka: f64,
    pub ks: f64,
}

impl Feedforward {
    pub fn calculate(&self, velocity: f64, acceleration: f64) -> f64 {
        let static_term = if velocity == 0.0 {
            0.0
        } else {
            self.ks * velocity.signum()
        };
        self.kv * velocity + self.ka * acceleration + static_term
    }
}

/// Whether closed-loop control is driving the actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlywheelState {
    Running,
    Stopped,
}

/// Read-only snapshot of the flywheel controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlywheelDiagnostics {
    pub state: FlywheelState,
    pub target: f64,
    pub measured: f64,
    pub filtered_voltage: f64,
    pub compensation_ratio: f64,
    pub power: f64,
    pub at_target: bool,
}

/// Voltage-compensated velocity controller for a flywheel
///
/// Pure computation: the caller feeds measured velocity and battery voltage
/// each cycle and applies the returned power.
#[derive(Debug, Clone)]
pub struct VelocityController {
    config: FlywheelSection,
    pid: PidController,
    feedforward: Feedforward,
    voltage: LowPassFilter,
    state: FlywheelState,
    compensation_enabled: bool,
    target: f64,
    measured: f64,
    ratio: f64,
    power: f64,
}

impl VelocityController {
    /// Create a new controller, stopped, with the filter seeded at nominal voltage
    pub fn new(config: FlywheelSection) -> Self {
        VelocityController {
            pid: PidController::new(config.kp, config.ki, config.kd, config.max_power),
            feedforward: Feedforward {
                kv: config.kv,
                ka: config.ka,
                ks: config.ks,
            },
            voltage: LowPassFilter::new(config.voltage_alpha, config.nominal_voltage),
            state: FlywheelState::Stopped,
            compensation_enabled: config.compensation_enabled,
            target: 0.0,
            measured: 0.0,
            ratio: 1.0,
            power: 0.0,
            config,
        }
    }

    /// Set the goal velocity and start closed-loop control
    ///
    /// A step in the target would read as a step in the error, so the
    /// derivative history is dropped whenever the target changes.
    pub fn set_target(&mut self, velocity: f64) {
        if !velocity.is_finite() {
            warn!("Ignoring non-finite flywheel target {}", velocity);
            return;
        }
        if self.state == FlywheelState::Stopped {
            self.pid.reset();
        } else if velocity != self.target {
            self.pid.clear_derivative();
        }
        self.target = velocity;
        self.state = FlywheelState::Running;
    }

    /// Stop control and zero the output immediately
    pub fn stop(&mut self) -> f64 {
        self.state = FlywheelState::Stopped;
        self.pid.reset();
        self.power = 0.0;
        self.power
    }

    pub fn set_compensation_enabled(&mut self, enabled: bool) {
        self.compensation_enabled = enabled;
    }

    /// Run one control cycle and return the power to apply
    ///
    /// The voltage filter advances every cycle, running or not, so it is
    /// already settled when the flywheel spins up.
    pub fn update(&mut self, measured: f64, raw_voltage: f64, dt: f64) -> f64 {
        let floor = self.config.min_voltage;
        // NaN fails the comparison and is treated as the floor too
        let sample = if raw_voltage >= floor { raw_voltage } else { floor };
        let filtered = self.voltage.filter(sample).max(floor);
        self.ratio = self.config.nominal_voltage / filtered;

        if measured.is_finite() {
            self.measured = measured;
        }

        if self.state == FlywheelState::Stopped {
            self.power = 0.0;
            return self.power;
        }

        // Velocity goals carry no acceleration reference
        let base = self.feedforward.calculate(self.target, 0.0)
            + self.pid.calculate(self.target - self.measured, dt);
        let compensated = if self.compensation_enabled {
            base * self.ratio
        } else {
            base
        };

        let limit = self.config.max_power;
        self.power = if compensated.is_finite() {
            compensated.clamp(-limit, limit)
        } else {
            0.0
        };
        self.power
    }

    /// Whether measured velocity sits inside the asymmetric tolerance band
    pub fn is_at_target(&self) -> bool {
        self.target - self.config.tolerance_below < self.measured
            && self.measured < self.target + self.config.tolerance_above
    }

    pub fn state(&self) -> FlywheelState {
        self.state
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn measured(&self) -> f64 {
        self.measured
    }

    pub fn filtered_voltage(&self) -> f64 {
        self.voltage.value().max(self.config.min_voltage)
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn compensation_enabled(&self) -> bool {
        self.compensation_enabled
    }

    pub fn config(&self) -> &FlywheelSection {
        &self.config
    }

    pub fn diagnostics(&self) -> FlywheelDiagnostics {
        FlywheelDiagnostics {
            state: self.state,
            target: self.target,
            measured: self.measured,
            filtered_voltage: self.filtered_voltage(),
            compensation_ratio: self.ratio,
            power: self.power,
            at_target: self.is_at_target(),
        }
    }
}
