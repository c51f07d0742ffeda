//! Simulated hardware for the sim binary and integration tests
//!
//! Each device advances its own model by a fixed step when it is read, so
//! one `RobotCore::periodic` call moves the simulation forward by one cycle.

use nalgebra::{Rotation2, Vector2};

use crate::common::angles::normalize_heading;
use crate::common::types::Pose;
use crate::config::OdometrySection;
use crate::control::hardware::{FlywheelMotor, VoltageSensor};
use crate::error::SensorError;
use crate::perception::sensors::{EncoderSample, OdometrySensors};

/// Body velocity in the robot frame: inches/s forward and left, rad/s
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyTwist {
    pub forward: f64,
    pub lateral: f64,
    pub omega: f64,
}

/// Dead wheels and IMU on a robot moving with a constant body twist
#[derive(Debug, Clone)]
pub struct SimOdometry {
    geometry: OdometrySection,
    twist: BodyTwist,
    step: f64,
    truth: Pose,
    /// Accumulated wheel travel in inches (left, right, strafe)
    travel: [f64; 3],
}

impl SimOdometry {
    pub fn new(geometry: OdometrySection, start: Pose, twist: BodyTwist, step: f64) -> Self {
        SimOdometry {
            geometry,
            twist,
            step,
            truth: start,
            travel: [0.0; 3],
        }
    }

    /// Ground-truth pose
    pub fn truth(&self) -> Pose {
        self.truth
    }

    fn advance(&mut self) {
        let forward = self.twist.forward * self.step;
        let lateral = self.twist.lateral * self.step;
        let d_theta = self.twist.omega * self.step;

        // Each wheel sees the body motion plus the arc its offset sweeps
        self.travel[0] += forward - self.geometry.left_offset * d_theta;
        self.travel[1] += forward - self.geometry.right_offset * d_theta;
        self.travel[2] += lateral + self.geometry.strafe_offset * d_theta;

        let field = Rotation2::new(self.truth.heading) * Vector2::new(forward, lateral);
        self.truth = Pose::new(
            self.truth.x + field.x,
            self.truth.y + field.y,
            self.truth.heading + d_theta,
        );
    }

    fn ticks(&self, inches: f64) -> i32 {
        // Real counters wrap; keep the same behavior here
        ((inches * self.geometry.ticks_per_inch).round() as i64) as i32
    }
}

impl OdometrySensors for SimOdometry {
    fn read_encoders(&mut self) -> Result<EncoderSample, SensorError> {
        self.advance();
        Ok(EncoderSample::new(
            self.ticks(self.travel[0]),
            self.ticks(self.travel[1]),
            self.ticks(self.travel[2]),
        ))
    }

    fn read_heading(&mut self) -> Result<f64, SensorError> {
        Ok(normalize_heading(self.truth.heading))
    }
}

/// First-order flywheel: velocity relaxes toward `power * supply * gain`
#[derive(Debug, Clone)]
pub struct SimFlywheel {
    velocity: f64,
    power: f64,
    /// Steady-state ticks/s per volt at full power
    gain: f64,
    /// Fraction of the gap to steady state closed per read
    response: f64,
    supply: f64,
}

impl SimFlywheel {
    pub fn new(gain: f64, response: f64, supply: f64) -> Self {
        SimFlywheel {
            velocity: 0.0,
            power: 0.0,
            gain,
            response: response.clamp(0.0, 1.0),
            supply,
        }
    }
}

impl FlywheelMotor for SimFlywheel {
    fn velocity(&mut self) -> Result<f64, SensorError> {
        let steady = self.power * self.supply * self.gain;
        self.velocity += self.response * (steady - self.velocity);
        Ok(self.velocity)
    }

    fn set_power(&mut self, power: f64) {
        self.power = power.clamp(-1.0, 1.0);
    }
}

/// Battery that sags linearly per read down to a floor
#[derive(Debug, Clone)]
pub struct SimBattery {
    voltage: f64,
    sag_per_read: f64,
    floor: f64,
}

impl SimBattery {
    pub fn new(voltage: f64, sag_per_read: f64, floor: f64) -> Self {
        SimBattery {
            voltage,
            sag_per_read,
            floor,
        }
    }

    pub fn steady(voltage: f64) -> Self {
        Self::new(voltage, 0.0, voltage)
    }
}

impl VoltageSensor for SimBattery {
    fn voltage(&mut self) -> Result<f64, SensorError> {
        let reading = self.voltage;
        self.voltage = (self.voltage - self.sag_per_read).max(self.floor);
        Ok(reading)
    }
}
