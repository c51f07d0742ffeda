//! Sensor interfaces for the arena robot

use crate::error::SensorError;

/// Raw cumulative tick counts from the three dead wheels
///
/// Counters may wrap or restart from zero when the hardware reinitializes,
/// so only differences between consecutive samples are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncoderSample {
    pub left: i32,
    pub right: i32,
    pub strafe: i32,
}

impl EncoderSample {
    pub fn new(left: i32, right: i32, strafe: i32) -> Self {
        EncoderSample {
            left,
            right,
            strafe,
        }
    }

    /// Per-wheel tick deltas since `previous`, tolerant of 32-bit wraparound
    pub fn delta_since(&self, previous: &EncoderSample) -> (i32, i32, i32) {
        (
            self.left.wrapping_sub(previous.left),
            self.right.wrapping_sub(previous.right),
            self.strafe.wrapping_sub(previous.strafe),
        )
    }
}

/// Hardware collaborator providing the odometry inputs
pub trait OdometrySensors: Send {
    /// Current dead-wheel tick counters
    fn read_encoders(&mut self) -> Result<EncoderSample, SensorError>;

    /// Absolute heading from the inertial sensor, in radians
    fn read_heading(&mut self) -> Result<f64, SensorError>;
}
