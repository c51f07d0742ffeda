//! Perception module for the arena robot
pub mod filters;
pub mod localization;
pub mod sensors;

use log::{debug, warn};

use self::localization::{PoseEstimator, UpdateOutcome};
use self::sensors::{EncoderSample, OdometrySensors};
use crate::common::types::{Pose, Velocity};
use crate::config::OdometrySection;
use crate::error::{CoreResult, SensorError};
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};

/// Perception stack for the robot
///
/// Owns the odometry hardware and the pose estimator. `periodic` is the
/// single mutating entry point per control cycle.
pub struct PerceptionStack<S: OdometrySensors> {
    base: LifecycleNodeBase,
    sensors: S,
    estimator: PoseEstimator,
    /// Time covered by cycles whose readings failed
    missed_dt: f64,
}

impl<S: OdometrySensors> PerceptionStack<S> {
    /// Create a new perception stack
    pub fn new(sensors: S, config: OdometrySection) -> Self {
        PerceptionStack {
            base: LifecycleNodeBase::new("perception_stack"),
            sensors,
            estimator: PoseEstimator::new(config),
            missed_dt: 0.0,
        }
    }

    fn read(&mut self) -> Result<(EncoderSample, f64), SensorError> {
        let encoders = self.sensors.read_encoders()?;
        let heading = self.sensors.read_heading()?;
        Ok((encoders, heading))
    }

    /// Run one estimation cycle; `dt` is seconds since the previous cycle
    ///
    /// Sensor faults leave the previous estimate in place. The motion made
    /// during a fault is integrated on the next good reading, over the
    /// combined time of the missed cycles.
    pub fn periodic(&mut self, dt: f64) -> Option<UpdateOutcome> {
        if !self.base.is_active() {
            return None;
        }
        match self.read() {
            Ok((encoders, heading)) => {
                let elapsed = if dt.is_finite() {
                    dt + self.missed_dt
                } else {
                    dt
                };
                self.missed_dt = 0.0;
                let outcome = self.estimator.update(encoders, heading, elapsed);
                let pose = self.estimator.pose();
                debug!(
                    "pose x={:.2} y={:.2} heading={:.1}deg",
                    pose.x,
                    pose.y,
                    pose.heading_degrees()
                );
                Some(outcome)
            }
            Err(e) => {
                warn!("Odometry read failed, keeping last estimate: {}", e);
                if dt > 0.0 && dt.is_finite() {
                    self.missed_dt += dt;
                }
                None
            }
        }
    }

    /// Overwrite the pose and re-baseline on the current hardware readings
    pub fn reset_pose(&mut self, pose: Pose) -> Result<(), SensorError> {
        let (encoders, heading) = self.read()?;
        self.estimator.reset_pose(pose, encoders, heading);
        self.missed_dt = 0.0;
        debug!("pose reset to {:?}", self.estimator.pose());
        Ok(())
    }

    /// Get the current pose estimate
    pub fn pose(&self) -> Pose {
        self.estimator.pose()
    }

    /// Unwrapped heading in radians
    pub fn total_heading(&self) -> f64 {
        self.estimator.total_heading()
    }

    /// Get the current smoothed velocity
    pub fn velocity(&self) -> Velocity {
        self.estimator.velocity()
    }

    pub fn estimator(&self) -> &PoseEstimator {
        &self.estimator
    }

    pub fn state(&self) -> State {
        self.base.get_state()
    }
}

impl<S: OdometrySensors> LifecycleNode for PerceptionStack<S> {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn on_configure(&mut self) -> CoreResult<()> {
        self.estimator.config().validate()?;
        self.base.transition(State::Unconfigured, State::Inactive)
    }

    fn on_activate(&mut self) -> CoreResult<()> {
        self.base.transition(State::Inactive, State::Active)
    }

    fn on_deactivate(&mut self) -> CoreResult<()> {
        self.base.transition(State::Active, State::Inactive)
    }

    fn on_cleanup(&mut self) -> CoreResult<()> {
        self.base.transition(State::Inactive, State::Unconfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    struct ScriptedOdometry {
        encoders: EncoderSample,
        heading: f64,
        fail: bool,
    }

    impl OdometrySensors for ScriptedOdometry {
        fn read_encoders(&mut self) -> Result<EncoderSample, SensorError> {
            if self.fail {
                return Err(SensorError::Disconnected("odometry".to_string()));
            }
            Ok(self.encoders)
        }

        fn read_heading(&mut self) -> Result<f64, SensorError> {
            Ok(self.heading)
        }
    }

    fn active_stack() -> PerceptionStack<ScriptedOdometry> {
        let sensors = ScriptedOdometry {
            encoders: EncoderSample::new(1_000, 1_000, 0),
            heading: 0.0,
            fail: false,
        };
        let mut stack = PerceptionStack::new(sensors, OdometrySection::default());
        stack.on_configure().unwrap();
        stack.on_activate().unwrap();
        stack
    }

    #[test]
    fn inactive_stack_does_nothing() {
        let sensors = ScriptedOdometry {
            encoders: EncoderSample::default(),
            heading: 0.0,
            fail: false,
        };
        let mut stack = PerceptionStack::new(sensors, OdometrySection::default());
        assert_eq!(stack.periodic(0.01), None);
    }

    #[test]
    fn reset_pose_rebaselines_on_hardware() {
        let mut stack = active_stack();
        stack.periodic(0.01);
        stack.sensors.encoders = EncoderSample::new(9_000, 9_000, 50);
        stack.sensors.heading = 2.0;

        let target = Pose::new(24.0, 36.0, 1.0);
        stack.reset_pose(target).unwrap();
        assert_eq!(stack.periodic(0.01), Some(UpdateOutcome::Integrated));

        let pose = stack.pose();
        assert_abs_diff_eq!(pose.x, 24.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pose.y, 36.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pose.heading, 1.0, epsilon = 1e-12);
    }

    fn ticks(inches: f64) -> i32 {
        (inches * OdometrySection::default().ticks_per_inch).round() as i32
    }

    /// Drive straight at `speed` in/s on 10 ms cycles, dropping the readings
    /// of every cycle in `lost`; returns the true travel
    fn drive_with_dropout(
        stack: &mut PerceptionStack<ScriptedOdometry>,
        speed: f64,
        cycles: usize,
        lost: std::ops::Range<usize>,
    ) -> f64 {
        let step = 0.01;
        let mut travel = 0.0;
        for cycle in 1..=cycles {
            travel += speed * step;
            stack.sensors.encoders = EncoderSample::new(ticks(travel), ticks(travel), 0);
            stack.sensors.fail = lost.contains(&cycle);
            let outcome = stack.periodic(step);
            if stack.sensors.fail {
                assert_eq!(outcome, None);
            } else {
                assert_eq!(outcome, Some(UpdateOutcome::Integrated));
                assert_abs_diff_eq!(stack.velocity().vx, speed, epsilon = 0.3);
            }
        }
        travel
    }

    fn unsmoothed_stack() -> PerceptionStack<ScriptedOdometry> {
        let sensors = ScriptedOdometry {
            encoders: EncoderSample::default(),
            heading: 0.0,
            fail: false,
        };
        let config = OdometrySection {
            velocity_alpha: 1.0,
            ..OdometrySection::default()
        };
        let mut stack = PerceptionStack::new(sensors, config);
        stack.on_configure().unwrap();
        stack.on_activate().unwrap();
        assert_eq!(stack.periodic(0.01), Some(UpdateOutcome::Baselined));
        stack
    }

    #[test]
    fn single_missed_read_keeps_velocity_scale() {
        let mut stack = unsmoothed_stack();
        let travel = drive_with_dropout(&mut stack, 20.0, 10, 5..6);
        assert_abs_diff_eq!(stack.pose().x, travel, epsilon = 0.01);
    }

    #[test]
    fn long_dropout_motion_is_recovered() {
        let mut stack = unsmoothed_stack();
        // 0.6 s without readings at 24 in/s covers 14.4 in
        let travel = drive_with_dropout(&mut stack, 24.0, 70, 5..65);
        assert_abs_diff_eq!(travel, 16.8, epsilon = 1e-9);
        assert_abs_diff_eq!(stack.pose().x, travel, epsilon = 0.01);
    }

    #[test]
    fn sensor_fault_keeps_estimate() {
        let mut stack = active_stack();
        stack.periodic(0.01);
        let pose = stack.pose();
        stack.sensors.fail = true;
        assert_eq!(stack.periodic(0.01), None);
        assert_eq!(stack.pose(), pose);
        assert!(stack.reset_pose(Pose::origin()).is_err());
    }
}
