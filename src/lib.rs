pub mod common;
pub mod config;
pub mod control;
pub mod error;
pub mod harness;
pub mod lifecycle;
pub mod navigation;
pub mod perception;

use std::time::Duration;

use log::info;

use crate::common::types::{Pose, Velocity};
use crate::config::CoreConfig;
use crate::control::command::FlywheelCommand;
use crate::control::controllers::FlywheelDiagnostics;
use crate::control::hardware::{FlywheelMotor, VoltageSensor};
use crate::control::ControlStack;
use crate::error::{CoreResult, SensorError};
use crate::lifecycle::LifecycleNode;
use crate::navigation::{NavigationStack, ZoneStatus};
use crate::perception::sensors::OdometrySensors;
use crate::perception::PerceptionStack;

/// Everything one control cycle produced
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub pose: Pose,
    pub velocity: Velocity,
    pub zone: ZoneStatus,
    pub flywheel: FlywheelDiagnostics,
}

/// Core functionality for the arena robot
///
/// Runs perception, zone classification and flywheel control in that order
/// once per cycle, so every consumer sees the same pose snapshot.
pub struct RobotCore<S, M, V>
where
    S: OdometrySensors,
    M: FlywheelMotor,
    V: VoltageSensor,
{
    perception: PerceptionStack<S>,
    navigation: NavigationStack,
    control: ControlStack<M, V>,
}

impl<S, M, V> RobotCore<S, M, V>
where
    S: OdometrySensors,
    M: FlywheelMotor,
    V: VoltageSensor,
{
    /// Create a new core around the robot's hardware
    pub fn new(sensors: S, motor: M, battery: V, config: CoreConfig) -> Self {
        RobotCore {
            perception: PerceptionStack::new(sensors, config.odometry),
            navigation: NavigationStack::new(config.zones),
            control: ControlStack::new(motor, battery, config.flywheel),
        }
    }

    fn components(&mut self) -> [&mut dyn LifecycleNode; 3] {
        [&mut self.perception, &mut self.navigation, &mut self.control]
    }

    /// Configure and activate every stack
    pub fn init(&mut self) -> CoreResult<()> {
        for component in self.components() {
            component.on_configure()?;
            component.on_activate()?;
        }
        info!("Robot core initialized");
        Ok(())
    }

    /// Deactivate and clean up every stack; the flywheel is stopped first
    pub fn shutdown(&mut self) -> CoreResult<()> {
        for component in self.components().into_iter().rev() {
            component.on_deactivate()?;
            component.on_cleanup()?;
        }
        info!("Robot core shut down");
        Ok(())
    }

    /// Run one cycle
    pub fn periodic(&mut self, dt: Duration) -> CycleReport {
        let dt = dt.as_secs_f64();
        self.perception.periodic(dt);
        let pose = self.perception.pose();
        let zone = self.navigation.status(&pose);
        self.control.periodic(dt);
        CycleReport {
            pose,
            velocity: self.perception.velocity(),
            zone,
            flywheel: self.control.diagnostics(),
        }
    }

    pub fn pose(&self) -> Pose {
        self.perception.pose()
    }

    pub fn velocity(&self) -> Velocity {
        self.perception.velocity()
    }

    /// Heading without wrapping, for counting full rotations
    pub fn total_heading(&self) -> f64 {
        self.perception.total_heading()
    }

    /// Pose of the shooter exit, offset along the robot heading
    pub fn shooter_pose(&self) -> Pose {
        self.perception.estimator().shooter_pose()
    }

    /// Shooter pose extrapolated `lookahead` seconds along the current velocity
    pub fn predicted_shooter_pose(&self, lookahead: f64) -> Pose {
        self.perception.estimator().predicted_shooter_pose(lookahead)
    }

    pub fn reset_pose(&mut self, pose: Pose) -> Result<(), SensorError> {
        self.perception.reset_pose(pose)
    }

    /// Zone label of the current pose
    pub fn classify(&self) -> &str {
        let pose = self.perception.pose();
        self.navigation.classify(&pose)
    }

    pub fn distance_to_nearest_zone(&self) -> f64 {
        self.navigation.distance_to_nearest_zone(&self.perception.pose())
    }

    pub fn apply(&mut self, command: FlywheelCommand) {
        self.control.apply(command);
    }

    pub fn set_target(&mut self, velocity: f64) {
        self.control.set_target(velocity);
    }

    pub fn stop(&mut self) {
        self.control.stop();
    }

    pub fn is_at_target(&self) -> bool {
        self.control.is_at_target()
    }

    pub fn perception(&self) -> &PerceptionStack<S> {
        &self.perception
    }

    pub fn navigation(&self) -> &NavigationStack {
        &self.navigation
    }

    pub fn control(&self) -> &ControlStack<M, V> {
        &self.control
    }
}
