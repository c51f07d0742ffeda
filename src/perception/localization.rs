//! Localization module
//!
//! Dead-wheel odometry fused with an absolute heading sensor. Two forward
//! wheels and one strafe wheel give robot-centric translation; the inertial
//! sensor gives rotation. Each update integrates one cycle of motion into a
//! field pose and refreshes a smoothed field-relative velocity.

use log::warn;
use nalgebra::{Rotation2, Vector2};

use crate::common::angles::{heading_delta, normalize_heading};
use crate::common::types::{Pose, Velocity};
use crate::config::OdometrySection;
use crate::perception::filters::{Filter, LowPassFilter};
use crate::perception::sensors::EncoderSample;

/// What a single update did with its inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// First sample after construction; only recorded as baseline
    Baselined,
    /// Motion integrated normally
    Integrated,
    /// Encoder delta was implausible and discarded as a counter reset
    EncoderReset,
}

#[derive(Debug, Clone, Copy)]
struct Baseline {
    encoders: EncoderSample,
    heading: f64,
}

/// Pose estimator for the robot
#[derive(Debug, Clone)]
pub struct PoseEstimator {
    config: OdometrySection,
    pose: Pose,
    vx: LowPassFilter,
    vy: LowPassFilter,
    omega: LowPassFilter,
    /// Unwrapped heading: sum of every applied heading delta
    total_heading: f64,
    previous: Option<Baseline>,
}

impl PoseEstimator {
    /// Create a new estimator at the origin
    pub fn new(config: OdometrySection) -> Self {
        Self::with_pose(config, Pose::origin())
    }

    /// Create a new estimator at a starting pose
    pub fn with_pose(config: OdometrySection, pose: Pose) -> Self {
        let alpha = config.velocity_alpha;
        let pose = Pose::new(pose.x, pose.y, pose.heading);
        PoseEstimator {
            config,
            pose,
            vx: LowPassFilter::new(alpha, 0.0),
            vy: LowPassFilter::new(alpha, 0.0),
            omega: LowPassFilter::new(alpha, 0.0),
            total_heading: pose.heading,
            previous: None,
        }
    }

    /// Integrate one cycle of sensor readings
    ///
    /// `dt` is the elapsed time in seconds since the previous update,
    /// including any cycles whose readings were lost. A non-positive `dt`
    /// still moves the pose but leaves the smoothed velocity untouched.
    pub fn update(&mut self, encoders: EncoderSample, heading: f64, dt: f64) -> UpdateOutcome {
        let Some(previous) = self.previous else {
            self.previous = Some(Baseline {
                encoders,
                heading: if heading.is_finite() { heading } else { 0.0 },
            });
            return UpdateOutcome::Baselined;
        };

        // A NaN heading sample must not poison the running heading
        let (d_theta, heading) = if heading.is_finite() {
            (heading_delta(previous.heading, heading), heading)
        } else {
            warn!("Ignoring non-finite heading sample");
            (0.0, previous.heading)
        };

        let (d_left, d_right, d_strafe) = encoders.delta_since(&previous.encoders);
        let tpi = self.config.ticks_per_inch;
        let left = d_left as f64 / tpi;
        let right = d_right as f64 / tpi;
        let strafe = d_strafe as f64 / tpi;

        self.previous = Some(Baseline { encoders, heading });

        let limit = self.wheel_delta_limit(dt);
        if left.abs() > limit || right.abs() > limit || strafe.abs() > limit {
            warn!(
                "Discarding implausible encoder delta ({:.1}, {:.1}, {:.1}) in; treating as counter reset",
                left, right, strafe
            );
            self.publish(
                Pose::new(self.pose.x, self.pose.y, self.pose.heading + d_theta),
                d_theta,
            );
            return UpdateOutcome::EncoderReset;
        }

        let local = self.robot_displacement(left, right, strafe, d_theta);
        let field = Rotation2::new(self.pose.heading) * local;

        self.publish(
            Pose::new(
                self.pose.x + field.x,
                self.pose.y + field.y,
                self.pose.heading + d_theta,
            ),
            d_theta,
        );

        if dt > 0.0 && dt.is_finite() {
            self.vx.filter(field.x / dt);
            self.vy.filter(field.y / dt);
            self.omega.filter(d_theta / dt);
        }

        UpdateOutcome::Integrated
    }

    /// Robot-centric (forward, left) displacement for one cycle
    fn robot_displacement(&self, left: f64, right: f64, strafe: f64, d_theta: f64) -> Vector2<f64> {
        let mut forward = (left + right) / 2.0;
        let mut lateral = strafe;

        if self.config.skew_correction {
            // Turning sweeps each wheel along an arc proportional to its offset
            let mean_lateral_offset = (self.config.left_offset + self.config.right_offset) / 2.0;
            forward += mean_lateral_offset * d_theta;
            lateral -= self.config.strafe_offset * d_theta;
        }

        Vector2::new(forward, lateral)
    }

    /// Largest wheel travel accepted as real motion over `dt` seconds
    fn wheel_delta_limit(&self, dt: f64) -> f64 {
        let floor = self.config.max_wheel_delta;
        if dt > 0.0 && dt.is_finite() {
            floor.max(self.config.max_wheel_speed * dt)
        } else {
            floor
        }
    }

    fn publish(&mut self, pose: Pose, d_theta: f64) {
        self.pose = pose;
        self.total_heading += d_theta;
    }

    /// Overwrite the pose and re-baseline on the given raw readings
    pub fn reset_pose(&mut self, pose: Pose, encoders: EncoderSample, heading: f64) {
        self.pose = Pose::new(pose.x, pose.y, pose.heading);
        self.total_heading = self.pose.heading;
        self.previous = Some(Baseline {
            encoders,
            heading: if heading.is_finite() { heading } else { 0.0 },
        });
        self.vx.reset(0.0);
        self.vy.reset(0.0);
        self.omega.reset(0.0);
    }

    /// Latest pose snapshot
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Latest smoothed velocity snapshot
    pub fn velocity(&self) -> Velocity {
        Velocity {
            vx: self.vx.value(),
            vy: self.vy.value(),
            omega: self.omega.value(),
        }
    }

    /// Heading in radians without wrapping; a full left turn adds 2π
    pub fn total_heading(&self) -> f64 {
        self.total_heading
    }

    /// Pose of the shooter, offset along the robot heading
    pub fn shooter_pose(&self) -> Pose {
        self.pose.offset_forward(self.config.shooter_offset)
    }

    /// Shooter pose extrapolated `lookahead` seconds with the smoothed velocity
    pub fn predicted_shooter_pose(&self, lookahead: f64) -> Pose {
        let shooter = self.shooter_pose();
        let v = self.velocity();
        Pose {
            x: shooter.x + v.vx * lookahead,
            y: shooter.y + v.vy * lookahead,
            heading: normalize_heading(shooter.heading + v.omega * lookahead),
        }
    }

    pub fn config(&self) -> &OdometrySection {
        &self.config
    }
}
