//! Common utilities and types for the arena robot

pub mod angles;

/// Common types used across the codebase
pub mod types {
    use nalgebra::{Point2, Vector2};

    use super::angles::normalize_heading;

    /// A 2D point in field inches
    pub type Point2D = Point2<f64>;

    /// A field pose: position in inches, heading in radians within `[0, 2π)`
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Pose {
        pub x: f64,
        pub y: f64,
        pub heading: f64,
    }

    impl Pose {
        /// Create a pose, normalizing the heading
        pub fn new(x: f64, y: f64, heading: f64) -> Self {
            Pose {
                x,
                y,
                heading: normalize_heading(heading),
            }
        }

        /// Pose at the field origin facing +x
        pub fn origin() -> Self {
            Pose::default()
        }

        /// Position component as a point
        pub fn position(&self) -> Point2D {
            Point2::new(self.x, self.y)
        }

        /// Heading in degrees
        pub fn heading_degrees(&self) -> f64 {
            self.heading.to_degrees()
        }

        /// Pose shifted `distance` inches along its own heading
        pub fn offset_forward(&self, distance: f64) -> Self {
            Pose {
                x: self.x + distance * self.heading.cos(),
                y: self.y + distance * self.heading.sin(),
                heading: self.heading,
            }
        }
    }

    /// Field-relative velocity: inches/s and rad/s
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Velocity {
        pub vx: f64,
        pub vy: f64,
        pub omega: f64,
    }

    impl Velocity {
        /// Linear speed magnitude in inches/s
        pub fn speed(&self) -> f64 {
            Vector2::new(self.vx, self.vy).norm()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::types::{Pose, Velocity};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn pose_new_wraps_heading() {
        let pose = Pose::new(1.0, 2.0, -FRAC_PI_2);
        assert_abs_diff_eq!(pose.heading, 1.5 * PI, epsilon = 1e-12);
    }

    #[test]
    fn offset_forward_follows_heading() {
        let pose = Pose::new(10.0, 10.0, FRAC_PI_2).offset_forward(-0.6);
        assert_abs_diff_eq!(pose.x, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pose.y, 9.4, epsilon = 1e-12);
    }

    #[test]
    fn speed_is_magnitude() {
        let v = Velocity {
            vx: 3.0,
            vy: 4.0,
            omega: 1.0,
        };
        assert_abs_diff_eq!(v.speed(), 5.0);
    }
}
