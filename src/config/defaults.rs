//! Default value functions for serde deserialization.

// Odometry: 2000-tick encoders on 48 mm dead wheels.
pub fn ticks_per_inch() -> f64 {
    336.87
}

pub fn left_offset() -> f64 {
    6.0
}

pub fn right_offset() -> f64 {
    -6.0
}

pub fn strafe_offset() -> f64 {
    -7.0
}

pub fn enabled() -> bool {
    true
}

pub fn velocity_alpha() -> f64 {
    0.3
}

pub fn max_wheel_delta() -> f64 {
    12.0
}

pub fn max_wheel_speed() -> f64 {
    120.0
}

pub fn shooter_offset() -> f64 {
    -0.6
}

// Flywheel
pub fn nominal_voltage() -> f64 {
    12.0
}

pub fn min_voltage() -> f64 {
    9.0
}

pub fn voltage_alpha() -> f64 {
    0.08
}

pub fn kv() -> f64 {
    0.003
}

pub fn ka() -> f64 {
    0.08
}

pub fn ks() -> f64 {
    0.0
}

pub fn kp() -> f64 {
    0.009
}

pub fn ki() -> f64 {
    0.0
}

pub fn kd() -> f64 {
    0.01
}

pub fn max_power() -> f64 {
    0.85
}

pub fn tolerance_below() -> f64 {
    20.0
}

pub fn tolerance_above() -> f64 {
    40.0
}
