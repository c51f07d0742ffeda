//! Flywheel commands issued by upstream logic

/// Named flywheel speeds, in encoder ticks per second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VelocityPreset {
    Off,
    Close,
    Mid,
    Far,
    Max,
    MaxAuto,
    /// Slow reverse to keep game pieces out of the shooter
    Idle,
    RunHigh,
}

impl VelocityPreset {
    pub fn velocity(self) -> f64 {
        match self {
            VelocityPreset::Off => 0.0,
            VelocityPreset::Close => 1000.0,
            VelocityPreset::Mid => 1250.0,
            VelocityPreset::Far => 1500.0,
            VelocityPreset::Max => 1500.0,
            VelocityPreset::MaxAuto => 1600.0,
            VelocityPreset::Idle => -300.0,
            VelocityPreset::RunHigh => 2000.0,
        }
    }
}

/// A state change requested of the flywheel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlywheelCommand {
    /// Drop to zero power, bypassing the controller
    Stop,
    SetVelocity(f64),
    Preset(VelocityPreset),
    SetCompensation(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_speeds() {
        assert_eq!(VelocityPreset::Off.velocity(), 0.0);
        assert_eq!(VelocityPreset::Close.velocity(), 1000.0);
        assert_eq!(VelocityPreset::MaxAuto.velocity(), 1600.0);
        assert!(VelocityPreset::Idle.velocity() < 0.0);
    }
}
