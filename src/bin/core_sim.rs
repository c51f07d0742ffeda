use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use arena_core::common::types::Pose;
use arena_core::config::CoreConfig;
use arena_core::control::command::{FlywheelCommand, VelocityPreset};
use arena_core::harness::{BodyTwist, SimBattery, SimFlywheel, SimOdometry};
use arena_core::RobotCore;
use log::info;

const CYCLE: Duration = Duration::from_millis(10);
const CYCLES: u32 = 400;

fn load_config() -> Result<CoreConfig> {
    match std::env::args().nth(1) {
        Some(path) => CoreConfig::load(Path::new(&path))
            .with_context(|| format!("Failed to load config from {}", path)),
        None => CoreConfig::load_default().context("Failed to load default config"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let flywheel = &config.flywheel;
    // Size the simulated wheel so feedforward alone lands on target
    let gain = if flywheel.kv > 0.0 {
        1.0 / (flywheel.kv * flywheel.nominal_voltage)
    } else {
        200.0
    };

    let start = Pose::new(6.0, 6.0, 0.0);
    let twist = BodyTwist {
        forward: 12.0,
        lateral: 0.0,
        omega: 0.15,
    };
    let sensors = SimOdometry::new(config.odometry.clone(), start, twist, CYCLE.as_secs_f64());
    let motor = SimFlywheel::new(gain, 0.2, flywheel.nominal_voltage);
    let battery = SimBattery::new(12.6, 0.005, 10.5);

    let mut core = RobotCore::new(sensors, motor, battery, config);
    core.init().context("Failed to initialize robot core")?;
    core.reset_pose(start).context("Failed to seed start pose")?;
    core.apply(FlywheelCommand::Preset(VelocityPreset::Close));

    let mut interval = tokio::time::interval(CYCLE);
    for cycle in 0..CYCLES {
        interval.tick().await;

        if cycle == CYCLES / 2 {
            info!("Switching to far preset");
            core.apply(FlywheelCommand::Preset(VelocityPreset::Far));
        }

        let report = core.periodic(CYCLE);
        if cycle % 25 == 0 {
            info!(
                "cycle {:3}: pose=({:.1}, {:.1}, {:.0}deg) zone={} dist={:.1} flywheel={:.0}/{:.0} power={:.3} ready={}",
                cycle,
                report.pose.x,
                report.pose.y,
                report.pose.heading_degrees(),
                report.zone.label,
                report.zone.distance,
                report.flywheel.measured,
                report.flywheel.target,
                report.flywheel.power,
                report.flywheel.at_target
            );
        }
    }

    let shooter = core.predicted_shooter_pose(0.1);
    info!(
        "Predicted shooter pose in 100ms: ({:.1}, {:.1})",
        shooter.x, shooter.y
    );

    core.shutdown().context("Failed to shut down robot core")?;
    Ok(())
}
