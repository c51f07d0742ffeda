//! Configuration loading for the arena core.
//!
//! All calibration constants live in a single YAML file; every field has a
//! default so a partial file only overrides what it names.

mod defaults;
mod flywheel;
mod odometry;
mod zones;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, CoreResult};

pub use flywheel::FlywheelSection;
pub use odometry::OdometrySection;
pub use zones::{default_zones, ZoneEntry};

/// Full core configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub odometry: OdometrySection,

    #[serde(default)]
    pub flywheel: FlywheelSection,

    /// Zones in classification priority order
    #[serde(default = "default_zones")]
    pub zones: Vec<ZoneEntry>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            odometry: OdometrySection::default(),
            flywheel: FlywheelSection::default(),
            zones: default_zones(),
        }
    }
}

impl CoreConfig {
    /// Load and validate configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load from the default config path (config/robot.yaml), falling back to defaults
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Path::new("config/robot.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: CoreConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section; zone geometry is checked when the registry is built
    pub fn validate(&self) -> CoreResult<()> {
        self.odometry.validate()?;
        self.flywheel.validate()?;
        Ok(())
    }
}
