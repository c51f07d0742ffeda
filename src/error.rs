//! Error types for the arena core

use thiserror::Error;

/// Errors raised while building or driving the core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Zone '{label}' has {count} vertices, at least 3 are required")]
    DegenerateZone { label: String, count: usize },

    #[error("Duplicate zone label '{0}'")]
    DuplicateZone(String),

    #[error("Unknown zone '{0}'")]
    UnknownZone(String),

    #[error("Lifecycle error in {node}: {reason}")]
    Lifecycle { node: String, reason: String },
}

/// Errors raised while loading configuration from disk
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Invalid(#[from] CoreError),
}

/// Hardware read failures reported by sensor collaborators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensorError {
    #[error("Sensor '{0}' disconnected")]
    Disconnected(String),

    #[error("Sensor '{name}' returned an invalid reading: {reason}")]
    InvalidReading { name: String, reason: String },
}

impl SensorError {
    /// Pass `value` through if finite, else report it as an invalid reading
    pub fn require_finite(name: &str, value: f64) -> Result<f64, SensorError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(SensorError::InvalidReading {
                name: name.to_string(),
                reason: format!("non-finite value {}", value),
            })
        }
    }
}

/// Result alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
