//! Lifecycle management for arena core components

use log::info;

use crate::error::{CoreError, CoreResult};

/// Trait for components that follow a lifecycle pattern
pub trait LifecycleNode: Send {
    /// Node name used in logs and errors
    fn name(&self) -> &str;

    /// Configure the node
    fn on_configure(&mut self) -> CoreResult<()>;

    /// Activate the node
    fn on_activate(&mut self) -> CoreResult<()>;

    /// Deactivate the node
    fn on_deactivate(&mut self) -> CoreResult<()>;

    /// Clean up the node
    fn on_cleanup(&mut self) -> CoreResult<()>;
}

/// State of a lifecycle node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unconfigured,
    Inactive,
    Active,
}

/// Base implementation for lifecycle nodes
#[derive(Debug, Clone)]
pub struct LifecycleNodeBase {
    pub name: String,
    state: State,
}

impl LifecycleNodeBase {
    /// Create a new lifecycle node base
    pub fn new(name: &str) -> Self {
        LifecycleNodeBase {
            name: name.to_string(),
            state: State::Unconfigured,
        }
    }

    /// Get the current state
    pub fn get_state(&self) -> State {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == State::Active
    }

    /// Move to `to`, provided the node is currently in `from`
    pub fn transition(&mut self, from: State, to: State) -> CoreResult<()> {
        if self.state != from {
            return Err(CoreError::Lifecycle {
                node: self.name.clone(),
                reason: format!("cannot move to {:?} from {:?}", to, self.state),
            });
        }
        info!("{}: {:?} -> {:?}", self.name, from, to);
        self.state = to;
        Ok(())
    }
}
