//! Navigation module for the arena robot
//!
//! Zone awareness only: which named region the robot occupies and how far
//! it is from the closest one. Trajectory generation lives outside this crate.
pub mod geometry;
pub mod zones;

use log::info;

use self::zones::{Zone, ZoneRegistry, NO_ZONE};
use crate::common::types::Pose;
use crate::config::ZoneEntry;
use crate::error::CoreResult;
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};

/// Result of classifying one pose snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneStatus {
    pub label: String,
    /// Zero when inside a zone
    pub distance: f64,
}

impl ZoneStatus {
    pub fn in_zone(&self) -> bool {
        self.label != NO_ZONE
    }
}

/// Navigation stack for the robot
pub struct NavigationStack {
    base: LifecycleNodeBase,
    entries: Vec<ZoneEntry>,
    registry: ZoneRegistry,
}

impl NavigationStack {
    /// Create a new navigation stack; zones are built during configuration
    pub fn new(entries: Vec<ZoneEntry>) -> Self {
        NavigationStack {
            base: LifecycleNodeBase::new("navigation_stack"),
            entries,
            registry: ZoneRegistry::default(),
        }
    }

    /// Label of the highest-priority zone containing the pose
    pub fn classify(&self, pose: &Pose) -> &str {
        self.registry.classify(pose)
    }

    pub fn distance_to_nearest_zone(&self, pose: &Pose) -> f64 {
        self.registry.nearest_zone_distance(pose)
    }

    pub fn zone_at(&self, pose: &Pose) -> Option<&Zone> {
        self.registry.zone_at(pose)
    }

    /// Label and proximity for one pose
    pub fn status(&self, pose: &Pose) -> ZoneStatus {
        ZoneStatus {
            label: self.classify(pose).to_string(),
            distance: self.distance_to_nearest_zone(pose),
        }
    }

    pub fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    pub fn state(&self) -> State {
        self.base.get_state()
    }
}

impl LifecycleNode for NavigationStack {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn on_configure(&mut self) -> CoreResult<()> {
        if !self.entries.is_empty() {
            self.registry = ZoneRegistry::from_entries(&self.entries)?;
        }
        info!("{} zones registered", self.registry.len());
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
