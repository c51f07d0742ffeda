//! Named field zones and the priority-ordered registry that classifies poses

use std::collections::HashSet;

use super::geometry;
use crate::common::types::{Point2D, Pose};
use crate::config::ZoneEntry;
use crate::error::{CoreError, CoreResult};

/// Label reported when no zone contains the pose
pub const NO_ZONE: &str = "NONE";

/// A named simple polygon on the field
///
/// Always holds at least three vertices; immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    label: String,
    vertices: Vec<Point2D>,
}

impl Zone {
    /// Create a zone, rejecting polygons with fewer than 3 vertices
    pub fn new(label: &str, vertices: Vec<Point2D>) -> CoreResult<Self> {
        if vertices.len() < 3 {
            return Err(CoreError::DegenerateZone {
                label: label.to_string(),
                count: vertices.len(),
            });
        }
        if vertices.iter().any(|v| !(v.x.is_finite() && v.y.is_finite())) {
            return Err(CoreError::InvalidConfig(format!(
                "zone '{}' has a non-finite vertex",
                label
            )));
        }
        Ok(Zone {
            label: label.to_string(),
            vertices,
        })
    }

    pub fn from_entry(entry: &ZoneEntry) -> CoreResult<Self> {
        let vertices = entry
            .vertices
            .iter()
            .map(|&[x, y]| Point2D::new(x, y))
            .collect();
        Zone::new(&entry.label, vertices)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn vertices(&self) -> &[Point2D] {
        &self.vertices
    }

    /// Whether the pose position lies inside or on the boundary
    pub fn contains(&self, pose: &Pose) -> bool {
        geometry::point_in_polygon(&self.vertices, &pose.position())
    }

    /// Zero inside, else the distance to the closest edge
    pub fn distance_to(&self, pose: &Pose) -> f64 {
        geometry::distance_to_polygon(&self.vertices, &pose.position())
    }

    /// Area-weighted center of the zone
    pub fn centroid(&self) -> Point2D {
        // Non-empty by construction
        geometry::centroid(&self.vertices).unwrap_or_else(|| self.vertices[0])
    }
}

/// Read-only set of zones, checked in registration order
///
/// When zones overlap, the first registered one wins, so register the most
/// specific (smallest) zones first.
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
}

impl ZoneRegistry {
    /// Build a registry; labels must be unique
    pub fn new(zones: Vec<Zone>) -> CoreResult<Self> {
        let mut seen = HashSet::new();
        for zone in &zones {
            if zone.label == NO_ZONE {
                return Err(CoreError::InvalidConfig(format!(
                    "zone label '{}' is reserved",
                    NO_ZONE
                )));
            }
            if !seen.insert(zone.label.as_str()) {
                return Err(CoreError::DuplicateZone(zone.label.clone()));
            }
        }
        Ok(ZoneRegistry { zones })
    }

    pub fn from_entries(entries: &[ZoneEntry]) -> CoreResult<Self> {
        let zones = entries
            .iter()
            .map(Zone::from_entry)
            .collect::<CoreResult<Vec<_>>>()?;
        ZoneRegistry::new(zones)
    }

    /// First zone, in priority order, that contains the pose
    pub fn zone_at(&self, pose: &Pose) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.contains(pose))
    }

    /// Label of the containing zone, or [`NO_ZONE`]
    pub fn classify(&self, pose: &Pose) -> &str {
        self.zone_at(pose).map_or(NO_ZONE, Zone::label)
    }

    /// Smallest distance to any zone; infinite for an empty registry
    pub fn nearest_zone_distance(&self, pose: &Pose) -> f64 {
        self.zones
            .iter()
            .map(|zone| zone.distance_to(pose))
            .fold(f64::INFINITY, f64::min)
    }

    /// Straight-line distance from the pose to a zone's centroid
    pub fn distance_to_centroid(&self, label: &str, pose: &Pose) -> CoreResult<f64> {
        let zone = self
            .get(label)
            .ok_or_else(|| CoreError::UnknownZone(label.to_string()))?;
        Ok((zone.centroid() - pose.position()).norm())
    }

    pub fn get(&self, label: &str) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.label == label)
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_zones;
    use approx::assert_abs_diff_eq;

    fn square(label: &str, x0: f64, y0: f64, side: f64) -> Zone {
        Zone::new(
            label,
            vec![
                Point2D::new(x0, y0),
                Point2D::new(x0 + side, y0),
                Point2D::new(x0 + side, y0 + side),
                Point2D::new(x0, y0 + side),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_degenerate_zone() {
        let err = Zone::new("LINE", vec![Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)])
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::DegenerateZone {
                label: "LINE".to_string(),
                count: 2
            }
        );
    }

    #[test]
    fn unit_square_queries() {
        let zone = square("UNIT", 0.0, 0.0, 1.0);
        assert!(zone.contains(&Pose::new(0.5, 0.5, 0.0)));
        assert!(!zone.contains(&Pose::new(2.0, 2.0, 0.0)));
        assert_abs_diff_eq!(zone.distance_to(&Pose::new(2.0, 0.5, 0.0)), 1.0, epsilon = 1e-12);
        assert_eq!(zone.distance_to(&Pose::new(0.5, 0.5, 3.0)), 0.0);
    }

    #[test]
    fn first_registered_zone_wins_overlap() {
        let a = square("A", 0.0, 0.0, 10.0);
        let b = square("B", 5.0, 5.0, 10.0);
        let registry = ZoneRegistry::new(vec![a, b]).unwrap();

        assert_eq!(registry.classify(&Pose::new(7.0, 7.0, 0.0)), "A");
        assert_eq!(registry.classify(&Pose::new(12.0, 12.0, 0.0)), "B");
        assert_eq!(registry.classify(&Pose::new(30.0, 30.0, 0.0)), NO_ZONE);

        let swapped = ZoneRegistry::new(vec![
            square("B", 5.0, 5.0, 10.0),
            square("A", 0.0, 0.0, 10.0),
        ])
        .unwrap();
        assert_eq!(swapped.classify(&Pose::new(7.0, 7.0, 0.0)), "B");
    }

    #[test]
    fn default_field_zones_priority() {
        let registry = ZoneRegistry::from_entries(&default_zones()).unwrap();
        assert_eq!(registry.classify(&Pose::new(12.0, 12.0, 0.0)), "CLOSE");
        assert_eq!(registry.classify(&Pose::new(36.0, 12.0, 0.0)), "MID");
        assert_eq!(registry.classify(&Pose::new(60.0, 30.0, 0.0)), "FAR");
        // Inside MAIN only: above CLOSE and MID
        assert_eq!(registry.classify(&Pose::new(30.0, 30.0, 0.0)), "MAIN");
        assert_eq!(registry.classify(&Pose::new(100.0, 100.0, 0.0)), NO_ZONE);
    }

    #[test]
    fn nearest_distance_over_all_zones() {
        let registry = ZoneRegistry::new(vec![
            square("NEAR", 0.0, 0.0, 10.0),
            square("FARTHER", 40.0, 0.0, 10.0),
        ])
        .unwrap();
        assert_abs_diff_eq!(
            registry.nearest_zone_distance(&Pose::new(13.0, 5.0, 0.0)),
            3.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            registry.nearest_zone_distance(&Pose::new(38.0, 5.0, 0.0)),
            2.0,
            epsilon = 1e-12
        );
        assert_eq!(registry.nearest_zone_distance(&Pose::new(5.0, 5.0, 0.0)), 0.0);
        assert_eq!(
            ZoneRegistry::default().nearest_zone_distance(&Pose::origin()),
            f64::INFINITY
        );
    }

    #[test]
    fn duplicate_and_reserved_labels_rejected() {
        let dup = ZoneRegistry::new(vec![square("X", 0.0, 0.0, 1.0), square("X", 5.0, 5.0, 1.0)]);
        assert_eq!(dup.unwrap_err(), CoreError::DuplicateZone("X".to_string()));
        assert!(ZoneRegistry::new(vec![square(NO_ZONE, 0.0, 0.0, 1.0)]).is_err());
    }

    #[test]
    fn centroid_distance_by_label() {
        let registry = ZoneRegistry::new(vec![square("S", 0.0, 0.0, 10.0)]).unwrap();
        let d = registry
            .distance_to_centroid("S", &Pose::new(5.0, 9.0, 0.0))
            .unwrap();
        assert_abs_diff_eq!(d, 4.0, epsilon = 1e-12);
        assert_eq!(
            registry.distance_to_centroid("Q", &Pose::origin()).unwrap_err(),
            CoreError::UnknownZone("Q".to_string())
        );
    }
}
