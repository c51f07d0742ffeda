//! Zone registry configuration section.

use serde::{Deserialize, Serialize};

/// One named polygon, vertices as `[x, y]` field inches
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneEntry {
    pub label: String,
    pub vertices: Vec<[f64; 2]>,
}

impl ZoneEntry {
    pub fn new(label: &str, vertices: &[[f64; 2]]) -> Self {
        ZoneEntry {
            label: label.to_string(),
            vertices: vertices.to_vec(),
        }
    }
}

/// Field shooting zones, most specific first
pub fn default_zones() -> Vec<ZoneEntry> {
    vec![
        ZoneEntry::new("CLOSE", &[[0.0, 0.0], [24.0, 0.0], [24.0, 24.0], [0.0, 24.0]]),
        ZoneEntry::new("MID", &[[24.0, 0.0], [48.0, 0.0], [48.0, 24.0], [24.0, 24.0]]),
        ZoneEntry::new("FAR", &[[48.0, 0.0], [72.0, 0.0], [72.0, 36.0], [48.0, 36.0]]),
        ZoneEntry::new("MAIN", &[[0.0, 0.0], [48.0, 0.0], [48.0, 36.0], [0.0, 36.0]]),
    ]
}
