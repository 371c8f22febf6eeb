//! Serde structs for scene files.
//!
//! These define the on-disk format only. Numbers are plain floats here and
//! are validated and converted to fixed-point by the loader.

use gridlink_core::device::DeviceKind;
use serde::{Deserialize, Serialize};

// ===========================================================================
// Scene
// ===========================================================================

/// Top-level contents of a scene file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneData {
    #[serde(default)]
    pub prefabs: Vec<PrefabData>,
    #[serde(default)]
    pub devices: Vec<PlacementData>,
}

// ===========================================================================
// Prefabs
// ===========================================================================

/// A placeable device template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefabData {
    pub name: String,
    pub kind: KindData,
    #[serde(default = "default_range")]
    pub range: f64,
    #[serde(default)]
    pub production: u32,
    #[serde(default)]
    pub consumption: u32,
}

fn default_range() -> f64 {
    10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindData {
    Generator,
    Consumer,
    Transmitter,
}

impl From<KindData> for DeviceKind {
    fn from(kind: KindData) -> Self {
        match kind {
            KindData::Generator => DeviceKind::Generator,
            KindData::Consumer => DeviceKind::Consumer,
            KindData::Transmitter => DeviceKind::Transmitter,
        }
    }
}

// ===========================================================================
// Placements
// ===========================================================================

/// One device placed in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementData {
    /// Name of the prefab to instantiate.
    pub prefab: String,
    #[serde(default)]
    pub position: PositionData,
    /// Optional handle for looking the device up after loading.
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionData {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}
