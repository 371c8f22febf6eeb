//! Declarative scene files for Gridlink.
//!
//! A scene declares named prefabs (kind, range, production, consumption) and
//! a list of placements. Loading resolves every placement against the
//! prefabs and spawns the devices into a fresh [`DeviceRegistry`].
//!
//! [`DeviceRegistry`]: gridlink_core::registry::DeviceRegistry

pub mod loader;
pub mod scene;
pub mod schema;

pub use loader::{DataLoadError, Format, detect_format, load_scene, parse_scene};
pub use scene::{Prefab, Scene, SceneError};
