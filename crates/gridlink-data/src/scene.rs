//! A loaded scene: the populated registry plus its prefab palette.

use std::collections::HashMap;

use gridlink_core::device::{DeviceSpec, Position};
use gridlink_core::id::DeviceId;
use gridlink_core::registry::{DeviceRegistry, RegistryError};

/// A named, resolved device template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefab {
    pub name: String,
    pub spec: DeviceSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("no prefab named '{0}'")]
    UnknownPrefab(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Devices spawned from a scene file, with the prefabs they came from.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub registry: DeviceRegistry,
    prefabs: Vec<Prefab>,
    labels: HashMap<String, DeviceId>,
}

impl Scene {
    pub(crate) fn new(prefabs: Vec<Prefab>) -> Self {
        Self {
            registry: DeviceRegistry::new(),
            prefabs,
            labels: HashMap::new(),
        }
    }

    pub(crate) fn insert_label(&mut self, label: String, id: DeviceId) {
        self.labels.insert(label, id);
    }

    pub(crate) fn has_label(&self, label: &str) -> bool {
        self.labels.contains_key(label)
    }

    pub fn prefab(&self, name: &str) -> Option<&Prefab> {
        self.prefabs.iter().find(|p| p.name == name)
    }

    /// Prefab names in declaration order.
    pub fn prefab_names(&self) -> impl Iterator<Item = &str> {
        self.prefabs.iter().map(|p| p.name.as_str())
    }

    /// Place a new device from a named prefab.
    pub fn spawn_prefab(&mut self, name: &str, position: Position) -> Result<DeviceId, SceneError> {
        let spec = self
            .prefab(name)
            .ok_or_else(|| SceneError::UnknownPrefab(name.to_string()))?
            .spec;
        Ok(self.registry.spawn(spec, position)?)
    }

    /// The device placed under `label`, if it is still alive.
    pub fn device(&self, label: &str) -> Option<DeviceId> {
        self.labels
            .get(label)
            .copied()
            .filter(|id| self.registry.contains(*id))
    }

    /// All labels and their devices, sorted by label.
    pub fn labels(&self) -> Vec<(&str, DeviceId)> {
        let mut labels: Vec<_> = self.labels.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        labels.sort_unstable_by_key(|(k, _)| *k);
        labels
    }
}
