use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::device::{Device, DeviceKind, DeviceSpec, Position};
use crate::fixed::Fixed64;
use crate::id::DeviceId;

/// The live set of placed devices.
///
/// This is the only place devices are looked up; nothing in the engine scans
/// global state. Iteration follows slot order, so every query is
/// deterministic for a given sequence of spawns and despawns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceRegistry {
    devices: SlotMap<DeviceId, Device>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Lifecycle --

    /// Place a new device. Rejects a negative range.
    pub fn spawn(&mut self, spec: DeviceSpec, position: Position) -> Result<DeviceId, RegistryError> {
        if spec.range < Fixed64::ZERO {
            return Err(RegistryError::NegativeRange { range: spec.range });
        }
        let kind = spec.kind;
        let id = self.devices.insert(Device::from_spec(spec, position));
        log::trace!("spawned {kind:?} {id:?} at {position:?}");
        Ok(id)
    }

    /// Remove a device, returning its final state.
    pub fn despawn(&mut self, id: DeviceId) -> Result<Device, RegistryError> {
        let device = self.devices.remove(id).ok_or(RegistryError::NotFound(id))?;
        log::trace!("despawned {:?} {id:?}", device.kind());
        Ok(device)
    }

    /// Move a device to a new position.
    pub fn move_device(&mut self, id: DeviceId, position: Position) -> Result<(), RegistryError> {
        let device = self.devices.get_mut(id).ok_or(RegistryError::NotFound(id))?;
        device.position = position;
        Ok(())
    }

    // -- Queries --

    pub fn get(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(id)
    }

    pub fn contains(&self, id: DeviceId) -> bool {
        self.devices.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// All devices in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (DeviceId, &Device)> {
        self.devices.iter()
    }

    /// All devices of one kind, in slot order.
    pub fn of_kind(&self, kind: DeviceKind) -> impl Iterator<Item = (DeviceId, &Device)> {
        self.devices.iter().filter(move |(_, d)| d.kind() == kind)
    }

    // -- Powered state --

    /// Read a device's powered flag. `None` if the device does not exist.
    pub fn is_powered(&self, id: DeviceId) -> Option<bool> {
        self.devices.get(id).map(Device::powered)
    }

    /// Overwrite a device's powered flag and return the previous value.
    ///
    /// Written by the balance evaluator once per consumer per tick. Renderers
    /// should only read the flag.
    pub fn set_powered(&mut self, id: DeviceId, powered: bool) -> Result<bool, RegistryError> {
        let device = self.devices.get_mut(id).ok_or(RegistryError::NotFound(id))?;
        Ok(std::mem::replace(&mut device.powered, powered))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("device not found: {0:?}")]
    NotFound(DeviceId),
    #[error("device range must be non-negative, got {range}")]
    NegativeRange { range: Fixed64 },
}
