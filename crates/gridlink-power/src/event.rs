//! Powered-state transition events reported by a tick.

use gridlink_core::fixed::Ticks;
use gridlink_core::id::DeviceId;

/// Emitted when a consumer's powered flag changes. Never emitted for a tick
/// that leaves the flag as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerEvent {
    /// The consumer's network now covers its demand.
    ConsumerPowered {
        device: DeviceId,
        net_power: i64,
        tick: Ticks,
    },
    /// The consumer's network no longer covers its demand.
    ConsumerUnpowered {
        device: DeviceId,
        /// Missing production: consumed - produced.
        deficit: u64,
        tick: Ticks,
    },
}

impl PowerEvent {
    pub fn device(&self) -> DeviceId {
        match self {
            PowerEvent::ConsumerPowered { device, .. } | PowerEvent::ConsumerUnpowered { device, .. } => {
                *device
            }
        }
    }

    pub fn tick(&self) -> Ticks {
        match self {
            PowerEvent::ConsumerPowered { tick, .. } | PowerEvent::ConsumerUnpowered { tick, .. } => {
                *tick
            }
        }
    }
}
