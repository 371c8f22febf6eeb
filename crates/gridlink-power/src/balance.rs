//! Per-consumer power balance.
//!
//! A consumer is powered when everything it can reach, plus itself, produces
//! at least as much as it consumes.

use std::collections::BTreeSet;

use gridlink_core::device::DeviceKind;
use gridlink_core::id::DeviceId;
use gridlink_core::registry::{DeviceRegistry, RegistryError};
use serde::{Deserialize, Serialize};

use crate::adjacency::{Neighborhood, ProximityGraph};
use crate::reachability::reachable_from;

// ---------------------------------------------------------------------------
// Balance result
// ---------------------------------------------------------------------------

/// Outcome of evaluating one consumer's network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkBalance {
    /// The evaluated consumer.
    pub consumer: DeviceId,
    /// Number of devices directly adjacent to the consumer.
    pub direct: usize,
    /// Every device reachable from the consumer (consumer excluded).
    pub members: BTreeSet<DeviceId>,
    /// Total production of the consumer and its members.
    pub produced: u64,
    /// Total consumption of the consumer and its members.
    pub consumed: u64,
    /// `produced - consumed`.
    pub net_power: i64,
    /// `net_power >= 0`.
    pub powered: bool,
}

impl NetworkBalance {
    /// How much more production the network needs. Zero when powered.
    pub fn deficit(&self) -> u64 {
        self.consumed.saturating_sub(self.produced)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BalanceError {
    #[error("device {device:?} is a {kind:?}, only consumers have a power balance")]
    NotAConsumer { device: DeviceId, kind: DeviceKind },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Compute a consumer's balance without writing anything.
pub fn assess<N>(
    registry: &DeviceRegistry,
    graph: &N,
    consumer: DeviceId,
) -> Result<NetworkBalance, BalanceError>
where
    N: Neighborhood + ?Sized,
{
    let device = registry
        .get(consumer)
        .ok_or(RegistryError::NotFound(consumer))?;
    if device.kind() != DeviceKind::Consumer {
        return Err(BalanceError::NotAConsumer {
            device: consumer,
            kind: device.kind(),
        });
    }

    let direct = graph.adjacents(consumer).len();
    let members = reachable_from(graph, consumer);

    let mut produced = u64::from(device.production());
    let mut consumed = u64::from(device.consumption());
    for member in members.iter().filter_map(|id| registry.get(*id)) {
        produced += u64::from(member.production());
        consumed += u64::from(member.consumption());
    }

    let net_power = signed(produced).saturating_sub(signed(consumed));

    Ok(NetworkBalance {
        consumer,
        direct,
        members,
        produced,
        consumed,
        net_power,
        powered: net_power >= 0,
    })
}

/// Evaluate a consumer against the current registry and store its powered
/// flag. Rejects anything that is not a consumer.
pub fn evaluate(
    registry: &mut DeviceRegistry,
    consumer: DeviceId,
) -> Result<NetworkBalance, BalanceError> {
    let balance = assess(registry, &ProximityGraph::new(registry), consumer)?;
    registry.set_powered(consumer, balance.powered)?;
    Ok(balance)
}

fn signed(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}
