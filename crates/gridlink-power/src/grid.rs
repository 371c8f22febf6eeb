//! Per-tick orchestration.
//!
//! Every tick rebuilds adjacency from current positions, assesses each
//! consumer against the same frozen registry state, then writes all powered
//! flags. Assessment order cannot affect results because assessment never
//! reads a `powered` flag.

use gridlink_core::device::DeviceKind;
use gridlink_core::fixed::Ticks;
use gridlink_core::id::DeviceId;
use gridlink_core::registry::DeviceRegistry;
use gridlink_core::sim::{SimState, StateHash};
use serde::{Deserialize, Serialize};
use slotmap::Key;

use crate::adjacency::{Neighborhood, ProximityGraph};
use crate::balance::{NetworkBalance, assess};
use crate::event::PowerEvent;

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// How adjacency is computed during a tick. Both produce identical results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdjacencyStrategy {
    /// Rescan the registry for every adjacency query.
    #[default]
    OnDemand,
    /// Compute every device's adjacents once at the start of the tick.
    Snapshot,
}

// ---------------------------------------------------------------------------
// Tick report
// ---------------------------------------------------------------------------

/// Everything one tick decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub tick: Ticks,
    /// One entry per consumer, in registry order.
    pub balances: Vec<NetworkBalance>,
    /// Powered-state transitions, in registry order.
    pub events: Vec<PowerEvent>,
}

impl TickReport {
    pub fn balance(&self, consumer: DeviceId) -> Option<&NetworkBalance> {
        self.balances.iter().find(|b| b.consumer == consumer)
    }

    pub fn powered_count(&self) -> usize {
        self.balances.iter().filter(|b| b.powered).count()
    }

    pub fn unpowered(&self) -> impl Iterator<Item = DeviceId> {
        self.balances.iter().filter(|b| !b.powered).map(|b| b.consumer)
    }

    /// Hash of every consumer's outcome. Excludes the tick number, so two
    /// ticks over an unchanged registry hash equal.
    pub fn state_hash(&self) -> u64 {
        let mut h = StateHash::new();
        for b in &self.balances {
            h.write_u64(b.consumer.data().as_ffi());
            h.write_bool(b.powered);
            h.write_i64(b.net_power);
        }
        h.finish()
    }
}

// ---------------------------------------------------------------------------
// PowerGrid
// ---------------------------------------------------------------------------

/// Drives the per-tick recomputation of every consumer's powered state.
///
/// Holds no network state between ticks beyond the tick counter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerGrid {
    state: SimState,
    strategy: AdjacencyStrategy,
}

impl PowerGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(strategy: AdjacencyStrategy) -> Self {
        Self {
            state: SimState::new(),
            strategy,
        }
    }

    pub fn strategy(&self) -> AdjacencyStrategy {
        self.strategy
    }

    /// Number of ticks run so far.
    pub fn current_tick(&self) -> Ticks {
        self.state.tick
    }

    /// Recompute every consumer's network and powered flag.
    ///
    /// Generators and transmitters are read but never written.
    pub fn tick(&mut self, registry: &mut DeviceRegistry) -> TickReport {
        let tick = self.state.advance();
        let consumers: Vec<DeviceId> = registry
            .of_kind(DeviceKind::Consumer)
            .map(|(id, _)| id)
            .collect();

        let balances = match self.strategy {
            AdjacencyStrategy::OnDemand => {
                assess_all(registry, &ProximityGraph::new(registry), &consumers)
            }
            AdjacencyStrategy::Snapshot => {
                let snapshot = ProximityGraph::new(registry).snapshot();
                log::trace!("tick {tick}: snapshot holds {} edges", snapshot.edge_count());
                assess_all(registry, &snapshot, &consumers)
            }
        };

        let mut events = Vec::new();
        for balance in &balances {
            log::debug!(
                "tick {tick}: consumer {:?} direct={} network={} net_power={}",
                balance.consumer,
                balance.direct,
                balance.members.len(),
                balance.net_power
            );

            let Ok(was_powered) = registry.set_powered(balance.consumer, balance.powered) else {
                continue;
            };
            if was_powered == balance.powered {
                continue;
            }

            let event = if balance.powered {
                log::info!("consumer {:?} powered at tick {tick}", balance.consumer);
                PowerEvent::ConsumerPowered {
                    device: balance.consumer,
                    net_power: balance.net_power,
                    tick,
                }
            } else {
                log::info!(
                    "consumer {:?} lost power at tick {tick} (deficit {})",
                    balance.consumer,
                    balance.deficit()
                );
                PowerEvent::ConsumerUnpowered {
                    device: balance.consumer,
                    deficit: balance.deficit(),
                    tick,
                }
            };
            events.push(event);
        }

        TickReport {
            tick,
            balances,
            events,
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn assess_all<N>(registry: &DeviceRegistry, graph: &N, consumers: &[DeviceId]) -> Vec<NetworkBalance>
where
    N: Neighborhood + ?Sized,
{
    consumers
        .iter()
        .filter_map(|&consumer| assess_logged(registry, graph, consumer))
        .collect()
}

#[cfg(feature = "parallel")]
fn assess_all<N>(registry: &DeviceRegistry, graph: &N, consumers: &[DeviceId]) -> Vec<NetworkBalance>
where
    N: Neighborhood + Sync + ?Sized,
{
    use rayon::prelude::*;

    consumers
        .par_iter()
        .filter_map(|&consumer| assess_logged(registry, graph, consumer))
        .collect()
}

fn assess_logged<N>(registry: &DeviceRegistry, graph: &N, consumer: DeviceId) -> Option<NetworkBalance>
where
    N: Neighborhood + ?Sized,
{
    match assess(registry, graph, consumer) {
        Ok(balance) => Some(balance),
        Err(e) => {
            log::warn!("skipping consumer {consumer:?}: {e}");
            None
        }
    }
}
