//! Proximity-derived direct adjacency.
//!
//! An edge from device X to candidate Y exists when Y's kind is permitted by
//! X's rule, the two are not at exactly the same position, and X lies
//! strictly inside Y's range. The candidate's range is what counts: a
//! short-range transmitter still links to a long-range generator whose range
//! covers the gap.

use std::borrow::Cow;

use gridlink_core::device::DeviceKind;
use gridlink_core::id::DeviceId;
use gridlink_core::registry::DeviceRegistry;
use slotmap::SecondaryMap;

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// Kinds a device of `kind` may link to directly.
pub fn adjacency_rule(kind: DeviceKind) -> &'static [DeviceKind] {
    match kind {
        DeviceKind::Generator => &[DeviceKind::Transmitter],
        DeviceKind::Transmitter => &[
            DeviceKind::Generator,
            DeviceKind::Transmitter,
            DeviceKind::Consumer,
        ],
        DeviceKind::Consumer => &[DeviceKind::Transmitter],
    }
}

/// Whether a device of kind `from` may link to a candidate of kind `to`.
pub fn permits(from: DeviceKind, to: DeviceKind) -> bool {
    adjacency_rule(from).contains(&to)
}

// ---------------------------------------------------------------------------
// Neighborhood seam
// ---------------------------------------------------------------------------

/// Source of direct adjacents for the reachability walk.
///
/// Implementations must return each adjacent at most once and must return an
/// empty list for a device that does not exist.
pub trait Neighborhood {
    fn adjacents(&self, device: DeviceId) -> Cow<'_, [DeviceId]>;
}

// ---------------------------------------------------------------------------
// ProximityGraph
// ---------------------------------------------------------------------------

/// Computes adjacency on demand from the current registry contents.
///
/// Every query rescans the registry, so results always reflect the positions
/// at the moment of the call.
#[derive(Debug, Clone, Copy)]
pub struct ProximityGraph<'r> {
    registry: &'r DeviceRegistry,
}

impl<'r> ProximityGraph<'r> {
    pub fn new(registry: &'r DeviceRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r DeviceRegistry {
        self.registry
    }

    /// Devices directly adjacent to `device`, in registry order.
    pub fn direct_adjacents(&self, device: DeviceId) -> Vec<DeviceId> {
        let Some(origin) = self.registry.get(device) else {
            return Vec::new();
        };
        let rule = adjacency_rule(origin.kind());
        let here = origin.position();

        self.registry
            .iter()
            .filter(|(_, candidate)| candidate.position() != here)
            .filter(|(_, candidate)| rule.contains(&candidate.kind()))
            .filter(|(_, candidate)| here.within(&candidate.position(), candidate.range()))
            .map(|(id, _)| id)
            .collect()
    }

    /// Compute every device's adjacents once, for reuse within a single tick.
    pub fn snapshot(&self) -> AdjacencySnapshot {
        let mut adjacents = SecondaryMap::with_capacity(self.registry.len());
        for (id, _) in self.registry.iter() {
            adjacents.insert(id, self.direct_adjacents(id));
        }
        AdjacencySnapshot { adjacents }
    }
}

impl Neighborhood for ProximityGraph<'_> {
    fn adjacents(&self, device: DeviceId) -> Cow<'_, [DeviceId]> {
        Cow::Owned(self.direct_adjacents(device))
    }
}

// ---------------------------------------------------------------------------
// AdjacencySnapshot
// ---------------------------------------------------------------------------

/// Direct adjacency for every device, frozen at the moment it was built.
///
/// Only valid while positions are unchanged; build a fresh one every tick.
#[derive(Debug, Clone, Default)]
pub struct AdjacencySnapshot {
    adjacents: SecondaryMap<DeviceId, Vec<DeviceId>>,
}

impl AdjacencySnapshot {
    /// Number of directed edges in the snapshot.
    pub fn edge_count(&self) -> usize {
        self.adjacents.values().map(Vec::len).sum()
    }
}

impl Neighborhood for AdjacencySnapshot {
    fn adjacents(&self, device: DeviceId) -> Cow<'_, [DeviceId]> {
        match self.adjacents.get(device) {
            Some(list) => Cow::Borrowed(list.as_slice()),
            None => Cow::Borrowed(&[]),
        }
    }
}
