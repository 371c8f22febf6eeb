//! Transitive reachability over direct adjacency.
//!
//! The walk expands every device with that device's own kind rule, so the
//! relation followed is path-dependent: a generator reached through a
//! transmitter expands only toward transmitters, even when the walk started
//! at a consumer. Reachability is therefore the forward closure of the
//! directed adjacency relation from the origin, not a symmetric component.

use std::collections::BTreeSet;

use gridlink_core::id::DeviceId;

use crate::adjacency::Neighborhood;

/// Every device reachable from `origin` through direct adjacency, excluding
/// `origin` itself.
///
/// Depth-first over an explicit stack with one visited set shared by the
/// whole walk, so each device is expanded at most once and cycles or
/// redundant paths cannot inflate the result. An unknown origin reaches
/// nothing.
pub fn reachable_from<N>(graph: &N, origin: DeviceId) -> BTreeSet<DeviceId>
where
    N: Neighborhood + ?Sized,
{
    let mut visited = BTreeSet::from([origin]);
    let mut reached = BTreeSet::new();
    let mut stack = vec![origin];

    while let Some(current) = stack.pop() {
        for &next in graph.adjacents(current).iter() {
            if visited.insert(next) {
                reached.insert(next);
                stack.push(next);
            }
        }
    }

    log::trace!("walk from {origin:?} reached {} devices", reached.len());
    reached
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::ProximityGraph;
    use gridlink_core::registry::DeviceRegistry;
    use gridlink_core::test_utils::*;

    // -----------------------------------------------------------------------
    // Basic shapes
    // -----------------------------------------------------------------------

    #[test]
    fn isolated_device_reaches_nothing() {
        let mut reg = DeviceRegistry::new();
        let c = add_consumer(&mut reg, at(0.0), 10.0, 1);
        add_consumer(&mut reg, at(1.0), 10.0, 1);
        assert!(reachable_from(&ProximityGraph::new(&reg), c).is_empty());
    }

    #[test]
    fn unknown_origin_reaches_nothing() {
        let mut reg = DeviceRegistry::new();
        let t = add_transmitter(&mut reg, at(0.0), 10.0);
        add_transmitter(&mut reg, at(1.0), 10.0);
        reg.despawn(t).unwrap();
        assert!(reachable_from(&ProximityGraph::new(&reg), t).is_empty());
    }

    #[test]
    fn chain_is_followed_to_the_end() {
        let mut reg = DeviceRegistry::new();
        let (g, line, c) = build_transmission_line(&mut reg, 4, 10.0, 10, 5);
        let reached = reachable_from(&ProximityGraph::new(&reg), c);

        let mut expected: BTreeSet<DeviceId> = line.into_iter().collect();
        expected.insert(g);
        assert_eq!(reached, expected);
    }

    #[test]
    fn origin_is_never_included() {
        let mut reg = DeviceRegistry::new();
        let (_, line, _) = build_transmission_line(&mut reg, 3, 10.0, 10, 5);
        let graph = ProximityGraph::new(&reg);
        for (id, _) in reg.iter() {
            assert!(!reachable_from(&graph, id).contains(&id));
        }
        // A middle transmitter links both ways and still excludes itself.
        assert!(!reachable_from(&graph, line[1]).contains(&line[1]));
    }

    // -----------------------------------------------------------------------
    // Cycles and redundant paths
    // -----------------------------------------------------------------------

    #[test]
    fn triangle_of_transmitters_terminates() {
        let mut reg = DeviceRegistry::new();
        let a = add_transmitter(&mut reg, pos(0.0, 0.0, 0.0), 10.0);
        let b = add_transmitter(&mut reg, pos(4.0, 0.0, 0.0), 10.0);
        let c = add_transmitter(&mut reg, pos(2.0, 3.0, 0.0), 10.0);

        let reached = reachable_from(&ProximityGraph::new(&reg), a);
        assert_eq!(reached, BTreeSet::from([b, c]));
    }

    #[test]
    fn redundant_paths_reach_generator_once() {
        let mut reg = DeviceRegistry::new();
        let c = add_consumer(&mut reg, at(0.0), 20.0, 5);
        let t1 = add_transmitter(&mut reg, pos(5.0, 3.0, 0.0), 20.0);
        let t2 = add_transmitter(&mut reg, pos(5.0, -3.0, 0.0), 20.0);
        let g = add_generator(&mut reg, at(10.0), 20.0, 10);

        let reached = reachable_from(&ProximityGraph::new(&reg), c);
        assert_eq!(reached, BTreeSet::from([t1, t2, g]));
    }

    // -----------------------------------------------------------------------
    // Path dependence
    // -----------------------------------------------------------------------

    #[test]
    fn zero_range_device_is_reached_but_reaches_little() {
        let mut reg = DeviceRegistry::new();
        let t_short = add_transmitter(&mut reg, at(0.0), 0.0);
        let t_long = add_transmitter(&mut reg, at(5.0), 10.0);
        let graph = ProximityGraph::new(&reg);

        // The zero-range transmitter reaches out using t_long's range.
        assert_eq!(reachable_from(&graph, t_short), BTreeSet::from([t_long]));
        // t_long cannot link back: t_short's own range covers nothing.
        assert!(reachable_from(&graph, t_long).is_empty());
    }

    #[test]
    fn each_hop_uses_its_own_rule() {
        let mut reg = DeviceRegistry::new();
        let c = add_consumer(&mut reg, at(0.0), 20.0, 1);
        let t = add_transmitter(&mut reg, at(5.0), 6.0);
        let g = add_generator(&mut reg, at(10.0), 6.0, 1);
        // Out of t's reach, but inside the generator's hop.
        let t2 = add_transmitter(&mut reg, at(16.0), 7.0);
        // Within its own range of g, but generators never link to consumers.
        let c2 = add_consumer(&mut reg, pos(10.0, 3.0, 0.0), 3.5, 1);

        let graph = ProximityGraph::new(&reg);
        assert_eq!(reachable_from(&graph, c), BTreeSet::from([t, g, t2]));

        // From c2's side the relation differs: c2 expands toward t using
        // t's range and joins the same network.
        let from_c2 = reachable_from(&graph, c2);
        assert!(from_c2.contains(&t));
        assert!(from_c2.contains(&g));
        assert!(from_c2.contains(&c));
    }

    #[test]
    fn snapshot_and_on_demand_agree() {
        let mut reg = DeviceRegistry::new();
        build_grid_town(&mut reg, 6, 4);
        let graph = ProximityGraph::new(&reg);
        let snapshot = graph.snapshot();
        for (id, _) in reg.iter() {
            assert_eq!(reachable_from(&graph, id), reachable_from(&snapshot, id));
        }
    }
}
