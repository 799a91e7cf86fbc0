use std::collections::{BTreeMap, BTreeSet};

use crate::error::GraphError;
use crate::graph::{NodeId, SettlementGraph};
use crate::grid::CellPos;

use super::RoadStats;

#[derive(Debug, Clone, Copy)]
struct Closest {
    node: NodeId,
    distance: f64,
}

/// Bridges every node outside `connected` into the connected component.
///
/// Nodes already reachable through existing links are absorbed without a new
/// link. The rest are bridged one at a time, always the globally closest
/// (unconnected, connected) pair first; after each bridge, the island the
/// bridged node belongs to is absorbed by traversal. Cached closest distances
/// are only compared against nodes that just joined.
pub(super) fn connect_components(
    graph: &mut SettlementGraph,
    connected: &mut BTreeSet<NodeId>,
    stats: &mut RoadStats,
) -> Result<(), GraphError> {
    let mut unconnected: BTreeSet<NodeId> =
        graph.nodes().filter(|node| !connected.contains(node)).collect();
    if unconnected.is_empty() {
        return Ok(());
    }
    if connected.is_empty() {
        if let Some(root) = unconnected.pop_first() {
            connected.insert(root);
        }
    }

    let sources: Vec<NodeId> = connected.iter().copied().collect();
    let reached = absorb(graph, &sources, &mut unconnected, connected)?;
    stats.absorbed += reached.len();

    let positions = graph.positions().to_vec();
    let mut cache: BTreeMap<NodeId, Closest> = BTreeMap::new();
    for &node in &unconnected {
        if let Some(closest) = nearest(&positions, node, connected.iter().copied()) {
            cache.insert(node, closest);
        }
    }

    while let Some((node, target)) = pick_closest(&cache) {
        graph.link(target.node, node)?;
        stats.bridges += 1;
        tracing::debug!(
            target: "landmass::roads",
            node = node.raw(),
            connected_to = target.node.raw(),
            distance = target.distance,
            "bridged disconnected node"
        );

        unconnected.remove(&node);
        cache.remove(&node);
        connected.insert(node);

        let mut joined = vec![node];
        let island = absorb(graph, &[node], &mut unconnected, connected)?;
        stats.absorbed += island.len();
        for absorbed in island {
            cache.remove(&absorbed);
            joined.push(absorbed);
        }

        for (&pending, closest) in cache.iter_mut() {
            if let Some(candidate) = nearest(&positions, pending, joined.iter().copied()) {
                if candidate.distance < closest.distance {
                    *closest = candidate;
                }
            }
        }
    }

    Ok(())
}

/// Moves every unconnected node reachable from `sources` into `connected`,
/// returning the ones moved.
fn absorb(
    graph: &SettlementGraph,
    sources: &[NodeId],
    unconnected: &mut BTreeSet<NodeId>,
    connected: &mut BTreeSet<NodeId>,
) -> Result<Vec<NodeId>, GraphError> {
    let reached = graph.reachable_from(sources, |node| unconnected.contains(&node))?;
    let moved: Vec<NodeId> = reached
        .into_iter()
        .filter(|node| unconnected.contains(node))
        .collect();
    for node in &moved {
        unconnected.remove(node);
        connected.insert(*node);
    }
    Ok(moved)
}

fn nearest(
    positions: &[CellPos],
    from: NodeId,
    pool: impl Iterator<Item = NodeId>,
) -> Option<Closest> {
    let origin = positions[from.raw() as usize];
    let mut best: Option<Closest> = None;
    for node in pool {
        let distance = origin.distance(positions[node.raw() as usize]);
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(Closest { node, distance });
        }
    }
    best
}

fn pick_closest(cache: &BTreeMap<NodeId, Closest>) -> Option<(NodeId, Closest)> {
    let mut best: Option<(NodeId, Closest)> = None;
    for (&node, &closest) in cache {
        if best.map_or(true, |(_, b)| closest.distance < b.distance) {
            best = Some((node, closest));
        }
    }
    best
}
