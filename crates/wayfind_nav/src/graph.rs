//! Graph capabilities consumed by the pathfinder

use core::fmt;
use core::hash::Hash;

use crate::astar::AStar;
use crate::config::AStarConfig;

/// What any pathfinder needs from a graph
///
/// Queries panic when handed a node the graph does not know; asking about
/// an unknown node means the caller and the graph are out of sync.
pub trait Navigable {
    /// Node identifier. Two nodes are the same node iff their ids are equal.
    type NodeId: Copy + Eq + Hash + Ord + fmt::Debug;

    /// Adjacent nodes that are currently visible. Never contains `id` itself.
    fn neighbours(&self, id: Self::NodeId) -> Vec<Self::NodeId>;

    /// Estimated travel cost, never negative
    fn heuristic(&self, from: Self::NodeId, to: Self::NodeId) -> f32;

    /// Cost of the direct edge between two adjacent nodes.
    /// `f32::INFINITY` when the edge is currently blocked.
    fn distance(&self, from: Self::NodeId, to: Self::NodeId) -> f32;
}

/// Graphs that answer path queries themselves
pub trait PathFinding: Navigable {
    /// Search settings used by [`PathFinding::find_path`]
    fn astar_config(&self) -> AStarConfig {
        AStarConfig::default()
    }

    /// Path from `from` to `to` (both inclusive), or `None` when there is none
    fn find_path(&self, from: Self::NodeId, to: Self::NodeId) -> Option<Vec<Self::NodeId>> {
        AStar::new(self.astar_config()).find_path(self, from, to)
    }

    /// Whether `to` can currently be reached from `from`
    fn is_reachable_from(&self, from: Self::NodeId, to: Self::NodeId) -> bool {
        self.find_path(from, to).is_some()
    }
}

/// Sum of edge distances along a path (0 for a singleton path)
pub fn path_cost<G: Navigable + ?Sized>(graph: &G, path: &[G::NodeId]) -> f32 {
    path.windows(2).map(|w| graph.distance(w[0], w[1])).sum()
}
