//! Memory-based navigation and exploration
//!
//! A graph remembers which nodes have been seen. Unless perfect memory is
//! on, `neighbours` only reports seen nodes, so paths can only run over
//! explored ground. Frontier nodes are seen nodes that still have an
//! unexplored physical neighbour.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::graph::PathFinding;

/// Exploration capability
pub trait Exploration: PathFinding {
    /// Adjacent nodes regardless of what has been seen
    fn physical_neighbours(&self, id: Self::NodeId) -> Vec<Self::NodeId>;

    /// `Ok` when the node belongs to the graph, else the graph's own
    /// out-of-range error
    fn check_node(&self, id: Self::NodeId) -> Result<()>;

    /// Whether the node has been seen. Perfect memory does not affect this.
    fn has_been_seen(&self, id: Self::NodeId) -> bool;

    /// Remember the node as seen
    fn mark_as_seen(&mut self, id: Self::NodeId) -> Result<()>;

    /// Remember several nodes as seen, stopping at the first unknown one
    fn mark_all_as_seen<I>(&mut self, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = Self::NodeId>,
        Self: Sized,
    {
        for id in ids {
            self.mark_as_seen(id)?;
        }
        Ok(())
    }

    /// Whether a node has fewer visible than physical neighbours
    fn is_frontier(&self, id: Self::NodeId) -> bool {
        self.neighbours(id).len() < self.physical_neighbours(id).len()
    }

    /// Current frontier nodes. Prunes candidates proven not to be frontier.
    fn frontier(&mut self) -> Vec<Self::NodeId>;

    /// Squared straight-line distance, used to rank frontier candidates
    fn proximity(&self, a: Self::NodeId, b: Self::NodeId) -> f32;

    /// Path from `start` to the reachable frontier node nearest to it
    fn explore(&mut self, start: Self::NodeId) -> Option<Vec<Self::NodeId>> {
        self.explore_towards(start, start)
    }

    /// Path from `start` to a reachable frontier node, trying the frontier
    /// nodes nearest to `towards` first
    fn explore_towards(
        &mut self,
        start: Self::NodeId,
        towards: Self::NodeId,
    ) -> Option<Vec<Self::NodeId>> {
        let frontier = self.frontier();
        rank_by(frontier, |n| self.proximity(n, towards))
            .into_iter()
            .find_map(|candidate| self.find_path(start, candidate))
    }

    /// Whether visibility filtering is bypassed
    fn perfect_memory(&self) -> bool;

    /// Turn visibility filtering off (`true`) or back on
    fn set_perfect_memory(&mut self, enabled: bool);

    /// Forget every seen node
    fn wipe_out_memory(&mut self);
}

/// Stable sort by an `f32` key
pub(crate) fn rank_by<N: Copy>(nodes: Vec<N>, mut key: impl FnMut(N) -> f32) -> Vec<N> {
    let mut keyed: Vec<(f32, N)> = nodes.into_iter().map(|n| (key(n), n)).collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, n)| n).collect()
}

/// Nodes that may be frontier. Grows on every `mark_as_seen`, shrinks
/// when a candidate is found not to be frontier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierCandidates<N: Ord> {
    nodes: BTreeSet<N>,
}

impl<N: Ord> Default for FrontierCandidates<N> {
    fn default() -> Self {
        Self { nodes: BTreeSet::new() }
    }
}

impl<N: Ord + Copy> FrontierCandidates<N> {
    pub fn new() -> Self {
        Self { nodes: BTreeSet::new() }
    }

    pub fn insert(&mut self, node: N) {
        self.nodes.insert(node);
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: N) -> bool {
        self.nodes.contains(&node)
    }

    /// Keep and return the candidates satisfying `is_frontier`, drop the rest
    pub fn prune(&mut self, mut is_frontier: impl FnMut(N) -> bool) -> Vec<N> {
        let mut frontier = Vec::new();
        self.nodes.retain(|&n| {
            let keep = is_frontier(n);
            if keep {
                frontier.push(n);
            }
            keep
        });
        frontier
    }
}
