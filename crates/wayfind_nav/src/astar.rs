//! A* pathfinder
//!
//! Generic over any [`Navigable`] graph. The open set is a binary heap with
//! lazy replacement: when a node's priority improves a fresh entry is pushed
//! and the old one is skipped when popped, so a node is never expanded twice
//! for the same open-set membership.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::config::{AStarConfig, SearchMode};
use crate::graph::Navigable;

/// Open-set entry. Ordered so that the heap pops the lowest priority first,
/// and among equal priorities the earliest inserted.
struct OpenEntry<N> {
    node: N,
    priority: f32,
    seq: u64,
}

impl<N> PartialEq for OpenEntry<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N> Eq for OpenEntry<N> {}

impl<N> PartialOrd for OpenEntry<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N> Ord for OpenEntry<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A* search strategy. Holds only settings; every query starts from scratch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AStar {
    config: AStarConfig,
}

impl AStar {
    /// Create a pathfinder with the given settings
    pub fn new(config: AStarConfig) -> Self {
        Self { config }
    }

    /// Pathfinder with the given search mode and no iteration cap
    pub fn with_mode(search_mode: SearchMode) -> Self {
        Self::new(AStarConfig::default().with_search_mode(search_mode))
    }

    pub fn config(&self) -> &AStarConfig {
        &self.config
    }

    fn priority(&self, dist: f32, estimate: impl FnOnce() -> f32) -> f32 {
        match self.config.search_mode {
            SearchMode::Dijkstra => dist,
            SearchMode::Greedy => estimate(),
            SearchMode::Heuristic => dist + estimate(),
        }
    }

    /// Find a path from `start` to `goal`, both inclusive.
    ///
    /// Returns `None` when the goal is unreachable or the iteration cap is
    /// exhausted; the two cases are not distinguished. The search stops at
    /// the first time the goal is popped from the open set.
    pub fn find_path<G>(
        &self,
        graph: &G,
        start: G::NodeId,
        goal: G::NodeId,
    ) -> Option<Vec<G::NodeId>>
    where
        G: Navigable + ?Sized,
    {
        let mut heap = BinaryHeap::new();
        // node -> seq of its live heap entry
        let mut open: HashMap<G::NodeId, (u64, f32)> = HashMap::new();
        let mut best: HashMap<G::NodeId, f32> = HashMap::new();
        let mut came_from: HashMap<G::NodeId, G::NodeId> = HashMap::new();
        let mut seq = 0u64;

        let seed = match self.config.search_mode {
            SearchMode::Dijkstra => 0.0,
            _ => graph.heuristic(start, goal),
        };
        heap.push(OpenEntry { node: start, priority: seed, seq });
        open.insert(start, (seq, seed));
        best.insert(start, 0.0);

        let mut iterations = 0usize;

        while let Some(OpenEntry { node: current, seq: entry_seq, .. }) = heap.pop() {
            match open.get(&current) {
                Some(&(live, _)) if live == entry_seq => {
                    open.remove(&current);
                }
                _ => continue,
            }

            if current == goal {
                let path = reconstruct(&came_from, start, goal);
                log::trace!(
                    "A* found path of {} nodes after {} expansions",
                    path.len(),
                    iterations
                );
                return Some(path);
            }

            iterations += 1;
            if let Some(max) = self.config.max_iterations {
                if iterations > max {
                    log::debug!("A* gave up after {} expansions", max);
                    return None;
                }
            }

            let dist_to_current = best[&current];

            for next in graph.neighbours(current) {
                let edge = graph.distance(current, next);
                if edge.is_nan() || edge == f32::INFINITY {
                    continue;
                }
                let dist_to_next = dist_to_current + edge.max(0.0);
                if dist_to_next == f32::INFINITY {
                    continue;
                }

                let improves = best.get(&next).map_or(true, |&known| dist_to_next < known);
                if !improves {
                    continue;
                }
                best.insert(next, dist_to_next);
                came_from.insert(next, current);

                let priority = self.priority(dist_to_next, || graph.heuristic(next, goal));
                let reinsert = match open.get(&next) {
                    Some(&(_, queued)) => queued > priority,
                    None => true,
                };
                if reinsert {
                    seq += 1;
                    heap.push(OpenEntry { node: next, priority, seq });
                    open.insert(next, (seq, priority));
                }
            }
        }

        log::debug!("A* exhausted the open set after {} expansions, no path", iterations);
        None
    }
}

fn reconstruct<N>(came_from: &HashMap<N, N>, start: N, goal: N) -> Vec<N>
where
    N: Copy + Eq + std::hash::Hash,
{
    let mut path = vec![goal];
    let mut node = goal;
    while node != start {
        match came_from.get(&node) {
            Some(&prev) => {
                path.push(prev);
                node = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Find a path with default settings (A* with heuristic, no iteration cap)
pub fn find_path<G>(graph: &G, start: G::NodeId, goal: G::NodeId) -> Option<Vec<G::NodeId>>
where
    G: Navigable + ?Sized,
{
    AStar::default().find_path(graph, start, goal)
}
