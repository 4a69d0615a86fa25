//! Explicit adjacency-list graph
//!
//! For ad-hoc graphs that are not derived from a mesh or a grid.

use core::fmt;
use core::hash::Hash;
use std::collections::BTreeMap;

use crate::config::AStarConfig;
use crate::graph::{Navigable, PathFinding};

type HeuristicFn<N> = Box<dyn Fn(N, N) -> f32>;

/// Weighted graph with explicit edges and an optional heuristic
///
/// Without a heuristic function the estimate is always 0, which makes
/// every search mode except greedy behave like Dijkstra.
pub struct AdjacencyGraph<N> {
    edges: BTreeMap<N, BTreeMap<N, f32>>,
    heuristic: Option<HeuristicFn<N>>,
    astar: AStarConfig,
}

impl<N> AdjacencyGraph<N>
where
    N: Copy + Eq + Hash + Ord + fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            edges: BTreeMap::new(),
            heuristic: None,
            astar: AStarConfig::default(),
        }
    }

    /// Graph whose estimates come from `heuristic(from, to)`
    pub fn with_heuristic(heuristic: impl Fn(N, N) -> f32 + 'static) -> Self {
        Self {
            heuristic: Some(Box::new(heuristic)),
            ..Self::new()
        }
    }

    /// Set the A* settings used by `find_path`
    pub fn with_astar(mut self, astar: AStarConfig) -> Self {
        self.astar = astar;
        self
    }

    /// Register an isolated node
    pub fn add_node(&mut self, node: N) {
        self.edges.entry(node).or_default();
    }

    /// Add (or re-weight) a one-way edge. Self loops are ignored.
    pub fn add_edge(&mut self, from: N, to: N, cost: f32) {
        self.add_node(to);
        if from == to {
            self.add_node(from);
            return;
        }
        self.edges.entry(from).or_default().insert(to, cost);
    }

    /// Add an edge in both directions with the same cost
    pub fn connect(&mut self, a: N, b: N, cost: f32) {
        self.add_edge(a, b, cost);
        self.add_edge(b, a, cost);
    }

    /// Change the cost of an existing edge; `f32::INFINITY` blocks it.
    /// Returns false when the edge does not exist.
    pub fn set_cost(&mut self, from: N, to: N, cost: f32) -> bool {
        match self.edges.get_mut(&from).and_then(|out| out.get_mut(&to)) {
            Some(c) => {
                *c = cost;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, node: N) -> bool {
        self.edges.contains_key(&node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        self.edges.keys().copied()
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }
}

impl<N> Default for AdjacencyGraph<N>
where
    N: Copy + Eq + Hash + Ord + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N: fmt::Debug> fmt::Debug for AdjacencyGraph<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdjacencyGraph")
            .field("edges", &self.edges)
            .field("has_heuristic", &self.heuristic.is_some())
            .finish()
    }
}

impl<N> Navigable for AdjacencyGraph<N>
where
    N: Copy + Eq + Hash + Ord + fmt::Debug,
{
    type NodeId = N;

    fn neighbours(&self, id: N) -> Vec<N> {
        match self.edges.get(&id) {
            Some(out) => out.keys().copied().collect(),
            None => panic!("unknown node {:?}", id),
        }
    }

    fn heuristic(&self, from: N, to: N) -> f32 {
        self.heuristic.as_ref().map_or(0.0, |h| h(from, to))
    }

    fn distance(&self, from: N, to: N) -> f32 {
        self.edges
            .get(&from)
            .and_then(|out| out.get(&to))
            .copied()
            .unwrap_or(f32::NAN)
    }
}

impl<N> PathFinding for AdjacencyGraph<N>
where
    N: Copy + Eq + Hash + Ord + fmt::Debug,
{
    fn astar_config(&self) -> AStarConfig {
        self.astar
    }
}
