//! State shared by the mesh-derived graphs
//!
//! Nodes are indices into a position table. Edges come from an [`EdgeMap`];
//! obstacles are arbitrary line-intersectable shapes that block every edge
//! whose straight segment they intersect while blocking.

use wayfind_math::{LineIntersectable, Segment, Vec3};
use wayfind_structures::{BitSet, SlotKey, SlotMap};

use crate::config::AStarConfig;
use crate::error::{NavError, Result};
use crate::exploration::{Exploration, FrontierCandidates};
use crate::mesh::EdgeMap;

/// A shape registered as an obstacle on a mesh graph
#[derive(Debug)]
pub struct MeshObstacle {
    shape: Box<dyn LineIntersectable>,
    blocking: bool,
}

impl MeshObstacle {
    pub fn shape(&self) -> &dyn LineIntersectable {
        self.shape.as_ref()
    }

    pub fn is_blocking(&self) -> bool {
        self.blocking
    }
}

/// Stable handle of a mesh obstacle
pub type ObstacleKey = SlotKey<MeshObstacle>;

#[derive(Debug)]
pub(crate) struct SpatialCore {
    pub(crate) positions: Vec<Vec3>,
    pub(crate) edges: EdgeMap,
    obstacles: SlotMap<MeshObstacle>,
    seen: BitSet,
    candidates: FrontierCandidates<usize>,
    pub(crate) perfect_memory: bool,
    pub(crate) astar: AStarConfig,
}

impl SpatialCore {
    pub(crate) fn new(positions: Vec<Vec3>, edges: EdgeMap, astar: AStarConfig) -> Self {
        let count = positions.len();
        Self {
            positions,
            edges,
            obstacles: SlotMap::new(),
            seen: BitSet::with_capacity(count),
            candidates: FrontierCandidates::new(),
            perfect_memory: false,
            astar,
        }
    }

    pub(crate) fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub(crate) fn check(&self, id: usize) -> Result<()> {
        if id < self.positions.len() {
            Ok(())
        } else {
            Err(NavError::NodeOutOfRange {
                node: id,
                count: self.positions.len(),
            })
        }
    }

    /// Position of a node, panicking on an unknown one
    pub(crate) fn position(&self, id: usize) -> Vec3 {
        self.positions[id]
    }

    pub(crate) fn physical_neighbours(&self, id: usize) -> Vec<usize> {
        assert!(
            id < self.positions.len(),
            "node {} out of range ({} nodes)",
            id,
            self.positions.len()
        );
        self.edges.neighbours(id).collect()
    }

    pub(crate) fn neighbours(&self, id: usize) -> Vec<usize> {
        let mut out = self.physical_neighbours(id);
        if !self.perfect_memory {
            out.retain(|&n| self.seen.contains(n));
        }
        out
    }

    pub(crate) fn euclidean(&self, from: usize, to: usize) -> f32 {
        self.position(from).distance(self.position(to))
    }

    /// Whether any blocking obstacle intersects the segment
    pub(crate) fn is_obstructed(&self, segment: &Segment) -> bool {
        self.obstacles
            .values()
            .any(|o| o.blocking && o.shape.intersects(segment))
    }

    pub(crate) fn has_line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        !self.is_obstructed(&Segment::new(from, to))
    }

    /// Euclidean distance, or infinity when the straight line is obstructed
    pub(crate) fn distance(&self, from: usize, to: usize) -> f32 {
        let (a, b) = (self.position(from), self.position(to));
        if self.is_obstructed(&Segment::new(a, b)) {
            f32::INFINITY
        } else {
            a.distance(b)
        }
    }

    pub(crate) fn is_node_blocked(&self, id: usize) -> bool {
        let p = self.position(id);
        self.is_obstructed(&Segment::new(p, p))
    }

    /// Closest node to `point` whose straight line to it is unobstructed
    pub(crate) fn nearest_unblocked(&self, point: Vec3) -> Option<usize> {
        let mut nearest = None;
        let mut best = f32::INFINITY;
        for (id, &p) in self.positions.iter().enumerate() {
            let d = point.distance_squared(p);
            if d < best && self.has_line_of_sight(point, p) {
                best = d;
                nearest = Some(id);
            }
        }
        nearest
    }

    pub(crate) fn add_obstacle(
        &mut self,
        shape: Box<dyn LineIntersectable>,
        blocking: bool,
    ) -> ObstacleKey {
        self.obstacles.insert(MeshObstacle { shape, blocking })
    }

    pub(crate) fn remove_obstacle(
        &mut self,
        key: ObstacleKey,
    ) -> Result<Box<dyn LineIntersectable>> {
        self.obstacles
            .remove(key)
            .map(|o| o.shape)
            .ok_or(NavError::UnknownObstacle)
    }

    pub(crate) fn is_blocking(&self, key: ObstacleKey) -> Result<bool> {
        self.obstacles
            .get(key)
            .map(|o| o.blocking)
            .ok_or(NavError::UnknownObstacle)
    }

    pub(crate) fn set_blocking_state(&mut self, key: ObstacleKey, blocking: bool) -> Result<()> {
        let obstacle = self.obstacles.get_mut(key).ok_or(NavError::UnknownObstacle)?;
        obstacle.blocking = blocking;
        Ok(())
    }

    pub(crate) fn obstacles(&self) -> impl Iterator<Item = (ObstacleKey, &MeshObstacle)> {
        self.obstacles.iter()
    }

    pub(crate) fn has_been_seen(&self, id: usize) -> bool {
        self.seen.contains(id)
    }

    pub(crate) fn mark_as_seen(&mut self, id: usize) -> Result<()> {
        self.check(id)?;
        self.seen.insert(id);
        self.candidates.insert(id);
        Ok(())
    }

    pub(crate) fn wipe_out_memory(&mut self) {
        self.seen.clear();
        self.candidates.clear();
    }

    pub(crate) fn proximity(&self, a: usize, b: usize) -> f32 {
        self.position(a).distance_squared(self.position(b))
    }
}

/// Frontier of a graph built on a [`SpatialCore`]. The candidates are moved
/// out of the core while the graph is consulted, then put back pruned.
pub(crate) fn spatial_frontier<G>(
    graph: &mut G,
    core: impl Fn(&mut G) -> &mut SpatialCore,
) -> Vec<usize>
where
    G: Exploration<NodeId = usize>,
{
    if graph.perfect_memory() {
        return Vec::new();
    }
    let mut candidates = std::mem::take(&mut core(graph).candidates);
    let frontier = candidates.prune(|n| graph.is_frontier(n));
    core(graph).candidates = candidates;
    frontier
}
