//! Mesh dual graph
//!
//! One node per mesh face, placed at the average of the face's corners.
//! Two nodes are adjacent when their faces share an edge.

use wayfind_math::{LineIntersectable, Vec3};

use crate::config::AStarConfig;
use crate::error::{NavError, Result};
use crate::exploration::Exploration;
use crate::graph::{Navigable, PathFinding};
use crate::mesh::{Edge, EdgeMap, Face, Mesh};
use crate::obstacle::ObstacleRegistry;
use crate::spatial::{spatial_frontier, MeshObstacle, ObstacleKey, SpatialCore};

/// Navigation graph over the faces of a mesh
#[derive(Debug)]
pub struct MeshDualGraph {
    core: SpatialCore,
    faces: Vec<Face>,
}

/// Every face corner must index a mesh vertex
pub(crate) fn validate_faces(mesh: &Mesh) -> Result<()> {
    let count = mesh.vertices.len();
    for face in &mesh.faces {
        if let Some(&node) = face.vertices().iter().find(|&&v| v >= count) {
            return Err(NavError::NodeOutOfRange { node, count });
        }
    }
    Ok(())
}

impl MeshDualGraph {
    /// Build the dual graph of a mesh with default search settings
    pub fn from_mesh(mesh: &Mesh) -> Result<Self> {
        Self::with_config(mesh, AStarConfig::default())
    }

    pub fn with_config(mesh: &Mesh, astar: AStarConfig) -> Result<Self> {
        validate_faces(mesh)?;

        let positions: Vec<Vec3> = mesh.faces.iter().map(|f| f.centre(&mesh.vertices)).collect();

        let mut edges = EdgeMap::new();
        for (i, a) in mesh.faces.iter().enumerate() {
            for (j, b) in mesh.faces.iter().enumerate().skip(i + 1) {
                if a.is_connected(b) {
                    edges.insert(Edge::new(i, j)?);
                }
            }
        }

        log::debug!(
            "dual graph: {} faces, {} adjacencies",
            positions.len(),
            edges.edges().count()
        );

        Ok(Self {
            core: SpatialCore::new(positions, edges, astar),
            faces: mesh.faces.clone(),
        })
    }

    pub fn node_count(&self) -> usize {
        self.core.node_count()
    }

    /// Position of a node
    pub fn position(&self, id: usize) -> Vec3 {
        self.core.position(id)
    }

    /// The face a node stands for
    pub fn face(&self, id: usize) -> &Face {
        &self.faces[id]
    }

    /// Register an obstacle that blocks from the start
    pub fn add_obstacle_blocking(
        &mut self,
        shape: impl LineIntersectable + 'static,
    ) -> ObstacleKey {
        self.core.add_obstacle(Box::new(shape), true)
    }

    pub fn obstacles(&self) -> impl Iterator<Item = (ObstacleKey, &MeshObstacle)> {
        self.core.obstacles()
    }

    pub fn set_astar_config(&mut self, astar: AStarConfig) {
        self.core.astar = astar;
    }
}

impl Navigable for MeshDualGraph {
    type NodeId = usize;

    fn neighbours(&self, id: usize) -> Vec<usize> {
        self.core.neighbours(id)
    }

    fn heuristic(&self, from: usize, to: usize) -> f32 {
        self.core.euclidean(from, to)
    }

    fn distance(&self, from: usize, to: usize) -> f32 {
        self.core.distance(from, to)
    }
}

impl PathFinding for MeshDualGraph {
    fn astar_config(&self) -> AStarConfig {
        self.core.astar
    }
}

impl ObstacleRegistry for MeshDualGraph {
    type Obstacle = Box<dyn LineIntersectable>;
    type ObstacleKey = ObstacleKey;

    /// Registers the obstacle as non-blocking
    fn add_obstacle(&mut self, obstacle: Self::Obstacle) -> Result<ObstacleKey> {
        Ok(self.core.add_obstacle(obstacle, false))
    }

    fn remove_obstacle(&mut self, key: ObstacleKey) -> Result<Self::Obstacle> {
        self.core.remove_obstacle(key)
    }

    fn is_blocking(&self, key: ObstacleKey) -> Result<bool> {
        self.core.is_blocking(key)
    }

    fn set_blocking_state(&mut self, key: ObstacleKey, blocking: bool) -> Result<()> {
        self.core.set_blocking_state(key, blocking)
    }

    fn is_node_blocked(&self, id: usize) -> bool {
        self.core.is_node_blocked(id)
    }
}

impl Exploration for MeshDualGraph {
    fn physical_neighbours(&self, id: usize) -> Vec<usize> {
        self.core.physical_neighbours(id)
    }

    fn check_node(&self, id: usize) -> Result<()> {
        self.core.check(id)
    }

    fn has_been_seen(&self, id: usize) -> bool {
        self.core.has_been_seen(id)
    }

    fn mark_as_seen(&mut self, id: usize) -> Result<()> {
        self.core.mark_as_seen(id)
    }

    fn frontier(&mut self) -> Vec<usize> {
        spatial_frontier(self, |g| &mut g.core)
    }

    fn proximity(&self, a: usize, b: usize) -> f32 {
        self.core.proximity(a, b)
    }

    fn perfect_memory(&self) -> bool {
        self.core.perfect_memory
    }

    fn set_perfect_memory(&mut self, enabled: bool) {
        self.core.perfect_memory = enabled;
    }

    fn wipe_out_memory(&mut self) {
        self.core.wipe_out_memory();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use wayfind_math::AABB;

    /// Three unit squares in a row along x, in the y = 0 plane
    fn strip() -> Mesh {
        let mut vertices = Vec::new();
        for x in 0..4 {
            vertices.push(Vec3::new(x as f32, 0.0, 0.0));
            vertices.push(Vec3::new(x as f32, 0.0, 1.0));
        }
        let mut mesh = Mesh::new(vertices);
        for x in 0..3 {
            let b = 2 * x;
            mesh.add_face(&[b, b + 2, b + 3, b + 1]).unwrap();
        }
        mesh
    }

    #[test]
    fn test_dual_topology() {
        let g = MeshDualGraph::from_mesh(&strip()).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.physical_neighbours(1), vec![0, 2]);
        assert_eq!(g.physical_neighbours(0), vec![1]);
        assert_eq!(g.position(0), Vec3::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn test_dual_path_needs_seen_nodes() {
        let mut g = MeshDualGraph::from_mesh(&strip()).unwrap();
        assert_eq!(g.find_path(0, 2), None);
        g.mark_all_as_seen([0, 1, 2]).unwrap();
        assert_eq!(g.find_path(0, 2), Some(vec![0, 1, 2]));
        assert_relative_eq!(g.distance(0, 1), 1.0);
    }

    #[test]
    fn test_dual_obstacle_blocks_edge() {
        let mut g = MeshDualGraph::from_mesh(&strip()).unwrap();
        g.set_perfect_memory(true);
        let wall = AABB::new(Vec3::new(1.9, -1.0, 0.0), Vec3::new(2.1, 1.0, 1.0));
        let key = g.add_obstacle(Box::new(wall)).unwrap();
        assert!(!g.is_blocking(key).unwrap());
        assert_eq!(g.find_path(0, 2), Some(vec![0, 1, 2]));

        g.toggle_blocking_on(key).unwrap();
        assert_eq!(g.distance(1, 2), f32::INFINITY);
        assert_relative_eq!(g.heuristic(1, 2), 1.0);
        assert_eq!(g.find_path(0, 2), None);

        g.remove_obstacle(key).unwrap();
        assert_eq!(g.is_blocking(key), Err(NavError::UnknownObstacle));
        assert!(g.find_path(0, 2).is_some());
    }

    #[test]
    fn test_dual_mark_unknown_node() {
        let mut g = MeshDualGraph::from_mesh(&strip()).unwrap();
        assert_eq!(
            g.mark_as_seen(7),
            Err(NavError::NodeOutOfRange { node: 7, count: 3 })
        );
    }

    #[test]
    fn test_dual_frontier() {
        let mut g = MeshDualGraph::from_mesh(&strip()).unwrap();
        g.mark_all_as_seen([0, 1]).unwrap();
        assert_eq!(g.frontier(), vec![1]);
        assert_eq!(g.explore(0), Some(vec![0, 1]));
        g.mark_as_seen(2).unwrap();
        assert!(g.frontier().is_empty());
        assert_eq!(g.explore(0), None);
    }
}
