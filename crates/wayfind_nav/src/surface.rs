//! Surface navigation graph
//!
//! Nodes are the mesh's own vertices (face corners) plus one synthetic
//! centre node per sufficiently large face. Corners keep the mesh's edges;
//! each centre is linked to the corners of its face and to the centres of
//! faces sharing an edge with it.
//!
//! The heuristic can be discounted to favour routes over face centres or
//! along the mesh border. Edge costs are always plain Euclidean distance.

use wayfind_math::{LineIntersectable, Vec3};

use crate::config::{SurfaceConfig, TravelPreference};
use crate::dual::validate_faces;
use crate::error::Result;
use crate::exploration::Exploration;
use crate::graph::{Navigable, PathFinding};
use crate::mesh::{Edge, Face, Mesh};
use crate::obstacle::ObstacleRegistry;
use crate::spatial::{spatial_frontier, MeshObstacle, ObstacleKey, SpatialCore};

/// Heuristic multiplier applied to preferred vertex classes
pub const PREFERENCE_DISCOUNT: f32 = 0.8;

/// Classification of a surface graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexType {
    /// Endpoint of an edge that belongs to exactly one face
    Border,
    /// Synthetic face-centre node
    Centre,
    Other,
}

/// Navigation graph over the corners and centres of a mesh
#[derive(Debug)]
pub struct SurfaceGraph {
    core: SpatialCore,
    faces: Vec<Face>,
    vertex_types: Vec<VertexType>,
    face_centres: Vec<Option<usize>>,
    corner_count: usize,
    config: SurfaceConfig,
}

impl SurfaceGraph {
    /// Build with default settings
    pub fn from_mesh(mesh: &Mesh) -> Result<Self> {
        Self::with_config(mesh, SurfaceConfig::default())
    }

    pub fn with_config(mesh: &Mesh, config: SurfaceConfig) -> Result<Self> {
        validate_faces(mesh)?;

        let corner_count = mesh.vertices.len();
        let mut positions = mesh.vertices.clone();
        let mut edges = mesh.edge_map();

        let mut vertex_types = vec![VertexType::Other; corner_count];
        for &edge in &mesh.edges {
            if mesh.face_membership(edge) == 1 {
                vertex_types[edge.i()] = VertexType::Border;
                vertex_types[edge.j()] = VertexType::Border;
            }
        }

        let mut face_centres = Vec::with_capacity(mesh.faces.len());
        for face in &mesh.faces {
            if face.area(&mesh.vertices) < config.centre_area_threshold {
                face_centres.push(None);
                continue;
            }
            let centre = positions.len();
            positions.push(face.centroid(&mesh.vertices));
            vertex_types.push(VertexType::Centre);
            for &corner in face.vertices() {
                edges.insert(Edge::new(corner, centre)?);
            }
            face_centres.push(Some(centre));
        }

        for (i, a) in mesh.faces.iter().enumerate() {
            for (j, b) in mesh.faces.iter().enumerate().take(i) {
                if let (Some(ca), Some(cb)) = (face_centres[i], face_centres[j]) {
                    if a.is_connected(b) {
                        edges.insert(Edge::new(ca, cb)?);
                    }
                }
            }
        }

        log::debug!(
            "surface graph: {} corners, {} centres",
            corner_count,
            positions.len() - corner_count
        );

        Ok(Self {
            core: SpatialCore::new(positions, edges, config.astar),
            faces: mesh.faces.clone(),
            vertex_types,
            face_centres,
            corner_count,
            config,
        })
    }

    pub fn node_count(&self) -> usize {
        self.core.node_count()
    }

    /// Number of nodes that are mesh vertices; centres come after them
    pub fn corner_count(&self) -> usize {
        self.corner_count
    }

    pub fn position(&self, id: usize) -> Vec3 {
        self.core.position(id)
    }

    pub fn vertex_type(&self, id: usize) -> VertexType {
        self.vertex_types[id]
    }

    /// Centre node of a face, if it has one
    pub fn face_centre(&self, face: usize) -> Option<usize> {
        self.face_centres.get(face).copied().flatten()
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn set_travel_preference(&mut self, preference: TravelPreference) {
        self.config.travel_preference = preference;
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

    /// Node of the first face within `face_threshold` of `point` that is
    /// closest to `point` with an unobstructed line of sight. Faces whose
    /// nodes are all hidden behind obstacles are skipped.
    ///
    /// Whether the node has been seen is not considered.
    pub fn nearest_reachable_vertex(&self, point: Vec3, face_threshold: f32) -> Option<usize> {
        let corners = &self.core.positions[..self.corner_count];
        for (index, face) in self.faces.iter().enumerate() {
            if face.distance_from_point(point, corners) > face_threshold {
                continue;
            }
            let nearest = face
                .vertices()
                .iter()
                .copied()
                .chain(self.face_centres[index])
                .filter(|&v| self.core.has_line_of_sight(point, self.position(v)))
                .min_by(|&a, &b| {
                    point
                        .distance_squared(self.position(a))
                        .total_cmp(&point.distance_squared(self.position(b)))
                });
            if nearest.is_some() {
                return nearest;
            }
        }
        None
    }

    /// Node closest to `point` over the whole graph whose straight line to
    /// `point` is unobstructed
    pub fn nearest_unblocked_vertex(&self, point: Vec3) -> Option<usize> {
        self.core.nearest_unblocked(point)
    }

    /// Path between the nodes anchoring two arbitrary positions.
    ///
    /// Getting from `start` to the first node, and from the last node to
    /// `goal`, is left to the caller.
    pub fn find_path_between(
        &self,
        start: Vec3,
        goal: Vec3,
        face_threshold: f32,
    ) -> Option<Vec<usize>> {
        let from = self.nearest_reachable_vertex(start, face_threshold)?;
        let to = self.nearest_reachable_vertex(goal, face_threshold)?;
        self.find_path(from, to)
    }
}

impl Navigable for SurfaceGraph {
    type NodeId = usize;

    fn neighbours(&self, id: usize) -> Vec<usize> {
        self.core.neighbours(id)
    }

    fn heuristic(&self, from: usize, to: usize) -> f32 {
        let d = self.core.euclidean(from, to);
        let discounted = match self.config.travel_preference {
            TravelPreference::PreferCentre => self.vertex_types[from] == VertexType::Centre,
            TravelPreference::PreferBorder => self.vertex_types[to] == VertexType::Border,
            TravelPreference::NoPreference => false,
        };
        if discounted {
            d * PREFERENCE_DISCOUNT
        } else {
            d
        }
    }

    fn distance(&self, from: usize, to: usize) -> f32 {
        self.core.distance(from, to)
    }
}

impl PathFinding for SurfaceGraph {
    fn astar_config(&self) -> crate::config::AStarConfig {
        self.config.astar
    }
}

impl ObstacleRegistry for SurfaceGraph {
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

impl Exploration for SurfaceGraph {
    fn physical_neighbours(&self, id: usize) -> Vec<usize> {
        self.core.physical_neighbours(id)
    }

    fn check_node(&self, id: usize) -> Result<()> {
        self.core.check(id)
    }

    fn has_been_seen(&self, id: usize) -> bool {
        self.core.has_been_seen(id)
    }

    /// Observers only report mesh vertices, so seeing a corner also marks
    /// the centres next to it.
    fn mark_as_seen(&mut self, id: usize) -> Result<()> {
        self.core.mark_as_seen(id)?;
        if self.vertex_types[id] != VertexType::Centre {
            let centres: Vec<usize> = self
                .core
                .physical_neighbours(id)
                .into_iter()
                .filter(|&n| self.vertex_types[n] == VertexType::Centre)
                .collect();
            for centre in centres {
                self.core.mark_as_seen(centre)?;
            }
        }
        Ok(())
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

    /// Unit square split into two triangles along the 1-2 diagonal
    ///
    /// ```text
    /// 2 --- 3
    /// | \   |
    /// |   \ |
    /// 0 --- 1
    /// ```
    fn square() -> Mesh {
        let mut mesh = Mesh::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
        ]);
        mesh.add_face(&[0, 1, 2]).unwrap();
        mesh.add_face(&[1, 3, 2]).unwrap();
        mesh
    }

    #[test]
    fn test_surface_nodes_and_types() {
        let g = SurfaceGraph::from_mesh(&square()).unwrap();
        assert_eq!(g.corner_count(), 4);
        assert_eq!(g.node_count(), 6);
        assert_eq!(g.face_centre(0), Some(4));
        assert_eq!(g.face_centre(1), Some(5));
        for v in 0..4 {
            assert_eq!(g.vertex_type(v), VertexType::Border);
        }
        assert_eq!(g.vertex_type(4), VertexType::Centre);
        // Centre of face 0 links to its corners and the other centre
        assert_eq!(g.physical_neighbours(4), vec![0, 1, 2, 5]);
        let c = g.position(4);
        assert_relative_eq!(c.x, 1.0 / 3.0, epsilon = 1e-5);
        assert_relative_eq!(c.z, 1.0 / 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_centre_threshold() {
        let config = SurfaceConfig::default().with_centre_area_threshold(1.0);
        let g = SurfaceGraph::with_config(&square(), config).unwrap();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.face_centre(0), None);
    }

    #[test]
    fn test_interior_vertex_is_other() {
        // Fan of four triangles around vertex 4
        let mut mesh = Mesh::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 2.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(1.0, 0.0, 1.0),
        ]);
        for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
            mesh.add_face(&[a, b, 4]).unwrap();
        }
        let g = SurfaceGraph::from_mesh(&mesh).unwrap();
        assert_eq!(g.vertex_type(4), VertexType::Other);
        assert_eq!(g.vertex_type(0), VertexType::Border);
    }

    #[test]
    fn test_heuristic_discount() {
        let mut g = SurfaceGraph::from_mesh(&square()).unwrap();
        let plain = g.position(4).distance(g.position(3));
        assert_relative_eq!(g.heuristic(4, 3), plain * PREFERENCE_DISCOUNT);
        assert_relative_eq!(g.heuristic(3, 4), plain);

        g.set_travel_preference(TravelPreference::PreferBorder);
        assert_relative_eq!(g.heuristic(4, 3), plain * PREFERENCE_DISCOUNT);
        assert_relative_eq!(g.heuristic(3, 4), plain);

        g.set_travel_preference(TravelPreference::NoPreference);
        assert_relative_eq!(g.heuristic(4, 3), plain);
        // Edge costs never change
        assert_relative_eq!(g.distance(4, 0), g.position(4).distance(g.position(0)));
    }

    #[test]
    fn test_mark_corner_marks_centres() {
        let mut g = SurfaceGraph::from_mesh(&square()).unwrap();
        g.mark_as_seen(0).unwrap();
        assert!(g.has_been_seen(4));
        assert!(!g.has_been_seen(5));
        g.mark_as_seen(3).unwrap();
        assert!(g.has_been_seen(5));
        assert_eq!(g.find_path(0, 3), Some(vec![0, 4, 5, 3]));
    }

    #[test]
    fn test_nearest_reachable_vertex() {
        let mut g = SurfaceGraph::from_mesh(&square()).unwrap();
        let p = Vec3::new(0.1, 0.0, 0.1);
        assert_eq!(g.nearest_reachable_vertex(p, 0.5), Some(0));
        // Far above every face
        assert_eq!(g.nearest_reachable_vertex(Vec3::new(0.1, 5.0, 0.1), 0.5), None);

        // Hide corner 0 behind a small box: the centre is next closest
        g.add_obstacle_blocking(AABB::new(Vec3::new(0.02, -0.1, 0.02), Vec3::new(0.05, 0.1, 0.05)));
        assert_eq!(g.nearest_reachable_vertex(p, 0.5), Some(4));
        assert_eq!(g.nearest_unblocked_vertex(p), Some(4));
    }

    #[test]
    fn test_find_path_between_points() {
        let mut g = SurfaceGraph::from_mesh(&square()).unwrap();
        g.set_perfect_memory(true);
        let path = g
            .find_path_between(Vec3::new(0.05, 0.0, 0.05), Vec3::new(0.95, 0.0, 0.95), 0.1)
            .unwrap();
        assert_eq!(path.first(), Some(&0));
        assert_eq!(path.last(), Some(&3));
    }

    #[test]
    fn test_surface_frontier() {
        let mut g = SurfaceGraph::from_mesh(&square()).unwrap();
        g.mark_as_seen(0).unwrap();
        let frontier = g.frontier();
        assert!(frontier.contains(&0));
        assert!(frontier.contains(&4));
        g.mark_all_as_seen([1, 2, 3]).unwrap();
        assert!(g.frontier().is_empty());
    }
}
