//! Polygon mesh data model
//!
//! A mesh is a list of vertex positions, undirected edges between vertex
//! indices, and convex faces given as vertex cycles.

use std::collections::{BTreeMap, BTreeSet};

use wayfind_math::{Segment, Triangle, Vec3};

use crate::error::{NavError, Result};

/// Undirected edge between two distinct vertices, stored as `i < j`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    i: usize,
    j: usize,
}

impl Edge {
    /// Create an edge, rejecting self loops
    pub fn new(a: usize, b: usize) -> Result<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Ok(Self { i: a, j: b }),
            std::cmp::Ordering::Greater => Ok(Self { i: b, j: a }),
            std::cmp::Ordering::Equal => Err(NavError::DegenerateEdge(a)),
        }
    }

    /// Smaller endpoint
    pub fn i(&self) -> usize {
        self.i
    }

    /// Larger endpoint
    pub fn j(&self) -> usize {
        self.j
    }

    pub fn contains(&self, v: usize) -> bool {
        self.i == v || self.j == v
    }
}

/// Undirected adjacency between vertex indices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeMap {
    adjacency: BTreeMap<usize, BTreeSet<usize>>,
}

impl EdgeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, edge: Edge) {
        self.adjacency.entry(edge.i).or_default().insert(edge.j);
        self.adjacency.entry(edge.j).or_default().insert(edge.i);
    }

    pub fn remove(&mut self, edge: Edge) {
        for (a, b) in [(edge.i, edge.j), (edge.j, edge.i)] {
            if let Some(set) = self.adjacency.get_mut(&a) {
                set.remove(&b);
                if set.is_empty() {
                    self.adjacency.remove(&a);
                }
            }
        }
    }

    pub fn contains(&self, edge: Edge) -> bool {
        self.adjacency.get(&edge.i).is_some_and(|s| s.contains(&edge.j))
    }

    /// Neighbours of `v` in ascending order (empty for an isolated vertex)
    pub fn neighbours(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency.get(&v).into_iter().flatten().copied()
    }

    pub fn degree(&self, v: usize) -> usize {
        self.adjacency.get(&v).map_or(0, BTreeSet::len)
    }

    /// Every edge once, in ascending order
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.adjacency
            .iter()
            .flat_map(|(&i, set)| set.range(i + 1..).map(move |&j| Edge { i, j }))
    }
}

/// Convex polygon over mesh vertices, corners listed in cycle order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Face {
    vertices: Vec<usize>,
}

impl Face {
    /// Create a face, requiring at least three distinct corners
    pub fn new(vertices: Vec<usize>) -> Result<Self> {
        let distinct: BTreeSet<_> = vertices.iter().collect();
        if vertices.len() < 3 || distinct.len() != vertices.len() {
            return Err(NavError::DegenerateFace(distinct.len()));
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn corner(&self, positions: &[Vec3], k: usize) -> Vec3 {
        positions[self.vertices[k % self.vertices.len()]]
    }

    /// Average of the corner positions
    pub fn centre(&self, positions: &[Vec3]) -> Vec3 {
        let sum = self
            .vertices
            .iter()
            .fold(Vec3::ZERO, |acc, &v| acc + positions[v]);
        sum / self.vertices.len() as f32
    }

    /// Area-weighted centroid of the polygon
    pub fn centroid(&self, positions: &[Vec3]) -> Vec3 {
        let centre = self.centre(positions);
        let mut weighted = Vec3::ZERO;
        let mut total = 0.0;
        for k in 0..self.len() {
            let tri =
                Triangle::new(centre, self.corner(positions, k), self.corner(positions, k + 1));
            let area = tri.area();
            weighted += tri.centroid() * area;
            total += area;
        }
        if total > 0.0 {
            weighted / total
        } else {
            centre
        }
    }

    /// Surface area, as a fan of triangles around the centre
    pub fn area(&self, positions: &[Vec3]) -> f32 {
        let centre = self.centre(positions);
        (0..self.len())
            .map(|k| {
                Triangle::new(centre, self.corner(positions, k), self.corner(positions, k + 1))
                    .area()
            })
            .sum()
    }

    /// Boundary edges in cycle order
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let n = self.vertices.len();
        (0..n).filter_map(move |k| Edge::new(self.vertices[k], self.vertices[(k + 1) % n]).ok())
    }

    /// Whether `edge` is one of the boundary edges
    pub fn contains_edge(&self, edge: Edge) -> bool {
        self.edges().any(|e| e == edge)
    }

    /// Whether two faces share at least two corners
    pub fn is_connected(&self, other: &Face) -> bool {
        self.vertices
            .iter()
            .filter(|v| other.vertices.contains(v))
            .take(2)
            .count()
            >= 2
    }

    /// Distance from a point to the face.
    ///
    /// Inside the prism obtained by extruding the face along its normal this
    /// is the distance to the face's plane; outside it is the distance to the
    /// nearest boundary edge.
    pub fn distance_from_point(&self, point: Vec3, positions: &[Vec3]) -> f32 {
        let n = self.len();
        let first = self.corner(positions, 0);
        let normal =
            (self.corner(positions, 1) - first).cross(first - self.corner(positions, n - 1));

        let mut sign = 0.0f32;
        let mut inside = true;
        for k in 0..n {
            let p = self.corner(positions, k);
            let along = self.corner(positions, k + 1) - p;
            let side = along.cross(normal).dot(point - p);
            if sign == 0.0 {
                sign = if side > 0.0 { 1.0 } else { -1.0 };
            } else if side * sign <= 0.0 {
                inside = false;
                break;
            }
        }

        let normal_len = normal.length();
        if inside && normal_len > 0.0 {
            return ((point - first).dot(normal) / normal_len).abs();
        }

        (0..n)
            .map(|k| {
                Segment::new(self.corner(positions, k), self.corner(positions, k + 1))
                    .distance_squared_to_point(point)
            })
            .fold(f32::INFINITY, f32::min)
            .sqrt()
    }
}

/// Vertices, edges and faces of a navigation surface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub edges: Vec<Edge>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Self {
            vertices,
            edges: Vec::new(),
            faces: Vec::new(),
        }
    }

    fn check_vertex(&self, v: usize) -> Result<()> {
        if v < self.vertices.len() {
            Ok(())
        } else {
            Err(NavError::NodeOutOfRange {
                node: v,
                count: self.vertices.len(),
            })
        }
    }

    /// Add a face over existing vertices, together with its boundary edges
    pub fn add_face(&mut self, corners: &[usize]) -> Result<&mut Self> {
        for &v in corners {
            self.check_vertex(v)?;
        }
        let face = Face::new(corners.to_vec())?;
        for edge in face.edges() {
            if !self.edges.contains(&edge) {
                self.edges.push(edge);
            }
        }
        self.faces.push(face);
        Ok(self)
    }

    /// Add a lone edge between existing vertices
    pub fn add_edge(&mut self, a: usize, b: usize) -> Result<&mut Self> {
        self.check_vertex(a)?;
        self.check_vertex(b)?;
        let edge = Edge::new(a, b)?;
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
        Ok(self)
    }

    /// Adjacency built from the edge list
    pub fn edge_map(&self) -> EdgeMap {
        let mut map = EdgeMap::new();
        for &edge in &self.edges {
            map.insert(edge);
        }
        map
    }

    /// Number of faces each edge belongs to
    pub fn face_membership(&self, edge: Edge) -> usize {
        self.faces.iter().filter(|f| f.contains_edge(edge)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> (Vec<Vec3>, Face) {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 2.0),
            Vec3::new(0.0, 0.0, 2.0),
        ];
        (positions, Face::new(vec![0, 1, 2, 3]).unwrap())
    }

    #[test]
    fn test_edge_normalised() {
        assert_eq!(Edge::new(3, 1).unwrap(), Edge::new(1, 3).unwrap());
        assert_eq!(Edge::new(2, 2), Err(NavError::DegenerateEdge(2)));
    }

    #[test]
    fn test_face_rejects_degenerate() {
        assert!(Face::new(vec![0, 1]).is_err());
        assert!(Face::new(vec![0, 1, 1]).is_err());
    }

    #[test]
    fn test_face_geometry() {
        let (positions, face) = square();
        assert_eq!(face.centre(&positions), Vec3::new(1.0, 0.0, 1.0));
        assert_relative_eq!(face.area(&positions), 4.0, epsilon = 1e-5);
        let c = face.centroid(&positions);
        assert_relative_eq!(c.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(c.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_face_edges_and_connection() {
        let (_, face) = square();
        assert!(face.contains_edge(Edge::new(3, 0).unwrap()));
        assert!(!face.contains_edge(Edge::new(0, 2).unwrap()));
        let other = Face::new(vec![1, 4, 2]).unwrap();
        let far = Face::new(vec![2, 5, 6]).unwrap();
        assert!(face.is_connected(&other));
        assert!(!face.is_connected(&far));
    }

    #[test]
    fn test_face_distance_from_point() {
        let (positions, face) = square();
        // Above the face: distance to the plane
        let above = face.distance_from_point(Vec3::new(1.0, 3.0, 1.0), &positions);
        assert_relative_eq!(above, 3.0, epsilon = 1e-5);
        // Beside the face: distance to the nearest edge
        let beside = face.distance_from_point(Vec3::new(-1.0, 0.0, 1.0), &positions);
        assert_relative_eq!(beside, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_mesh_builder() {
        let mut mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::new(1.0, 0.0, 1.0)]);
        mesh.add_face(&[0, 1, 2]).unwrap().add_face(&[1, 3, 2]).unwrap();
        assert_eq!(mesh.edges.len(), 5);
        assert_eq!(mesh.face_membership(Edge::new(1, 2).unwrap()), 2);
        assert_eq!(mesh.face_membership(Edge::new(0, 1).unwrap()), 1);
        assert!(mesh.add_face(&[0, 1, 9]).is_err());
        assert_eq!(mesh.edge_map().neighbours(1).collect::<Vec<_>>(), vec![0, 2, 3]);
        assert_eq!(mesh.edge_map().edges().count(), 5);
    }
}
