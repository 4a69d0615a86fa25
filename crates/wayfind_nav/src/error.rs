//! Error types for navigation graphs

use thiserror::Error;

use crate::tile::Tile;

/// Navigation errors
///
/// Only mutations and obstacle queries report these. A failed search is
/// not an error: path queries return `None`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavError {
    /// Vertex index outside the graph
    #[error("Node {node} out of range (graph has {count} nodes)")]
    NodeOutOfRange { node: usize, count: usize },

    /// Tile outside the grid bounds
    #[error("Tile {tile} outside a {width}x{height} grid")]
    TileOutOfBounds { tile: Tile, width: i32, height: i32 },

    /// Obstacle handle does not refer to a registered obstacle
    #[error("Obstacle not found")]
    UnknownObstacle,

    /// Tile obstacle cannot change its blocking state (walls, or no obstacle)
    #[error("Obstacle at {0} cannot be toggled")]
    NotTogglable(Tile),

    /// Area index outside the layered stack
    #[error("Area {area} out of range (stack has {count} areas)")]
    UnknownArea { area: usize, count: usize },

    /// Portals only link neighbouring areas
    #[error("Areas {from} and {to} are not adjacent")]
    NotAdjacentAreas { from: usize, to: usize },

    /// A new area was added without (or with a superfluous) portal
    #[error("Area {area} needs a portal to the area below exactly when it is not the first")]
    MisplacedPortal { area: usize },

    /// Face with fewer than three distinct corners
    #[error("Degenerate face with {0} corners")]
    DegenerateFace(usize),

    /// Edge connecting a vertex to itself
    #[error("Degenerate edge on vertex {0}")]
    DegenerateEdge(usize),
}

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, NavError>;
