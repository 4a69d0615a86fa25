//! Wayfind Nav - Pathfinding and Exploration
//!
//! Generic A* search over anything implementing [`Navigable`], plus a set
//! of ready-made navigation graphs.
//!
//! # Features
//!
//! - A* with greedy, Dijkstra and heuristic modes and an iteration cap
//! - Togglable obstacles ([`ObstacleRegistry`])
//! - Seen-node memory, frontier detection and exploration ([`Exploration`])
//! - Graphs: mesh dual graph, surface graph, tile grid, explicit adjacency
//! - Stacking graphs into areas linked by portals ([`LayeredAreas`])
//!
//! # Example
//!
//! ```ignore
//! use wayfind_nav::prelude::*;
//!
//! let mut grid = TileGrid::new(3, 3);
//! grid.set_perfect_memory(true);
//! grid.add_obstacle(TileObstacle::wall((1, 1)))?;
//! let path = grid.find_path(Tile::new(0, 0), Tile::new(2, 2));
//! ```

pub mod astar;
pub mod config;
pub mod dual;
pub mod error;
pub mod explicit;
pub mod exploration;
pub mod graph;
pub mod layered;
pub mod mesh;
pub mod obstacle;
pub mod spatial;
pub mod surface;
pub mod tile;

pub use error::{NavError, Result};
pub use graph::{path_cost, Navigable, PathFinding};
pub use obstacle::ObstacleRegistry;
pub use exploration::Exploration;
pub use layered::LayeredAreas;

pub mod prelude {
    pub use crate::astar::AStar;
    pub use crate::config::{
        AStarConfig, LayeredConfig, SearchMode, SurfaceConfig, TileGridConfig, TravelPreference,
    };
    pub use crate::dual::MeshDualGraph;
    pub use crate::error::{NavError, Result};
    pub use crate::explicit::AdjacencyGraph;
    pub use crate::exploration::Exploration;
    pub use crate::graph::{Navigable, PathFinding};
    pub use crate::layered::{AreaId, LayeredAreas, Portal};
    pub use crate::mesh::{Face, Mesh};
    pub use crate::obstacle::ObstacleRegistry;
    pub use crate::spatial::{MeshObstacle, ObstacleKey};
    pub use crate::surface::{SurfaceGraph, VertexType};
    pub use crate::tile::{Tile, TileGrid, TileObstacle, TileObstacleKind};
    pub use wayfind_math::{LineIntersectable, Sphere, Vec3, AABB};
}
