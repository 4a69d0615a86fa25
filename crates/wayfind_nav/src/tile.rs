//! Sparse 2D tile grid
//!
//! Nodes are integer tiles on a bounded `width x height` grid. Only
//! obstacles and seen tiles are stored; every other in-bounds tile is free
//! floor. Walls always block. Doors block unless open.

use core::fmt;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::{AStarConfig, TileGridConfig};
use crate::error::{NavError, Result};
use crate::exploration::{Exploration, FrontierCandidates};
use crate::graph::{Navigable, PathFinding};
use crate::obstacle::ObstacleRegistry;

/// Cost of a diagonal move
pub const DIAGONAL_COST: f32 = std::f32::consts::SQRT_2;

/// Integer grid coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile containing a continuous position (rounded to the nearest tile)
    pub fn from_position(x: f32, y: f32) -> Self {
        Self::new(x.round() as i32, y.round() as i32)
    }

    /// Squared straight-line distance
    pub fn distance_squared(self, other: Tile) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        dx * dx + dy * dy
    }

    pub fn manhattan(self, other: Tile) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Tile {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// What occupies an obstacle tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileObstacleKind {
    /// Permanently blocking
    Wall,
    /// Blocking while closed
    Door { open: bool },
}

/// An obstacle occupying one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileObstacle {
    pub tile: Tile,
    pub kind: TileObstacleKind,
}

impl TileObstacle {
    pub fn wall(tile: impl Into<Tile>) -> Self {
        Self {
            tile: tile.into(),
            kind: TileObstacleKind::Wall,
        }
    }

    pub fn door(tile: impl Into<Tile>, open: bool) -> Self {
        Self {
            tile: tile.into(),
            kind: TileObstacleKind::Door { open },
        }
    }

    pub fn is_blocking(&self) -> bool {
        match self.kind {
            TileObstacleKind::Wall => true,
            TileObstacleKind::Door { open } => !open,
        }
    }
}

/// Navigation graph over a bounded tile grid
#[derive(Debug, Clone)]
pub struct TileGrid {
    width: i32,
    height: i32,
    config: TileGridConfig,
    obstacles: HashMap<Tile, TileObstacleKind>,
    seen: HashSet<Tile>,
    candidates: FrontierCandidates<Tile>,
    perfect_memory: bool,
}

impl TileGrid {
    /// Empty grid with default settings
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_config(width, height, TileGridConfig::default())
    }

    pub fn with_config(width: i32, height: i32, config: TileGridConfig) -> Self {
        Self {
            width: width.max(0),
            height: height.max(0),
            config,
            obstacles: HashMap::new(),
            seen: HashSet::new(),
            candidates: FrontierCandidates::new(),
            perfect_memory: false,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn config(&self) -> &TileGridConfig {
        &self.config
    }

    pub fn set_diagonal_movement(&mut self, enabled: bool) {
        self.config.diagonal_movement = enabled;
    }

    pub fn in_bounds(&self, tile: Tile) -> bool {
        (0..self.width).contains(&tile.x) && (0..self.height).contains(&tile.y)
    }

    fn assert_in_bounds(&self, tile: Tile) {
        assert!(
            self.in_bounds(tile),
            "tile {} outside {}x{} grid",
            tile,
            self.width,
            self.height
        );
    }

    fn check(&self, tile: Tile) -> Result<()> {
        if self.in_bounds(tile) {
            Ok(())
        } else {
            Err(NavError::TileOutOfBounds {
                tile,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn obstacle_at(&self, tile: Tile) -> Option<TileObstacle> {
        self.obstacles
            .get(&tile)
            .map(|&kind| TileObstacle { tile, kind })
    }

    pub fn is_wall(&self, tile: Tile) -> bool {
        matches!(self.obstacles.get(&tile), Some(TileObstacleKind::Wall))
    }

    pub fn is_door(&self, tile: Tile) -> bool {
        matches!(self.obstacles.get(&tile), Some(TileObstacleKind::Door { .. }))
    }

    /// Wall, or closed door
    pub fn is_blocked(&self, tile: Tile) -> bool {
        self.obstacle_at(tile).is_some_and(|o| o.is_blocking())
    }

    /// Every tile currently marked as seen
    pub fn seen_tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.seen.iter().copied()
    }
}

const AXIS_STEPS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL_STEPS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, 1), (1, -1)];

impl Navigable for TileGrid {
    type NodeId = Tile;

    /// Unblocked physical neighbours, restricted to seen tiles unless
    /// perfect memory is on
    fn neighbours(&self, id: Tile) -> Vec<Tile> {
        let mut out = self.physical_neighbours(id);
        out.retain(|&t| !self.is_blocked(t) && (self.perfect_memory || self.seen.contains(&t)));
        out
    }

    /// Manhattan distance, or straight-line distance with diagonal moves
    fn heuristic(&self, from: Tile, to: Tile) -> f32 {
        self.assert_in_bounds(from);
        self.assert_in_bounds(to);
        if self.config.diagonal_movement {
            from.distance_squared(to).sqrt()
        } else {
            from.manhattan(to) as f32
        }
    }

    fn distance(&self, from: Tile, to: Tile) -> f32 {
        self.assert_in_bounds(from);
        self.assert_in_bounds(to);
        if from.x == to.x || from.y == to.y {
            1.0
        } else {
            DIAGONAL_COST
        }
    }
}

impl PathFinding for TileGrid {
    fn astar_config(&self) -> AStarConfig {
        self.config.astar
    }
}

impl ObstacleRegistry for TileGrid {
    type Obstacle = TileObstacle;
    type ObstacleKey = Tile;

    /// Places the obstacle, replacing whatever was on its tile before
    fn add_obstacle(&mut self, obstacle: TileObstacle) -> Result<Tile> {
        self.check(obstacle.tile)?;
        self.obstacles.insert(obstacle.tile, obstacle.kind);
        Ok(obstacle.tile)
    }

    fn remove_obstacle(&mut self, key: Tile) -> Result<TileObstacle> {
        self.obstacles
            .remove(&key)
            .map(|kind| TileObstacle { tile: key, kind })
            .ok_or(NavError::UnknownObstacle)
    }

    fn is_blocking(&self, key: Tile) -> Result<bool> {
        self.obstacle_at(key)
            .map(|o| o.is_blocking())
            .ok_or(NavError::UnknownObstacle)
    }

    /// Opens or closes a door. Walls cannot be toggled.
    fn set_blocking_state(&mut self, key: Tile, blocking: bool) -> Result<()> {
        match self.obstacles.get_mut(&key) {
            Some(TileObstacleKind::Door { open }) => {
                *open = !blocking;
                Ok(())
            }
            _ => Err(NavError::NotTogglable(key)),
        }
    }

    fn is_node_blocked(&self, id: Tile) -> bool {
        self.is_blocked(id)
    }
}

impl Exploration for TileGrid {
    /// In-bounds adjacent tiles, whether blocked or seen or neither
    fn physical_neighbours(&self, id: Tile) -> Vec<Tile> {
        self.assert_in_bounds(id);
        let diagonals: &[(i32, i32)] = if self.config.diagonal_movement {
            &DIAGONAL_STEPS
        } else {
            &[]
        };
        AXIS_STEPS
            .iter()
            .chain(diagonals)
            .map(|&(dx, dy)| Tile::new(id.x + dx, id.y + dy))
            .filter(|&t| self.in_bounds(t))
            .collect()
    }

    fn check_node(&self, id: Tile) -> Result<()> {
        self.check(id)
    }

    fn has_been_seen(&self, id: Tile) -> bool {
        self.seen.contains(&id)
    }

    fn mark_as_seen(&mut self, id: Tile) -> Result<()> {
        self.check(id)?;
        self.seen.insert(id);
        self.candidates.insert(id);
        Ok(())
    }

    fn frontier(&mut self) -> Vec<Tile> {
        if self.perfect_memory {
            return Vec::new();
        }
        let mut candidates = std::mem::take(&mut self.candidates);
        let frontier = candidates.prune(|t| self.is_frontier(t));
        self.candidates = candidates;
        frontier
    }

    /// Some adjacent tile is unseen. Walls and doors count, so a closed
    /// door keeps the tiles beside it on the frontier until it is seen.
    fn is_frontier(&self, id: Tile) -> bool {
        self.physical_neighbours(id)
            .into_iter()
            .any(|t| !self.seen.contains(&t))
    }

    fn proximity(&self, a: Tile, b: Tile) -> f32 {
        a.distance_squared(b)
    }

    fn perfect_memory(&self) -> bool {
        self.perfect_memory
    }

    fn set_perfect_memory(&mut self, enabled: bool) {
        self.perfect_memory = enabled;
    }

    fn wipe_out_memory(&mut self) {
        self.seen.clear();
        self.candidates.clear();
    }
}

/// Renders the grid top row first: `.` seen floor, `W`/`w` wall,
/// `O`/`o` open door, `X`/`x` closed door (upper case when seen),
/// blank for unseen floor.
impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let tile = Tile::new(x, y);
                let seen = self.seen.contains(&tile);
                let c = match (self.obstacles.get(&tile), seen) {
                    (None, true) => '.',
                    (None, false) => ' ',
                    (Some(TileObstacleKind::Wall), true) => 'W',
                    (Some(TileObstacleKind::Wall), false) => 'w',
                    (Some(TileObstacleKind::Door { open: true }), true) => 'O',
                    (Some(TileObstacleKind::Door { open: true }), false) => 'o',
                    (Some(TileObstacleKind::Door { open: false }), true) => 'X',
                    (Some(TileObstacleKind::Door { open: false }), false) => 'x',
                };
                write!(f, "{}", c)?;
            }
            if y > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
