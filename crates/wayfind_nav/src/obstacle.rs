//! Dynamic obstacles
//!
//! Obstacles never change graph topology. A blocking obstacle makes the
//! edges it covers cost `f32::INFINITY` (or hides the nodes it covers,
//! depending on the graph), and toggling it takes effect on the next query.

use core::fmt;

use crate::error::Result;
use crate::graph::Navigable;

/// Registry of togglable obstacles owned by a graph
pub trait ObstacleRegistry: Navigable {
    /// What gets registered
    type Obstacle;

    /// Identity of a registered obstacle
    type ObstacleKey: Copy + Eq + fmt::Debug;

    /// Register an obstacle and return its key
    fn add_obstacle(&mut self, obstacle: Self::Obstacle) -> Result<Self::ObstacleKey>;

    /// Unregister an obstacle and hand it back
    fn remove_obstacle(&mut self, key: Self::ObstacleKey) -> Result<Self::Obstacle>;

    /// Whether the obstacle currently blocks movement
    fn is_blocking(&self, key: Self::ObstacleKey) -> Result<bool>;

    /// Set whether the obstacle blocks movement
    fn set_blocking_state(&mut self, key: Self::ObstacleKey, blocking: bool) -> Result<()>;

    fn toggle_blocking_on(&mut self, key: Self::ObstacleKey) -> Result<()> {
        self.set_blocking_state(key, true)
    }

    fn toggle_blocking_off(&mut self, key: Self::ObstacleKey) -> Result<()> {
        self.set_blocking_state(key, false)
    }

    /// Whether a currently blocking obstacle covers the node itself
    fn is_node_blocked(&self, id: Self::NodeId) -> bool;
}
