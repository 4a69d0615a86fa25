//! Navigation configuration
//!
//! Every struct deserializes from partial documents; missing fields take
//! their default values.

use serde::{Deserialize, Serialize};

/// Priority policy of the A* open set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Priority is the heuristic estimate only
    Greedy,
    /// Priority is the cost travelled so far
    Dijkstra,
    /// Priority is travelled cost plus heuristic estimate
    #[default]
    Heuristic,
}

/// A* search settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AStarConfig {
    /// Open-set priority policy
    pub search_mode: SearchMode,

    /// Give up after this many node expansions (unbounded when `None`)
    pub max_iterations: Option<usize>,
}

impl AStarConfig {
    /// Set the search mode
    pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    /// Bound the number of expansions
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }
}

/// Vertex class a surface graph's heuristic favours
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelPreference {
    /// Cheaper estimates when leaving face-centre nodes
    #[default]
    PreferCentre,
    /// Cheaper estimates when heading for mesh-border vertices
    PreferBorder,
    NoPreference,
}

/// Surface graph settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub travel_preference: TravelPreference,

    /// Faces with a smaller area get no centre node
    pub centre_area_threshold: f32,

    pub astar: AStarConfig,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            travel_preference: TravelPreference::PreferCentre,
            centre_area_threshold: 0.0,
            astar: AStarConfig::default(),
        }
    }
}

impl SurfaceConfig {
    /// Set the travel preference
    pub fn with_travel_preference(mut self, preference: TravelPreference) -> Self {
        self.travel_preference = preference;
        self
    }

    /// Set the minimum face area for centre nodes
    pub fn with_centre_area_threshold(mut self, threshold: f32) -> Self {
        self.centre_area_threshold = threshold;
        self
    }

    /// Set the A* settings
    pub fn with_astar(mut self, astar: AStarConfig) -> Self {
        self.astar = astar;
        self
    }
}

/// Tile grid settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileGridConfig {
    /// Allow moves to the four diagonal neighbours
    pub diagonal_movement: bool,

    pub astar: AStarConfig,
}

impl TileGridConfig {
    /// Enable or disable diagonal moves
    pub fn with_diagonal_movement(mut self, enabled: bool) -> Self {
        self.diagonal_movement = enabled;
        self
    }

    /// Set the A* settings
    pub fn with_astar(mut self, astar: AStarConfig) -> Self {
        self.astar = astar;
        self
    }
}

/// Layered area composition settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayeredConfig {
    /// Cost of crossing one portal
    pub portal_cost: f32,

    /// Heuristic penalty per intermediate area. Should exceed the diameter
    /// of the largest area so that searches minimise area hops first.
    pub area_penalty: f32,
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self {
            portal_cost: 1.0,
            area_penalty: 1000.0,
        }
    }
}

impl LayeredConfig {
    /// Set the portal crossing cost
    pub fn with_portal_cost(mut self, cost: f32) -> Self {
        self.portal_cost = cost;
        self
    }

    /// Set the per-area heuristic penalty
    pub fn with_area_penalty(mut self, penalty: f32) -> Self {
        self.area_penalty = penalty;
        self
    }
}
