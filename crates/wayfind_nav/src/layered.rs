//! Layered area composition
//!
//! Stacks navigation graphs ("areas") into one graph. Area `i` and area
//! `i + 1` are linked by a portal: a node of area `i` (its low portal) and
//! a node of area `i + 1` (its high portal). Composite nodes are addressed
//! as [`AreaId`]s.
//!
//! A portal can be crossed when it is open, neither end is blocked, and
//! the far end has been seen (or perfect memory is on).
//!
//! Path queries are only answered towards higher area indices; a query
//! from a higher area to a lower one yields no path.

use core::fmt;

use crate::config::LayeredConfig;
use crate::error::{NavError, Result};
use crate::exploration::Exploration;
use crate::graph::{path_cost, Navigable, PathFinding};
use crate::obstacle::ObstacleRegistry;

/// A node (or obstacle, or obstacle key) inside a given area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AreaId<T> {
    pub area: usize,
    pub id: T,
}

impl<T> AreaId<T> {
    pub const fn new(area: usize, id: T) -> Self {
        Self { area, id }
    }
}

impl<T: fmt::Display> fmt::Display for AreaId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}>", self.area, self.id)
    }
}

/// Link between area `i` (`low`) and area `i + 1` (`high`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Portal<N> {
    pub low: N,
    pub high: N,
    pub open: bool,
}

/// Stack of areas joined by portals
pub struct LayeredAreas<A: Exploration + ObstacleRegistry> {
    areas: Vec<A>,
    portals: Vec<Portal<A::NodeId>>,
    perfect_memory: bool,
    config: LayeredConfig,
}

impl<A> LayeredAreas<A>
where
    A: Exploration + ObstacleRegistry,
{
    pub fn new() -> Self {
        Self::with_config(LayeredConfig::default())
    }

    pub fn with_config(config: LayeredConfig) -> Self {
        Self {
            areas: Vec::new(),
            portals: Vec::new(),
            perfect_memory: false,
            config,
        }
    }

    pub fn config(&self) -> &LayeredConfig {
        &self.config
    }

    /// Stack a new area on top.
    ///
    /// The first area takes no portal. Every later area needs one, given as
    /// `(low, high)`: `low` in the current top area, `high` in the new one.
    /// Both ends must be nodes of their areas. Returns the index of the new
    /// area.
    pub fn add_next_area(
        &mut self,
        mut area: A,
        portal: Option<(A::NodeId, A::NodeId)>,
        open: bool,
    ) -> Result<usize> {
        let index = self.areas.len();
        match (index, portal) {
            (0, None) => {}
            (0, Some(_)) | (_, None) => return Err(NavError::MisplacedPortal { area: index }),
            (_, Some((low, high))) => {
                self.areas[index - 1].check_node(low)?;
                area.check_node(high)?;
                self.portals.push(Portal { low, high, open });
                log::debug!(
                    "area {} added, portal {:?} -> {:?} ({})",
                    index,
                    low,
                    high,
                    if open { "open" } else { "closed" }
                );
            }
        }
        area.set_perfect_memory(self.perfect_memory);
        self.areas.push(area);
        Ok(index)
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn area(&self, index: usize) -> Option<&A> {
        self.areas.get(index)
    }

    pub fn area_mut(&mut self, index: usize) -> Option<&mut A> {
        self.areas.get_mut(index)
    }

    pub fn areas(&self) -> &[A] {
        &self.areas
    }

    /// Portal between area `index` and area `index + 1`
    pub fn portal(&self, index: usize) -> Option<&Portal<A::NodeId>> {
        self.portals.get(index)
    }

    /// Node of area `area` leading up to area `area + 1`
    pub fn low_portal(&self, area: usize) -> Option<A::NodeId> {
        self.portals.get(area).map(|p| p.low)
    }

    /// Node of area `area + 1` paired with the low portal of `area`
    pub fn connected_high_portal(&self, area: usize) -> Option<A::NodeId> {
        self.portals.get(area).map(|p| p.high)
    }

    /// Node of area `area` leading down to area `area - 1`
    pub fn high_portal(&self, area: usize) -> Option<A::NodeId> {
        area.checked_sub(1)
            .and_then(|below| self.portals.get(below))
            .map(|p| p.high)
    }

    /// Node of area `area - 1` paired with the high portal of `area`
    pub fn connected_low_portal(&self, area: usize) -> Option<A::NodeId> {
        area.checked_sub(1)
            .and_then(|below| self.portals.get(below))
            .map(|p| p.low)
    }

    fn check_area(&self, area: usize) -> Result<()> {
        if area < self.areas.len() {
            Ok(())
        } else {
            Err(NavError::UnknownArea {
                area,
                count: self.areas.len(),
            })
        }
    }

    /// Open or close the portal between two adjacent areas
    pub fn set_portal(&mut self, from: usize, to: usize, open: bool) -> Result<()> {
        self.check_area(from)?;
        self.check_area(to)?;
        let index = if to == from + 1 {
            from
        } else if from == to + 1 {
            to
        } else {
            return Err(NavError::NotAdjacentAreas { from, to });
        };
        self.portals[index].open = open;
        log::debug!("portal {} {}", index, if open { "opened" } else { "closed" });
        Ok(())
    }

    /// Whether portal `index` can be crossed, upwards or downwards
    fn is_crossable(&self, index: usize, upwards: bool) -> bool {
        let portal = &self.portals[index];
        if !portal.open
            || self.areas[index].is_node_blocked(portal.low)
            || self.areas[index + 1].is_node_blocked(portal.high)
        {
            return false;
        }
        self.perfect_memory
            || if upwards {
                self.areas[index + 1].has_been_seen(portal.high)
            } else {
                self.areas[index].has_been_seen(portal.low)
            }
    }

    fn tag(area: usize, path: Vec<A::NodeId>) -> Vec<AreaId<A::NodeId>> {
        path.into_iter().map(|id| AreaId::new(area, id)).collect()
    }
}

impl<A> Default for LayeredAreas<A>
where
    A: Exploration + ObstacleRegistry,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Navigable for LayeredAreas<A>
where
    A: Exploration + ObstacleRegistry,
{
    type NodeId = AreaId<A::NodeId>;

    fn neighbours(&self, node: Self::NodeId) -> Vec<Self::NodeId> {
        let area = node.area;
        let mut out = Self::tag(area, self.areas[area].neighbours(node.id));
        if self.low_portal(area) == Some(node.id) && self.is_crossable(area, true) {
            out.push(AreaId::new(area + 1, self.portals[area].high));
        }
        if self.high_portal(area) == Some(node.id) && self.is_crossable(area - 1, false) {
            out.push(AreaId::new(area - 1, self.portals[area - 1].low));
        }
        out
    }

    /// Same area: the area's own estimate. Across areas: distance to the
    /// exit portal, the portal crossings, a penalty per intermediate area,
    /// and the distance from the entry portal to the target.
    fn heuristic(&self, from: Self::NodeId, to: Self::NodeId) -> f32 {
        if from.area == to.area {
            return self.areas[from.area].heuristic(from.id, to.id);
        }
        let (exit, entry) = if from.area < to.area {
            (self.portals[from.area].low, self.portals[to.area - 1].high)
        } else {
            (self.portals[from.area - 1].high, self.portals[to.area].low)
        };
        let hops = from.area.abs_diff(to.area) as f32;
        self.areas[from.area].heuristic(from.id, exit)
            + self.config.portal_cost * hops
            + self.config.area_penalty * (hops - 1.0)
            + self.areas[to.area].heuristic(entry, to.id)
    }

    fn distance(&self, from: Self::NodeId, to: Self::NodeId) -> f32 {
        if from.area == to.area {
            self.areas[from.area].distance(from.id, to.id)
        } else {
            self.config.portal_cost
        }
    }
}

impl<A> PathFinding for LayeredAreas<A>
where
    A: Exploration + ObstacleRegistry,
{
    /// Stitches per-area paths at the portals on the way up. Fails as soon
    /// as one leg or one portal crossing fails.
    fn find_path(&self, from: Self::NodeId, to: Self::NodeId) -> Option<Vec<Self::NodeId>> {
        if from.area == to.area {
            return self.areas[from.area]
                .find_path(from.id, to.id)
                .map(|path| Self::tag(from.area, path));
        }
        if from.area > to.area {
            log::warn!(
                "path from area {} down to area {} is not supported",
                from.area,
                to.area
            );
            return None;
        }

        let mut path = Vec::new();
        let mut current = from.id;
        for level in from.area..to.area {
            if !self.is_crossable(level, true) {
                log::debug!("portal {} cannot be crossed", level);
                return None;
            }
            let portal = &self.portals[level];
            let leg = self.areas[level].find_path(current, portal.low)?;
            path.extend(Self::tag(level, leg));
            current = portal.high;
        }
        let last = self.areas[to.area].find_path(current, to.id)?;
        path.extend(Self::tag(to.area, last));
        Some(path)
    }
}

impl<A> ObstacleRegistry for LayeredAreas<A>
where
    A: Exploration + ObstacleRegistry,
{
    type Obstacle = AreaId<A::Obstacle>;
    type ObstacleKey = AreaId<A::ObstacleKey>;

    fn add_obstacle(&mut self, obstacle: Self::Obstacle) -> Result<Self::ObstacleKey> {
        self.check_area(obstacle.area)?;
        let key = self.areas[obstacle.area].add_obstacle(obstacle.id)?;
        Ok(AreaId::new(obstacle.area, key))
    }

    fn remove_obstacle(&mut self, key: Self::ObstacleKey) -> Result<Self::Obstacle> {
        self.check_area(key.area)?;
        let obstacle = self.areas[key.area].remove_obstacle(key.id)?;
        Ok(AreaId::new(key.area, obstacle))
    }

    fn is_blocking(&self, key: Self::ObstacleKey) -> Result<bool> {
        self.check_area(key.area)?;
        self.areas[key.area].is_blocking(key.id)
    }

    fn set_blocking_state(&mut self, key: Self::ObstacleKey, blocking: bool) -> Result<()> {
        self.check_area(key.area)?;
        self.areas[key.area].set_blocking_state(key.id, blocking)
    }

    fn is_node_blocked(&self, node: Self::NodeId) -> bool {
        self.areas[node.area].is_node_blocked(node.id)
    }
}

impl<A> Exploration for LayeredAreas<A>
where
    A: Exploration + ObstacleRegistry,
{
    /// The area's physical neighbours, plus the paired node if this is a portal
    fn physical_neighbours(&self, node: Self::NodeId) -> Vec<Self::NodeId> {
        let area = node.area;
        let mut out = Self::tag(area, self.areas[area].physical_neighbours(node.id));
        if self.low_portal(area) == Some(node.id) {
            out.push(AreaId::new(area + 1, self.portals[area].high));
        }
        if self.high_portal(area) == Some(node.id) {
            out.push(AreaId::new(area - 1, self.portals[area - 1].low));
        }
        out
    }

    fn check_node(&self, node: Self::NodeId) -> Result<()> {
        self.check_area(node.area)?;
        self.areas[node.area].check_node(node.id)
    }

    fn has_been_seen(&self, node: Self::NodeId) -> bool {
        self.areas[node.area].has_been_seen(node.id)
    }

    /// Seeing either end of a portal also marks the paired end as seen
    fn mark_as_seen(&mut self, node: Self::NodeId) -> Result<()> {
        self.check_area(node.area)?;
        let area = node.area;
        self.areas[area].mark_as_seen(node.id)?;
        if self.low_portal(area) == Some(node.id) {
            let high = self.portals[area].high;
            self.areas[area + 1].mark_as_seen(high)?;
        }
        if self.high_portal(area) == Some(node.id) {
            let low = self.portals[area - 1].low;
            self.areas[area - 1].mark_as_seen(low)?;
        }
        Ok(())
    }

    /// Union of every area's frontier
    fn frontier(&mut self) -> Vec<Self::NodeId> {
        self.areas
            .iter_mut()
            .enumerate()
            .flat_map(|(index, area)| Self::tag(index, area.frontier()))
            .collect()
    }

    /// The area's own measure within an area; unbounded across areas
    fn proximity(&self, a: Self::NodeId, b: Self::NodeId) -> f32 {
        if a.area == b.area {
            self.areas[a.area].proximity(a.id, b.id)
        } else {
            f32::INFINITY
        }
    }

    /// When `start` and `towards` share an area, that area is explored
    /// first. Otherwise (or when that fails) every reachable frontier node
    /// is ranked by `area_penalty` per area between it and `towards`, plus
    /// the cost of the path to it.
    fn explore_towards(
        &mut self,
        start: Self::NodeId,
        towards: Self::NodeId,
    ) -> Option<Vec<Self::NodeId>> {
        if start.area == towards.area {
            if let Some(path) = self.areas[start.area].explore_towards(start.id, towards.id) {
                if !path.is_empty() {
                    return Some(Self::tag(start.area, path));
                }
            }
        }

        let frontier = self.frontier();
        let mut best: Option<(f32, Vec<Self::NodeId>)> = None;
        for candidate in frontier {
            let Some(path) = self.find_path(start, candidate) else {
                continue;
            };
            let rank = self.config.area_penalty * candidate.area.abs_diff(towards.area) as f32
                + path_cost(&*self, &path);
            if best.as_ref().map_or(true, |(r, _)| rank < *r) {
                best = Some((rank, path));
            }
        }
        best.map(|(_, path)| path)
    }

    fn perfect_memory(&self) -> bool {
        self.perfect_memory
    }

    /// Applies to every area, including areas added later
    fn set_perfect_memory(&mut self, enabled: bool) {
        self.perfect_memory = enabled;
        for area in &mut self.areas {
            area.set_perfect_memory(enabled);
        }
    }

    fn wipe_out_memory(&mut self) {
        for area in &mut self.areas {
            area.wipe_out_memory();
        }
    }
}

/// One block per area: a header with the portal to the next area
/// (`O`/`X` open/closed when its low end has been seen, `o`/`x` otherwise),
/// then the area itself.
impl<A> fmt::Display for LayeredAreas<A>
where
    A: Exploration + ObstacleRegistry + fmt::Display,
    A::NodeId: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, area) in self.areas.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "=== Area {}", index)?;
            if let Some(portal) = self.portals.get(index) {
                let c = match (portal.open, area.has_been_seen(portal.low)) {
                    (true, true) => 'O',
                    (false, true) => 'X',
                    (true, false) => 'o',
                    (false, false) => 'x',
                };
                write!(f, ", portal: {} --{}-> {}", portal.low, c, portal.high)?;
            }
            write!(f, "\n{}", area)?;
        }
        Ok(())
    }
}

impl<A> fmt::Debug for LayeredAreas<A>
where
    A: Exploration + ObstacleRegistry + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayeredAreas")
            .field("areas", &self.areas)
            .field("portals", &self.portals)
            .field("perfect_memory", &self.perfect_memory)
            .field("config", &self.config)
            .finish()
    }
}
