//! Danger assessment for enemies that try to stay out of the blast.

use std::collections::HashSet;

use glam::IVec2;
use tracing::trace;

use crate::ai::pathfinding::manhattan;
use crate::map::{direction::Direction, grid::Grid};

/// A per-tick view of which tiles are dangerous.
///
/// A tile is safe when it is walkable, no live explosion covers it, and neither it nor any
/// of its four neighbours holds a bomb.
pub struct ThreatMap<'a> {
    grid: &'a Grid,
    blasted: HashSet<IVec2>,
}

impl<'a> ThreatMap<'a> {
    /// Builds the map from the tiles of every live explosion.
    pub fn new(grid: &'a Grid, explosion_tiles: impl IntoIterator<Item = IVec2>) -> Self {
        Self {
            grid,
            blasted: explosion_tiles.into_iter().collect(),
        }
    }

    pub fn is_blasted(&self, pos: IVec2) -> bool {
        self.blasted.contains(&pos)
    }

    /// Whether a bomb sits on `pos` or next to it.
    pub fn is_near_bomb(&self, pos: IVec2) -> bool {
        self.grid.has_bomb(pos)
            || Direction::DIRECTIONS
                .into_iter()
                .any(|dir| self.grid.has_bomb(pos + dir.as_ivec2()))
    }

    pub fn is_safe(&self, pos: IVec2) -> bool {
        self.grid.is_walkable(pos) && !self.is_blasted(pos) && !self.is_near_bomb(pos)
    }

    /// The safe tile closest to `from` by Manhattan distance, `from` itself included.
    ///
    /// Ties resolve to the first tile in row-major order.
    pub fn nearest_safe_tile(&self, from: IVec2) -> Option<IVec2> {
        self.grid
            .tiles()
            .map(|(pos, _)| pos)
            .filter(|&pos| self.is_safe(pos))
            .min_by_key(|&pos| manhattan(pos, from))
    }

    /// The direction to flee in when standing on an unsafe tile.
    ///
    /// Moves along the axis with the larger distance to the nearest safe tile (vertical on
    /// ties). Returns `None` when `from` is already safe or nothing is safe.
    pub fn escape_direction(&self, from: IVec2) -> Option<Direction> {
        if self.is_safe(from) {
            return None;
        }

        let target = self.nearest_safe_tile(from)?;
        let delta = target - from;
        let direction = if delta.x.abs() > delta.y.abs() {
            Direction::horizontal(delta.x)
        } else {
            Direction::vertical(delta.y)
        };

        trace!(from = ?from, target = ?target, direction = ?direction, "Escaping threat");
        direction
    }
}
