//! Circle-versus-grid collision and axis-separated movement resolution.

use bitflags::bitflags;
use glam::{IVec2, Vec2};
use smallvec::SmallVec;

use crate::map::grid::Grid;

bitflags! {
    /// What a moving circle collides with.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Blockers: u8 {
        const WALLS = 1 << 0;
        const BOMBS = 1 << 1;
    }
}

/// What a circle ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Wall,
    Bomb,
}

/// The first obstacle found overlapping a circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub kind: ObstacleKind,
    pub tile: IVec2,
    /// Unit vector from the obstacle toward the circle's center.
    pub normal: Vec2,
}

/// The outcome of [`resolve_movement`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    pub position: Vec2,
    pub moved_x: bool,
    pub moved_y: bool,
    /// Present when the full displacement could not be applied.
    pub contact: Option<Contact>,
}

impl MoveResult {
    /// True when the circle did not move at all despite a non-zero displacement.
    pub fn is_stuck(&self) -> bool {
        self.contact.is_some() && !self.moved_x && !self.moved_y
    }
}

/// Closest point to `center` on a tile's rectangle.
fn closest_point(grid: &Grid, tile: IVec2, center: Vec2) -> Vec2 {
    let (min, max) = grid.tile_bounds(tile);
    center.clamp(min, max)
}

/// Whether a circle overlaps a tile's rectangle. Touching edges do not count.
pub fn circle_overlaps_tile(grid: &Grid, center: Vec2, radius: f32, tile: IVec2) -> bool {
    closest_point(grid, tile, center).distance_squared(center) < radius * radius
}

/// The tiles a circle's collision checks consider: the 3x3 block around its center tile.
///
/// Radii are always under half a tile, so nothing outside this block can overlap.
fn neighbourhood(grid: &Grid, center: Vec2) -> impl Iterator<Item = IVec2> {
    let origin = grid.pixel_to_tile(center);
    (-1..=1).flat_map(move |dy| (-1..=1).map(move |dx| origin + IVec2::new(dx, dy)))
}

/// Bomb tiles the circle currently overlaps. These never block the circle.
pub fn overlapped_bombs(grid: &Grid, center: Vec2, radius: f32) -> SmallVec<[IVec2; 4]> {
    neighbourhood(grid, center)
        .filter(|&tile| grid.has_bomb(tile) && circle_overlaps_tile(grid, center, radius, tile))
        .collect()
}

/// Finds the first obstacle a circle at `center` overlaps.
///
/// Tiles outside the grid are walls. Bomb tiles listed in `exempt` are ignored.
pub fn find_contact(grid: &Grid, center: Vec2, radius: f32, blockers: Blockers, exempt: &[IVec2]) -> Option<Contact> {
    neighbourhood(grid, center).find_map(|tile| {
        let kind = if blockers.contains(Blockers::WALLS) && grid.is_blocking(tile) {
            ObstacleKind::Wall
        } else if blockers.contains(Blockers::BOMBS) && grid.has_bomb(tile) && !exempt.contains(&tile) {
            ObstacleKind::Bomb
        } else {
            return None;
        };

        if !circle_overlaps_tile(grid, center, radius, tile) {
            return None;
        }

        let away = center - closest_point(grid, tile, center);
        let normal = if away.length_squared() > f32::EPSILON {
            away.normalize()
        } else {
            (center - grid.tile_center(tile)).normalize_or_zero()
        };
        Some(Contact { kind, tile, normal })
    })
}

/// Moves a circle by `displacement`, sliding along obstacles.
///
/// Tries the full move first. If it collides, each axis is tried on its own and the
/// unblocked ones are kept; when both axes are free individually but not together, the
/// larger component wins (x on ties). When nothing can move the circle stays put and the
/// contact normal points away from the obstacle.
///
/// A circle standing on a bomb tile may always move off it, but never onto another bomb.
pub fn resolve_movement(grid: &Grid, position: Vec2, displacement: Vec2, radius: f32, blockers: Blockers) -> MoveResult {
    if displacement == Vec2::ZERO {
        return MoveResult {
            position,
            moved_x: false,
            moved_y: false,
            contact: None,
        };
    }

    let exempt = overlapped_bombs(grid, position, radius);
    let blocked_at = |target: Vec2| find_contact(grid, target, radius, blockers, &exempt);

    let full = position + displacement;
    let Some(contact) = blocked_at(full) else {
        return MoveResult {
            position: full,
            moved_x: displacement.x != 0.0,
            moved_y: displacement.y != 0.0,
            contact: None,
        };
    };

    let x_only = position + Vec2::new(displacement.x, 0.0);
    let y_only = position + Vec2::new(0.0, displacement.y);
    let x_free = displacement.x != 0.0 && blocked_at(x_only).is_none();
    let y_free = displacement.y != 0.0 && blocked_at(y_only).is_none();

    let (position, moved_x, moved_y) = match (x_free, y_free) {
        (true, true) if displacement.x.abs() >= displacement.y.abs() => (x_only, true, false),
        (true, true) => (y_only, false, true),
        (true, false) => (x_only, true, false),
        (false, true) => (y_only, false, true),
        (false, false) => (position, false, false),
    };

    let contact = if moved_x || moved_y {
        contact
    } else {
        Contact {
            normal: if contact.normal == Vec2::ZERO {
                -displacement.normalize_or_zero()
            } else {
                contact.normal
            },
            ..contact
        }
    };

    MoveResult {
        position,
        moved_x,
        moved_y,
        contact: Some(contact),
    }
}

/// Whether two circles overlap.
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}
