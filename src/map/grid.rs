//! The tile grid: static layout, destructible walls and bomb occupancy.

use std::collections::HashSet;

use bevy_ecs::resource::Resource;
use glam::{IVec2, Vec2};
use smallvec::SmallVec;
use strum_macros::AsRefStr;
use tracing::trace;

use crate::map::direction::Direction;

/// The kind of a single grid tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum TileKind {
    #[default]
    Empty,
    /// Indestructible. Stops movement and explosions.
    HardWall,
    /// Destructible. Stops movement, absorbs the explosion arm that reaches it.
    SoftWall,
    /// Walkable; standing here with every enemy dead wins the level.
    Exit,
}

impl TileKind {
    /// Whether entities may stand on this tile.
    pub const fn is_walkable(self) -> bool {
        matches!(self, TileKind::Empty | TileKind::Exit)
    }

    /// Whether this tile is a wall of either kind.
    pub const fn is_wall(self) -> bool {
        matches!(self, TileKind::HardWall | TileKind::SoftWall)
    }
}

/// Tiles touched by a single explosion. Power 4 covers at most 17 tiles.
pub type ExplosionTiles = SmallVec<[IVec2; 17]>;

/// The playing field.
///
/// Tiles are stored row-major. Coordinates are `IVec2 { x: column, y: row }`; any
/// coordinate outside the grid behaves as a hard wall.
#[derive(Resource, Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    tile_size: f32,
    tiles: Vec<TileKind>,
    bombs: HashSet<IVec2>,
    exit: Option<IVec2>,
}

impl Grid {
    /// Creates a grid of the given size filled with empty tiles.
    pub fn new(width: u32, height: u32, tile_size: f32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            tile_size,
            tiles: vec![TileKind::Empty; (width * height) as usize],
            bombs: HashSet::new(),
            exit: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// The size of the whole grid, in pixels.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.tile_size
    }

    /// The configured exit tile, whether or not it has been revealed yet.
    pub fn exit(&self) -> Option<IVec2> {
        self.exit
    }

    pub fn set_exit(&mut self, exit: IVec2) {
        self.exit = Some(exit);
    }

    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: IVec2) -> Option<usize> {
        self.in_bounds(pos).then(|| (pos.y * self.width + pos.x) as usize)
    }

    /// Returns the tile kind at `pos`, or `None` outside the grid.
    pub fn get(&self, pos: IVec2) -> Option<TileKind> {
        self.index(pos).map(|i| self.tiles[i])
    }

    /// Returns the tile kind at `pos`; coordinates outside the grid report [`TileKind::HardWall`].
    pub fn kind(&self, pos: IVec2) -> TileKind {
        self.get(pos).unwrap_or(TileKind::HardWall)
    }

    /// Overwrites a tile while a level is being built.
    ///
    /// Returns `false` when `pos` is outside the grid.
    pub fn set_tile(&mut self, pos: IVec2, kind: TileKind) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.tiles[i] = kind;
                true
            }
            None => false,
        }
    }

    /// Whether `pos` blocks movement, ignoring bombs.
    pub fn is_blocking(&self, pos: IVec2) -> bool {
        self.kind(pos).is_wall()
    }

    pub fn is_walkable(&self, pos: IVec2) -> bool {
        self.kind(pos).is_walkable()
    }

    /// Walkable and free of bombs.
    pub fn is_open(&self, pos: IVec2) -> bool {
        self.is_walkable(pos) && !self.has_bomb(pos)
    }

    /// Iterates every tile with its coordinate, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = (IVec2, TileKind)> + '_ {
        let width = self.width;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, kind)| (IVec2::new(i as i32 % width, i as i32 / width), *kind))
    }

    pub fn soft_wall_count(&self) -> usize {
        self.tiles.iter().filter(|kind| **kind == TileKind::SoftWall).count()
    }

    pub fn has_bomb(&self, pos: IVec2) -> bool {
        self.bombs.contains(&pos)
    }

    /// Whether a new bomb may be placed on `pos`: walkable floor without a bomb.
    pub fn can_place_bomb(&self, pos: IVec2) -> bool {
        self.is_open(pos)
    }

    /// Registers a bomb on `pos`. Returns `false` if one was already registered there.
    pub fn add_bomb(&mut self, pos: IVec2) -> bool {
        self.bombs.insert(pos)
    }

    /// Deregisters the bomb on `pos`. Returns `false` if there was none.
    pub fn remove_bomb(&mut self, pos: IVec2) -> bool {
        self.bombs.remove(&pos)
    }

    /// Computes the tiles reached by an explosion of `power` centered on `center`.
    ///
    /// The center always comes first. Each arm (up, down, left, right) then extends up to
    /// `power` tiles: a hard wall or the grid edge stops the arm without being included, a
    /// soft wall is included and stops the arm. Bombs never stop an arm.
    pub fn explosion_tiles(&self, center: IVec2, power: u32) -> ExplosionTiles {
        let mut tiles = ExplosionTiles::new();
        tiles.push(center);

        for dir in Direction::DIRECTIONS {
            let step = dir.as_ivec2();
            for distance in 1..=i32::try_from(power).unwrap_or(i32::MAX) {
                let pos = center + step * distance;
                match self.kind(pos) {
                    TileKind::HardWall => break,
                    TileKind::SoftWall => {
                        tiles.push(pos);
                        break;
                    }
                    TileKind::Empty | TileKind::Exit => tiles.push(pos),
                }
            }
        }

        tiles
    }

    /// Destroys the soft wall at `pos`, turning it into the exit if it was hiding it.
    ///
    /// Returns `false` and leaves the grid untouched when `pos` is not a soft wall.
    pub fn destroy_soft_wall(&mut self, pos: IVec2) -> bool {
        if self.get(pos) != Some(TileKind::SoftWall) {
            return false;
        }

        let revealed = if self.exit == Some(pos) {
            TileKind::Exit
        } else {
            TileKind::Empty
        };
        self.set_tile(pos, revealed);
        trace!(tile = ?pos, became = revealed.as_ref(), "Soft wall destroyed");
        true
    }

    /// Pixel coordinates of the center of a tile.
    pub fn tile_center(&self, pos: IVec2) -> Vec2 {
        (pos.as_vec2() + Vec2::splat(0.5)) * self.tile_size
    }

    /// The tile containing a pixel position. May lie outside the grid.
    pub fn pixel_to_tile(&self, pixel: Vec2) -> IVec2 {
        (pixel / self.tile_size).floor().as_ivec2()
    }

    /// Clamps a tile coordinate onto the grid.
    pub fn clamp_tile(&self, pos: IVec2) -> IVec2 {
        pos.clamp(IVec2::ZERO, IVec2::new(self.width - 1, self.height - 1))
    }

    /// The nearest valid tile for a pixel position.
    pub fn nearest_tile(&self, pixel: Vec2) -> IVec2 {
        self.clamp_tile(self.pixel_to_tile(pixel))
    }

    /// Minimum and maximum pixel corners of a tile.
    pub fn tile_bounds(&self, pos: IVec2) -> (Vec2, Vec2) {
        let min = pos.as_vec2() * self.tile_size;
        (min, min + Vec2::splat(self.tile_size))
    }
}
