//! Read-only snapshots of the simulation for renderers and HUDs.

use glam::{IVec2, Vec2};

use crate::ai::behavior::Behavior;
use crate::map::grid::TileKind;
use crate::powerup::PowerupKind;
use crate::systems::components::GameStatus;

#[derive(Debug, Clone, PartialEq)]
pub struct BombView {
    pub tile: IVec2,
    pub power: u32,
    /// From 1.0 when placed down to 0.0 at detonation.
    pub fuse_remaining: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplosionView {
    pub origin: IVec2,
    pub tiles: Vec<IVec2>,
    /// From 1.0 when spawned down to 0.0 when it burns out.
    pub life_remaining: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub position: Vec2,
    pub tile: IVec2,
    pub radius: f32,
    pub heading: Vec2,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemyView {
    pub position: Vec2,
    pub tile: IVec2,
    pub radius: f32,
    pub heading: Vec2,
    pub behavior: Behavior,
    pub chasing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerupView {
    pub kind: PowerupKind,
    pub tile: IVec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStatsView {
    pub bomb_count: u32,
    pub bombs_placed: u32,
    pub power: u32,
    pub speed: f32,
    pub powerups_collected: u32,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub width: u32,
    pub height: u32,
    pub tile_size: f32,
    /// Row-major tile kinds.
    pub tiles: Vec<TileKind>,
    pub bombs: Vec<BombView>,
    pub explosions: Vec<ExplosionView>,
    pub player: Option<PlayerView>,
    pub player_stats: Option<PlayerStatsView>,
    pub enemies: Vec<EnemyView>,
    pub powerups: Vec<PowerupView>,
    pub status: GameStatus,
    pub kills: u32,
    pub total_enemies: u32,
    pub elapsed: f32,
}

impl FrameView {
    pub fn tile(&self, pos: IVec2) -> Option<TileKind> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width as i32 || pos.y >= self.height as i32 {
            return None;
        }
        self.tiles.get((pos.y * self.width as i32 + pos.x) as usize).copied()
    }

    pub fn enemies_remaining(&self) -> usize {
        self.enemies.len()
    }
}
