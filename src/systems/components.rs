use bevy_ecs::{bundle::Bundle, component::Component, entity::Entity, resource::Resource};
use glam::{IVec2, Vec2};
use rand::{rngs::SmallRng, SeedableRng};
use strum_macros::AsRefStr;

use crate::ai::behavior::Brain;
use crate::config::{GameConfig, PlayerConfig};
use crate::map::grid::{ExplosionTiles, Grid};
use crate::powerup::{ActiveEffects, EffectBonus, PowerupKind};
use crate::systems::lifetime::{Cooldown, Timer};

/// A tag component for entities that are controlled by the player.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// Marks an entity that has been killed. Dead entities never act again.
#[derive(Default, Component, Debug)]
pub struct Dead;

/// Continuous position plus the grid tile derived from it.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub pixel: Vec2,
    pub tile: IVec2,
}

impl Position {
    /// A position centered on `tile`.
    pub fn at_tile(grid: &Grid, tile: IVec2) -> Self {
        Self {
            pixel: grid.tile_center(tile),
            tile,
        }
    }

    /// Moves to `pixel` and snaps the tile to the nearest valid cell.
    pub fn set_pixel(&mut self, grid: &Grid, pixel: Vec2) {
        self.pixel = pixel;
        self.tile = grid.nearest_tile(pixel);
    }
}

/// Circle dimensions used by the different collision checks.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// Against walls and bombs.
    pub radius: f32,
    /// Against explosion tiles.
    pub hit_radius: f32,
    /// Against other entities.
    pub contact_radius: f32,
}

impl Collider {
    pub fn new(radius: f32, hit_scale: f32, contact_scale: f32) -> Self {
        Self {
            radius,
            hit_radius: radius * hit_scale,
            contact_radius: radius * contact_scale,
        }
    }
}

/// The player's current heading, as a normalized vector (zero when idle).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub direction: Vec2,
}

/// Base and effective player stats.
///
/// Effective values are recomputed from the base values and the active effects at the
/// start of every tick.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PlayerStats {
    pub base_bomb_count: u32,
    pub base_power: u32,
    pub base_speed: f32,
    pub max_bomb_count: u32,
    pub max_power: u32,
    pub max_speed: f32,
    pub bomb_count: u32,
    pub power: u32,
    pub speed: f32,
    /// Bombs placed by this player that have not exploded yet.
    pub placed_bombs: u32,
    pub powerups_collected: u32,
    pub bomb_cooldown: Cooldown,
}

impl PlayerStats {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            base_bomb_count: config.base_bomb_count,
            base_power: config.base_power,
            base_speed: config.speed,
            max_bomb_count: config.max_bomb_count,
            max_power: config.max_power,
            max_speed: config.max_speed,
            bomb_count: config.base_bomb_count,
            power: config.base_power,
            speed: config.speed,
            placed_bombs: 0,
            powerups_collected: 0,
            bomb_cooldown: Cooldown::new(config.bomb_cooldown),
        }
    }

    /// Applies an aggregated bonus on top of the base stats, clamped to the caps.
    pub fn apply(&mut self, bonus: EffectBonus) {
        self.bomb_count = (self.base_bomb_count + bonus.bombs).min(self.max_bomb_count.max(self.base_bomb_count));
        self.power = (self.base_power + bonus.fire).min(self.max_power.max(self.base_power));
        self.speed = (self.base_speed * bonus.speed_multiplier).min(self.max_speed.max(self.base_speed));
    }

    pub fn bombs_available(&self) -> u32 {
        self.bomb_count.saturating_sub(self.placed_bombs)
    }
}

/// An enemy's decision state and speed.
#[derive(Component, Debug, Clone)]
pub struct Enemy {
    pub brain: Brain,
    /// Pixels per second.
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum BombState {
    Armed,
    Exploded,
}

#[derive(Component, Debug, Clone)]
pub struct Bomb {
    pub tile: IVec2,
    pub power: u32,
    pub owner: Entity,
    pub fuse: Timer,
    pub state: BombState,
}

impl Bomb {
    pub fn new(tile: IVec2, power: u32, owner: Entity, fuse_time: f32) -> Self {
        Self {
            tile,
            power,
            owner,
            fuse: Timer::new(fuse_time),
            state: BombState::Armed,
        }
    }

    /// Forces the bomb to explode on the next fuse update.
    pub fn trigger(&mut self) {
        if self.state == BombState::Armed {
            self.fuse.finish();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.state == BombState::Armed
    }
}

/// A live blast. Its tiles are fixed when it spawns.
#[derive(Component, Debug, Clone)]
pub struct Explosion {
    pub origin: IVec2,
    pub tiles: ExplosionTiles,
    pub timer: Timer,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub tile: IVec2,
    pub collected: bool,
}

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: PlayerControlled,
    pub position: Position,
    pub velocity: Velocity,
    pub collider: Collider,
    pub stats: PlayerStats,
    pub effects: ActiveEffects,
}

#[derive(Bundle)]
pub struct EnemyBundle {
    pub enemy: Enemy,
    pub position: Position,
    pub velocity: Velocity,
    pub collider: Collider,
}

/// Time elapsed during the current tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DeltaTime {
    pub seconds: f32,
}

impl DeltaTime {
    pub fn from_seconds(seconds: f32) -> Self {
        Self { seconds }
    }
}

/// The source of every random decision in a game.
#[derive(Resource, Debug)]
pub struct GameRng(pub SmallRng);

impl GameRng {
    pub fn from_config(config: &GameConfig) -> Self {
        match config.seed {
            Some(seed) => Self(SmallRng::seed_from_u64(seed)),
            None => Self(SmallRng::from_rng(&mut rand::rng())),
        }
    }
}

/// Whether the level is still being played.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr)]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

/// Counters shown on the result screen.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct LevelStats {
    pub kills: u32,
    pub total_enemies: u32,
    pub elapsed: f32,
    pub ticks: u64,
}

/// Paces the "exit locked" notice while the player waits on the exit.
#[derive(Resource, Debug, Clone)]
pub struct ExitNotice(pub Cooldown);
