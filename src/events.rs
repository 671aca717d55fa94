use bevy_ecs::prelude::*;
use glam::{IVec2, Vec2};
use strum_macros::AsRefStr;

use crate::map::direction::Direction;
use crate::powerup::PowerupKind;

/// Who died.
#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr)]
pub enum Victim {
    Player,
    Enemy,
}

/// How they died.
#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr)]
pub enum Cause {
    Explosion,
    EnemyContact,
}

/// Everything observable that happens during a tick, for audio and UI collaborators.
#[derive(Event, Clone, Debug, PartialEq)]
pub enum GameEvent {
    BombPlaced { tile: IVec2 },
    BombExploded { tile: IVec2, power: u32, tiles: usize },
    WallDestroyed { tile: IVec2 },
    ExitRevealed { tile: IVec2 },
    PowerupSpawned { kind: PowerupKind, tile: IVec2 },
    PowerupCollected { kind: PowerupKind, tile: IVec2 },
    EntityDied { victim: Victim, cause: Cause, tile: IVec2 },
    /// The player reached the exit while enemies were still alive.
    ExitLocked { remaining: u32 },
    LevelWon,
    LevelLost,
}

impl GameEvent {
    /// The sound effect associated with this event, if any.
    pub fn sound_name(&self) -> Option<&'static str> {
        match self {
            GameEvent::BombPlaced { .. } => Some("place_bomb"),
            GameEvent::BombExploded { .. } => Some("explosion"),
            GameEvent::PowerupCollected { .. } => Some("powerup"),
            GameEvent::EntityDied {
                victim: Victim::Enemy, ..
            } => Some("enemy_die"),
            GameEvent::EntityDied {
                victim: Victim::Player, ..
            } => Some("player_die"),
            GameEvent::LevelWon => Some("victory"),
            GameEvent::LevelLost => Some("game_over"),
            GameEvent::WallDestroyed { .. }
            | GameEvent::ExitRevealed { .. }
            | GameEvent::PowerupSpawned { .. }
            | GameEvent::ExitLocked { .. } => None,
        }
    }
}

/// Player intent for the next tick.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInput {
    /// Normalized movement direction, zero when idle.
    pub direction: Vec2,
    /// Place a bomb this tick. Consumed by the player control system.
    pub place_bomb: bool,
}

impl PlayerInput {
    /// Combines held directional inputs into a single normalized vector.
    ///
    /// Opposite directions cancel; a diagonal is scaled to unit length.
    pub fn from_directions(directions: &[Direction], place_bomb: bool) -> Self {
        let sum: Vec2 = directions.iter().map(|dir| dir.as_vec2()).sum();
        Self {
            direction: sum.clamp(Vec2::splat(-1.0), Vec2::splat(1.0)).normalize_or_zero(),
            place_bomb,
        }
    }
}
