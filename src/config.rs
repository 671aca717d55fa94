//! Runtime tuning, layered over the compile-time defaults in [`constants`](crate::constants).

use std::path::Path;

use bevy_ecs::resource::Resource;
use serde::{Deserialize, Serialize};

use crate::constants::{bomb, enemy, player};
use crate::error::GameResult;
use crate::powerup::PowerupKind;

/// Player tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub speed: f32,
    pub radius: f32,
    pub bomb_cooldown: f32,
    pub base_bomb_count: u32,
    pub base_power: u32,
    pub max_bomb_count: u32,
    pub max_power: u32,
    pub max_speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: player::SPEED,
            radius: player::RADIUS,
            bomb_cooldown: player::BOMB_COOLDOWN,
            base_bomb_count: player::BASE_BOMB_COUNT,
            base_power: player::BASE_BOMB_POWER,
            max_bomb_count: player::MAX_BOMB_COUNT,
            max_power: player::MAX_BOMB_POWER,
            max_speed: player::SPEED_MAX,
        }
    }
}

/// How long each kind of power-up lasts once collected. `None` is permanent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectDurations {
    pub fire_increase: Option<f32>,
    pub bomb_increase: Option<f32>,
    pub speed_increase: Option<f32>,
}

impl EffectDurations {
    pub fn for_kind(&self, kind: PowerupKind) -> Option<f32> {
        match kind {
            PowerupKind::FireIncrease => self.fire_increase,
            PowerupKind::BombIncrease => self.bomb_increase,
            PowerupKind::SpeedIncrease => self.speed_increase,
        }
    }
}

/// Simulation settings shared by every system.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for every random decision. Unseeded games draw one from the OS.
    pub seed: Option<u64>,
    pub fuse_time: f32,
    pub explosion_duration: f32,
    /// Explosions detonate the armed bombs they reach in the same tick.
    pub chain_reactions: bool,
    /// Promotes every enemy to smart behaviour.
    pub smart_ai: bool,
    pub enemy_radius: f32,
    pub player: PlayerConfig,
    pub effect_durations: EffectDurations,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            fuse_time: bomb::FUSE_TIME,
            explosion_duration: bomb::EXPLOSION_DURATION,
            chain_reactions: false,
            smart_ai: false,
            enemy_radius: enemy::RADIUS,
            player: PlayerConfig::default(),
            effect_durations: EffectDurations::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> GameResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}
