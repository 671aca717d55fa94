//! Power-up kinds, the effects they grant, and the table that decides what a destroyed wall drops.

use bevy_ecs::{component::Component, resource::Resource};
use rand::{seq::IndexedRandom, Rng};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum_macros::AsRefStr;
use tracing::warn;

use crate::constants::powerup::{BOMB_WEIGHT, FIRE_WEIGHT, NONE_WEIGHT, SPEED_MULTIPLIER, SPEED_WEIGHT};
use crate::systems::lifetime::Timer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PowerupKind {
    /// +1 blast power.
    FireIncrease,
    /// +1 simultaneous bomb.
    BombIncrease,
    /// Multiplies movement speed.
    SpeedIncrease,
}

/// A stat modifier held by the player, optionally expiring.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerupEffect {
    pub kind: PowerupKind,
    /// `None` for permanent effects.
    pub timer: Option<Timer>,
    /// Additive bonus for fire/bomb effects, multiplier for speed effects.
    pub magnitude: f32,
}

impl PowerupEffect {
    pub fn new(kind: PowerupKind, duration: Option<f32>) -> Self {
        let magnitude = match kind {
            PowerupKind::FireIncrease | PowerupKind::BombIncrease => 1.0,
            PowerupKind::SpeedIncrease => SPEED_MULTIPLIER,
        };
        Self {
            kind,
            timer: duration.filter(|d| *d > 0.0).map(Timer::new),
            magnitude,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.timer.as_ref().is_some_and(Timer::finished)
    }
}

/// Aggregated bonus from every active effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectBonus {
    pub fire: u32,
    pub bombs: u32,
    pub speed_multiplier: f32,
}

impl Default for EffectBonus {
    fn default() -> Self {
        Self {
            fire: 0,
            bombs: 0,
            speed_multiplier: 1.0,
        }
    }
}

/// Effects currently applied to an entity.
#[derive(Component, Debug, Clone, Default)]
pub struct ActiveEffects {
    effects: SmallVec<[PowerupEffect; 8]>,
}

impl ActiveEffects {
    pub fn push(&mut self, effect: PowerupEffect) {
        self.effects.push(effect);
    }

    pub fn iter(&self) -> impl Iterator<Item = &PowerupEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Advances every timed effect and drops the ones that have run out.
    ///
    /// Returns the kinds that expired.
    pub fn advance(&mut self, dt: f32) -> SmallVec<[PowerupKind; 4]> {
        for effect in self.effects.iter_mut() {
            if let Some(timer) = effect.timer.as_mut() {
                timer.tick(dt);
            }
        }

        let expired = self.effects.iter().filter(|e| e.is_expired()).map(|e| e.kind).collect();
        self.effects.retain(|e| !e.is_expired());
        expired
    }

    /// Fire and bomb bonuses add up, speed bonuses multiply.
    pub fn total(&self) -> EffectBonus {
        self.effects.iter().fold(EffectBonus::default(), |mut bonus, effect| {
            match effect.kind {
                PowerupKind::FireIncrease => bonus.fire += effect.magnitude.round() as u32,
                PowerupKind::BombIncrease => bonus.bombs += effect.magnitude.round() as u32,
                PowerupKind::SpeedIncrease => bonus.speed_multiplier *= effect.magnitude,
            }
            bonus
        })
    }
}

/// Relative weights of each drop outcome for a destroyed soft wall.
///
/// Serialized under the level's `powerup_probabilities` key.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropTable {
    pub fire_increase: f32,
    pub bomb_increase: f32,
    pub speed_increase: f32,
    pub none: f32,
}

impl Default for DropTable {
    fn default() -> Self {
        Self {
            fire_increase: FIRE_WEIGHT,
            bomb_increase: BOMB_WEIGHT,
            speed_increase: SPEED_WEIGHT,
            none: NONE_WEIGHT,
        }
    }
}

impl DropTable {
    /// A table that never drops anything.
    pub const NEVER: DropTable = DropTable {
        fire_increase: 0.0,
        bomb_increase: 0.0,
        speed_increase: 0.0,
        none: 1.0,
    };

    fn outcomes(&self) -> [(Option<PowerupKind>, f32); 4] {
        [
            (Some(PowerupKind::FireIncrease), self.fire_increase),
            (Some(PowerupKind::BombIncrease), self.bomb_increase),
            (Some(PowerupKind::SpeedIncrease), self.speed_increase),
            (None, self.none),
        ]
    }

    /// Chance that a roll produces any power-up at all.
    pub fn drop_rate(&self) -> f32 {
        let outcomes = self.outcomes();
        let total: f32 = outcomes.iter().map(|(_, w)| w.max(0.0)).sum();
        if total <= 0.0 {
            return 0.0;
        }
        (total - self.none.max(0.0)) / total
    }

    /// Rolls a drop. Invalid tables (all zero, negative weights) never drop.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<PowerupKind> {
        match self.outcomes().choose_weighted(rng, |(_, weight)| *weight) {
            Ok((kind, _)) => *kind,
            Err(error) => {
                warn!(?error, table = ?self, "Invalid power-up drop table");
                None
            }
        }
    }
}
