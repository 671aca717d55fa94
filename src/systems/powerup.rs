use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::{With, Without},
    system::{Commands, Query, Res},
};
use tracing::debug;

use crate::config::GameConfig;
use crate::events::GameEvent;
use crate::powerup::{ActiveEffects, PowerupEffect};
use crate::systems::components::{Dead, DeltaTime, PlayerControlled, PlayerStats, Position, Powerup};

/// Hands the power-up on the player's tile to the player.
pub fn powerup_collection_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut players: Query<(&Position, &mut PlayerStats, &mut ActiveEffects), (With<PlayerControlled>, Without<Dead>)>,
    mut powerups: Query<(Entity, &mut Powerup)>,
    mut events: EventWriter<GameEvent>,
) {
    for (position, mut stats, mut effects) in players.iter_mut() {
        for (entity, mut powerup) in powerups.iter_mut() {
            if powerup.collected || powerup.tile != position.tile {
                continue;
            }

            powerup.collected = true;
            commands.entity(entity).despawn();

            effects.push(PowerupEffect::new(powerup.kind, config.effect_durations.for_kind(powerup.kind)));
            stats.powerups_collected += 1;

            debug!(tile = ?powerup.tile, kind = powerup.kind.as_ref(), active = effects.len(), "Power-up collected");
            events.write(GameEvent::PowerupCollected {
                kind: powerup.kind,
                tile: powerup.tile,
            });
        }
    }
}

/// Ages timed effects and drops the expired ones.
pub fn effect_aging_system(dt: Res<DeltaTime>, mut holders: Query<&mut ActiveEffects>) {
    for mut effects in holders.iter_mut() {
        if effects.is_empty() {
            continue;
        }
        for kind in effects.advance(dt.seconds) {
            debug!(kind = kind.as_ref(), "Power-up effect expired");
        }
    }
}
