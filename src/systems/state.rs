use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::{Has, With, Without},
    system::{Commands, Query, Res, ResMut},
};
use tracing::{debug, info};

use crate::collision::circles_overlap;
use crate::events::{Cause, GameEvent, Victim};
use crate::map::grid::{Grid, TileKind};
use crate::systems::components::{
    Collider, Dead, DeltaTime, Enemy, ExitNotice, GameStatus, LevelStats, PlayerControlled, Position,
};

/// Run condition: true while the level is neither won nor lost.
pub fn is_playing(status: Res<GameStatus>) -> bool {
    *status == GameStatus::Playing
}

/// Kills the player on contact with any living enemy.
pub fn enemy_contact_system(
    mut commands: Commands,
    players: Query<(Entity, &Position, &Collider), (With<PlayerControlled>, Without<Dead>)>,
    enemies: Query<(&Position, &Collider), (With<Enemy>, Without<Dead>)>,
    mut events: EventWriter<GameEvent>,
) {
    for (entity, position, collider) in players.iter() {
        let touched = enemies.iter().any(|(enemy_position, enemy_collider)| {
            circles_overlap(
                position.pixel,
                collider.contact_radius,
                enemy_position.pixel,
                enemy_collider.contact_radius,
            )
        });

        if touched {
            info!(tile = ?position.tile, "Player caught by an enemy");
            commands.entity(entity).insert(Dead);
            events.write(GameEvent::EntityDied {
                victim: Victim::Player,
                cause: Cause::EnemyContact,
                tile: position.tile,
            });
        }
    }
}

/// Advances the level clock and decides whether the level is won or lost.
///
/// The level is lost once the player is dead. It is won when no enemy is left and the
/// player stands on the revealed exit; reaching the exit early only produces a notice.
#[allow(clippy::too_many_arguments)]
pub fn level_rules_system(
    dt: Res<DeltaTime>,
    grid: Res<Grid>,
    mut status: ResMut<GameStatus>,
    mut stats: ResMut<LevelStats>,
    mut notice: ResMut<ExitNotice>,
    players: Query<(&Position, Has<Dead>), With<PlayerControlled>>,
    enemies: Query<(), (With<Enemy>, Without<Dead>)>,
    mut events: EventWriter<GameEvent>,
) {
    stats.elapsed += dt.seconds;
    stats.ticks += 1;

    let Some((position, dead)) = players.iter().next() else {
        return;
    };

    if dead {
        *status = GameStatus::Lost;
        info!(elapsed = stats.elapsed, kills = stats.kills, "Level lost");
        events.write(GameEvent::LevelLost);
        return;
    }

    if grid.kind(position.tile) != TileKind::Exit {
        notice.0.expire();
        return;
    }

    let remaining = enemies.iter().count() as u32;
    if remaining == 0 {
        *status = GameStatus::Won;
        info!(elapsed = stats.elapsed, kills = stats.kills, "Level won");
        events.write(GameEvent::LevelWon);
        return;
    }

    notice.0.tick(dt.seconds);
    if notice.0.try_use() {
        debug!(remaining, "Exit locked until every enemy is dead");
        events.write(GameEvent::ExitLocked { remaining });
    }
}
