use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::{With, Without},
    system::{Commands, Query, Res, ResMut},
};
use glam::Vec2;
use tracing::{debug, info};

use crate::collision::circle_overlaps_tile;
use crate::events::{Cause, GameEvent, Victim};
use crate::map::grid::Grid;
use crate::systems::components::{
    Collider, Dead, DeltaTime, Enemy, Explosion, LevelStats, PlayerControlled, Position,
};

/// Ages explosions and removes the ones that have burned out.
pub fn explosion_aging_system(
    mut commands: Commands,
    dt: Res<DeltaTime>,
    mut explosions: Query<(Entity, &mut Explosion)>,
) {
    for (entity, mut explosion) in explosions.iter_mut() {
        if explosion.timer.tick(dt.seconds) {
            commands.entity(entity).despawn();
        }
    }
}

/// Whether a circle of `radius` at `center` touches any tile of the explosion.
pub fn explosion_hits(grid: &Grid, explosion: &Explosion, center: Vec2, radius: f32) -> bool {
    explosion
        .tiles
        .iter()
        .any(|&tile| circle_overlaps_tile(grid, center, radius, tile))
}

/// Kills every player or enemy caught in a live explosion.
pub fn explosion_hit_system(
    mut commands: Commands,
    grid: Res<Grid>,
    mut stats: ResMut<LevelStats>,
    explosions: Query<&Explosion>,
    players: Query<(Entity, &Position, &Collider), (With<PlayerControlled>, Without<Dead>)>,
    enemies: Query<(Entity, &Position, &Collider), (With<Enemy>, Without<Dead>)>,
    mut events: EventWriter<GameEvent>,
) {
    if explosions.is_empty() {
        return;
    }

    let caught = |position: &Position, collider: &Collider| {
        explosions
            .iter()
            .any(|explosion| explosion_hits(&grid, explosion, position.pixel, collider.hit_radius))
    };

    for (entity, position, collider) in players.iter() {
        if caught(position, collider) {
            info!(tile = ?position.tile, "Player caught in explosion");
            commands.entity(entity).insert(Dead);
            events.write(GameEvent::EntityDied {
                victim: Victim::Player,
                cause: Cause::Explosion,
                tile: position.tile,
            });
        }
    }

    for (entity, position, collider) in enemies.iter() {
        if caught(position, collider) {
            stats.kills += 1;
            debug!(tile = ?position.tile, kills = stats.kills, "Enemy killed");
            commands.entity(entity).despawn();
            events.write(GameEvent::EntityDied {
                victim: Victim::Enemy,
                cause: Cause::Explosion,
                tile: position.tile,
            });
        }
    }
}
