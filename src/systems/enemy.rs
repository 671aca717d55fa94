use bevy_ecs::{
    query::{With, Without},
    system::{Query, Res, ResMut},
};
use glam::Vec2;
use tracing::trace;

use crate::ai::behavior::Perception;
use crate::ai::threat::ThreatMap;
use crate::collision::{resolve_movement, Blockers};
use crate::map::grid::Grid;
use crate::systems::components::{
    Collider, Dead, DeltaTime, Enemy, Explosion, GameRng, PlayerControlled, Position, Velocity,
};

/// Lets every enemy pick its heading for this tick.
pub fn enemy_ai_system(
    dt: Res<DeltaTime>,
    grid: Res<Grid>,
    mut rng: ResMut<GameRng>,
    explosions: Query<&Explosion>,
    players: Query<&Position, (With<PlayerControlled>, Without<Dead>)>,
    mut enemies: Query<(&mut Enemy, &Position, &Collider, &mut Velocity), (Without<PlayerControlled>, Without<Dead>)>,
) {
    let threats = ThreatMap::new(&grid, explosions.iter().flat_map(|explosion| explosion.tiles.iter().copied()));
    let target = players.iter().next().map(|position| position.tile);

    for (mut enemy, position, collider, mut velocity) in enemies.iter_mut() {
        let view = Perception {
            grid: &grid,
            threats: &threats,
            position: position.pixel,
            tile: position.tile,
            radius: collider.radius,
            target,
        };
        let previous = enemy.brain.heading();
        let heading = enemy.brain.decide(&view, dt.seconds, &mut rng.0);
        if heading != previous {
            trace!(tile = ?position.tile, from = ?previous, to = ?heading, chasing = enemy.brain.is_chasing(), "Enemy heading changed");
        }
        velocity.direction = heading.map(|dir| dir.as_vec2()).unwrap_or(Vec2::ZERO);
    }
}

/// Moves enemies along their headings.
///
/// While travelling along one axis an enemy drifts back toward the center line of its
/// lane, which keeps it from catching on wall corners when it turns.
pub fn enemy_movement_system(
    dt: Res<DeltaTime>,
    grid: Res<Grid>,
    mut enemies: Query<(&mut Enemy, &mut Position, &Collider, &Velocity), Without<Dead>>,
) {
    for (mut enemy, mut position, collider, velocity) in enemies.iter_mut() {
        if velocity.direction == Vec2::ZERO {
            continue;
        }

        let step = enemy.speed * dt.seconds;
        let mut displacement = velocity.direction * step;
        let offset = grid.tile_center(position.tile) - position.pixel;
        if velocity.direction.x == 0.0 {
            displacement.x = offset.x.clamp(-step, step);
        } else if velocity.direction.y == 0.0 {
            displacement.y = offset.y.clamp(-step, step);
        }

        let result = resolve_movement(&grid, position.pixel, displacement, collider.radius, Blockers::all());
        let moved_forward = if velocity.direction.x != 0.0 { result.moved_x } else { result.moved_y };
        if !moved_forward {
            enemy.brain.notify_blocked();
        }
        position.set_pixel(&grid, result.position);
    }
}
