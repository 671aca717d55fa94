use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::{With, Without},
    system::{Commands, Query, Res, ResMut},
};
use glam::Vec2;
use tracing::{debug, trace};

use crate::collision::{resolve_movement, Blockers};
use crate::config::GameConfig;
use crate::events::{GameEvent, PlayerInput};
use crate::map::grid::Grid;
use crate::powerup::ActiveEffects;
use crate::systems::components::{Bomb, Collider, Dead, DeltaTime, PlayerControlled, PlayerStats, Position, Velocity};

/// Recomputes effective player stats from the base values and every active effect.
///
/// Runs first in the tick, so effects pruned at the end of the previous tick no longer count.
pub fn player_stats_system(mut players: Query<(&mut PlayerStats, &ActiveEffects), Without<Dead>>) {
    for (mut stats, effects) in players.iter_mut() {
        let bonus = effects.total();
        stats.apply(bonus);
    }
}

/// Why a bomb could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementBlocked {
    NoBombsLeft,
    CoolingDown,
    TileOccupied,
}

/// Checks every gate for placing a bomb on the player's current tile, consuming the cooldown on success.
pub fn check_bomb_placement(grid: &Grid, position: &Position, stats: &mut PlayerStats) -> Result<(), PlacementBlocked> {
    if stats.placed_bombs >= stats.bomb_count {
        return Err(PlacementBlocked::NoBombsLeft);
    }
    if !stats.bomb_cooldown.is_ready() {
        return Err(PlacementBlocked::CoolingDown);
    }
    if !grid.can_place_bomb(position.tile) {
        return Err(PlacementBlocked::TileOccupied);
    }
    stats.bomb_cooldown.try_use();
    Ok(())
}

/// Applies the current [`PlayerInput`]: moves the player and places a bomb if requested.
///
/// Movement is resolved against walls and bombs, sliding along whichever axis is free.
/// The bomb request is consumed whether or not placement succeeds.
#[allow(clippy::too_many_arguments)]
pub fn player_control_system(
    mut commands: Commands,
    dt: Res<DeltaTime>,
    config: Res<GameConfig>,
    mut input: ResMut<PlayerInput>,
    mut grid: ResMut<Grid>,
    mut players: Query<
        (Entity, &mut Position, &mut Velocity, &Collider, &mut PlayerStats),
        (With<PlayerControlled>, Without<Dead>),
    >,
    mut events: EventWriter<GameEvent>,
) {
    let place_bomb = std::mem::take(&mut input.place_bomb);

    for (entity, mut position, mut velocity, collider, mut stats) in players.iter_mut() {
        stats.bomb_cooldown.tick(dt.seconds);

        velocity.direction = input.direction.normalize_or_zero();
        let displacement = velocity.direction * stats.speed * dt.seconds;
        if displacement != Vec2::ZERO {
            let result = resolve_movement(&grid, position.pixel, displacement, collider.radius, Blockers::all());
            if let Some(contact) = result.contact {
                trace!(tile = ?contact.tile, obstacle = ?contact.kind, stuck = result.is_stuck(), "Player movement obstructed");
            }
            position.set_pixel(&grid, result.position);
        }

        if !place_bomb {
            continue;
        }

        match check_bomb_placement(&grid, &position, &mut stats) {
            Ok(()) => {
                grid.add_bomb(position.tile);
                stats.placed_bombs += 1;
                commands.spawn(Bomb::new(position.tile, stats.power, entity, config.fuse_time));
                events.write(GameEvent::BombPlaced { tile: position.tile });
                debug!(
                    tile = ?position.tile,
                    power = stats.power,
                    placed = stats.placed_bombs,
                    capacity = stats.bomb_count,
                    "Bomb placed"
                );
            }
            Err(reason) => {
                trace!(tile = ?position.tile, reason = ?reason, "Bomb placement refused");
            }
        }
    }
}
