use std::collections::VecDeque;

use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    system::{Commands, Query, Res, ResMut},
};
use tracing::debug;

use crate::config::GameConfig;
use crate::events::GameEvent;
use crate::map::grid::{Grid, TileKind};
use crate::powerup::DropTable;
use crate::systems::components::{Bomb, BombState, DeltaTime, Explosion, GameRng, PlayerStats, Powerup};
use crate::systems::lifetime::Timer;

/// Advances bomb fuses and detonates the bombs whose fuse has run out.
///
/// Each detonation, in order:
/// 1. computes the blast tiles against the grid as it is now,
/// 2. removes the bomb from the grid and the world,
/// 3. destroys soft walls in the blast, possibly revealing the exit or dropping a power-up,
/// 4. frees a bomb slot for the owner,
/// 5. spawns the explosion.
///
/// With chain reactions enabled, armed bombs inside a blast detonate in the same pass.
#[allow(clippy::too_many_arguments)]
pub fn bomb_fuse_system(
    mut commands: Commands,
    dt: Res<DeltaTime>,
    config: Res<GameConfig>,
    drops: Res<DropTable>,
    mut grid: ResMut<Grid>,
    mut rng: ResMut<GameRng>,
    mut bombs: Query<(Entity, &mut Bomb)>,
    mut owners: Query<&mut PlayerStats>,
    mut events: EventWriter<GameEvent>,
) {
    let mut due: VecDeque<Entity> = VecDeque::new();
    for (entity, mut bomb) in bombs.iter_mut() {
        if bomb.is_armed() && bomb.fuse.tick(dt.seconds) {
            due.push_back(entity);
        }
    }

    while let Some(entity) = due.pop_front() {
        let (tile, power, owner) = match bombs.get_mut(entity) {
            Ok((_, mut bomb)) if bomb.is_armed() => {
                bomb.state = BombState::Exploded;
                (bomb.tile, bomb.power, bomb.owner)
            }
            _ => continue,
        };

        let tiles = grid.explosion_tiles(tile, power);
        grid.remove_bomb(tile);
        commands.entity(entity).despawn();

        for &pos in tiles.iter() {
            if !grid.destroy_soft_wall(pos) {
                continue;
            }
            events.write(GameEvent::WallDestroyed { tile: pos });

            if grid.kind(pos) == TileKind::Exit {
                debug!(tile = ?pos, "Exit revealed");
                events.write(GameEvent::ExitRevealed { tile: pos });
                continue;
            }

            if let Some(kind) = drops.roll(&mut rng.0) {
                commands.spawn(Powerup {
                    kind,
                    tile: pos,
                    collected: false,
                });
                events.write(GameEvent::PowerupSpawned { kind, tile: pos });
                debug!(tile = ?pos, kind = kind.as_ref(), "Power-up dropped");
            }
        }

        if let Ok(mut stats) = owners.get_mut(owner) {
            stats.placed_bombs = stats.placed_bombs.saturating_sub(1);
        }

        if config.chain_reactions {
            for (other, mut bomb) in bombs.iter_mut() {
                if bomb.is_armed() && tiles.contains(&bomb.tile) && !due.contains(&other) {
                    bomb.trigger();
                    due.push_back(other);
                }
            }
        }

        debug!(tile = ?tile, power, tiles = tiles.len(), "Bomb exploded");
        events.write(GameEvent::BombExploded {
            tile,
            power,
            tiles: tiles.len(),
        });
        commands.spawn(Explosion {
            origin: tile,
            tiles,
            timer: Timer::new(config.explosion_duration),
        });
    }
}
