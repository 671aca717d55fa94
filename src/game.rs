//! This module contains the main game logic and state.

use bevy_ecs::{
    event::Events,
    query::{Has, With},
    schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, SystemSet},
    world::World,
};
use glam::Vec2;
use tracing::info;

use crate::ai::behavior::{Brain, Intelligence};
use crate::config::GameConfig;
use crate::constants::{enemy, player, powerup::EXIT_LOCKED_NOTICE_INTERVAL, MAX_DELTA};
use crate::error::{GameResult, LevelError};
use crate::events::{GameEvent, PlayerInput};
use crate::map::grid::Grid;
use crate::map::level::{Level, LevelDescription};
use crate::powerup::ActiveEffects;
use crate::systems::{
    bomb_fuse_system, effect_aging_system, enemy_ai_system, enemy_contact_system, enemy_movement_system,
    explosion_aging_system, explosion_hit_system, is_playing, level_rules_system, player_control_system,
    player_stats_system, powerup_collection_system, Bomb, Collider, Cooldown, Dead, DeltaTime, Enemy, EnemyBundle,
    ExitNotice, Explosion, GameRng, GameStatus, LevelStats, PlayerBundle, PlayerControlled, PlayerStats, Position,
    Powerup, Velocity,
};
use crate::view::{BombView, EnemyView, ExplosionView, FrameView, PlayerStatsView, PlayerView, PowerupView};

/// The phases of a tick, in execution order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Player stats and control.
    Input,
    /// Enemy decisions and movement.
    Motion,
    /// Explosion aging, bomb fuses and blast hits.
    Hazards,
    /// Power-up collection and effect aging.
    Pickups,
    /// Contact deaths and win/lose checks.
    Rules,
}

/// Core game state manager built on the Bevy ECS architecture.
///
/// Owns the world and the schedule; one call to [`Game::tick`] advances every entity by
/// one step in a fixed order.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
}

impl Game {
    /// Validates a level description and starts a game on it.
    ///
    /// # Errors
    ///
    /// Returns an error when the description fails validation, or when the configured
    /// colliders or player speed do not fit the level's tiles.
    pub fn new(description: &LevelDescription, config: GameConfig) -> GameResult<Game> {
        let level = description.build()?;
        Self::check_fits(&config, level.grid.tile_size())?;
        Ok(Self::from_level(level, config))
    }

    /// Collision only scans the 3x3 neighbourhood, so radii stay under half a tile and no
    /// entity may cross a whole tile in one clamped tick.
    fn check_fits(config: &GameConfig, tile_size: f32) -> Result<(), LevelError> {
        for (what, radius) in [("Player", config.player.radius), ("Enemy", config.enemy_radius)] {
            if !(radius.is_finite() && radius > 0.0 && radius < tile_size / 2.0) {
                return Err(LevelError::ColliderTooLarge {
                    what,
                    radius,
                    tile_size,
                });
            }
        }

        let fastest = config.player.speed.max(config.player.max_speed);
        if fastest * MAX_DELTA >= tile_size {
            return Err(LevelError::TooFast {
                what: "Player",
                speed: fastest,
                tile_size,
            });
        }
        Ok(())
    }

    /// Starts a game on an already validated level.
    pub fn from_level(level: Level, config: GameConfig) -> Game {
        let mut world = World::default();
        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);

        Self::setup_ecs(&mut world);
        Self::configure_schedule(&mut schedule);
        Self::spawn_level(&mut world, level, config);

        Game { world, schedule }
    }

    /// Inserts the resources every system expects.
    fn setup_ecs(world: &mut World) {
        world.init_resource::<Events<GameEvent>>();
        world.insert_resource(DeltaTime::default());
        world.insert_resource(PlayerInput::default());
        world.insert_resource(GameStatus::Playing);
        world.insert_resource(ExitNotice(Cooldown::new(EXIT_LOCKED_NOTICE_INTERVAL)));
    }

    fn configure_schedule(schedule: &mut Schedule) {
        schedule.configure_sets(
            (
                SimulationSet::Input.run_if(is_playing),
                SimulationSet::Motion.run_if(is_playing),
                SimulationSet::Hazards.run_if(is_playing),
                SimulationSet::Pickups.run_if(is_playing),
                SimulationSet::Rules.run_if(is_playing),
            )
                .chain(),
        );

        schedule.add_systems((
            (player_stats_system, player_control_system)
                .chain()
                .in_set(SimulationSet::Input),
            (enemy_ai_system, enemy_movement_system)
                .chain()
                .in_set(SimulationSet::Motion),
            (explosion_aging_system, bomb_fuse_system, explosion_hit_system)
                .chain()
                .in_set(SimulationSet::Hazards),
            (powerup_collection_system, effect_aging_system)
                .chain()
                .in_set(SimulationSet::Pickups),
            (enemy_contact_system, level_rules_system)
                .chain()
                .in_set(SimulationSet::Rules),
        ));
    }

    fn spawn_level(world: &mut World, level: Level, config: GameConfig) {
        let grid = level.grid;

        let player_stats = PlayerStats::new(&config.player);
        world.spawn(PlayerBundle {
            player: PlayerControlled,
            position: Position::at_tile(&grid, level.player_start),
            velocity: Velocity::default(),
            collider: Collider::new(config.player.radius, player::HIT_SCALE, player::CONTACT_SCALE),
            stats: player_stats,
            effects: ActiveEffects::default(),
        });

        for spawn in &level.enemies {
            let intelligence = if config.smart_ai {
                Intelligence::Smart
            } else {
                spawn.intelligence
            };
            world.spawn(EnemyBundle {
                enemy: Enemy {
                    brain: Brain::new(spawn.behavior, intelligence),
                    speed: spawn.speed,
                },
                position: Position::at_tile(&grid, spawn.cell),
                velocity: Velocity::default(),
                collider: Collider::new(config.enemy_radius, enemy::HIT_SCALE, enemy::CONTACT_SCALE),
            });
        }

        info!(
            title = %level.title,
            width = grid.width(),
            height = grid.height(),
            enemies = level.enemies.len(),
            exit = ?level.exit,
            seed = ?config.seed,
            "Level started"
        );

        world.insert_resource(LevelStats {
            total_enemies: level.enemies.len() as u32,
            ..LevelStats::default()
        });
        world.insert_resource(GameRng::from_config(&config));
        world.insert_resource(level.drops);
        world.insert_resource(grid);
        world.insert_resource(config);
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Deltas are clamped to `[0, MAX_DELTA]`; a zero delta (pause) still runs the schedule
    /// but nothing moves or ages. Events not drained within two ticks are dropped.
    pub fn tick(&mut self, dt: f32) {
        let seconds = if dt.is_finite() { dt.clamp(0.0, MAX_DELTA) } else { 0.0 };
        self.world.insert_resource(DeltaTime::from_seconds(seconds));
        self.world.resource_mut::<Events<GameEvent>>().update();
        self.schedule.run(&mut self.world);
    }

    /// Sets the player's intent for the following ticks.
    ///
    /// The bomb request stays pending until a tick consumes it.
    pub fn set_input(&mut self, input: PlayerInput) {
        let mut current = self.world.resource_mut::<PlayerInput>();
        current.direction = input.direction.normalize_or_zero();
        current.place_bomb |= input.place_bomb;
    }

    /// Makes every armed bomb explode on the next tick. Returns how many were triggered.
    pub fn detonate_all(&mut self) -> usize {
        let mut bombs = self.world.query::<&mut Bomb>();
        let mut triggered = 0;
        for mut bomb in bombs.iter_mut(&mut self.world) {
            if bomb.is_armed() {
                bomb.trigger();
                triggered += 1;
            }
        }
        triggered
    }

    /// Takes every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.world.resource_mut::<Events<GameEvent>>().drain().collect()
    }

    pub fn status(&self) -> GameStatus {
        *self.world.resource::<GameStatus>()
    }

    pub fn grid(&self) -> &Grid {
        self.world.resource::<Grid>()
    }

    pub fn config(&self) -> &GameConfig {
        self.world.resource::<GameConfig>()
    }

    pub fn level_stats(&self) -> &LevelStats {
        self.world.resource::<LevelStats>()
    }

    /// Builds a snapshot of everything a renderer needs.
    pub fn view(&mut self) -> FrameView {
        let world = &mut self.world;

        let mut bombs: Vec<BombView> = world
            .query::<&Bomb>()
            .iter(world)
            .map(|bomb| BombView {
                tile: bomb.tile,
                power: bomb.power,
                fuse_remaining: bomb.fuse.remaining_fraction(),
            })
            .collect();
        bombs.sort_by_key(|bomb| (bomb.tile.y, bomb.tile.x));

        let explosions = world
            .query::<&Explosion>()
            .iter(world)
            .map(|explosion| ExplosionView {
                origin: explosion.origin,
                tiles: explosion.tiles.to_vec(),
                life_remaining: explosion.timer.remaining_fraction(),
            })
            .collect();

        let (player, player_stats) = world
            .query_filtered::<(&Position, &Velocity, &Collider, &PlayerStats, Has<Dead>), With<PlayerControlled>>()
            .iter(world)
            .next()
            .map(|(position, velocity, collider, stats, dead)| {
                (
                    Some(PlayerView {
                        position: position.pixel,
                        tile: position.tile,
                        radius: collider.radius,
                        heading: velocity.direction,
                        alive: !dead,
                    }),
                    Some(PlayerStatsView {
                        bomb_count: stats.bomb_count,
                        bombs_placed: stats.placed_bombs,
                        power: stats.power,
                        speed: stats.speed,
                        powerups_collected: stats.powerups_collected,
                    }),
                )
            })
            .unwrap_or((None, None));

        let enemies = world
            .query::<(&Enemy, &Position, &Velocity, &Collider)>()
            .iter(world)
            .map(|(enemy, position, velocity, collider)| EnemyView {
                position: position.pixel,
                tile: position.tile,
                radius: collider.radius,
                heading: velocity.direction,
                behavior: enemy.brain.behavior,
                chasing: enemy.brain.is_chasing(),
            })
            .collect();

        let powerups = world
            .query::<&Powerup>()
            .iter(world)
            .filter(|powerup| !powerup.collected)
            .map(|powerup| PowerupView {
                kind: powerup.kind,
                tile: powerup.tile,
            })
            .collect();

        let grid = world.resource::<Grid>();
        let stats = world.resource::<LevelStats>();
        FrameView {
            width: grid.width(),
            height: grid.height(),
            tile_size: grid.tile_size(),
            tiles: grid.tiles().map(|(_, kind)| kind).collect(),
            bombs,
            explosions,
            player,
            player_stats,
            enemies,
            powerups,
            status: *world.resource::<GameStatus>(),
            kills: stats.kills,
            total_enemies: stats.total_enemies,
            elapsed: stats.elapsed,
        }
    }

    /// Pixel position of the player, if it exists.
    pub fn player_position(&mut self) -> Option<Vec2> {
        self.world
            .query_filtered::<&Position, With<PlayerControlled>>()
            .iter(&self.world)
            .next()
            .map(|position| position.pixel)
    }
}
