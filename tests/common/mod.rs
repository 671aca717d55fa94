#![allow(dead_code)]

use bevy_ecs::{entity::Entity, event::Events, world::World};
use boomer::{
    ai::behavior::{Behavior, Brain, Intelligence},
    config::GameConfig,
    constants::{enemy, player, powerup::EXIT_LOCKED_NOTICE_INTERVAL, TILE_SIZE},
    events::{GameEvent, PlayerInput},
    game::Game,
    map::{
        grid::Grid,
        level::{Cell, EnemyDescription, ExitDescription, LevelDescription},
        parser::MapTileParser,
    },
    powerup::{ActiveEffects, DropTable},
    systems::{
        Bomb, Collider, Cooldown, DeltaTime, Enemy, EnemyBundle, ExitNotice, GameRng, GameStatus, LevelStats,
        PlayerBundle, PlayerControlled, PlayerStats, Position, Velocity,
    },
};
use glam::IVec2;

pub const TEST_SEED: u64 = 7;

/// One tick at the fixed 60 Hz step.
pub const DT: f32 = 1.0 / 60.0;

/// A 7x7 room with a hard-wall border and an empty interior.
pub const OPEN_ROOM: [&str; 7] = [
    "#######",
    "#     #",
    "#     #",
    "#     #",
    "#     #",
    "#     #",
    "#######",
];

/// A 13x11 arena with nothing but a border.
pub const ARENA: [&str; 11] = [
    "#############",
    "#@          #",
    "#           #",
    "#           #",
    "#           #",
    "#           #",
    "#           #",
    "#           #",
    "#           #",
    "#           #",
    "#############",
];

/// A seeded configuration with default tuning.
pub fn test_config() -> GameConfig {
    GameConfig {
        seed: Some(TEST_SEED),
        ..GameConfig::default()
    }
}

/// Builds a grid straight from map rows, markers included as floor or exit.
pub fn grid_from_rows(rows: &[&str]) -> Grid {
    let parsed = MapTileParser::parse_board(rows).expect("test board should parse");
    let mut grid = Grid::new(parsed.width, parsed.height, TILE_SIZE);
    for (i, kind) in parsed.tiles.iter().enumerate() {
        let pos = IVec2::new(i as i32 % parsed.width as i32, i as i32 / parsed.width as i32);
        grid.set_tile(pos, *kind);
    }
    if let Some(exit) = parsed.exit {
        grid.set_exit(exit);
    }
    grid
}

/// Replaces single characters in a board, for building variations of a layout.
pub fn with_tiles(rows: &[&str], edits: &[(i32, i32, char)]) -> Vec<String> {
    let mut rows: Vec<Vec<char>> = rows.iter().map(|row| row.chars().collect()).collect();
    for &(col, row, symbol) in edits {
        rows[row as usize][col as usize] = symbol;
    }
    rows.into_iter().map(String::from_iter).collect()
}

/// A level with a visible exit, the given enemies, and no power-up drops.
pub fn level<S: AsRef<str>>(rows: &[S], exit: IVec2, enemies: Vec<EnemyDescription>) -> LevelDescription {
    let parsed = MapTileParser::parse_board(rows).expect("test board should parse");
    LevelDescription {
        title: Some("Test".to_string()),
        width: parsed.width,
        height: parsed.height,
        tile_size: TILE_SIZE,
        tiles: rows.iter().map(|row| row.as_ref().to_string()).collect(),
        player_start: Cell::from(parsed.player_start.expect("test board needs a player start")),
        exit: Some(ExitDescription {
            col: exit.x,
            row: exit.y,
            hidden_under_soft_wall: false,
        }),
        enemies,
        powerup_probabilities: Some(DropTable::NEVER),
    }
}

pub fn create_game(description: &LevelDescription, config: GameConfig) -> Game {
    Game::new(description, config).expect("test level should be valid")
}

/// Runs `ticks` fixed steps, draining events after every tick.
pub fn run_ticks(game: &mut Game, ticks: usize) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        game.tick(DT);
        events.extend(game.drain_events());
    }
    events
}

/// Runs fixed steps for roughly `seconds`, draining events after every tick.
pub fn run_for(game: &mut Game, seconds: f32) -> Vec<GameEvent> {
    run_ticks(game, (seconds / DT).ceil() as usize)
}

pub fn count_events(events: &[GameEvent], predicate: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|event| predicate(event)).count()
}

/// Spawns an armed bomb and registers it on the grid.
pub fn spawn_bomb(world: &mut World, tile: IVec2, power: u32, fuse_time: f32) -> Entity {
    world.resource_mut::<Grid>().add_bomb(tile);
    world.spawn(Bomb::new(tile, power, Entity::PLACEHOLDER, fuse_time)).id()
}

pub fn player_entity(world: &mut World) -> Entity {
    world
        .query_filtered::<Entity, bevy_ecs::query::With<PlayerControlled>>()
        .single(world)
        .expect("there should be exactly one player")
}

/// A world with every resource the systems expect, without a schedule.
pub fn create_test_world(grid: Grid) -> World {
    let config = test_config();
    let mut world = World::new();
    world.init_resource::<Events<GameEvent>>();
    world.insert_resource(DeltaTime::from_seconds(DT));
    world.insert_resource(PlayerInput::default());
    world.insert_resource(GameStatus::Playing);
    world.insert_resource(ExitNotice(Cooldown::new(EXIT_LOCKED_NOTICE_INTERVAL)));
    world.insert_resource(LevelStats::default());
    world.insert_resource(GameRng::from_config(&config));
    world.insert_resource(DropTable::NEVER);
    world.insert_resource(grid);
    world.insert_resource(config);
    world
}

pub fn spawn_test_player(world: &mut World, tile: IVec2) -> Entity {
    let config = world.resource::<GameConfig>().clone();
    let position = Position::at_tile(world.resource::<Grid>(), tile);
    world
        .spawn(PlayerBundle {
            player: PlayerControlled,
            position,
            velocity: Velocity::default(),
            collider: Collider::new(config.player.radius, player::HIT_SCALE, player::CONTACT_SCALE),
            stats: PlayerStats::new(&config.player),
            effects: ActiveEffects::default(),
        })
        .id()
}

pub fn spawn_test_enemy(world: &mut World, tile: IVec2, behavior: Behavior) -> Entity {
    let position = Position::at_tile(world.resource::<Grid>(), tile);
    world
        .spawn(EnemyBundle {
            enemy: Enemy {
                brain: Brain::new(behavior, Intelligence::Basic),
                speed: enemy::SPEED,
            },
            position,
            velocity: Velocity::default(),
            collider: Collider::new(enemy::RADIUS, enemy::HIT_SCALE, enemy::CONTACT_SCALE),
        })
        .id()
}

/// Takes every event written so far in a bare test world.
pub fn drain_world_events(world: &mut World) -> Vec<GameEvent> {
    world.resource_mut::<Events<GameEvent>>().drain().collect()
}
