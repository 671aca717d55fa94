use boomer::ai::behavior::Intelligence;
use boomer::config::GameConfig;
use boomer::error::{GameError, LevelError};
use boomer::events::{Cause, GameEvent, PlayerInput, Victim};
use boomer::game::Game;
use boomer::map::direction::Direction;
use boomer::map::grid::TileKind;
use boomer::map::level::{EnemyDescription, EnemyKind, ExitDescription};
use boomer::powerup::{DropTable, PowerupKind};
use boomer::systems::{Enemy, Explosion, GameStatus, Position, Powerup, Timer};
use glam::{IVec2, Vec2};
use speculoos::prelude::*;

mod common;

use common::{count_events, ARENA};

/// An enemy walled in on all four sides of (9, 5).
const BOXED_ENEMY: [(i32, i32, char); 4] = [(8, 5, '#'), (10, 5, '#'), (9, 4, '#'), (9, 6, '#')];

fn boxed_enemy() -> EnemyDescription {
    EnemyDescription::new(EnemyKind::Basic, 9, 5, 85.0)
}

fn right() -> PlayerInput {
    PlayerInput::from_directions(&[Direction::Right], false)
}

fn bomb_request() -> PlayerInput {
    PlayerInput::from_directions(&[], true)
}

#[test]
fn test_bomb_blast_reshapes_the_grid() {
    let rows = common::with_tiles(
        &ARENA,
        &[(6, 5, '.'), (7, 5, '.'), (5, 3, '#'), (3, 5, '.'), (5, 8, '.')],
    );
    let config = common::test_config();
    let fuse = config.fuse_time;
    let mut game = common::create_game(&common::level(&rows, IVec2::new(11, 9), vec![]), config);
    common::spawn_bomb(&mut game.world, IVec2::new(5, 5), 2, fuse);

    let early = common::run_for(&mut game, 1.0);
    assert_that(&count_events(&early, |e| matches!(e, GameEvent::BombExploded { .. }))).is_equal_to(0);

    let events = common::run_for(&mut game, 1.1);
    assert_that(&events.contains(&GameEvent::BombExploded {
        tile: IVec2::new(5, 5),
        power: 2,
        tiles: 7,
    }))
    .is_true();
    assert_that(&count_events(&events, |e| matches!(e, GameEvent::WallDestroyed { .. }))).is_equal_to(2);

    let grid = game.grid();
    assert_that(&grid.kind(IVec2::new(6, 5))).is_equal_to(TileKind::Empty);
    assert_that(&grid.kind(IVec2::new(7, 5))).is_equal_to(TileKind::SoftWall);
    assert_that(&grid.kind(IVec2::new(3, 5))).is_equal_to(TileKind::Empty);
    assert_that(&grid.kind(IVec2::new(5, 8))).is_equal_to(TileKind::SoftWall);
    assert_that(&grid.kind(IVec2::new(5, 3))).is_equal_to(TileKind::HardWall);
    assert_that(&grid.has_bomb(IVec2::new(5, 5))).is_false();
    assert_that(&game.status()).is_equal_to(GameStatus::Playing);
}

#[test]
fn test_walls_reveal_exit_and_drop_powerups() {
    let rows = common::with_tiles(&ARENA, &[(4, 5, '.'), (6, 5, '.')]);
    let mut description = common::level(&rows, IVec2::new(4, 5), vec![]);
    description.exit = Some(ExitDescription {
        col: 4,
        row: 5,
        hidden_under_soft_wall: true,
    });
    description.powerup_probabilities = Some(DropTable {
        fire_increase: 0.0,
        bomb_increase: 1.0,
        speed_increase: 0.0,
        none: 0.0,
    });
    let mut game = common::create_game(&description, common::test_config());
    common::spawn_bomb(&mut game.world, IVec2::new(5, 5), 1, 0.0);

    let events = common::run_ticks(&mut game, 1);

    assert_that(&events.contains(&GameEvent::ExitRevealed { tile: IVec2::new(4, 5) })).is_true();
    assert_that(&events.contains(&GameEvent::PowerupSpawned {
        kind: PowerupKind::BombIncrease,
        tile: IVec2::new(6, 5),
    }))
    .is_true();
    assert_that(&count_events(&events, |e| matches!(e, GameEvent::PowerupSpawned { .. }))).is_equal_to(1);
    assert_that(&game.grid().kind(IVec2::new(4, 5))).is_equal_to(TileKind::Exit);

    let view = game.view();
    assert_that(&view.powerups.len()).is_equal_to(1);
    assert_that(&view.powerups[0].tile).is_equal_to(IVec2::new(6, 5));
}

#[test]
fn test_enemy_caught_in_blast_is_killed() {
    let rows = common::with_tiles(&ARENA, &BOXED_ENEMY);
    let mut game = common::create_game(
        &common::level(&rows, IVec2::new(11, 9), vec![boxed_enemy()]),
        common::test_config(),
    );
    assert_that(&game.level_stats().total_enemies).is_equal_to(1);
    common::spawn_bomb(&mut game.world, IVec2::new(9, 5), 1, 0.5);

    let events = common::run_for(&mut game, 1.0);

    assert_that(&events.contains(&GameEvent::EntityDied {
        victim: Victim::Enemy,
        cause: Cause::Explosion,
        tile: IVec2::new(9, 5),
    }))
    .is_true();
    assert_that(&game.level_stats().kills).is_equal_to(1);
    assert_that(&game.view().enemies_remaining()).is_equal_to(0);
    assert_that(&game.status()).is_equal_to(GameStatus::Playing);
}

#[test]
fn test_own_bomb_kills_player() {
    let mut game = common::create_game(&common::level(&ARENA, IVec2::new(11, 9), vec![]), common::test_config());
    game.set_input(bomb_request());

    let events = common::run_for(&mut game, 2.5);

    assert_that(&events.contains(&GameEvent::BombPlaced { tile: IVec2::new(1, 1) })).is_true();
    assert_that(&events.contains(&GameEvent::EntityDied {
        victim: Victim::Player,
        cause: Cause::Explosion,
        tile: IVec2::new(1, 1),
    }))
    .is_true();
    assert_that(&count_events(&events, |e| *e == GameEvent::LevelLost)).is_equal_to(1);
    assert_that(&game.status()).is_equal_to(GameStatus::Lost);
    assert_that(&game.view().player.map(|p| p.alive)).is_equal_to(Some(false));

    // Nothing happens once the level is over.
    let ticks = game.level_stats().ticks;
    assert_that(&common::run_ticks(&mut game, 10).is_empty()).is_true();
    assert_that(&game.level_stats().ticks).is_equal_to(ticks);
}

#[test]
fn test_chaser_contact_kills_player() {
    let chaser = EnemyDescription {
        chase_range: Some(5),
        ..EnemyDescription::new(EnemyKind::Chase, 4, 1, 95.0)
    };
    let mut game = common::create_game(
        &common::level(&ARENA, IVec2::new(11, 9), vec![chaser]),
        common::test_config(),
    );

    let events = common::run_for(&mut game, 3.0);

    assert_that(&events.contains(&GameEvent::EntityDied {
        victim: Victim::Player,
        cause: Cause::EnemyContact,
        tile: IVec2::new(1, 1),
    }))
    .is_true();
    assert_that(&game.status()).is_equal_to(GameStatus::Lost);
}

#[test]
fn test_reaching_exit_with_no_enemies_wins() {
    let mut game = common::create_game(&common::level(&ARENA, IVec2::new(2, 1), vec![]), common::test_config());
    game.set_input(right());

    let events = common::run_ticks(&mut game, 30);

    assert_that(&game.status()).is_equal_to(GameStatus::Won);
    assert_that(&count_events(&events, |e| *e == GameEvent::LevelWon)).is_equal_to(1);

    let position = game.player_position();
    common::run_ticks(&mut game, 10);
    assert_that(&game.player_position()).is_equal_to(position);
}

#[test]
fn test_exit_stays_locked_while_enemies_live() {
    let rows = common::with_tiles(&ARENA, &BOXED_ENEMY);
    let mut game = common::create_game(
        &common::level(&rows, IVec2::new(2, 1), vec![boxed_enemy()]),
        common::test_config(),
    );
    game.set_input(right());
    let mut events = common::run_ticks(&mut game, 12);
    game.set_input(PlayerInput::default());
    events.extend(common::run_ticks(&mut game, 200));

    assert_that(&game.status()).is_equal_to(GameStatus::Playing);
    assert_that(&events.contains(&GameEvent::ExitLocked { remaining: 1 })).is_true();
    // Repeated at most once every two seconds.
    assert_that(&count_events(&events, |e| matches!(e, GameEvent::ExitLocked { .. }))).is_equal_to(2);
}

#[test]
fn test_detonate_all() {
    let mut game = common::create_game(&common::level(&ARENA, IVec2::new(11, 9), vec![]), common::test_config());
    game.set_input(bomb_request());
    let placed = common::run_ticks(&mut game, 1);
    assert_that(&placed).is_equal_to(vec![GameEvent::BombPlaced { tile: IVec2::new(1, 1) }]);

    assert_that(&game.detonate_all()).is_equal_to(1);
    let events = common::run_ticks(&mut game, 1);
    assert_that(&count_events(&events, |e| matches!(e, GameEvent::BombExploded { .. }))).is_equal_to(1);
    assert_that(&game.detonate_all()).is_equal_to(0);
}

#[test]
fn test_chain_reactions_follow_config() {
    for (chain_reactions, expected) in [(false, 1), (true, 2)] {
        let config = GameConfig {
            chain_reactions,
            ..common::test_config()
        };
        let mut game = common::create_game(&common::level(&ARENA, IVec2::new(11, 9), vec![]), config);
        common::spawn_bomb(&mut game.world, IVec2::new(3, 5), 2, 0.0);
        common::spawn_bomb(&mut game.world, IVec2::new(5, 5), 1, 10.0);

        let events = common::run_ticks(&mut game, 1);

        assert_that(&count_events(&events, |e| matches!(e, GameEvent::BombExploded { .. }))).is_equal_to(expected);
        assert_that(&game.grid().has_bomb(IVec2::new(5, 5))).is_equal_to(!chain_reactions);
    }
}

#[test]
fn test_undrained_events_expire_after_two_ticks() {
    let description = common::level(&ARENA, IVec2::new(11, 9), vec![]);

    let mut game = common::create_game(&description, common::test_config());
    game.set_input(bomb_request());
    game.tick(common::DT);
    game.tick(common::DT);
    assert_that(&game.drain_events()).is_equal_to(vec![GameEvent::BombPlaced { tile: IVec2::new(1, 1) }]);

    let mut game = common::create_game(&description, common::test_config());
    game.set_input(bomb_request());
    game.tick(common::DT);
    game.tick(common::DT);
    game.tick(common::DT);
    assert_that(&game.drain_events().is_empty()).is_true();
}

#[test]
fn test_tick_clamps_delta() {
    let mut game = common::create_game(&common::level(&ARENA, IVec2::new(11, 9), vec![]), common::test_config());
    game.set_input(right());

    game.tick(1.0);
    assert_that(&game.player_position()).is_equal_to(Some(Vec2::new(87.0, 72.0)));

    game.tick(f32::NAN);
    game.tick(-1.0);
    assert_that(&game.player_position()).is_equal_to(Some(Vec2::new(87.0, 72.0)));
    assert_that(&game.level_stats().ticks).is_equal_to(3);
}

#[test]
fn test_collected_powerup_applies_next_tick() {
    let mut game = common::create_game(&common::level(&ARENA, IVec2::new(11, 9), vec![]), common::test_config());
    game.world.spawn(Powerup {
        kind: PowerupKind::BombIncrease,
        tile: IVec2::new(1, 1),
        collected: false,
    });

    let events = common::run_ticks(&mut game, 1);
    assert_that(&events).is_equal_to(vec![GameEvent::PowerupCollected {
        kind: PowerupKind::BombIncrease,
        tile: IVec2::new(1, 1),
    }]);
    assert_that(&game.view().player_stats.map(|s| s.bomb_count)).is_equal_to(Some(1));

    common::run_ticks(&mut game, 1);
    let stats = game.view().player_stats.expect("player stats");
    assert_that(&stats.bomb_count).is_equal_to(2);
    assert_that(&stats.powerups_collected).is_equal_to(1);
}

#[test]
fn test_view_reflects_world() {
    let rows = common::with_tiles(&ARENA, &BOXED_ENEMY);
    let mut game = common::create_game(
        &common::level(&rows, IVec2::new(11, 9), vec![boxed_enemy()]),
        common::test_config(),
    );
    game.set_input(bomb_request());
    common::run_ticks(&mut game, 1);

    let view = game.view();
    assert_that(&view.width).is_equal_to(13);
    assert_that(&view.height).is_equal_to(11);
    assert_that(&view.tiles.len()).is_equal_to(143);
    assert_that(&view.tile(IVec2::new(0, 0))).is_equal_to(Some(TileKind::HardWall));
    assert_that(&view.tile(IVec2::new(11, 9))).is_equal_to(Some(TileKind::Exit));
    assert_that(&view.tile(IVec2::new(13, 0))).is_none();
    assert_that(&view.bombs.len()).is_equal_to(1);
    assert_that(&view.bombs[0].tile).is_equal_to(IVec2::new(1, 1));
    assert_that(&(view.bombs[0].fuse_remaining < 1.0)).is_true();
    assert_that(&view.enemies_remaining()).is_equal_to(1);
    assert_that(&view.player.map(|p| p.tile)).is_equal_to(Some(IVec2::new(1, 1)));
    assert_that(&view.status).is_equal_to(GameStatus::Playing);
}

#[test]
fn test_smart_ai_config_promotes_enemies() {
    let config = GameConfig {
        smart_ai: true,
        ..common::test_config()
    };
    let rows = common::with_tiles(&ARENA, &BOXED_ENEMY);
    let mut game = common::create_game(&common::level(&rows, IVec2::new(11, 9), vec![boxed_enemy()]), config);

    let intelligence: Vec<Intelligence> = game
        .world
        .query::<&Enemy>()
        .iter(&game.world)
        .map(|enemy| enemy.brain.intelligence)
        .collect();
    assert_that(&intelligence).is_equal_to(vec![Intelligence::Smart]);
}

#[test]
fn test_smart_enemy_leaves_a_live_blast_within_one_tick() {
    let config = GameConfig {
        smart_ai: true,
        ..common::test_config()
    };
    // Walls above and below (7, 5) leave (8, 5) as the only way out of the blast.
    let rows = common::with_tiles(&ARENA, &[(7, 4, '#'), (7, 6, '#')]);
    let fast_chaser = EnemyDescription::new(EnemyKind::Chase, 7, 5, 400.0);
    let mut game = common::create_game(&common::level(&rows, IVec2::new(11, 9), vec![fast_chaser]), config);

    let tiles = game.grid().explosion_tiles(IVec2::new(6, 5), 1);
    assert_that(&tiles.contains(&IVec2::new(7, 5))).is_true();
    game.world.spawn(Explosion {
        origin: IVec2::new(6, 5),
        tiles,
        timer: Timer::new(1.0),
    });

    game.tick(0.1);

    let enemies: Vec<IVec2> = game
        .world
        .query::<(&Enemy, &Position)>()
        .iter(&game.world)
        .map(|(_, position)| position.tile)
        .collect();
    assert_that(&enemies).is_equal_to(vec![IVec2::new(8, 5)]);
    assert_that(&game.level_stats().kills).is_equal_to(0);
}

#[test]
fn test_configuration_must_fit_the_tiles() {
    let description = common::level(&ARENA, IVec2::new(11, 9), vec![]);

    let mut small_tiles = description.clone();
    small_tiles.tile_size = 20.0;
    let error = Game::new(&small_tiles, common::test_config()).err().expect("player radius 13 on 20 px tiles");
    assert_that(&matches!(
        error,
        GameError::Level(LevelError::ColliderTooLarge { what: "Player", .. })
    ))
    .is_true();

    let wide_enemies = GameConfig {
        enemy_radius: 24.0,
        ..common::test_config()
    };
    let error = Game::new(&description, wide_enemies).err().expect("enemy radius of half a tile");
    assert_that(&matches!(
        error,
        GameError::Level(LevelError::ColliderTooLarge { what: "Enemy", .. })
    ))
    .is_true();

    let mut fast_player = common::test_config();
    fast_player.player.max_speed = 480.0;
    let error = Game::new(&description, fast_player).err().expect("player crosses a tile per tick");
    assert_that(&matches!(error, GameError::Level(LevelError::TooFast { what: "Player", .. }))).is_true();

    assert_that(&Game::new(&description, common::test_config()).is_ok()).is_true();
}
