use boomer::config::GameConfig;
use boomer::constants::{bomb, player};
use boomer::error::GameError;
use boomer::events::{Cause, GameEvent, Victim};
use boomer::powerup::PowerupKind;
use glam::IVec2;
use speculoos::prelude::*;

#[test]
fn test_partial_config_keeps_defaults() {
    let config = GameConfig::from_json(
        r#"{
            "seed": 99,
            "chain_reactions": true,
            "player": { "base_power": 2 },
            "effect_durations": { "speed_increase": 10.0 }
        }"#,
    )
    .expect("config should parse");

    assert_that(&config.seed).is_equal_to(Some(99));
    assert_that(&config.chain_reactions).is_true();
    assert_that(&config.smart_ai).is_false();
    assert_that(&config.fuse_time).is_equal_to(bomb::FUSE_TIME);
    assert_that(&config.player.base_power).is_equal_to(2);
    assert_that(&config.player.speed).is_equal_to(player::SPEED);
    assert_that(&config.effect_durations.for_kind(PowerupKind::SpeedIncrease)).is_equal_to(Some(10.0));
    assert_that(&config.effect_durations.for_kind(PowerupKind::FireIncrease)).is_none();
}

#[test]
fn test_empty_config_is_default() {
    let config = GameConfig::from_json("{}").expect("empty object is valid");
    assert_that(&config).is_equal_to(GameConfig::default());
}

#[test]
fn test_bad_config_is_an_error() {
    let error = GameConfig::from_json(r#"{ "fuse_time": "soon" }"#).expect_err("wrong type");
    assert_that(&matches!(error, GameError::Json(_))).is_true();
}

#[test]
fn test_sound_names() {
    assert_that(&GameEvent::BombPlaced { tile: IVec2::ZERO }.sound_name()).is_equal_to(Some("place_bomb"));
    assert_that(
        &GameEvent::EntityDied {
            victim: Victim::Enemy,
            cause: Cause::Explosion,
            tile: IVec2::ZERO,
        }
        .sound_name(),
    )
    .is_equal_to(Some("enemy_die"));
    assert_that(&GameEvent::LevelWon.sound_name()).is_equal_to(Some("victory"));
    assert_that(&GameEvent::WallDestroyed { tile: IVec2::ZERO }.sound_name()).is_none();
}
