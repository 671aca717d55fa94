//! Centralized error types for the simulation.
//!
//! Only level loading and configuration can fail. Once a [`Game`](crate::game::Game)
//! exists, every tick either succeeds or absorbs the failure locally.

use std::io;

use glam::IVec2;

/// Main error type for the simulation.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Map parsing error: {0}")]
    MapParse(#[from] ParseError),

    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error type for map parsing operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("Unknown character {character:?} at column {col}, row {row}")]
    UnknownCharacter { character: char, col: usize, row: usize },
    #[error("Row {row} has {found} columns, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("Board has no rows")]
    EmptyBoard,
    #[error("Board has no player start marker")]
    MissingPlayerStart,
}

/// Errors raised while validating a level description.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LevelError {
    #[error("Level declares {declared} {axis} but the tile layout has {actual}")]
    DimensionMismatch {
        axis: &'static str,
        declared: u32,
        actual: u32,
    },

    #[error("Level must be at least 1x1, got {width}x{height}")]
    EmptyLevel { width: u32, height: u32 },

    #[error("Tile size must be positive, got {0}")]
    InvalidTileSize(f32),

    #[error("{what} at {cell} lies outside the {width}x{height} grid")]
    OutOfBounds {
        what: &'static str,
        cell: IVec2,
        width: u32,
        height: u32,
    },

    #[error("{what} at {cell} is not on a walkable tile")]
    BlockedSpawn { what: &'static str, cell: IVec2 },

    #[error("Enemy {index} has invalid speed {speed}")]
    InvalidSpeed { index: usize, speed: f32 },

    #[error("{what} radius {radius} must be under half of the {tile_size} tile")]
    ColliderTooLarge {
        what: &'static str,
        radius: f32,
        tile_size: f32,
    },

    #[error("{what} speed {speed} would cross a whole {tile_size} tile in one tick")]
    TooFast {
        what: &'static str,
        speed: f32,
        tile_size: f32,
    },

    #[error("Invalid level configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
