//! This module contains all the constants used in the game.

use std::time::Duration;

use glam::UVec2;

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The largest delta a single tick will simulate, in seconds.
///
/// Longer frames (a window drag, a debugger pause) are clamped so that bombs and
/// enemies never skip through walls.
pub const MAX_DELTA: f32 = 0.1;

/// The size of each tile, in pixels.
pub const TILE_SIZE: f32 = 48.0;
/// The size of a generated board, in tiles.
pub const BOARD_CELL_SIZE: UVec2 = UVec2::new(13, 11);

pub mod bomb {
    /// Seconds between placement and detonation.
    pub const FUSE_TIME: f32 = 2.0;
    /// Seconds an explosion stays lethal.
    pub const EXPLOSION_DURATION: f32 = 0.3;
}

pub mod player {
    /// Movement speed in pixels per second.
    pub const SPEED: f32 = 150.0;
    pub const SPEED_MAX: f32 = 250.0;
    /// Collision radius against walls and bombs.
    pub const RADIUS: f32 = 13.0;
    /// Fraction of the radius used when checking explosion hits.
    pub const HIT_SCALE: f32 = 0.7;
    /// Fraction of the radius used for enemy contact.
    pub const CONTACT_SCALE: f32 = 0.8;
    /// Minimum seconds between two bomb placements.
    pub const BOMB_COOLDOWN: f32 = 0.2;

    pub const BASE_BOMB_COUNT: u32 = 1;
    pub const BASE_BOMB_POWER: u32 = 1;
    pub const MAX_BOMB_COUNT: u32 = 3;
    pub const MAX_BOMB_POWER: u32 = 4;
}

pub mod enemy {
    pub const RADIUS: f32 = 10.0;
    pub const HIT_SCALE: f32 = 0.8;
    pub const CONTACT_SCALE: f32 = 0.8;
    /// Default movement speed in pixels per second.
    pub const SPEED: f32 = 85.0;
    /// Default Manhattan chase range, in tiles.
    pub const CHASE_RANGE: u32 = 5;
}

pub mod ai {
    /// Seconds between wander heading re-evaluations.
    pub const WANDER_INTERVAL: f32 = 0.5;
    /// Seconds between chase re-targets.
    pub const CHASE_INTERVAL: f32 = 0.3;
    /// Distance beyond the collider edge probed before committing to a chase heading.
    pub const CHASE_PROBE_MARGIN: f32 = 10.0;
}

pub mod powerup {
    /// Multiplier applied to speed per collected speed power-up.
    pub const SPEED_MULTIPLIER: f32 = 1.2;

    pub const FIRE_WEIGHT: f32 = 0.05;
    pub const BOMB_WEIGHT: f32 = 0.15;
    pub const SPEED_WEIGHT: f32 = 0.15;
    pub const NONE_WEIGHT: f32 = 0.65;

    /// Seconds between two "exit locked" notices while standing on the exit.
    pub const EXIT_LOCKED_NOTICE_INTERVAL: f32 = 2.0;
}

/// The default layout used when no level is supplied, as rows of tile symbols.
pub const RAW_BOARD: [&str; BOARD_CELL_SIZE.y as usize] = [
    "#############",
    "#@  . . . . #",
    "# #.#.#.#.# #",
    "#  . . . .  #",
    "#.#.#.#.#.#.#",
    "#  . .X. .  #",
    "#.#.#.#.#.#.#",
    "#  . . . .  #",
    "# #.#.#.#.# #",
    "#   . . .   #",
    "#############",
];
