//! Procedural board generation.

use glam::IVec2;
use rand::{rngs::SmallRng, seq::IndexedRandom, Rng, SeedableRng};
use tracing::debug;

use crate::constants::BOARD_CELL_SIZE;
use crate::error::{GameResult, LevelError};
use crate::map::level::LevelDescription;
use crate::map::parser::{EMPTY, EXIT, HARD_WALL, PLAYER_START, SOFT_WALL};

/// Generates classic bomberman boards: a hard-wall border, a pillar on every even cell,
/// and a random scattering of soft walls with a clear pocket around the player start.
pub struct MapGenerator {
    width: u32,
    height: u32,
    rng: SmallRng,
}

impl MapGenerator {
    /// Creates a generator for a board of the given size, seeded for reproducible output.
    ///
    /// # Errors
    ///
    /// Boards smaller than 5x5 leave no room for the spawn pocket and are rejected.
    pub fn new(width: u32, height: u32, seed: u64) -> GameResult<Self> {
        if width < 5 || height < 5 {
            return Err(LevelError::InvalidConfig(format!("generated boards must be at least 5x5, got {width}x{height}")).into());
        }
        Ok(Self {
            width,
            height,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// A generator for the standard 13x11 board.
    pub fn standard(seed: u64) -> Self {
        Self {
            width: BOARD_CELL_SIZE.x,
            height: BOARD_CELL_SIZE.y,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generates the rows of a new board.
    ///
    /// The player start `@` is always at (1, 1). The exit `X` is placed on one of the soft
    /// walls, preferring those in the far half of the board. Boards without soft walls get
    /// no exit.
    pub fn generate(&mut self) -> Vec<String> {
        let (width, height) = (self.width as i32, self.height as i32);
        let mut grid = vec![vec![EMPTY; width as usize]; height as usize];
        let set = |grid: &mut Vec<Vec<char>>, pos: IVec2, symbol: char| {
            grid[pos.y as usize][pos.x as usize] = symbol;
        };

        for x in 0..width {
            set(&mut grid, IVec2::new(x, 0), HARD_WALL);
            set(&mut grid, IVec2::new(x, height - 1), HARD_WALL);
        }
        for y in 0..height {
            set(&mut grid, IVec2::new(0, y), HARD_WALL);
            set(&mut grid, IVec2::new(width - 1, y), HARD_WALL);
        }

        for y in (2..height - 2).step_by(2) {
            for x in (2..width - 2).step_by(2) {
                set(&mut grid, IVec2::new(x, y), HARD_WALL);
            }
        }

        let mut soft_walls = Vec::new();
        for y in 2..height - 2 {
            for x in 2..width - 2 {
                if x % 2 == 0 && y % 2 == 0 {
                    continue;
                }
                let density = self.rng.random_range(0.50..0.70);
                if self.rng.random::<f64>() < density {
                    set(&mut grid, IVec2::new(x, y), SOFT_WALL);
                    soft_walls.push(IVec2::new(x, y));
                }
            }
        }

        // Pillars stay; only soft walls are cleared from the pocket.
        let spawn_pocket = [IVec2::new(1, 1), IVec2::new(2, 1), IVec2::new(1, 2), IVec2::new(2, 2)];
        for pos in spawn_pocket {
            if grid[pos.y as usize][pos.x as usize] == SOFT_WALL {
                set(&mut grid, pos, EMPTY);
            }
        }
        soft_walls.retain(|pos| !spawn_pocket.contains(pos));
        set(&mut grid, IVec2::new(1, 1), PLAYER_START);

        let far: Vec<IVec2> = soft_walls
            .iter()
            .copied()
            .filter(|pos| pos.x > width / 2 || pos.y > height / 2)
            .collect();
        let candidates = if far.is_empty() { &soft_walls } else { &far };
        if let Some(exit) = candidates.choose(&mut self.rng) {
            set(&mut grid, *exit, EXIT);
        }

        debug!(width, height, soft_walls = soft_walls.len(), "Generated board");
        grid.into_iter().map(String::from_iter).collect()
    }

    /// Generates a board and wraps it in a level description with the default enemy roster.
    pub fn generate_level(&mut self) -> GameResult<LevelDescription> {
        let rows = self.generate();
        LevelDescription::from_rows(&rows)
    }
}
