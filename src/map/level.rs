//! Level descriptions and their validation into a playable [`Level`].

use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ai::behavior::{Behavior, Intelligence};
use crate::constants::{enemy, MAX_DELTA, RAW_BOARD, TILE_SIZE};
use crate::error::{GameError, GameResult, LevelError, ParseError};
use crate::map::grid::{Grid, TileKind};
use crate::map::parser::{MapTileParser, EMPTY, SOFT_WALL};
use crate::powerup::DropTable;

/// A grid coordinate as written in level files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

impl From<Cell> for IVec2 {
    fn from(cell: Cell) -> Self {
        IVec2::new(cell.col, cell.row)
    }
}

impl From<IVec2> for Cell {
    fn from(pos: IVec2) -> Self {
        Cell::new(pos.x, pos.y)
    }
}

fn default_hidden() -> bool {
    true
}

fn default_tile_size() -> f32 {
    TILE_SIZE
}

fn default_speed() -> f32 {
    enemy::SPEED
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExitDescription {
    pub col: i32,
    pub row: i32,
    /// Whether a soft wall covers the exit until it is destroyed.
    #[serde(default = "default_hidden")]
    pub hidden_under_soft_wall: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Basic,
    Chase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDescription {
    #[serde(rename = "type")]
    pub kind: EnemyKind,
    pub col: i32,
    pub row: i32,
    /// Pixels per second.
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Manhattan range for chasers; defaults to the standard chase range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chase_range: Option<u32>,
    /// Enables threat avoidance and A* chasing for this enemy.
    #[serde(default)]
    pub smart: bool,
}

impl EnemyDescription {
    pub fn new(kind: EnemyKind, col: i32, row: i32, speed: f32) -> Self {
        Self {
            kind,
            col,
            row,
            speed,
            chase_range: None,
            smart: false,
        }
    }
}

/// A level as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    /// One string per row, using the map symbols.
    pub tiles: Vec<String>,
    pub player_start: Cell,
    /// Falls back to the `X` marker in `tiles` (hidden) when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit: Option<ExitDescription>,
    #[serde(default)]
    pub enemies: Vec<EnemyDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub powerup_probabilities: Option<DropTable>,
}

/// Where and how an enemy enters the level.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemySpawn {
    pub cell: IVec2,
    pub behavior: Behavior,
    pub intelligence: Intelligence,
    pub speed: f32,
}

/// A validated level, ready to be instantiated.
#[derive(Debug, Clone)]
pub struct Level {
    pub title: String,
    pub grid: Grid,
    pub player_start: IVec2,
    pub exit: IVec2,
    pub enemies: Vec<EnemySpawn>,
    pub drops: DropTable,
}

/// Enemies placed on levels that do not list their own: three wanderers and one chaser.
pub fn default_roster() -> Vec<EnemyDescription> {
    vec![
        EnemyDescription::new(EnemyKind::Basic, 1, 3, 85.0),
        EnemyDescription::new(EnemyKind::Basic, 11, 3, 85.0),
        EnemyDescription::new(EnemyKind::Basic, 1, 5, 80.0),
        EnemyDescription {
            chase_range: Some(enemy::CHASE_RANGE),
            ..EnemyDescription::new(EnemyKind::Chase, 11, 5, 95.0)
        },
    ]
}

impl LevelDescription {
    pub fn from_json(json: &str) -> GameResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> GameResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds a description from map rows with the default enemy roster.
    ///
    /// `@` marks the player start and `X` an exit hidden under a soft wall. Soft walls on
    /// roster cells are cleared; roster entries outside the board, on hard walls or on a marker are dropped.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> GameResult<Self> {
        let parsed = MapTileParser::parse_board(rows)?;
        let player_start = parsed.player_start.ok_or(ParseError::MissingPlayerStart)?;

        let mut tiles: Vec<Vec<char>> = rows.iter().map(|row| row.as_ref().chars().collect()).collect();
        let enemies: Vec<EnemyDescription> = default_roster()
            .into_iter()
            .filter(|e| {
                let cell = IVec2::new(e.col, e.row);
                cell != player_start
                    && parsed.exit != Some(cell)
                    && parsed.tile(cell).is_some_and(|kind| kind != TileKind::HardWall)
            })
            .collect();
        for enemy in &enemies {
            let symbol = &mut tiles[enemy.row as usize][enemy.col as usize];
            if *symbol == SOFT_WALL {
                *symbol = EMPTY;
            }
        }

        Ok(Self {
            title: None,
            width: parsed.width,
            height: parsed.height,
            tile_size: TILE_SIZE,
            tiles: tiles.into_iter().map(String::from_iter).collect(),
            player_start: player_start.into(),
            exit: parsed.exit.map(|exit| ExitDescription {
                col: exit.x,
                row: exit.y,
                hidden_under_soft_wall: true,
            }),
            enemies,
            powerup_probabilities: None,
        })
    }

    /// Parses the plain-text `.map` format: one line per row, no header.
    pub fn from_map_text(text: &str) -> GameResult<Self> {
        let mut rows: Vec<&str> = text.lines().map(|line| line.trim_end_matches('\r')).collect();
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }
        Self::from_rows(&rows)
    }

    /// The built-in board.
    pub fn default_board() -> GameResult<Self> {
        let mut description = Self::from_rows(&RAW_BOARD)?;
        description.title = Some("Default".to_string());
        Ok(description)
    }

    /// Loads a `.json` or `.map` level file.
    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut description = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&text)?,
            Some("map") => Self::from_map_text(&text)?,
            other => {
                return Err(GameError::Level(LevelError::InvalidConfig(format!(
                    "unsupported level format {:?} for {}",
                    other.unwrap_or(""),
                    path.display()
                ))))
            }
        };
        if description.title.is_none() {
            description.title = path.file_stem().map(|stem| stem.to_string_lossy().into_owned());
        }
        Ok(description)
    }

    /// Validates the description and builds the grid.
    ///
    /// # Errors
    ///
    /// Returns an error when the layout does not match the declared size, contains unknown
    /// symbols, or when the player, exit or any enemy lies outside the grid. The player and
    /// enemies must also start on walkable tiles, and no enemy may cover a whole tile in a
    /// single clamped tick.
    pub fn build(&self) -> GameResult<Level> {
        if self.width == 0 || self.height == 0 {
            return Err(LevelError::EmptyLevel {
                width: self.width,
                height: self.height,
            }
            .into());
        }
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(LevelError::InvalidTileSize(self.tile_size).into());
        }

        let parsed = MapTileParser::parse_board(&self.tiles)?;
        if parsed.height != self.height {
            return Err(LevelError::DimensionMismatch {
                axis: "rows",
                declared: self.height,
                actual: parsed.height,
            }
            .into());
        }
        if parsed.width != self.width {
            return Err(LevelError::DimensionMismatch {
                axis: "columns",
                declared: self.width,
                actual: parsed.width,
            }
            .into());
        }

        let mut grid = Grid::new(self.width, self.height, self.tile_size);
        for (i, kind) in parsed.tiles.iter().enumerate() {
            let pos = IVec2::new(i as i32 % self.width as i32, i as i32 / self.width as i32);
            grid.set_tile(pos, *kind);
        }

        let exit = match (self.exit, parsed.exit) {
            (Some(exit), _) => exit,
            (None, Some(marker)) => ExitDescription {
                col: marker.x,
                row: marker.y,
                hidden_under_soft_wall: true,
            },
            (None, None) => return Err(LevelError::InvalidConfig("level has no exit".to_string()).into()),
        };
        let exit_cell = self.check_bounds(&grid, "Exit", IVec2::new(exit.col, exit.row))?;

        // Stray exit markers elsewhere are plain floor.
        let markers: Vec<IVec2> = grid
            .tiles()
            .filter(|(pos, kind)| *kind == TileKind::Exit && *pos != exit_cell)
            .map(|(pos, _)| pos)
            .collect();
        for pos in markers {
            warn!(tile = ?pos, exit = ?exit_cell, "Ignoring stray exit marker");
            grid.set_tile(pos, TileKind::Empty);
        }
        grid.set_tile(
            exit_cell,
            if exit.hidden_under_soft_wall {
                TileKind::SoftWall
            } else {
                TileKind::Exit
            },
        );
        grid.set_exit(exit_cell);

        let player_start = self.check_spawn(&grid, "Player start", self.player_start.into())?;

        let enemies = self
            .enemies
            .iter()
            .enumerate()
            .map(|(index, enemy)| -> GameResult<EnemySpawn> {
                let cell = self.check_spawn(&grid, "Enemy", IVec2::new(enemy.col, enemy.row))?;
                if !(enemy.speed.is_finite() && enemy.speed > 0.0) {
                    return Err(LevelError::InvalidSpeed {
                        index,
                        speed: enemy.speed,
                    }
                    .into());
                }
                if enemy.speed * MAX_DELTA >= self.tile_size {
                    return Err(LevelError::TooFast {
                        what: "Enemy",
                        speed: enemy.speed,
                        tile_size: self.tile_size,
                    }
                    .into());
                }
                let behavior = match enemy.kind {
                    EnemyKind::Basic => Behavior::Wanderer,
                    EnemyKind::Chase => Behavior::Chaser {
                        range: enemy.chase_range.unwrap_or(enemy::CHASE_RANGE),
                    },
                };
                Ok(EnemySpawn {
                    cell,
                    behavior,
                    intelligence: if enemy.smart {
                        Intelligence::Smart
                    } else {
                        Intelligence::Basic
                    },
                    speed: enemy.speed,
                })
            })
            .collect::<GameResult<Vec<_>>>()?;

        let title = self.title.clone().unwrap_or_else(|| "Untitled".to_string());
        debug!(
            title = %title,
            width = self.width,
            height = self.height,
            enemies = enemies.len(),
            soft_walls = grid.soft_wall_count(),
            exit = ?exit_cell,
            "Level built"
        );

        Ok(Level {
            title,
            grid,
            player_start,
            exit: exit_cell,
            enemies,
            drops: self.powerup_probabilities.unwrap_or_default(),
        })
    }

    fn check_bounds(&self, grid: &Grid, what: &'static str, cell: IVec2) -> Result<IVec2, LevelError> {
        if grid.in_bounds(cell) {
            Ok(cell)
        } else {
            Err(LevelError::OutOfBounds {
                what,
                cell,
                width: self.width,
                height: self.height,
            })
        }
    }

    fn check_spawn(&self, grid: &Grid, what: &'static str, cell: IVec2) -> Result<IVec2, LevelError> {
        let cell = self.check_bounds(grid, what, cell)?;
        if grid.is_walkable(cell) {
            Ok(cell)
        } else {
            Err(LevelError::BlockedSpawn { what, cell })
        }
    }
}
