//! Map parsing functionality for converting raw board layouts into structured data.

use glam::IVec2;

use crate::error::ParseError;
use crate::map::grid::TileKind;

pub const HARD_WALL: char = '#';
pub const SOFT_WALL: char = '.';
pub const EMPTY: char = ' ';
pub const PLAYER_START: char = '@';
pub const EXIT: char = 'X';

/// Represents the parsed data from a raw board layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMap {
    pub width: u32,
    pub height: u32,
    /// The parsed tile layout, row-major.
    pub tiles: Vec<TileKind>,
    /// Position of the `@` marker, if present.
    pub player_start: Option<IVec2>,
    /// Position of the `X` marker, if present.
    pub exit: Option<IVec2>,
}

impl ParsedMap {
    pub fn tile(&self, pos: IVec2) -> Option<TileKind> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width as i32 || pos.y >= self.height as i32 {
            return None;
        }
        self.tiles.get((pos.y as u32 * self.width + pos.x as u32) as usize).copied()
    }
}

/// Parser for converting raw board layouts into structured map data.
pub struct MapTileParser;

impl MapTileParser {
    /// Parses a single character into a tile kind.
    ///
    /// The player start marker is plain floor; the exit marker is an exit tile.
    pub fn parse_character(c: char) -> Option<TileKind> {
        match c {
            HARD_WALL => Some(TileKind::HardWall),
            SOFT_WALL => Some(TileKind::SoftWall),
            EMPTY | PLAYER_START => Some(TileKind::Empty),
            EXIT => Some(TileKind::Exit),
            _ => None,
        }
    }

    /// Parses a raw board layout into structured map data.
    ///
    /// # Arguments
    ///
    /// * `rows` - The board, one string per row
    ///
    /// # Errors
    ///
    /// Returns an error if the board is empty, its rows differ in length, or it
    /// contains an unknown character. When a marker appears more than once the last
    /// occurrence wins.
    pub fn parse_board<S: AsRef<str>>(rows: &[S]) -> Result<ParsedMap, ParseError> {
        let width = rows
            .first()
            .map(|row| row.as_ref().chars().count())
            .filter(|&width| width > 0)
            .ok_or(ParseError::EmptyBoard)?;

        let mut tiles = Vec::with_capacity(width * rows.len());
        let mut player_start = None;
        let mut exit = None;

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(ParseError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }

            for (x, character) in row.chars().enumerate() {
                let tile = Self::parse_character(character).ok_or(ParseError::UnknownCharacter {
                    character,
                    col: x,
                    row: y,
                })?;

                let pos = IVec2::new(x as i32, y as i32);
                match character {
                    PLAYER_START => player_start = Some(pos),
                    EXIT => exit = Some(pos),
                    _ => {}
                }

                tiles.push(tile);
            }
        }

        Ok(ParsedMap {
            width: width as u32,
            height: rows.len() as u32,
            tiles,
            player_start,
            exit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_character() {
        assert_eq!(MapTileParser::parse_character('#'), Some(TileKind::HardWall));
        assert_eq!(MapTileParser::parse_character('.'), Some(TileKind::SoftWall));
        assert_eq!(MapTileParser::parse_character(' '), Some(TileKind::Empty));
        assert_eq!(MapTileParser::parse_character('@'), Some(TileKind::Empty));
        assert_eq!(MapTileParser::parse_character('X'), Some(TileKind::Exit));
        assert_eq!(MapTileParser::parse_character('o'), None);
    }

    #[test]
    fn test_parse_board_markers() {
        let parsed = MapTileParser::parse_board(&["###", "#@#", "#X#"]).unwrap();
        assert_eq!(parsed.width, 3);
        assert_eq!(parsed.height, 3);
        assert_eq!(parsed.player_start, Some(IVec2::new(1, 1)));
        assert_eq!(parsed.exit, Some(IVec2::new(1, 2)));
        assert_eq!(parsed.tile(IVec2::new(1, 1)), Some(TileKind::Empty));
        assert_eq!(parsed.tile(IVec2::new(3, 0)), None);
    }
}
