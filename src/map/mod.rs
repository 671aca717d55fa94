//! The playing field: tiles, level files and board generation.

pub mod direction;
pub mod generator;
pub mod grid;
pub mod level;
pub mod parser;
