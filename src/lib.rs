//! Boomer: the simulation core of a tile-based bomberman clone.

pub mod ai;
pub mod collision;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod game;
pub mod map;
pub mod powerup;
pub mod systems;
pub mod view;
