//! The Entity-Component-System (ECS) module.
//!
//! This module contains the components, resources and systems that make up a tick.

pub mod bomb;
pub mod components;
pub mod enemy;
pub mod explosion;
pub mod lifetime;
pub mod player;
pub mod powerup;
pub mod state;

pub use self::bomb::*;
pub use self::components::*;
pub use self::enemy::*;
pub use self::explosion::*;
pub use self::lifetime::*;
pub use self::player::*;
pub use self::powerup::*;
pub use self::state::*;
