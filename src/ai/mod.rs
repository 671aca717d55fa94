//! Enemy intelligence: behaviours, grid pathfinding and threat assessment.

pub mod behavior;
pub mod pathfinding;
pub mod threat;
