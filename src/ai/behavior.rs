//! Enemy decision making: wandering, range-gated chasing and threat avoidance.

use glam::{IVec2, Vec2};
use rand::{seq::SliceRandom, Rng};
use strum_macros::AsRefStr;
use tracing::trace;

use crate::ai::pathfinding::{find_path, first_step, manhattan};
use crate::ai::threat::ThreatMap;
use crate::constants::ai::{CHASE_INTERVAL, CHASE_PROBE_MARGIN, WANDER_INTERVAL};
use crate::map::{direction::Direction, grid::Grid};

/// What an enemy does when it is not fleeing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum Behavior {
    Wanderer,
    /// Pursues the player while within `range` tiles (Manhattan), wanders otherwise.
    Chaser { range: u32 },
}

/// How much an enemy reasons about its surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intelligence {
    /// Greedy chasing, no awareness of bombs or explosions.
    #[default]
    Basic,
    /// Flees unsafe tiles and chases along A* paths.
    Smart,
}

/// Everything an enemy can observe when it decides.
pub struct Perception<'a> {
    pub grid: &'a Grid,
    pub threats: &'a ThreatMap<'a>,
    /// Continuous position, in pixels.
    pub position: Vec2,
    pub tile: IVec2,
    pub radius: f32,
    /// The player's tile, when the player is alive.
    pub target: Option<IVec2>,
}

/// Mutable decision state of a single enemy.
#[derive(Debug, Clone)]
pub struct Brain {
    pub behavior: Behavior,
    pub intelligence: Intelligence,
    heading: Option<Direction>,
    since_wander: f32,
    since_chase: f32,
    chasing: bool,
    blocked: bool,
}

impl Brain {
    pub fn new(behavior: Behavior, intelligence: Intelligence) -> Self {
        Self {
            behavior,
            intelligence,
            heading: None,
            // Due immediately so the first tick picks a heading.
            since_wander: WANDER_INTERVAL,
            since_chase: CHASE_INTERVAL,
            chasing: false,
            blocked: false,
        }
    }

    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    pub fn is_chasing(&self) -> bool {
        self.chasing
    }

    /// Marks the last move as blocked so the next decision re-evaluates immediately.
    pub fn notify_blocked(&mut self) {
        self.blocked = true;
    }

    /// Advances the decision clocks and returns the heading for this tick.
    pub fn decide<R: Rng + ?Sized>(&mut self, view: &Perception, dt: f32, rng: &mut R) -> Option<Direction> {
        self.since_wander += dt;
        self.since_chase += dt;

        if self.intelligence == Intelligence::Smart {
            if let Some(escape) = view.threats.escape_direction(view.tile) {
                self.heading = Some(escape);
                self.blocked = false;
                return self.heading;
            }
        }

        let target = match self.behavior {
            Behavior::Wanderer => None,
            Behavior::Chaser { range } => view.target.filter(|&t| manhattan(t, view.tile) <= range),
        };

        match target {
            Some(target) => self.chase(view, target, rng),
            None => {
                if self.chasing {
                    trace!(tile = ?view.tile, "Target out of range, wandering");
                    self.chasing = false;
                }
                self.wander(view.grid, view.tile, rng);
            }
        }

        self.blocked = false;
        self.heading
    }

    fn wander<R: Rng + ?Sized>(&mut self, grid: &Grid, tile: IVec2, rng: &mut R) {
        if !self.blocked && self.since_wander < WANDER_INTERVAL {
            return;
        }
        self.since_wander = 0.0;
        self.heading = wander_heading(grid, tile, self.heading, rng);
    }

    fn chase<R: Rng + ?Sized>(&mut self, view: &Perception, target: IVec2, rng: &mut R) {
        let entering = !self.chasing;
        if !entering && !self.blocked && self.since_chase < CHASE_INTERVAL {
            return;
        }
        self.chasing = true;
        self.since_chase = 0.0;

        if view.tile == target {
            return;
        }

        let heading = match self.intelligence {
            Intelligence::Smart => match find_path(view.grid, view.tile, target, true) {
                Some(path) => first_step(&path),
                None => {
                    trace!(from = ?view.tile, to = ?target, "No path to target, wandering");
                    self.heading = wander_heading(view.grid, view.tile, self.heading, rng);
                    return;
                }
            },
            Intelligence::Basic => greedy_heading(view, target),
        };

        if entering {
            trace!(tile = ?view.tile, target = ?target, heading = ?heading, "Chase started");
        }
        self.heading = heading;
    }
}

/// Keeps the current heading while the next tile is open, otherwise picks a random open one.
pub fn wander_heading<R: Rng + ?Sized>(
    grid: &Grid,
    tile: IVec2,
    current: Option<Direction>,
    rng: &mut R,
) -> Option<Direction> {
    if let Some(dir) = current.filter(|dir| grid.is_open(tile + dir.as_ivec2())) {
        return Some(dir);
    }

    let mut directions = Direction::DIRECTIONS;
    directions.shuffle(rng);
    directions.into_iter().find(|dir| grid.is_open(tile + dir.as_ivec2()))
}

/// Axis-priority pursuit: the axis with the larger gap first, then the other, then anything open.
pub fn greedy_heading(view: &Perception, target: IVec2) -> Option<Direction> {
    let delta = target - view.tile;
    let (primary, secondary) = if delta.x.abs() > delta.y.abs() {
        (Direction::horizontal(delta.x), Direction::vertical(delta.y))
    } else {
        (Direction::vertical(delta.y), Direction::horizontal(delta.x))
    };

    primary
        .into_iter()
        .chain(secondary)
        .chain(Direction::DIRECTIONS)
        .find(|&dir| probe_is_open(view, dir))
}

/// Probes `radius + margin` pixels ahead of the entity.
///
/// If the probe point stays within the current tile, the neighbouring tile is checked instead.
fn probe_is_open(view: &Perception, dir: Direction) -> bool {
    let probe = view.position + dir.as_vec2() * (view.radius + CHASE_PROBE_MARGIN);
    let mut ahead = view.grid.pixel_to_tile(probe);
    if ahead == view.tile {
        ahead = view.tile + dir.as_ivec2();
    }
    view.grid.is_open(ahead)
}
