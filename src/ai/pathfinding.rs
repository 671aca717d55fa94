use glam::IVec2;
use pathfinding::prelude::astar;

use crate::map::{direction::Direction, grid::Grid};

/// Manhattan distance between two tiles.
pub fn manhattan(a: IVec2, b: IVec2) -> u32 {
    let d = (a - b).abs();
    (d.x + d.y) as u32
}

/// Finds the shortest 4-connected path between two tiles.
///
/// Only walkable tiles are traversed. When `avoid_bombs` is set, bomb tiles are treated
/// as walls, except the start tile. Returns the full path including both endpoints, or
/// `None` when the goal cannot be reached.
pub fn find_path(grid: &Grid, start: IVec2, goal: IVec2, avoid_bombs: bool) -> Option<Vec<IVec2>> {
    if !grid.in_bounds(start) || !grid.in_bounds(goal) {
        return None;
    }

    let passable = |pos: IVec2| grid.is_walkable(pos) && !(avoid_bombs && grid.has_bomb(pos));

    astar(
        &start,
        |&pos| {
            Direction::DIRECTIONS
                .into_iter()
                .map(move |dir| pos + dir.as_ivec2())
                .filter(|&next| passable(next))
                .map(|next| (next, 1u32))
                .collect::<Vec<_>>()
        },
        |&pos| manhattan(pos, goal),
        |&pos| pos == goal,
    )
    .map(|(path, _cost)| path)
}

/// The direction of the first step of a path, if it has one.
pub fn first_step(path: &[IVec2]) -> Option<Direction> {
    let [from, to, ..] = path else {
        return None;
    };
    let delta = *to - *from;
    Direction::DIRECTIONS.into_iter().find(|dir| dir.as_ivec2() == delta)
}
