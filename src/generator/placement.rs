/*
placement.rs

Copyright 2025 Hervé Quatremain

This file is part of Trapmaze.

Trapmaze is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Trapmaze is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Trapmaze. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Place the goal and the hazards in a generated maze.
//!
//! The goal is stamped into the grid. Hazards are not: they are kept in a [`HazardSet`] so that the
//! game can hide, reveal, or disarm them without changing the walls.
//!
//! Hazards are added one at a time. After each tentative addition, a breadth-first search verifies
//! that the start still reaches the goal without walking on a hazard. A candidate that would cut
//! the last safe route is rejected and the next one is tried.

use log::{debug, warn};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::grid::{Cell, Grid, Position};
use super::search::{Algorithm, Obstacles, find_path};

/// Set of hazard positions, disjoint from the start and the goal.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct HazardSet {
    hazards: BTreeSet<Position>,
}

impl HazardSet {
    /// Create an empty [`HazardSet`] object.
    pub fn new() -> Self {
        Self {
            hazards: BTreeSet::new(),
        }
    }

    /// Add a hazard. Return `false` if it was already there.
    pub fn insert(&mut self, pos: Position) -> bool {
        self.hazards.insert(pos)
    }

    /// Remove (disarm) a hazard. Return `false` if there was no hazard at that position.
    pub fn remove(&mut self, pos: Position) -> bool {
        self.hazards.remove(&pos)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.hazards.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.hazards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hazards.is_empty()
    }

    /// Iterate over the hazards, sorted by row then column.
    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.hazards.iter()
    }
}

impl Obstacles for HazardSet {
    fn blocks(&self, pos: Position) -> bool {
        self.contains(pos)
    }
}

impl FromIterator<Position> for HazardSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            hazards: iter.into_iter().collect(),
        }
    }
}

/// Choose the goal, stamp it into the grid, and return its position.
///
/// The goal is chosen at random among the open cells in the far half of the grid from the start.
/// If that region is empty, any open cell other than the start is used. If the grid has no such
/// cell at all, the cell next to the bottom-right corner, `(rows - 2, cols - 2)`, is stamped
/// without verification. On a 3x3 grid that cell is the start itself, and with fewer than three
/// rows or columns it is on the border.
pub fn place_goal<R: Rng + ?Sized>(grid: &mut Grid, start: Position, rng: &mut R) -> Position {
    // Only one goal at a time
    if let Some(previous) = grid.goal() {
        grid.set(previous, Cell::Open);
    }

    let candidates: Vec<Position> = grid
        .open_cells()
        .into_iter()
        .filter(|p| *p != start)
        .collect();
    let threshold: usize = (grid.rows() + grid.cols()).saturating_sub(4) / 2;
    let preferred: Vec<Position> = candidates
        .iter()
        .filter(|p| p.manhattan(start) >= threshold)
        .copied()
        .collect();

    let goal: Position = match preferred.choose(rng).or_else(|| candidates.choose(rng)) {
        Some(p) => *p,
        None => {
            let fallback: Position =
                Position::new(grid.rows().saturating_sub(2), grid.cols().saturating_sub(2));
            warn!("No open cell for the goal, using {fallback}");
            fallback
        }
    };
    debug!(
        "Goal at {goal} ({} preferred cells, {} candidates)",
        preferred.len(),
        candidates.len()
    );
    grid.set(goal, Cell::Goal);
    goal
}

/// Select up to `count` hazards so that a safe route from `start` to `goal` remains.
///
/// Fewer hazards are returned when no more cells can be added without cutting the last safe route.
/// That is not an error.
pub fn place_hazards<R: Rng + ?Sized>(
    grid: &Grid,
    count: usize,
    start: Position,
    goal: Position,
    rng: &mut R,
) -> HazardSet {
    let mut hazards: HazardSet = HazardSet::new();

    if find_path(grid, start, goal, &hazards, Algorithm::Bfs).is_none() {
        warn!("No route from {start} to {goal}, no hazard placed");
        return hazards;
    }

    while hazards.len() < count {
        let mut candidates: Vec<Position> = grid
            .positions()
            .filter(|p| grid.get(*p) == Cell::Open)
            .filter(|p| *p != start && *p != goal && !hazards.contains(*p))
            .collect();
        if candidates.is_empty() {
            break;
        }
        candidates.shuffle(rng);

        let mut placed: bool = false;
        for candidate in candidates {
            hazards.insert(candidate);
            if find_path(grid, start, goal, &hazards, Algorithm::Bfs).is_some() {
                debug!("    Hazard placed at {candidate}");
                placed = true;
                break;
            }
            debug!("    Hazard at {candidate} rejected: it cuts the route");
            hazards.remove(candidate);
        }
        // Every remaining cell is on all the safe routes
        if !placed {
            break;
        }
    }

    if hazards.len() < count {
        warn!("Only {} of {count} hazards could be placed", hazards.len());
    }
    hazards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::maze::generate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn goal_is_stamped_far_from_start() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut grid = generate(11, 21, Some(1));
        let start = Position::new(1, 1);
        let goal = place_goal(&mut grid, start, &mut rng);
        assert_eq!(grid.get(goal), Cell::Goal);
        assert_ne!(goal, start);
        assert!(goal.manhattan(start) >= (11 + 21 - 4) / 2);
        assert_eq!(grid.goal(), Some(goal));
    }

    #[test]
    fn goal_replaces_previous_goal() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut grid = generate(11, 11, Some(2));
        let start = Position::new(1, 1);
        place_goal(&mut grid, start, &mut rng);
        let second = place_goal(&mut grid, start, &mut rng);
        let goals = grid.positions().filter(|p| grid.get(*p) == Cell::Goal).count();
        assert_eq!(goals, 1);
        assert_eq!(grid.goal(), Some(second));
    }

    #[test]
    fn goal_falls_back_to_any_open_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        // Every open cell is close to the start
        let mut grid = Grid::from_ascii(&[
            "#########",
            "#  ######",
            "#########",
            "#########",
            "#########",
        ]);
        let goal = place_goal(&mut grid, Position::new(1, 1), &mut rng);
        assert_eq!(goal, Position::new(1, 2));
    }

    #[test]
    fn goal_falls_back_to_default_cell() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut grid = Grid::new(5, 7);
        let goal = place_goal(&mut grid, Position::new(1, 1), &mut rng);
        assert_eq!(goal, Position::new(3, 5));
        assert_eq!(grid.get(goal), Cell::Goal);
    }

    #[test]
    fn default_cell_on_3x3_grid_is_the_start() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut grid = Grid::new(3, 3);
        let goal = place_goal(&mut grid, Position::new(1, 1), &mut rng);
        assert_eq!(goal, Position::new(1, 1));
        assert_eq!(grid.get(goal), Cell::Goal);
    }

    #[test]
    fn hazards_keep_a_safe_route() {
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut grid = generate(11, 21, Some(seed));
            let start = Position::new(1, 1);
            let goal = place_goal(&mut grid, start, &mut rng);
            let hazards = place_hazards(&grid, 10, start, goal, &mut rng);
            assert!(!hazards.contains(start));
            assert!(!hazards.contains(goal));
            assert!(hazards.iter().all(|p| grid.get(*p) == Cell::Open));
            assert!(find_path(&grid, start, goal, &hazards, Algorithm::Bfs).is_some());
        }
    }

    #[test]
    fn corridor_accepts_no_hazard() {
        let mut rng = StdRng::seed_from_u64(5);
        let grid = Grid::from_ascii(&["#######", "#    G#", "#######"]);
        let hazards = place_hazards(&grid, 3, Position::new(1, 1), Position::new(1, 5), &mut rng);
        assert!(hazards.is_empty());
    }

    #[test]
    fn partial_placement_in_small_room() {
        let mut rng = StdRng::seed_from_u64(6);
        // Two routes around the center wall, one of them must stay free
        let grid = Grid::from_ascii(&[
            "#####",
            "#   #",
            "# # #",
            "#  G#",
            "#####",
        ]);
        let start = Position::new(1, 1);
        let goal = Position::new(3, 3);
        let hazards = place_hazards(&grid, 10, start, goal, &mut rng);
        assert!(!hazards.is_empty());
        assert!(hazards.len() < 5);
        assert!(find_path(&grid, start, goal, &hazards, Algorithm::Bfs).is_some());
    }

    #[test]
    fn hazards_can_be_disarmed() {
        let mut hazards: HazardSet = [Position::new(1, 2), Position::new(3, 4)]
            .into_iter()
            .collect();
        assert!(hazards.remove(Position::new(1, 2)));
        assert!(!hazards.remove(Position::new(1, 2)));
        assert_eq!(hazards.len(), 1);
        assert!(hazards.blocks(Position::new(3, 4)));
    }
}
