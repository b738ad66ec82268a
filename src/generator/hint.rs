/*
hint.rs

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

//! Select the hint shown to the player.
//!
//! All the algorithms run against the live hazards. Among those that found a path, the shortest
//! wins. On a tie, the order of [`HINT_PREFERENCE`] decides.

use log::debug;
use serde::{Deserialize, Serialize};

use super::grid::{Direction, Grid, Position};
use super::search::{Algorithm, Obstacles, Path, find_path};

/// Preference order when several algorithms return paths of the same length.
///
/// A* is also a shortest-path algorithm, so it ranks with BFS and Dijkstra, ahead of DFS.
pub const HINT_PREFERENCE: [Algorithm; 4] = [
    Algorithm::Bfs,
    Algorithm::AStar,
    Algorithm::Dijkstra,
    Algorithm::Dfs,
];

/// Directional hint.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint {
    /// Algorithm whose path was selected.
    pub algorithm: Algorithm,

    /// First move of the selected path.
    pub direction: Direction,

    /// Number of steps to the goal along the selected path.
    pub steps: usize,
}

/// Result of a hint request.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintOutcome {
    /// Move in the given direction.
    Move(Hint),

    /// The player already stands on the goal.
    AtGoal,

    /// No safe route leads to the goal.
    Trapped,
}

/// Run all the algorithms and return the best path with the algorithm that produced it.
pub fn best_path<O: Obstacles + ?Sized>(
    grid: &Grid,
    from: Position,
    goal: Position,
    obstacles: &O,
) -> Option<(Algorithm, Path)> {
    let mut best: Option<(Algorithm, Path)> = None;

    for algorithm in HINT_PREFERENCE {
        let Some(path) = find_path(grid, from, goal, obstacles, algorithm) else {
            continue;
        };
        // Strictly shorter only, so that earlier algorithms win ties
        let better: bool = match &best {
            Some((_, b)) => path.len() < b.len(),
            None => true,
        };
        if better {
            best = Some((algorithm, path));
        }
    }
    best
}

/// Compute the hint for a player standing on `from`.
pub fn best_hint<O: Obstacles + ?Sized>(
    grid: &Grid,
    from: Position,
    goal: Position,
    obstacles: &O,
) -> HintOutcome {
    let outcome: HintOutcome = match best_path(grid, from, goal, obstacles) {
        None => HintOutcome::Trapped,
        Some((algorithm, path)) => match path.first_move() {
            None => HintOutcome::AtGoal,
            Some(direction) => HintOutcome::Move(Hint {
                algorithm,
                direction,
                steps: path.len(),
            }),
        },
    };
    debug!("Hint from {from}: {outcome:?}");
    outcome
}
