/*
search.rs

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

//! Find a path between two cells of the grid.
//!
//! Four interchangeable algorithms share the same neighbor expansion: a step goes to one of the
//! four orthogonal cells, which must be inside the grid, not blocked, and not an obstacle.
//!
//! - [`Algorithm::Dfs`] follows a stack and returns the first path found. Not the shortest.
//! - [`Algorithm::Bfs`] explores layer by layer and returns a shortest path.
//! - [`Algorithm::Dijkstra`] settles cells by increasing distance with unit weights.
//! - [`Algorithm::AStar`] orders the frontier by distance plus the Manhattan distance to the goal.
//!
//! Searches do not use hidden randomness: the same inputs always give the same path. The DFS
//! neighbor order is shuffled only when [`SearchOptions::dfs_seed`] is set.

use clap::ValueEnum;
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap, HashSet, VecDeque};
use std::fmt;

use super::grid::{Direction, Grid, Position};

/// Positions that a search must avoid in addition to the blocked cells.
pub trait Obstacles {
    /// Whether the position cannot be walked on.
    fn blocks(&self, pos: Position) -> bool;
}

impl Obstacles for HashSet<Position> {
    fn blocks(&self, pos: Position) -> bool {
        self.contains(&pos)
    }
}

impl Obstacles for BTreeSet<Position> {
    fn blocks(&self, pos: Position) -> bool {
        self.contains(&pos)
    }
}

impl Obstacles for [Position] {
    fn blocks(&self, pos: Position) -> bool {
        self.contains(&pos)
    }
}

/// Search algorithm.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum)]
pub enum Algorithm {
    Dfs,
    Bfs,
    Dijkstra,
    #[value(name = "astar")]
    AStar,
}

impl Algorithm {
    /// All the algorithms.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Dfs,
        Algorithm::Bfs,
        Algorithm::Dijkstra,
        Algorithm::AStar,
    ];

    /// Whether the algorithm always returns a path with the minimum number of steps.
    pub fn is_shortest(&self) -> bool {
        !matches!(self, Algorithm::Dfs)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Algorithm::Dfs => write!(f, "DFS"),
            Algorithm::Bfs => write!(f, "BFS"),
            Algorithm::Dijkstra => write!(f, "Dijkstra"),
            Algorithm::AStar => write!(f, "A*"),
        }
    }
}

/// Ordered sequence of moves from a start cell (excluded) to a goal cell (included).
///
/// An empty path means that the start is the goal.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Path {
    /// Cells visited after the start, the last one being the goal.
    cells: Vec<Position>,

    /// Move leading to each cell of [`Path::cells`].
    moves: Vec<Direction>,
}

impl Path {
    /// Build the path from the start and the list of cells that follow it.
    fn from_cells(start: Position, cells: Vec<Position>) -> Self {
        let mut previous: Position = start;
        let mut moves: Vec<Direction> = Vec::with_capacity(cells.len());
        for cell in &cells {
            if let Some(d) = Direction::between(previous, *cell) {
                moves.push(d);
            }
            previous = *cell;
        }
        Self { cells, moves }
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the path has no steps.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Return the cells of the path.
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Return the moves of the path.
    pub fn moves(&self) -> &[Direction] {
        &self.moves
    }

    /// Return the first move, used as a hint.
    pub fn first_move(&self) -> Option<Direction> {
        self.moves.first().copied()
    }

    /// Return the last cell of the path.
    pub fn last(&self) -> Option<Position> {
        self.cells.last().copied()
    }
}

/// Tuning of a search.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// Seed used to shuffle the DFS neighbor order. The order is Up, Down, Left, Right when not
    /// set.
    pub dfs_seed: Option<u64>,

    /// Maximum number of expanded cells. The search reports no path when it is reached.
    pub step_budget: Option<usize>,
}

/// Result of a search, with statistics for comparing the algorithms.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Algorithm that ran.
    pub algorithm: Algorithm,

    /// Path found, or `None` if the goal cannot be reached.
    pub path: Option<Path>,

    /// Number of cells taken out of the frontier.
    pub expanded: usize,
}

/// Find a path with the given algorithm, or `None` if the goal cannot be reached.
pub fn find_path<O: Obstacles + ?Sized>(
    grid: &Grid,
    start: Position,
    goal: Position,
    obstacles: &O,
    algorithm: Algorithm,
) -> Option<Path> {
    search(
        grid,
        start,
        goal,
        obstacles,
        algorithm,
        &SearchOptions::default(),
    )
    .path
}

/// Run the given algorithm and return the path with the search statistics.
pub fn search<O: Obstacles + ?Sized>(
    grid: &Grid,
    start: Position,
    goal: Position,
    obstacles: &O,
    algorithm: Algorithm,
    options: &SearchOptions,
) -> SearchOutcome {
    let mut searcher: Searcher<O> = Searcher {
        grid,
        obstacles,
        start,
        goal,
        budget: options.step_budget,
        expanded: 0,
        came_from: HashMap::new(),
    };

    let path: Option<Path> = if start == goal {
        Some(Path::default())
    } else {
        match algorithm {
            Algorithm::Dfs => searcher.dfs(options.dfs_seed),
            Algorithm::Bfs => searcher.bfs(),
            Algorithm::Dijkstra => searcher.dijkstra(),
            Algorithm::AStar => searcher.astar(),
        }
    };

    match &path {
        Some(p) => debug!(
            "{algorithm}: {start} -> {goal} in {} steps ({} cells expanded)",
            p.len(),
            searcher.expanded
        ),
        None => debug!(
            "{algorithm}: no path from {start} to {goal} ({} cells expanded)",
            searcher.expanded
        ),
    }

    SearchOutcome {
        algorithm,
        path,
        expanded: searcher.expanded,
    }
}

/// State shared by the four algorithms.
struct Searcher<'a, O: Obstacles + ?Sized> {
    grid: &'a Grid,
    obstacles: &'a O,
    start: Position,
    goal: Position,
    budget: Option<usize>,
    expanded: usize,

    /// Predecessor of each discovered cell.
    came_from: HashMap<Position, Position>,
}

impl<O: Obstacles + ?Sized> Searcher<'_, O> {
    /// Return the cells reachable in one step from the given cell.
    fn expand(&self, pos: Position) -> Vec<Position> {
        self.grid
            .neighbors4(pos)
            .into_iter()
            .filter(|p| !self.grid.is_blocked(*p) && !self.obstacles.blocks(*p))
            .collect()
    }

    /// Count one more expanded cell. Return `false` when the budget is exhausted.
    fn take_step(&mut self) -> bool {
        if let Some(budget) = self.budget
            && self.expanded >= budget
        {
            debug!("    Step budget of {budget} cells exhausted");
            return false;
        }
        self.expanded += 1;
        true
    }

    /// Walk back the predecessors from the goal.
    fn reconstruct(&self) -> Path {
        let mut cells: Vec<Position> = Vec::new();
        let mut current: Position = self.goal;
        while current != self.start {
            cells.push(current);
            match self.came_from.get(&current) {
                Some(p) => current = *p,
                None => break,
            }
        }
        cells.reverse();
        Path::from_cells(self.start, cells)
    }

    fn dfs(&mut self, seed: Option<u64>) -> Option<Path> {
        let mut rng: Option<StdRng> = seed.map(StdRng::seed_from_u64);
        let mut visited: HashSet<Position> = HashSet::new();
        let mut stack: Vec<Position> = vec![self.start];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if !self.take_step() {
                return None;
            }
            if current == self.goal {
                return Some(self.reconstruct());
            }

            let mut next: Vec<Position> = self.expand(current);
            if let Some(r) = rng.as_mut() {
                next.shuffle(r);
            }
            // Push in reverse so that the first neighbor is explored first
            for n in next.into_iter().rev() {
                if !visited.contains(&n) {
                    self.came_from.insert(n, current);
                    stack.push(n);
                }
            }
        }
        None
    }

    fn bfs(&mut self) -> Option<Path> {
        let mut visited: HashSet<Position> = HashSet::from([self.start]);
        let mut queue: VecDeque<Position> = VecDeque::from([self.start]);

        while let Some(current) = queue.pop_front() {
            if !self.take_step() {
                return None;
            }
            if current == self.goal {
                return Some(self.reconstruct());
            }
            for n in self.expand(current) {
                if visited.insert(n) {
                    self.came_from.insert(n, current);
                    queue.push_back(n);
                }
            }
        }
        None
    }

    fn dijkstra(&mut self) -> Option<Path> {
        let mut distance: HashMap<Position, usize> = HashMap::from([(self.start, 0)]);
        let mut settled: HashSet<Position> = HashSet::new();
        let mut heap: BinaryHeap<Reverse<(usize, Position)>> = BinaryHeap::new();
        heap.push(Reverse((0, self.start)));

        while let Some(Reverse((d, current))) = heap.pop() {
            if !settled.insert(current) {
                continue;
            }
            if !self.take_step() {
                return None;
            }
            if current == self.goal {
                return Some(self.reconstruct());
            }
            for n in self.expand(current) {
                let candidate: usize = d + 1;
                if candidate < *distance.get(&n).unwrap_or(&usize::MAX) {
                    distance.insert(n, candidate);
                    self.came_from.insert(n, current);
                    heap.push(Reverse((candidate, n)));
                }
            }
        }
        None
    }

    fn astar(&mut self) -> Option<Path> {
        let goal: Position = self.goal;
        let mut g_score: HashMap<Position, usize> = HashMap::from([(self.start, 0)]);
        let mut closed: HashSet<Position> = HashSet::new();
        let mut open: BinaryHeap<Reverse<(usize, usize, Position)>> = BinaryHeap::new();
        let h: usize = self.start.manhattan(goal);
        open.push(Reverse((h, h, self.start)));

        while let Some(Reverse((_, _, current))) = open.pop() {
            if !closed.insert(current) {
                continue;
            }
            if !self.take_step() {
                return None;
            }
            if current == goal {
                return Some(self.reconstruct());
            }
            let g: usize = g_score.get(&current).copied().unwrap_or(0);
            for n in self.expand(current) {
                let tentative: usize = g + 1;
                if tentative < *g_score.get(&n).unwrap_or(&usize::MAX) {
                    g_score.insert(n, tentative);
                    self.came_from.insert(n, current);
                    let h: usize = n.manhattan(goal);
                    open.push(Reverse((tentative + h, h, n)));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_obstacles() -> HashSet<Position> {
        HashSet::new()
    }

    fn open_room() -> Grid {
        Grid::from_ascii(&[
            "#######",
            "#     #",
            "#     #",
            "#     #",
            "#######",
        ])
    }

    fn corridor_with_detour() -> Grid {
        Grid::from_ascii(&[
            "#########",
            "#       #",
            "# ##### #",
            "#       #",
            "#########",
        ])
    }

    /// Verify that the path is a chain of open, adjacent cells ending at the goal.
    fn assert_walkable(grid: &Grid, start: Position, goal: Position, path: &Path) {
        let mut previous = start;
        for (cell, d) in path.cells().iter().zip(path.moves()) {
            assert_eq!(previous.step(*d), Some(*cell));
            assert!(!grid.is_blocked(*cell));
            previous = *cell;
        }
        assert_eq!(path.cells().len(), path.moves().len());
        assert_eq!(path.last().unwrap_or(start), goal);
    }

    #[test]
    fn start_is_goal_gives_empty_path() {
        let grid = open_room();
        let pos = Position::new(2, 3);
        for algorithm in Algorithm::ALL {
            let path = find_path(&grid, pos, pos, &no_obstacles(), algorithm);
            assert_eq!(path, Some(Path::default()), "{algorithm}");
        }
    }

    #[test]
    fn surrounded_goal_is_not_found() {
        let grid = open_room();
        let goal = Position::new(2, 3);
        let obstacles: HashSet<Position> = grid.neighbors4(goal).into_iter().collect();
        for algorithm in Algorithm::ALL {
            let path = find_path(&grid, Position::new(1, 1), goal, &obstacles, algorithm);
            assert!(path.is_none(), "{algorithm}");
        }
    }

    #[test]
    fn obstacle_on_goal_is_not_found() {
        let grid = open_room();
        let goal = Position::new(3, 5);
        for algorithm in Algorithm::ALL {
            let path = find_path(&grid, Position::new(1, 1), goal, &[goal][..], algorithm);
            assert!(path.is_none(), "{algorithm}");
        }
    }

    #[test]
    fn shortest_algorithms_agree_on_length() {
        let grid = corridor_with_detour();
        let start = Position::new(1, 1);
        let goal = Position::new(3, 7);
        let bfs = find_path(&grid, start, goal, &no_obstacles(), Algorithm::Bfs).unwrap();
        assert_eq!(bfs.len(), 8);
        for algorithm in Algorithm::ALL {
            let path = find_path(&grid, start, goal, &no_obstacles(), algorithm).unwrap();
            assert_walkable(&grid, start, goal, &path);
            if algorithm.is_shortest() {
                assert_eq!(path.len(), bfs.len(), "{algorithm}");
            } else {
                assert!(path.len() >= bfs.len());
            }
        }
    }

    #[test]
    fn obstacles_force_the_detour() {
        let grid = corridor_with_detour();
        let start = Position::new(1, 1);
        let goal = Position::new(1, 7);
        let blocked: BTreeSet<Position> = BTreeSet::from([Position::new(1, 4)]);
        for algorithm in Algorithm::ALL {
            let path = find_path(&grid, start, goal, &blocked, algorithm).unwrap();
            assert_walkable(&grid, start, goal, &path);
            assert!(!path.cells().contains(&Position::new(1, 4)));
            if algorithm.is_shortest() {
                assert_eq!(path.len(), 10, "{algorithm}");
            }
        }
    }

    #[test]
    fn searches_are_deterministic() {
        let grid = open_room();
        let start = Position::new(1, 1);
        let goal = Position::new(3, 5);
        for algorithm in Algorithm::ALL {
            let a = find_path(&grid, start, goal, &no_obstacles(), algorithm);
            let b = find_path(&grid, start, goal, &no_obstacles(), algorithm);
            assert_eq!(a, b, "{algorithm}");
        }
        let options = SearchOptions {
            dfs_seed: Some(11),
            step_budget: None,
        };
        let a = search(&grid, start, goal, &no_obstacles(), Algorithm::Dfs, &options);
        let b = search(&grid, start, goal, &no_obstacles(), Algorithm::Dfs, &options);
        assert_eq!(a, b);
    }

    #[test]
    fn astar_expands_fewer_cells_in_open_space() {
        let grid = open_room();
        let start = Position::new(1, 1);
        let goal = Position::new(1, 5);
        let options = SearchOptions::default();
        let bfs = search(&grid, start, goal, &no_obstacles(), Algorithm::Bfs, &options);
        let astar = search(&grid, start, goal, &no_obstacles(), Algorithm::AStar, &options);
        assert_eq!(astar.path.as_ref().map(Path::len), Some(4));
        assert!(astar.expanded < bfs.expanded);
    }

    #[test]
    fn step_budget_gives_up() {
        let grid = corridor_with_detour();
        let start = Position::new(1, 1);
        let goal = Position::new(3, 7);
        let options = SearchOptions {
            dfs_seed: None,
            step_budget: Some(3),
        };
        for algorithm in Algorithm::ALL {
            let outcome = search(&grid, start, goal, &no_obstacles(), algorithm, &options);
            assert!(outcome.path.is_none(), "{algorithm}");
            assert_eq!(outcome.expanded, 3);
        }
    }

    #[test]
    fn first_move_points_to_the_goal() {
        let grid = open_room();
        let path = find_path(
            &grid,
            Position::new(2, 3),
            Position::new(1, 3),
            &no_obstacles(),
            Algorithm::Bfs,
        )
        .unwrap();
        assert_eq!(path.first_move(), Some(Direction::Up));
        assert_eq!(path.moves(), &[Direction::Up]);
    }
}
