/*
maze.rs

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

//! Generate a random maze by carving passages into a blocked grid.
//!
//! Carving is a randomized depth-first walk (recursive backtracker) that moves two cells at a time
//! and opens the wall in between. The walk uses an explicit stack, so large grids do not hit the
//! recursion limit. The result is a spanning tree: there is exactly one simple path between two
//! open cells. The optional densification pass opens a few straight wall connectors afterward so
//! that the maze has loops and several routes.

use log::{Level, debug, log_enabled, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{HashSet, VecDeque};
use std::error::Error;
use std::fmt;
use std::time::Instant;

use super::grid::{Cell, Direction, Grid, Position};
use crate::config::{DEFAULT_START, LOOP_DIVISOR, MAX_GENERATION_ATTEMPTS, MIN_DIMENSION};

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum GenerateError {
    /// Every attempt produced a grid that did not validate.
    TooManyAttempts,

    /// The goal could not be placed more than one step away from the start.
    Trivial,
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenerateError::TooManyAttempts => {
                write!(f, "no valid maze after {MAX_GENERATION_ATTEMPTS} attempts")
            }
            GenerateError::Trivial => write!(f, "the goal cannot be placed away from the start"),
        }
    }
}

impl Error for GenerateError {}

/// [`MazeGenerator`] object.
pub struct MazeGenerator {
    /// Number of rows, border included.
    pub rows: usize,

    /// Number of columns, border included.
    pub cols: usize,

    /// Cell where carving starts.
    pub start: Position,

    /// Whether to run the densification pass after carving.
    pub loops: bool,

    /// Number of cells carved or opened during the last generation, over all attempts.
    pub iteration: usize,

    /// Number of attempts used by the last generation.
    pub attempts: usize,

    /// Duration in seconds it took to generate the last maze.
    pub duration: f32,

    /// Time when the generation started. Used to compute the [`MazeGenerator::duration`].
    start_time: Instant,
}

impl MazeGenerator {
    /// Create the object. Dimensions smaller than [`MIN_DIMENSION`] are raised.
    pub fn new(rows: usize, cols: usize) -> Self {
        if rows < MIN_DIMENSION || cols < MIN_DIMENSION {
            warn!("Grid {rows}x{cols} is too small, using at least {MIN_DIMENSION}x{MIN_DIMENSION}");
        }
        Self {
            rows: rows.max(MIN_DIMENSION),
            cols: cols.max(MIN_DIMENSION),
            start: DEFAULT_START,
            loops: false,
            iteration: 0,
            attempts: 0,
            duration: 0.0,
            start_time: Instant::now(),
        }
    }

    /// Enable or disable the densification pass.
    pub fn with_loops(mut self, loops: bool) -> Self {
        self.loops = loops;
        self
    }

    /// Generate and return a maze.
    ///
    /// # Errors
    ///
    /// The method returns [`GenerateError::TooManyAttempts`] if no attempt produced a connected
    /// grid with a wall ring. That cannot happen unless the carving is broken.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Grid, GenerateError> {
        self.iteration = 0;
        self.attempts = 0;
        self.duration = 0.0;
        self.start_time = Instant::now();

        debug!(
            "Generating a {}x{} maze from {} (loops = {})",
            self.rows, self.cols, self.start, self.loops
        );

        while self.attempts < MAX_GENERATION_ATTEMPTS {
            self.attempts += 1;

            let mut grid: Grid = Grid::new(self.rows, self.cols);
            self.carve(&mut grid, rng);
            if self.loops {
                self.densify(&mut grid, rng);
            }

            if is_valid(&grid, self.start) {
                self.duration = self.start_time.elapsed().as_secs_f32();
                debug!(
                    "Attempts = {}  Iterations = {}  Duration = {}",
                    self.attempts, self.iteration, self.duration
                );
                if log_enabled!(Level::Debug) {
                    grid.debug();
                }
                return Ok(grid);
            }
            warn!("Attempt {} produced an invalid maze, regenerating", self.attempts);
        }
        self.duration = self.start_time.elapsed().as_secs_f32();
        Err(GenerateError::TooManyAttempts)
    }

    /// Whether the position can receive a carved cell: inside the outer wall ring.
    fn is_interior(&self, pos: Position) -> bool {
        pos.row >= 1 && pos.col >= 1 && pos.row + 1 < self.rows && pos.col + 1 < self.cols
    }

    /// Carve the passages with a depth-first walk.
    ///
    /// Each stack entry keeps the directions not yet tried from that cell, so popping an entry is
    /// the same as returning from the recursive call.
    fn carve<R: Rng + ?Sized>(&mut self, grid: &mut Grid, rng: &mut R) {
        grid.set(self.start, Cell::Open);
        self.iteration += 1;

        let mut stack: Vec<(Position, Vec<Direction>)> = vec![(self.start, shuffled(rng))];

        while let Some((current, directions)) = stack.last_mut() {
            let current: Position = *current;
            let Some(direction) = directions.pop() else {
                stack.pop();
                continue;
            };

            let Some(wall) = current.step(direction) else {
                continue;
            };
            let Some(next) = wall.step(direction) else {
                continue;
            };
            if !self.is_interior(next) || !grid.is_blocked(next) {
                continue;
            }

            grid.set(wall, Cell::Open);
            grid.set(next, Cell::Open);
            self.iteration += 1;
            stack.push((next, shuffled(rng)));
        }
    }

    /// Open straight wall connectors between two opposite open cells to introduce loops.
    fn densify<R: Rng + ?Sized>(&mut self, grid: &mut Grid, rng: &mut R) {
        let budget: usize = (self.rows * self.cols / LOOP_DIVISOR).max(2);
        let mut candidates: Vec<Position> = grid
            .positions()
            .filter(|p| self.is_interior(*p) && is_connector(grid, *p))
            .collect();
        candidates.shuffle(rng);

        let mut opened: usize = 0;
        for pos in candidates {
            if opened >= budget {
                break;
            }
            // Opening a neighbor may have turned this wall into something else than a connector
            if !is_connector(grid, pos) {
                continue;
            }
            grid.set(pos, Cell::Open);
            opened += 1;
            self.iteration += 1;
        }
        debug!("Densification opened {opened} walls (budget {budget})");
    }
}

/// Generate a maze of the given size, with a random or fixed seed.
///
/// # Panics
///
/// Panics if the generator cannot produce a valid maze. That is a bug in the carving algorithm.
pub fn generate(rows: usize, cols: usize, seed: Option<u64>) -> Grid {
    generate_from(rows, cols, DEFAULT_START, seed)
}

/// Generate a maze of the given size, carving from `start`.
///
/// # Panics
///
/// Panics if the generator cannot produce a valid maze, for example when `start` is on an even
/// row or column so that every two-cell step lands on the border.
pub fn generate_from(rows: usize, cols: usize, start: Position, seed: Option<u64>) -> Grid {
    let mut rng = super::rng_from_seed(seed);
    let mut generator: MazeGenerator = MazeGenerator::new(rows, cols);
    generator.start = start;
    match generator.generate(&mut rng) {
        Ok(grid) => grid,
        Err(e) => panic!("Bug: maze generation failed: {e}"),
    }
}

/// Return the directions in random order.
fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Vec<Direction> {
    let mut directions: Vec<Direction> = Direction::ALL.to_vec();
    directions.shuffle(rng);
    directions
}

/// Whether the blocked cell sits between exactly two opposite open cells.
fn is_connector(grid: &Grid, pos: Position) -> bool {
    if !grid.is_blocked(pos) {
        return false;
    }
    let open = |d: Direction| pos.step(d).is_some_and(|p| !grid.is_blocked(p));

    let vertical: bool = open(Direction::Up) && open(Direction::Down);
    let horizontal: bool = open(Direction::Left) && open(Direction::Right);
    vertical != horizontal
        && !(vertical && (open(Direction::Left) || open(Direction::Right)))
        && !(horizontal && (open(Direction::Up) || open(Direction::Down)))
}

/// Return the set of non-blocked cells reachable from `start` through non-blocked cells.
pub fn reachable(grid: &Grid, start: Position) -> HashSet<Position> {
    let mut visited: HashSet<Position> = HashSet::new();
    if grid.is_blocked(start) {
        return visited;
    }

    let mut queue: VecDeque<Position> = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for next in grid.neighbors4(current) {
            if !grid.is_blocked(next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    visited
}

/// Verify the generated grid: wall ring intact, every open cell reachable from the start, and the
/// start reaching at least one other cell.
fn is_valid(grid: &Grid, start: Position) -> bool {
    if grid.positions().any(|p| grid.is_border(p) && !grid.is_blocked(p)) {
        debug!("    Invalid: open cell on the border");
        return false;
    }
    let reached: HashSet<Position> = reachable(grid, start);
    if reached.len() <= 1 {
        debug!("    Invalid: the start cell is isolated");
        return false;
    }
    let open: usize = grid.open_cells().len();
    if reached.len() != open {
        debug!("    Invalid: {} of {} open cells reachable", reached.len(), open);
        return false;
    }
    true
}
