/*
grid.rs

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

//! Rectangular grid of cells shared by the generator, the placement engine, and the searches.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a grid cell.
///
/// - a `Blocked` cell is a wall. The border of the grid is always blocked.
/// - an `Open` cell is a passage that can be walked on.
/// - the `Goal` cell is the open cell the player must reach. There is at most one.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Cell {
    #[default]
    Blocked,
    Open,
    Goal,
}

impl Cell {
    /// Character used to render the cell.
    pub fn symbol(&self) -> char {
        match self {
            Cell::Blocked => '#',
            Cell::Open => ' ',
            Cell::Goal => 'G',
        }
    }
}

/// Cell coordinates in the grid.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Create a [`Position`] object.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Return the adjacent position in the given direction, or `None` if it would be negative.
    pub fn step(&self, direction: Direction) -> Option<Position> {
        let (dr, dc) = direction.delta();
        Some(Position {
            row: self.row.checked_add_signed(dr)?,
            col: self.col.checked_add_signed(dc)?,
        })
    }

    /// Manhattan distance between two positions.
    pub fn manhattan(&self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Relative move between two orthogonally adjacent cells.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The four directions, in the order used when no shuffling is requested.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Row and column offsets of the move.
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Direction leading from `from` to the adjacent cell `to`, if they are adjacent.
    pub fn between(from: Position, to: Position) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|d| from.step(*d) == Some(to))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Fixed-size grid of [`Cell`] values stored row by row.
///
/// Deserialization goes through [`GridData`] so that the number of cells always matches the
/// dimensions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "GridData")]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

/// Unchecked grid, as read from serialized data.
#[derive(Deserialize)]
pub struct GridData {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl TryFrom<GridData> for Grid {
    type Error = String;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        match data.rows.checked_mul(data.cols) {
            Some(n) if n == data.cells.len() => Ok(Self {
                rows: data.rows,
                cols: data.cols,
                cells: data.cells,
            }),
            _ => Err(format!(
                "{} cells do not fill a {}x{} grid",
                data.cells.len(),
                data.rows,
                data.cols
            )),
        }
    }
}

impl Grid {
    /// Create a grid where all the cells are blocked.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Blocked; rows * cols],
        }
    }

    /// Create a grid from rows of characters: `#` is blocked, `G` is the goal, anything else is
    /// open. Rows shorter than the first one are padded with blocked cells.
    pub fn from_ascii(lines: &[&str]) -> Self {
        let rows: usize = lines.len();
        let cols: usize = lines.first().map_or(0, |l| l.chars().count());
        let mut grid: Grid = Grid::new(rows, cols);

        for (row, line) in lines.iter().enumerate() {
            for (col, c) in line.chars().take(cols).enumerate() {
                let cell: Cell = match c {
                    '#' => Cell::Blocked,
                    'G' => Cell::Goal,
                    _ => Cell::Open,
                };
                grid.set(Position::new(row, col), cell);
            }
        }
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the position is inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Whether the position is on the outer ring of the grid.
    pub fn is_border(&self, pos: Position) -> bool {
        pos.row == 0 || pos.col == 0 || pos.row + 1 == self.rows || pos.col + 1 == self.cols
    }

    /// Return the cell at the given position. Positions outside the grid are blocked.
    pub fn get(&self, pos: Position) -> Cell {
        if self.in_bounds(pos) {
            self.cells[pos.row * self.cols + pos.col]
        } else {
            Cell::Blocked
        }
    }

    /// Set the cell at the given position. Positions outside the grid are ignored.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if self.in_bounds(pos) {
            self.cells[pos.row * self.cols + pos.col] = cell;
        }
    }

    /// Whether the cell is a wall (or outside the grid).
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.get(pos) == Cell::Blocked
    }

    /// Return the in-bounds orthogonal neighbors with the direction leading to each of them.
    pub fn steps(&self, pos: Position) -> Vec<(Direction, Position)> {
        Direction::ALL
            .into_iter()
            .filter_map(|d| pos.step(d).map(|p| (d, p)))
            .filter(|(_, p)| self.in_bounds(*p))
            .collect()
    }

    /// Return the in-bounds orthogonal neighbors of the given position.
    pub fn neighbors4(&self, pos: Position) -> Vec<Position> {
        self.steps(pos).into_iter().map(|(_, p)| p).collect()
    }

    /// Return all the non-blocked positions, row by row.
    pub fn open_cells(&self) -> Vec<Position> {
        self.positions().filter(|p| !self.is_blocked(*p)).collect()
    }

    /// Return the position of the goal, if one has been stamped.
    pub fn goal(&self) -> Option<Position> {
        self.positions().find(|p| self.get(*p) == Cell::Goal)
    }

    /// Iterate over all the positions of the grid, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Position::new(row, col)))
    }

    /// Print the grid.
    pub fn debug(&self) {
        for line in self.to_string().lines() {
            debug!("{line}");
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows {
            let line: String = (0..self.cols)
                .map(|col| self.get(Position::new(row, col)).symbol())
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_blocked() {
        let grid = Grid::new(5, 7);
        assert_eq!(grid.rows(), 5);
        assert_eq!(grid.cols(), 7);
        assert!(grid.positions().all(|p| grid.is_blocked(p)));
        assert!(grid.open_cells().is_empty());
    }

    #[test]
    fn out_of_bounds_is_blocked() {
        let grid = Grid::from_ascii(&["   ", "   "]);
        assert!(!grid.is_blocked(Position::new(1, 2)));
        assert!(grid.is_blocked(Position::new(2, 0)));
        assert!(grid.is_blocked(Position::new(0, 3)));
        assert!(!grid.in_bounds(Position::new(0, 3)));
    }

    #[test]
    fn neighbors_are_bounds_checked() {
        let grid = Grid::new(3, 3);
        let corner = grid.neighbors4(Position::new(0, 0));
        assert_eq!(corner, vec![Position::new(1, 0), Position::new(0, 1)]);
        assert_eq!(grid.neighbors4(Position::new(1, 1)).len(), 4);
        assert_eq!(grid.neighbors4(Position::new(2, 2)).len(), 2);
    }

    #[test]
    fn direction_between_adjacent_cells() {
        let a = Position::new(2, 2);
        assert_eq!(Direction::between(a, Position::new(1, 2)), Some(Direction::Up));
        assert_eq!(Direction::between(a, Position::new(2, 3)), Some(Direction::Right));
        assert_eq!(Direction::between(a, Position::new(3, 3)), None);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }

    #[test]
    fn deserialize_rejects_wrong_cell_count() {
        let json = r#"{"rows":5,"cols":5,"cells":["Open"]}"#;
        let err = serde_json::from_str::<Grid>(json).unwrap_err();
        assert!(err.to_string().contains("1 cells do not fill a 5x5 grid"));

        let grid = Grid::from_ascii(&["###", "#G#", "###"]);
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(serde_json::from_str::<Grid>(&json).unwrap(), grid);
    }

    #[test]
    fn ascii_round_trip_and_goal() {
        let lines = ["#####", "#  G#", "#####"];
        let grid = Grid::from_ascii(&lines);
        assert_eq!(grid.goal(), Some(Position::new(1, 3)));
        assert_eq!(grid.to_string(), "#####\n#  G#\n#####\n");
        assert!(grid.is_border(Position::new(1, 4)));
        assert!(!grid.is_border(Position::new(1, 2)));
    }
}
