/*
config.rs

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

//! Build-time constants and the run-time level configuration.

use serde::{Deserialize, Serialize};

use crate::generator::grid::Position;
use crate::generator::levels::Level;

pub const COPYRIGHT_NOTICE: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "
Copyright 2025 Hervé Quatremain
License GPLv3+: GNU GPL version 3 or later <https://gnu.org/licenses/gpl.html>.
This is free software: you are free to change and redistribute it.
There is NO WARRANTY, to the extent permitted by law."
);

/// Default number of rows. Odd so that carving leaves an outer wall ring.
pub const DEFAULT_ROWS: usize = 11;

/// Default number of columns.
pub const DEFAULT_COLS: usize = 21;

/// Smallest accepted dimension. Smaller values are raised to this one.
pub const MIN_DIMENSION: usize = 5;

/// Cell where carving starts and where the player enters the maze.
pub const DEFAULT_START: Position = Position { row: 1, col: 1 };

/// Number of times the generator retries when the carved maze does not validate.
pub const MAX_GENERATION_ATTEMPTS: usize = 8;

/// Number of times a level is rebuilt when the goal ends up trivially close or unreachable.
pub const MAX_LEVEL_ATTEMPTS: usize = 8;

/// The densification pass opens up to `rows * cols / LOOP_DIVISOR` extra walls.
pub const LOOP_DIVISOR: usize = 20;

/// Run-time parameters used to build a level.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    /// Number of rows in the grid, border included.
    pub rows: usize,

    /// Number of columns in the grid, border included.
    pub cols: usize,

    /// Difficulty level. Drives the number of hazards.
    pub level: Level,

    /// Seed for the random generator. A random seed is drawn when not set.
    pub seed: Option<u64>,

    /// Whether to open extra walls after carving so that the maze has loops.
    pub loops: bool,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            level: Level::One,
            seed: None,
            loops: false,
        }
    }
}

impl LevelConfig {
    /// Return the configuration with dimensions raised to [`MIN_DIMENSION`] when needed.
    pub fn clamped(&self) -> Self {
        Self {
            rows: self.rows.max(MIN_DIMENSION),
            cols: self.cols.max(MIN_DIMENSION),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_constants() {
        let config = LevelConfig::default();
        assert_eq!(config.rows, DEFAULT_ROWS);
        assert_eq!(config.cols, DEFAULT_COLS);
        assert_eq!(config.level, Level::One);
        assert!(config.seed.is_none());
    }

    #[test]
    fn clamped_raises_small_dimensions() {
        let config = LevelConfig {
            rows: 0,
            cols: 3,
            ..LevelConfig::default()
        }
        .clamped();
        assert_eq!(config.rows, MIN_DIMENSION);
        assert_eq!(config.cols, MIN_DIMENSION);
    }
}
