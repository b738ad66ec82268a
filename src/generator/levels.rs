/*
levels.rs

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

//! Difficulty levels and construction of a playable level.
//!
//! A level bundles the maze, the start, the goal, and the hazards. All of them are created together
//! by [`LevelBuilder::build`] and discarded when the level is restarted or completed.

use clap::ValueEnum;
use log::{debug, info, warn};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use strum_macros::FromRepr;

use super::grid::{Grid, Position};
use super::maze::{GenerateError, MazeGenerator};
use super::placement::{HazardSet, place_goal, place_hazards};
use super::search::{Algorithm, find_path};
use crate::config::{DEFAULT_START, LevelConfig, MAX_LEVEL_ATTEMPTS};

/// Difficulty level.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialOrd,
    Ord,
    PartialEq,
    Eq,
    Hash,
    ValueEnum,
    FromRepr,
    Default,
)]
#[repr(u8)]
pub enum Level {
    #[default]
    #[value(name = "1")]
    One = 1,
    #[value(name = "2")]
    Two,
    #[value(name = "3")]
    Three,
    #[value(name = "4")]
    Four,
    #[value(name = "5")]
    Five,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Level {}", self.number())
    }
}

impl Level {
    /// Level number, starting at 1.
    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// Number of hazards requested for the level: 3, 5, 7, 9, then 10.
    pub fn hazard_count(&self) -> usize {
        (3 + 2 * (self.number() as usize - 1)).min(10)
    }

    /// Following level, or `None` after the last one.
    pub fn next(&self) -> Option<Level> {
        Level::from_repr(self.number() + 1)
    }
}

/// Everything needed to play a level.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LevelData {
    pub level: Level,

    /// Maze with the goal stamped in.
    pub grid: Grid,

    pub start: Position,
    pub goal: Position,

    /// Hazards, kept out of the grid.
    pub hazards: HazardSet,

    /// Seed that reproduces this level with the same configuration.
    pub seed: u64,
}

impl LevelData {
    /// Render the level as text. The player is drawn as `P`, and the hazards as `T` when
    /// `reveal` is set.
    pub fn render(&self, player: Option<Position>, reveal: bool) -> String {
        let mut s: String = String::with_capacity((self.grid.cols() + 1) * self.grid.rows());
        for row in 0..self.grid.rows() {
            for col in 0..self.grid.cols() {
                let pos: Position = Position::new(row, col);
                let c: char = if player == Some(pos) {
                    'P'
                } else if reveal && self.hazards.contains(pos) {
                    'T'
                } else {
                    self.grid.get(pos).symbol()
                };
                s.push(c);
            }
            s.push('\n');
        }
        s
    }
}

/// [`LevelBuilder`] object.
pub struct LevelBuilder {
    /// Configuration, with dimensions already clamped.
    pub config: LevelConfig,

    /// Seed of the random generator.
    pub seed: u64,

    /// Number of mazes generated for the last level.
    pub attempts: usize,

    /// Number of carving iterations for the last level.
    pub iteration: usize,

    /// Duration in seconds it took to build the last level.
    pub duration: f32,

    rng: StdRng,
}

impl LevelBuilder {
    /// Create the object. A random seed is drawn when the configuration does not provide one.
    pub fn new(config: &LevelConfig) -> Self {
        let seed: u64 = config.seed.unwrap_or_else(|| rand::rng().random());
        debug!("Level builder seed = {seed}");
        Self {
            config: config.clamped(),
            seed,
            attempts: 0,
            iteration: 0,
            duration: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Build a level at the configured difficulty.
    pub fn build(&mut self) -> Result<LevelData, GenerateError> {
        self.build_level(self.config.level)
    }

    /// Build a level at the given difficulty.
    ///
    /// # Errors
    ///
    /// The method returns [`GenerateError::Trivial`] if, after [`MAX_LEVEL_ATTEMPTS`] mazes, the
    /// goal is never more than one step away from the start, and forwards the errors of
    /// [`MazeGenerator::generate`].
    pub fn build_level(&mut self, level: Level) -> Result<LevelData, GenerateError> {
        let start_time: Instant = Instant::now();
        let start: Position = DEFAULT_START;
        self.attempts = 0;
        self.iteration = 0;

        while self.attempts < MAX_LEVEL_ATTEMPTS {
            self.attempts += 1;

            let mut generator: MazeGenerator =
                MazeGenerator::new(self.config.rows, self.config.cols).with_loops(self.config.loops);
            let mut grid: Grid = generator.generate(&mut self.rng)?;
            self.iteration += generator.iteration;

            let goal: Position = place_goal(&mut grid, start, &mut self.rng);
            match find_path(&grid, start, goal, &HazardSet::new(), Algorithm::Bfs) {
                Some(path) if path.len() > 1 => (),
                _ => {
                    warn!("Goal {goal} is unreachable or next to the start, regenerating");
                    continue;
                }
            }

            let hazards: HazardSet =
                place_hazards(&grid, level.hazard_count(), start, goal, &mut self.rng);
            self.duration = start_time.elapsed().as_secs_f32();
            info!(
                "{level}: {}x{} maze, goal {goal}, {} hazards",
                grid.rows(),
                grid.cols(),
                hazards.len()
            );
            return Ok(LevelData {
                level,
                grid,
                start,
                goal,
                hazards,
                seed: self.seed,
            });
        }
        self.duration = start_time.elapsed().as_secs_f32();
        Err(GenerateError::Trivial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hazard_counts_per_level() {
        let counts: Vec<usize> = [Level::One, Level::Two, Level::Three, Level::Four, Level::Five]
            .iter()
            .map(Level::hazard_count)
            .collect();
        assert_eq!(counts, vec![3, 5, 7, 9, 10]);
    }

    #[test]
    fn level_progression() {
        assert_eq!(Level::One.next(), Some(Level::Two));
        assert_eq!(Level::Four.next(), Some(Level::Five));
        assert_eq!(Level::Five.next(), None);
        assert_eq!(Level::from_repr(3), Some(Level::Three));
        assert_eq!(Level::Two.to_string(), "Level 2");
    }

    #[test]
    fn builder_is_reproducible() {
        let config = LevelConfig {
            seed: Some(1234),
            ..LevelConfig::default()
        };
        let a = LevelBuilder::new(&config).build().unwrap();
        let b = LevelBuilder::new(&config).build().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.seed, 1234);
    }

    #[test]
    fn built_level_is_playable() {
        let config = LevelConfig {
            level: Level::Five,
            seed: Some(99),
            loops: true,
            ..LevelConfig::default()
        };
        let data = LevelBuilder::new(&config).build().unwrap();
        assert_eq!(data.grid.goal(), Some(data.goal));
        assert!(!data.hazards.contains(data.start));
        assert!(!data.hazards.contains(data.goal));
        let path = find_path(&data.grid, data.start, data.goal, &data.hazards, Algorithm::Bfs);
        assert!(path.is_some_and(|p| p.len() > 1));
    }

    #[test]
    fn render_marks_player_and_hazards() {
        let config = LevelConfig {
            seed: Some(7),
            ..LevelConfig::default()
        };
        let data = LevelBuilder::new(&config).build().unwrap();
        let hidden = data.render(Some(data.start), false);
        let shown = data.render(Some(data.start), true);
        assert_eq!(hidden.lines().count(), data.grid.rows());
        assert_eq!(hidden.chars().filter(|c| *c == 'P').count(), 1);
        assert_eq!(hidden.chars().filter(|c| *c == 'T').count(), 0);
        assert_eq!(shown.chars().filter(|c| *c == 'T').count(), data.hazards.len());
        assert_eq!(shown.chars().filter(|c| *c == 'G').count(), 1);
    }
}
