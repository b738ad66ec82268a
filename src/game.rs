/*
game.rs

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

//! Manage the status of a game in progress.
//!
//! The first time the player steps on a hazard, the second chance is used: the hazard is disarmed
//! (removed from the hazard set) and the player survives. Any later hazard ends the game.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::LevelConfig;
use crate::generator::grid::{Direction, Position};
use crate::generator::hint::{HintOutcome, best_hint};
use crate::generator::levels::{Level, LevelBuilder, LevelData};
use crate::generator::maze::GenerateError;
use crate::player::Player;

/// Status of the game.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

/// Result of a move request.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move hits a wall, leaves the grid, or the game is over. The player did not move.
    Blocked,

    /// The player moved to an open cell.
    Moved,

    /// The player stepped on a hazard and used the second chance. The hazard is disarmed.
    HazardSurvived,

    /// The player stepped on a hazard without a second chance. The game is lost.
    HazardFatal,

    /// The player reached the goal. The game is won.
    ReachedGoal,
}

/// Manage the status of the game in progress.
pub struct Game {
    /// Maze, goal, and live hazards.
    pub data: LevelData,

    pub player: Player,

    status: GameStatus,

    /// Number of hints the player asked for in the current level.
    hints_used: usize,

    /// Builds the next maze on restart or level change.
    builder: LevelBuilder,
}

impl Game {
    /// Create a [`Game`] object with a new level built from the configuration.
    pub fn new(config: &LevelConfig) -> Result<Self, GenerateError> {
        let mut builder: LevelBuilder = LevelBuilder::new(config);
        let data: LevelData = builder.build()?;
        Ok(Self::with_builder(builder, data))
    }

    /// Create a [`Game`] object for an existing level.
    pub fn from_level(config: &LevelConfig, data: LevelData) -> Self {
        Self::with_builder(LevelBuilder::new(config), data)
    }

    fn with_builder(builder: LevelBuilder, data: LevelData) -> Self {
        Self {
            player: Player::new(data.start),
            data,
            status: GameStatus::Playing,
            hints_used: 0,
            builder,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn level(&self) -> Level {
        self.data.level
    }

    pub fn hints_used(&self) -> usize {
        self.hints_used
    }

    /// Move the player one cell in the given direction.
    pub fn try_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.status != GameStatus::Playing {
            return MoveOutcome::Blocked;
        }

        let from: Position = self.player.position();
        let to: Position = match from.step(direction) {
            Some(p) if !self.data.grid.is_blocked(p) => p,
            _ => {
                debug!("Move {direction} from {from} blocked");
                return MoveOutcome::Blocked;
            }
        };
        self.player.set_position(to);
        debug!("Player moved {direction} to {to}");

        if self.data.hazards.contains(to) {
            if self.player.use_second_chance() {
                self.data.hazards.remove(to);
                info!("Hazard at {to} disarmed by the second chance");
                return MoveOutcome::HazardSurvived;
            }
            self.status = GameStatus::Lost;
            info!("Hazard at {to}: game over");
            return MoveOutcome::HazardFatal;
        }

        if to == self.data.goal {
            self.status = GameStatus::Won;
            info!("Goal reached with {} hints", self.hints_used);
            return MoveOutcome::ReachedGoal;
        }
        MoveOutcome::Moved
    }

    /// Compute a hint that avoids the live hazards.
    pub fn hint(&mut self) -> HintOutcome {
        self.hints_used += 1;
        best_hint(
            &self.data.grid,
            self.player.position(),
            self.data.goal,
            &self.data.hazards,
        )
    }

    /// Render the level. Hazards are revealed once the game is over.
    pub fn render(&self) -> String {
        self.data.render(
            Some(self.player.position()),
            self.status != GameStatus::Playing,
        )
    }

    /// Replay the current level with a new maze.
    pub fn restart(&mut self) -> Result<(), GenerateError> {
        let data: LevelData = self.builder.build_level(self.data.level)?;
        self.reset(data);
        Ok(())
    }

    /// Move to the following level with a new maze.
    ///
    /// Return `false`, and keep the current level, if the current level is the last one.
    pub fn next_level(&mut self) -> Result<bool, GenerateError> {
        let Some(level) = self.data.level.next() else {
            return Ok(false);
        };
        let data: LevelData = self.builder.build_level(level)?;
        self.reset(data);
        Ok(true)
    }

    fn reset(&mut self, data: LevelData) {
        self.player = Player::new(data.start);
        self.data = data;
        self.status = GameStatus::Playing;
        self.hints_used = 0;
    }
}
