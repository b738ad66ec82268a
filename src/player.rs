/*
player.rs

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

//! Player position and second chance.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::generator::grid::Position;

/// Player state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Player {
    /// Current cell.
    position: Position,

    /// Whether the player can still survive a hazard. The second chance is used at most once.
    second_chance: bool,
}

impl Player {
    /// Create a [`Player`] object standing on the given cell, with the second chance available.
    pub fn new(position: Position) -> Self {
        Self {
            position,
            second_chance: true,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Whether the second chance has not been used yet.
    pub fn has_second_chance(&self) -> bool {
        self.second_chance
    }

    /// Consume the second chance. Return `true` if it was available.
    pub fn use_second_chance(&mut self) -> bool {
        if self.second_chance {
            self.second_chance = false;
            debug!("Second chance used at {}", self.position);
            true
        } else {
            false
        }
    }
}
