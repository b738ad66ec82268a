/*
lib.rs

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

//! Maze generation, hazard placement, and path hints for the Trapmaze game.
//!
//! The presentation layer (terminal or graphical) calls into this crate to build a level, move the
//! player, and ask for hints. See [`generator`] for the algorithms and [`game`] for the rules.

pub mod cli_options;
pub mod config;
pub mod game;
pub mod generator;
pub mod player;
