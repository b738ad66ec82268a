/*
generator.rs

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

//! Generate mazes, place the goal and the hazards, and find paths.
//!
//! A level is built in three steps:
//!
//! * A maze represented by a [`grid::Grid`] object.
//!   You create it by creating a [`maze::MazeGenerator`] object and by using its
//!   [`maze::MazeGenerator::generate`] method.
//!   If the carved grid does not validate, the method retries and eventually returns an error.
//!
//! * The goal, stamped into the grid by [`placement::place_goal`].
//!
//! * The hazards, returned as a [`placement::HazardSet`] by [`placement::place_hazards`].
//!   Each hazard is validated with a search so that a safe route from the start to the goal
//!   always remains.
//!
//! [`levels::LevelBuilder`] runs these steps and returns a [`levels::LevelData`] object.
//!
//! At play time, [`search::find_path`] runs one of the four algorithms, and [`hint::best_hint`]
//! runs all of them to select the move to suggest.

pub mod grid;
pub mod hint;
pub mod levels;
pub mod maze;
pub mod placement;
pub mod search;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Create a random generator from the given seed, or from a random seed.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::seed_from_u64(rand::rng().random()),
    }
}
