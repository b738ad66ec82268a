/*
cli_options.rs

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

//! Process command-line options.
//!
//! The command line builds one or several levels and prints them, so that developers can inspect
//! the generated mazes, the hazard placement, and how the search algorithms compare.
//!
//! # Examples
//!
//! Build a level 3 maze from a fixed seed and reveal the hazards:
//!
//! ```text
//! $ trapmaze --level 3 --seed 42 --reveal
//! #####################
//! #P  #     #       # #
//! ...
//! Hint (BFS): move right, 24 steps to the goal
//! ```
//!
//! Compare the algorithms on five levels with loops, and print statistics:
//!
//! ```text
//! $ trapmaze -c 5 --loops --compare --summary
//! ```

use clap::Parser;
use log::debug;
use serde::Serialize;
use std::collections::HashSet;
use std::env;

use crate::config::{COPYRIGHT_NOTICE, DEFAULT_COLS, DEFAULT_ROWS, LevelConfig};
use crate::generator::grid::Position;
use crate::generator::hint::{HintOutcome, best_hint};
use crate::generator::levels::{Level, LevelBuilder, LevelData};
use crate::generator::search::{Algorithm, SearchOptions, SearchOutcome, search};

/// Build random trap mazes and compare the hint algorithms.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// Number of rows, border included
    #[arg(short, long, default_value_t = DEFAULT_ROWS)]
    rows: usize,

    /// Number of columns, border included
    #[arg(short = 'w', long, default_value_t = DEFAULT_COLS)]
    cols: usize,

    /// Difficulty level, which sets the number of hazards
    #[arg(value_enum, short, long, default_value_t = Level::One)]
    level: Level,

    /// Seed for the random generator
    #[arg(short, long)]
    seed: Option<u64>,

    /// Open extra walls so that the maze has loops
    #[arg(long, default_value_t = false)]
    loops: bool,

    /// Number of levels to generate
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Print the path found by this algorithm
    #[arg(value_enum, short, long)]
    algorithm: Option<Algorithm>,

    /// Run all the algorithms and print their path length and expanded cells
    #[arg(long, default_value_t = false)]
    compare: bool,

    /// Show the hazards in the printed maze
    #[arg(long, default_value_t = false)]
    reveal: bool,

    /// Print the levels in JSON format
    #[arg(short, long, default_value_t = false)]
    json: bool,

    /// Print some statistics after generating the levels
    #[arg(long, default_value_t = false)]
    summary: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Search result as printed in JSON.
#[derive(Serialize)]
struct SearchReport {
    algorithm: Algorithm,
    steps: Option<usize>,
    expanded: usize,
    moves: Option<String>,
}

impl SearchReport {
    fn new(outcome: &SearchOutcome) -> Self {
        Self {
            algorithm: outcome.algorithm,
            steps: outcome.path.as_ref().map(|p| p.len()),
            expanded: outcome.expanded,
            moves: outcome.path.as_ref().map(|p| {
                p.moves()
                    .iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<String>>()
                    .join(" ")
            }),
        }
    }
}

/// Level as printed in JSON.
#[derive(Serialize)]
struct LevelReport<'a> {
    #[serde(flatten)]
    data: &'a LevelData,
    hazards_requested: usize,
    hint: HintOutcome,
    searches: Vec<SearchReport>,
}

/// Parse and process command-line options. Return the process exit code.
pub fn parse() -> u8 {
    let args: Args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    let config: LevelConfig = LevelConfig {
        rows: args.rows,
        cols: args.cols,
        level: args.level,
        seed: args.seed,
        loops: args.loops,
    };
    let mut builder: LevelBuilder = LevelBuilder::new(&config);

    let algorithms: Vec<Algorithm> = if args.compare {
        Algorithm::ALL.to_vec()
    } else {
        args.algorithm.into_iter().collect()
    };

    let mut total: f32 = 0.0;
    let mut max: f32 = 0.0;
    let mut attempts: usize = 0;
    let mut iterations: usize = 0;
    let mut partial: usize = 0;
    let mut expanded: Vec<(Algorithm, usize)> = Algorithm::ALL.iter().map(|a| (*a, 0)).collect();

    for i in 0..args.count {
        debug!("Iteration {i}");

        let data: LevelData = match builder.build() {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Error: {e}");
                return 1;
            }
        };
        total += builder.duration;
        if builder.duration > max {
            max = builder.duration;
        }
        attempts += builder.attempts;
        iterations += builder.iteration;
        if data.hazards.len() < config.level.hazard_count() {
            partial += 1;
        }

        let hint: HintOutcome = best_hint(&data.grid, data.start, data.goal, &data.hazards);
        let outcomes: Vec<SearchOutcome> = algorithms
            .iter()
            .map(|a| {
                search(
                    &data.grid,
                    data.start,
                    data.goal,
                    &data.hazards,
                    *a,
                    &SearchOptions::default(),
                )
            })
            .collect();
        for outcome in &outcomes {
            if let Some(e) = expanded.iter_mut().find(|(a, _)| *a == outcome.algorithm) {
                e.1 += outcome.expanded;
            }
        }

        if args.json {
            let report: LevelReport = LevelReport {
                data: &data,
                hazards_requested: config.level.hazard_count(),
                hint,
                searches: outcomes.iter().map(SearchReport::new).collect(),
            };
            match serde_json::to_string_pretty(&report) {
                Ok(s) => println!("{s}"),
                Err(e) => {
                    eprintln!("Error: cannot serialize the level: {e}");
                    return 1;
                }
            }
            continue;
        }

        print_level(&data, &hint, &outcomes, args.reveal);
    }

    if args.summary && args.count > 0 {
        println!(
            "
        total time = {}s
      average time = {}s
          max time = {}s
  average attempts = {}
average iterations = {}
   partial hazards = {}",
            total,
            total / args.count as f32,
            max,
            attempts as f32 / args.count as f32,
            iterations / args.count,
            partial
        );
        for (algorithm, e) in expanded.iter().filter(|(a, _)| algorithms.contains(a)) {
            println!("{:>18} = {} cells expanded on average", algorithm.to_string(), e / args.count);
        }
    }
    0
}

/// Print the level, the hint, and the requested searches.
fn print_level(data: &LevelData, hint: &HintOutcome, outcomes: &[SearchOutcome], reveal: bool) {
    println!("{} (seed {})", data.level, data.seed);
    println!(
        "Goal at {}, {} of {} hazards placed",
        data.goal,
        data.hazards.len(),
        data.level.hazard_count()
    );
    print!("{}", data.render(Some(data.start), reveal));

    match hint {
        HintOutcome::Move(h) => println!(
            "Hint ({}): move {}, {} steps to the goal",
            h.algorithm, h.direction, h.steps
        ),
        HintOutcome::AtGoal => println!("Hint: you are at the goal"),
        HintOutcome::Trapped => println!("Hint: no safe path found"),
    }

    for outcome in outcomes {
        match &outcome.path {
            Some(path) => {
                println!(
                    "{:>8}: {} steps, {} cells expanded",
                    outcome.algorithm.to_string(),
                    path.len(),
                    outcome.expanded
                );
                let cells: HashSet<Position> = path.cells().iter().copied().collect();
                print_path(data, &cells);
            }
            None => println!(
                "{:>8}: no path, {} cells expanded",
                outcome.algorithm.to_string(),
                outcome.expanded
            ),
        }
    }
    println!();
}

/// Print the maze with the path cells drawn as dots.
fn print_path(data: &LevelData, cells: &HashSet<Position>) {
    let rendered: String = data.render(Some(data.start), true);
    for (row, line) in rendered.lines().enumerate() {
        let line: String = line
            .chars()
            .enumerate()
            .map(|(col, c)| {
                if c == ' ' && cells.contains(&Position::new(row, col)) {
                    '.'
                } else {
                    c
                }
            })
            .collect();
        println!("{line}");
    }
}
