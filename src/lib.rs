//! # N-Puzzle Solver Library
//!
//! This library solves the sliding tile puzzle (8-puzzle, 15-puzzle, ...) optimally
//! with A* graph search under an admissible heuristic.
//!
//! It is used by three binaries:
//! - `human_player`: Interactive play in the terminal, with undo and A* hints.
//! - `astar_solver`: Reads a board from a file and prints the optimal solution.
//! - `heuristic_evaluator`: Solves a batch of random boards under each heuristic and
//!   reports nodes expanded, solution depth, timing and effective branching factor.
//!
//! ## Modules
//! - `engine`: The immutable `Board`, blank `Direction`s and the interactive `Game`.
//! - `heuristics`: Hamming and Manhattan distance, and the explicit zero heuristic.
//! - `solver`: Search nodes, successor generation, the A* engine and path reconstruction.
//! - `utils`: Board parsing, inversion counting, solvability and random boards.
//! - `config`, `experiment`, `report`: The batch experiment driver and its output.
//! - `error`: The crate's `Error` type.

pub mod config;
pub mod engine;
pub mod error;
pub mod experiment;
pub mod heuristics;
pub mod report;
pub mod solver;
pub mod utils;

pub use error::{Error, Result};
