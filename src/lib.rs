/// Q-table, training loop, and greedy path extraction
pub mod algo;

/// Per-episode schedules for the exploration rate
pub mod decay;

/// Maze contract, actions, and move dynamics
pub mod env;

/// Error type
pub mod error;

/// Exploration policies
pub mod exploration;

/// Concrete mazes
pub mod gym;

mod util;

pub use algo::{extract_path, solve, train, Path, QLearningConfig, QTable, Solution, Training};
pub use env::{Action, Maze, Pos};
pub use error::{Error, Result};
