pub mod path;
pub mod q_learning;
pub mod q_table;

pub use path::{extract_path, Path, PathStatus};
pub use q_learning::{train, EpisodeReport, QLearningConfig, Training};
pub use q_table::QTable;

use rand::Rng;

use crate::{env::Maze, error::Result};

/// A trained table together with its greedy replay
#[derive(Debug, Clone)]
pub struct Solution {
    pub training: Training,
    pub path: Path,
}

/// Train on `maze` and replay the learned policy with the same step cap
pub fn solve<M, R>(maze: &M, config: &QLearningConfig, rng: &mut R) -> Result<Solution>
where
    M: Maze + ?Sized,
    R: Rng + ?Sized,
{
    let training = train(maze, config, rng)?;
    let path = extract_path(maze, &training.q_table, config.max_steps, rng)?;
    Ok(Solution { training, path })
}
