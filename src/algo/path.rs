use log::{debug, warn};
use rand::Rng;

use crate::{
    env::{self, valid_actions, Action, Maze, Outcome, Pos, RewardScheme},
    error::{Error, Result},
    exploration::EpsilonGreedy,
};

use super::QTable;

/// How a greedy replay ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    /// The path ends on the exit
    Reached,
    /// The step cap ran out before the exit was reached
    StepLimit,
}

/// A path produced by replaying a trained Q-table
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Visited states, starting with the entry
    pub states: Vec<Pos>,
    pub status: PathStatus,
}

impl Path {
    /// Number of moves taken
    pub fn cost(&self) -> usize {
        self.states.len().saturating_sub(1)
    }

    /// Determine if the path ends on the exit
    pub fn is_solved(&self) -> bool {
        self.status == PathStatus::Reached
    }

    /// The last visited state
    pub fn last(&self) -> Option<Pos> {
        self.states.last().copied()
    }

    /// Treat a failed replay as an error
    ///
    /// **Returns** [`Error::NotConverged`] unless the path reached the exit
    pub fn into_result(self) -> Result<Self> {
        if self.is_solved() {
            return Ok(self);
        }
        Err(Error::NotConverged {
            steps: self.cost(),
            last: self.last().unwrap_or_default(),
        })
    }
}

/// Replay `q_table` greedily from the entry of `maze`
///
/// Ties between equally valued actions are broken with `rng`. A move into a wall leaves
/// the agent in place and still uses up a step. The returned path holds at most
/// `max_steps` states, so it always terminates even if the policy loops.
///
/// **Returns** an error if the maze is invalid, `max_steps` is zero, or `q_table` was
/// trained on a maze of a different shape
pub fn extract_path<M, R>(
    maze: &M,
    q_table: &QTable,
    max_steps: usize,
    rng: &mut R,
) -> Result<Path>
where
    M: Maze + ?Sized,
    R: Rng + ?Sized,
{
    env::validate(maze)?;

    let expected = (maze.rows(), maze.cols(), Action::COUNT);
    if q_table.shape() != expected {
        return Err(Error::ShapeMismatch {
            expected,
            found: q_table.shape(),
        });
    }
    if max_steps < 1 {
        return Err(Error::InvalidParameter {
            name: "max_steps",
            value: 0.0,
            min: 1.0,
            max: usize::MAX as f64,
        });
    }

    let policy = EpsilonGreedy::greedy();
    let rewards = RewardScheme::default();
    let mut state = maze.entry();
    let mut states = vec![state];
    let (mut steps, mut collisions) = (0, 0);

    // Every step, blocked or not, counts against the cap; only real moves add a state
    let status = loop {
        if state == maze.exit() {
            break PathStatus::Reached;
        }
        if steps + 1 >= max_steps {
            break PathStatus::StepLimit;
        }

        let actions = valid_actions(state, maze.rows(), maze.cols());
        let Some(action) = policy.act(q_table, state, &actions, rng) else {
            break PathStatus::StepLimit;
        };
        let step = env::evaluate(maze, state, action, &rewards)?;
        steps += 1;
        if step.outcome == Outcome::Wall {
            collisions += 1;
            continue;
        }

        state = step.next_state;
        states.push(state);
    };

    let path = Path { states, status };
    match status {
        PathStatus::Reached => debug!(
            "Greedy path reached the exit in {} moves ({collisions} wall collisions)",
            path.cost()
        ),
        PathStatus::StepLimit => warn!(
            "Greedy path did not reach the exit within {max_steps} states, stopped at {:?} after {collisions} wall collisions",
            state
        ),
    }

    Ok(path)
}
