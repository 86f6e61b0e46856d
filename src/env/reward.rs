use crate::error::{Error, Result};

use super::{transition, Action, Maze, Pos};

/// Rewards handed out for each kind of move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardScheme {
    /// Reward for walking into a wall
    ///
    /// **Default**: `-1.0`
    pub wall: f32,
    /// Reward for stepping onto the exit
    ///
    /// **Default**: `100.0`
    pub exit: f32,
    /// Reward for any other move
    ///
    /// **Default**: `-0.1`
    pub step: f32,
}

impl Default for RewardScheme {
    fn default() -> Self {
        Self {
            wall: -1.0,
            exit: 100.0,
            step: -0.1,
        }
    }
}

/// What a proposed move amounts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// A wall blocks the move and the agent stays put
    Wall,
    /// The move lands on the exit
    Exit,
    /// An ordinary move to an open neighbour
    Move,
}

/// Score a proposed transition from `state` to the naive `next_state`
///
/// A wall takes precedence over the exit, so a walled-off exit cannot be entered.
pub fn reward<M: Maze + ?Sized>(
    maze: &M,
    state: Pos,
    next_state: Pos,
    scheme: &RewardScheme,
) -> (Outcome, f32) {
    if maze.is_wall_between(state, next_state) {
        (Outcome::Wall, scheme.wall)
    } else if next_state == maze.exit() {
        (Outcome::Exit, scheme.exit)
    } else {
        (Outcome::Move, scheme.step)
    }
}

/// The result of taking one action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Where the agent ends up, equal to the starting state after a wall collision
    pub next_state: Pos,
    pub reward: f32,
    pub outcome: Outcome,
}

impl Step {
    /// Determine if the step ends the episode
    pub fn is_terminal(&self) -> bool {
        self.outcome == Outcome::Exit
    }
}

/// Take `action` from `state`
///
/// The reward is computed against the naive next state first; a wall collision then
/// discards that state and leaves the agent where it was.
///
/// **Returns** [`Error::OffGrid`] if the action leaves the grid
pub fn evaluate<M: Maze + ?Sized>(
    maze: &M,
    state: Pos,
    action: Action,
    scheme: &RewardScheme,
) -> Result<Step> {
    let naive = transition(state, action)
        .filter(|&pos| maze.contains(pos))
        .ok_or(Error::OffGrid { state, action })?;

    let (outcome, reward) = reward(maze, state, naive, scheme);
    let next_state = match outcome {
        Outcome::Wall => state,
        Outcome::Exit | Outcome::Move => naive,
    };

    Ok(Step {
        next_state,
        reward,
        outcome,
    })
}
