use thiserror::Error;

use crate::env::{Action, Pos};

/// Errors raised by the solver
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The maze handed to the solver cannot be navigated at all
    #[error("Invalid maze: {reason}")]
    InvalidMaze { reason: String },

    /// A hyperparameter fell outside its allowed interval
    #[error("Invalid value for `{name}`: {value}. Must be in the interval [{min}, {max}].")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The Q-table was trained on a maze of a different size
    #[error("Q-table shape {found:?} does not match maze shape {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize, usize),
        found: (usize, usize, usize),
    },

    /// A move was evaluated that leaves the grid
    #[error("Action {action:?} from {state:?} leaves the grid")]
    OffGrid { state: Pos, action: Action },

    /// The greedy replay stopped before reaching the exit
    #[error("Policy did not reach the exit after {steps} steps (stopped at {last:?})")]
    NotConverged { steps: usize, last: Pos },
}

pub type Result<T> = std::result::Result<T, Error>;
