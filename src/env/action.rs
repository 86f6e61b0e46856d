use strum::{EnumIter, FromRepr, IntoEnumIterator, VariantArray};

use super::Pos;

/// A move to one of the four orthogonal neighbours
#[derive(EnumIter, VariantArray, FromRepr, Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Action {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Action {
    /// Number of actions, i.e. the depth of a Q-table
    pub const COUNT: usize = Self::VARIANTS.len();

    /// Position of this action along the last axis of a Q-table
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Compute the naive next state for a move, ignoring walls
///
/// **Returns** `None` only when the move would underflow the grid origin. Moves past the
/// far edges still produce a coordinate, so callers pick actions from [`valid_actions`].
pub fn transition((row, col): Pos, action: Action) -> Option<Pos> {
    match action {
        Action::Up => row.checked_sub(1).map(|r| (r, col)),
        Action::Down => Some((row + 1, col)),
        Action::Left => col.checked_sub(1).map(|c| (row, c)),
        Action::Right => Some((row, col + 1)),
    }
}

/// Get the actions that keep the agent inside a `rows` x `cols` grid
///
/// Walls are not considered. Moving into a wall is allowed and penalized by the reward
/// instead. The result is only empty for a single-cell grid.
pub fn valid_actions(state: Pos, rows: usize, cols: usize) -> Vec<Action> {
    Action::iter()
        .filter(|&action| {
            transition(state, action).is_some_and(|(r, c)| r < rows && c < cols)
        })
        .collect()
}
