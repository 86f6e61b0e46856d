use std::ops::{Index, IndexMut};

use rand::{seq::SliceRandom, Rng};

use crate::env::{Action, Pos};

/// Dense table of action values with shape `rows x cols x 4`
///
/// Entry `(row, col, a)` estimates the discounted return of taking action `a` from
/// cell `(row, col)`. All entries start at zero and the shape never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    rows: usize,
    cols: usize,
    values: Vec<f32>,
}

impl QTable {
    /// Create a zeroed table for a `rows x cols` grid
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols * Action::COUNT],
        }
    }

    /// **Returns** `(rows, cols, actions)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.rows, self.cols, Action::COUNT)
    }

    /// The values of all four actions in a cell, ordered by [`Action::index`]
    pub fn values(&self, (row, col): Pos) -> &[f32] {
        let start = self.offset((row, col), Action::Up);
        &self.values[start..start + Action::COUNT]
    }

    /// The highest value among `actions` in `state`, or `None` if `actions` is empty
    pub fn max_value(&self, state: Pos, actions: &[Action]) -> Option<f32> {
        actions
            .iter()
            .map(|&action| self[(state, action)])
            .reduce(f32::max)
    }

    /// All of `actions` that attain the highest value in `state`
    pub fn best_actions(&self, state: Pos, actions: &[Action]) -> Vec<Action> {
        let Some(max) = self.max_value(state, actions) else {
            return Vec::new();
        };
        actions
            .iter()
            .copied()
            .filter(|&action| self[(state, action)] == max)
            .collect()
    }

    /// Pick uniformly at random among the best of `actions` in `state`
    ///
    /// Ties are broken randomly rather than by order so that equally good moves are
    /// followed equally often.
    pub fn greedy_action<R: Rng + ?Sized>(
        &self,
        state: Pos,
        actions: &[Action],
        rng: &mut R,
    ) -> Option<Action> {
        self.best_actions(state, actions).choose(rng).copied()
    }

    fn offset(&self, (row, col): Pos, action: Action) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "State {:?} is outside the {}x{} Q-table",
            (row, col),
            self.rows,
            self.cols,
        );
        (row * self.cols + col) * Action::COUNT + action.index()
    }
}

impl Index<(Pos, Action)> for QTable {
    type Output = f32;

    fn index(&self, (state, action): (Pos, Action)) -> &Self::Output {
        &self.values[self.offset(state, action)]
    }
}

impl IndexMut<(Pos, Action)> for QTable {
    fn index_mut(&mut self, (state, action): (Pos, Action)) -> &mut Self::Output {
        let i = self.offset(state, action);
        &mut self.values[i]
    }
}
