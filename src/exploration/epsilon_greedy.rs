use rand::{seq::SliceRandom, Rng};

use crate::{
    algo::QTable,
    decay::{Constant, Decay},
    env::{Action, Pos},
    error::Result,
    util::ensure_interval,
};

use super::Choice;

/// Epsilon greedy exploration policy with an epsilon that decays once per episode
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: f32,
    decay: D,
}

impl EpsilonGreedy<Constant> {
    /// A purely greedy policy that never explores
    pub fn greedy() -> Self {
        Self {
            epsilon: 0.0,
            decay: Constant,
        }
    }
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy from a starting epsilon and a decay strategy
    ///
    /// **Returns** an error if `epsilon` is not in the interval `[0,1]`
    pub fn new(epsilon: f32, decay: D) -> Result<Self> {
        ensure_interval!(epsilon, 0.0f32, 1.0f32);
        Ok(Self { epsilon, decay })
    }

    /// The current exploration rate
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Advance the exploration rate by one episode
    pub fn decay(&mut self) {
        self.epsilon = self.decay.next(self.epsilon);
    }

    /// Flip the exploration coin
    ///
    /// No randomness is drawn when epsilon is zero.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Choice {
        if self.epsilon > 0.0 && rng.gen::<f32>() < self.epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }

    /// Select one of `actions` for `state`
    ///
    /// Exploring picks uniformly among all actions. Exploiting picks uniformly among the
    /// actions sharing the highest Q-value.
    ///
    /// **Returns** `None` if `actions` is empty
    pub fn act<R: Rng + ?Sized>(
        &self,
        q_table: &QTable,
        state: Pos,
        actions: &[Action],
        rng: &mut R,
    ) -> Option<Action> {
        match self.choose(rng) {
            Choice::Explore => actions.choose(rng).copied(),
            Choice::Exploit => q_table.greedy_action(state, actions, rng),
        }
    }
}
