use log::{debug, info, trace};
use rand::Rng;

use crate::{
    decay::Multiplicative,
    env::{self, valid_actions, Action, Maze, Pos, RewardScheme},
    error::{Error, Result},
    exploration::EpsilonGreedy,
    util::ensure_interval,
};

use super::QTable;

/// Configuration for [`train`]
#[derive(Debug, Clone, PartialEq)]
pub struct QLearningConfig {
    /// Number of episodes to train for, at least 1
    ///
    /// **Default**: `500`
    pub episodes: u32,
    /// Learning rate α, in `(0,1]`
    ///
    /// **Default**: `0.1`
    pub alpha: f32,
    /// Discount factor γ, in `[0,1]`
    ///
    /// **Default**: `0.9`
    pub gamma: f32,
    /// Initial exploration rate ε, in `[0,1]`
    ///
    /// **Default**: `1.0`
    pub exploration: f32,
    /// Multiplicative exploration decay applied after every episode, in `(0,1]`
    ///
    /// **Default**: `0.995`
    pub exploration_decay: f32,
    /// Exploration floor, in `[0,1]`
    ///
    /// **Default**: `0.05`
    pub min_exploration: f32,
    /// Step cap per episode, also used when replaying the policy
    ///
    /// **Default**: `1000`
    pub max_steps: usize,
    pub rewards: RewardScheme,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            episodes: 500,
            alpha: 0.1,
            gamma: 0.9,
            exploration: 1.0,
            exploration_decay: 0.995,
            min_exploration: 0.05,
            max_steps: 1000,
            rewards: RewardScheme::default(),
        }
    }
}

impl QLearningConfig {
    /// Configure the four learning hyperparameters and keep the default policy constants
    pub fn new(episodes: u32, alpha: f32, gamma: f32, exploration: f32) -> Self {
        Self {
            episodes,
            alpha,
            gamma,
            exploration,
            ..Default::default()
        }
    }

    /// Check every hyperparameter against its interval
    pub fn validate(&self) -> Result<()> {
        let &Self {
            episodes,
            alpha,
            gamma,
            exploration,
            exploration_decay,
            min_exploration,
            max_steps,
            ..
        } = self;

        if episodes < 1 {
            return Err(Error::InvalidParameter {
                name: "episodes",
                value: episodes.into(),
                min: 1.0,
                max: f64::from(u32::MAX),
            });
        }
        if max_steps < 1 {
            return Err(Error::InvalidParameter {
                name: "max_steps",
                value: max_steps as f64,
                min: 1.0,
                max: usize::MAX as f64,
            });
        }
        if alpha <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "alpha",
                value: alpha.into(),
                min: 0.0,
                max: 1.0,
            });
        }
        ensure_interval!(alpha, 0.0f32, 1.0f32);
        ensure_interval!(gamma, 0.0f32, 1.0f32);
        ensure_interval!(exploration, 0.0f32, 1.0f32);
        Multiplicative::new(exploration_decay, min_exploration)?;

        Ok(())
    }

    fn policy(&self) -> Result<EpsilonGreedy<Multiplicative>> {
        EpsilonGreedy::new(
            self.exploration,
            Multiplicative::new(self.exploration_decay, self.min_exploration)?,
        )
    }
}

/// Summary of a single training episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeReport {
    /// Number of actions taken
    pub steps: usize,
    /// Sum of rewards received
    pub reward: f32,
    /// Exploration rate in effect during the episode
    pub exploration: f32,
    pub reached_exit: bool,
}

/// The outcome of [`train`]
#[derive(Debug, Clone)]
pub struct Training {
    pub q_table: QTable,
    /// The first episode that reached the exit, or the episode count if none did
    pub first_hit: u32,
    pub episodes: Vec<EpisodeReport>,
    /// Exploration rate after the final decay
    pub exploration: f32,
}

impl Training {
    /// Determine if any episode reached the exit
    pub fn converged(&self) -> bool {
        (self.first_hit as usize) < self.episodes.len()
    }
}

/// A single experienced transition
struct Exp {
    state: Pos,
    action: Action,
    next_state: Pos,
    reward: f32,
}

/// Tabular Q-learning driver
struct QLearner<'a, M: Maze + ?Sized> {
    maze: &'a M,
    config: &'a QLearningConfig,
    q_table: QTable,
    policy: EpsilonGreedy<Multiplicative>,
}

impl<'a, M: Maze + ?Sized> QLearner<'a, M> {
    /// Q(s,a) ← Q(s,a) + α[r + γ max<sub>a'</sub> Q(s',a') - Q(s,a)]
    fn learn(&mut self, experience: Exp) {
        let Exp {
            state,
            action,
            next_state,
            reward,
        } = experience;

        let next_actions = valid_actions(next_state, self.maze.rows(), self.maze.cols());
        let max_next_q = self
            .q_table
            .max_value(next_state, &next_actions)
            .unwrap_or(0.0);

        let q_value = self.q_table[(state, action)];
        self.q_table[(state, action)] =
            q_value + self.config.alpha * (reward + self.config.gamma * max_next_q - q_value);
    }

    /// Run one episode from the entry
    fn go<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<EpisodeReport> {
        let mut report = EpisodeReport {
            steps: 0,
            reward: 0.0,
            exploration: self.policy.epsilon(),
            reached_exit: false,
        };

        let mut state = self.maze.entry();
        if state == self.maze.exit() {
            report.reached_exit = true;
            return Ok(report);
        }

        let (rows, cols) = (self.maze.rows(), self.maze.cols());
        while report.steps < self.config.max_steps {
            let actions = valid_actions(state, rows, cols);
            let Some(action) = self.policy.act(&self.q_table, state, &actions, rng) else {
                break;
            };
            let step = env::evaluate(self.maze, state, action, &self.config.rewards)?;

            self.learn(Exp {
                state,
                action,
                next_state: step.next_state,
                reward: step.reward,
            });

            report.steps += 1;
            report.reward += step.reward;
            state = step.next_state;

            if step.is_terminal() {
                report.reached_exit = true;
                break;
            }
        }

        Ok(report)
    }
}

/// Learn a Q-table for navigating `maze` from its entry to its exit
///
/// Each episode starts at the entry and ends on reaching the exit or after
/// `config.max_steps` actions. The exploration rate decays after every episode.
///
/// **Returns** an error before any episode runs if the maze or the configuration is invalid
pub fn train<M, R>(maze: &M, config: &QLearningConfig, rng: &mut R) -> Result<Training>
where
    M: Maze + ?Sized,
    R: Rng + ?Sized,
{
    env::validate(maze)?;
    config.validate()?;

    info!(
        "Training on {}x{} maze for {} episodes (alpha={}, gamma={}, epsilon={})",
        maze.rows(),
        maze.cols(),
        config.episodes,
        config.alpha,
        config.gamma,
        config.exploration,
    );

    let mut learner = QLearner {
        maze,
        config,
        q_table: QTable::new(maze.rows(), maze.cols()),
        policy: config.policy()?,
    };

    let mut first_hit = config.episodes;
    let mut episodes = Vec::with_capacity(config.episodes as usize);
    for episode in 0..config.episodes {
        let report = learner.go(rng)?;
        trace!(
            "Episode {episode}: {} steps, reward {:.1}, epsilon {:.3}",
            report.steps,
            report.reward,
            report.exploration,
        );

        if report.reached_exit && episode < first_hit {
            debug!("Exit first reached in episode {episode} after {} steps", report.steps);
            first_hit = episode;
        }

        episodes.push(report);
        learner.policy.decay();
    }

    let exploration = learner.policy.epsilon();
    if first_hit < config.episodes {
        info!("Training finished: exit first reached in episode {first_hit}, final epsilon {exploration:.3}");
    } else {
        info!("Training finished: exit never reached, final epsilon {exploration:.3}");
    }

    Ok(Training {
        q_table: learner.q_table,
        first_hit,
        episodes,
        exploration,
    })
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::gym::GridMaze;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(1234)
    }

    #[test]
    fn config_validation() {
        assert!(QLearningConfig::default().validate().is_ok(), "defaults are valid");
        assert!(QLearningConfig::new(1, 1.0, 0.0, 0.0).validate().is_ok(), "edges are valid");

        let invalid = [
            ("episodes", QLearningConfig::new(0, 0.1, 0.9, 1.0)),
            ("alpha", QLearningConfig::new(10, 0.0, 0.9, 1.0)),
            ("alpha", QLearningConfig::new(10, 1.5, 0.9, 1.0)),
            ("gamma", QLearningConfig::new(10, 0.1, 1.1, 1.0)),
            ("exploration", QLearningConfig::new(10, 0.1, 0.9, -0.5)),
            (
                "max_steps",
                QLearningConfig {
                    max_steps: 0,
                    ..Default::default()
                },
            ),
            (
                "rate",
                QLearningConfig {
                    exploration_decay: 0.0,
                    ..Default::default()
                },
            ),
            (
                "floor",
                QLearningConfig {
                    min_exploration: 2.0,
                    ..Default::default()
                },
            ),
        ];

        for (expected, config) in invalid {
            match config.validate() {
                Err(Error::InvalidParameter { name, .. }) => {
                    assert_eq!(name, expected, "wrong parameter reported")
                }
                other => panic!("{expected} accepted: {other:?}"),
            }
        }
    }

    #[test]
    fn invalid_maze_fails_fast() {
        let maze = GridMaze::new(2, 2, (0, 0), (5, 5));
        let result = train(&maze, &QLearningConfig::default(), &mut rng());
        assert!(matches!(result, Err(Error::InvalidMaze { .. })), "exit out of bounds");

        let maze = GridMaze::new(0, 0, (0, 0), (0, 0));
        let result = train(&maze, &QLearningConfig::default(), &mut rng());
        assert!(matches!(result, Err(Error::InvalidMaze { .. })), "empty grid");
    }

    #[test]
    fn q_table_shape_is_fixed() {
        let maze = GridMaze::new(3, 4, (0, 0), (2, 3));
        for episodes in [1, 5, 50] {
            let training = train(&maze, &QLearningConfig::new(episodes, 0.5, 0.9, 1.0), &mut rng()).unwrap();
            assert_eq!(training.q_table.shape(), (3, 4, 4), "shape independent of episodes");
            assert_eq!(training.episodes.len(), episodes as usize, "one report per episode");
        }
    }

    #[test]
    fn exploration_decays_to_floor() {
        let maze = GridMaze::new(3, 3, (0, 0), (2, 2));
        let config = QLearningConfig::new(800, 0.5, 0.9, 1.0);
        let training = train(&maze, &config, &mut rng()).unwrap();

        let rates = training.episodes.iter().map(|e| e.exploration).collect::<Vec<_>>();
        assert_eq!(rates[0], 1.0, "first episode uses the initial rate");
        assert!(rates.windows(2).all(|w| w[1] <= w[0]), "non-increasing");
        assert!(rates.iter().all(|&r| r >= 0.05), "never below the floor");
        assert_eq!(training.exploration, 0.05, "reaches the floor");
    }

    #[test]
    fn single_cell_maze() {
        let maze = GridMaze::new(1, 1, (0, 0), (0, 0));
        let training = train(&maze, &QLearningConfig::new(3, 0.5, 0.9, 1.0), &mut rng()).unwrap();

        assert_eq!(training.first_hit, 0, "exit reached immediately");
        assert!(training.converged());
        for report in &training.episodes {
            assert_eq!(report.steps, 0, "zero-step episode");
            assert!(report.reached_exit, "immediately successful");
        }
        assert_eq!(training.q_table.values((0, 0)), [0.0; 4], "nothing learned");
    }

    #[test]
    fn entry_equals_exit() {
        let maze = GridMaze::new(3, 3, (1, 1), (1, 1));
        let training = train(&maze, &QLearningConfig::new(2, 0.5, 0.9, 1.0), &mut rng()).unwrap();
        assert_eq!(training.first_hit, 0);
        assert!(training.episodes.iter().all(|e| e.steps == 0));
    }

    #[test]
    fn unreachable_exit_hits_sentinel() {
        let mut maze = GridMaze::new(2, 3, (0, 0), (1, 2));
        maze.enclose((1, 2));
        let config = QLearningConfig {
            max_steps: 200,
            ..QLearningConfig::new(20, 0.5, 0.9, 1.0)
        };
        let training = train(&maze, &config, &mut rng()).unwrap();

        assert_eq!(training.first_hit, 20, "sentinel equals episode count");
        assert!(!training.converged());
        for report in &training.episodes {
            assert_eq!(report.steps, 200, "every episode runs to the cap");
            assert!(!report.reached_exit);
        }
    }

    #[test]
    fn first_hit_is_earliest_episode() {
        let maze = GridMaze::corridor(4);
        let training = train(&maze, &QLearningConfig::new(30, 0.5, 0.9, 1.0), &mut rng()).unwrap();

        let earliest = training
            .episodes
            .iter()
            .position(|e| e.reached_exit)
            .unwrap() as u32;
        assert_eq!(training.first_hit, earliest, "first hit is the earliest success");
    }

    #[test]
    fn first_hit_after_failed_episode() {
        // 1x3 corridor, two-step cap, purely greedy agent. Episode 0 ties between Left
        // and Right in the middle cell. Turning back exhausts the cap and leaves Left at
        // -0.1, so episode 1 must move Right onto the exit.
        let maze = GridMaze::corridor(3);
        let config = QLearningConfig {
            exploration_decay: 1.0,
            min_exploration: 0.0,
            max_steps: 2,
            ..QLearningConfig::new(5, 1.0, 0.0, 0.0)
        };

        let mut hits = Vec::new();
        for seed in 0..32 {
            let training = train(&maze, &config, &mut StdRng::seed_from_u64(seed)).unwrap();
            let turned_back = training.q_table[((0, 1), Action::Left)];
            match training.first_hit {
                0 => assert_eq!(turned_back, 0.0, "seed {seed}: Left never tried"),
                1 => assert!(
                    (turned_back + 0.1).abs() < 1e-6,
                    "seed {seed}: episode 0 turned back"
                ),
                other => panic!("seed {seed}: first hit in episode {other}"),
            }
            hits.push(training.first_hit);
        }

        assert!(hits.contains(&0), "some seeds reach the exit in episode 0");
        assert!(hits.contains(&1), "some seeds first reach the exit in episode 1");
    }

    #[test]
    fn zero_exploration_is_raised_to_floor() {
        let maze = GridMaze::new(3, 3, (0, 0), (2, 2));
        let config = QLearningConfig::new(5, 0.5, 0.9, 0.0);
        let training = train(&maze, &config, &mut rng()).unwrap();

        let rates = training.episodes.iter().map(|e| e.exploration).collect::<Vec<_>>();
        assert_eq!(rates, [0.0, 0.05, 0.05, 0.05, 0.05], "floor applies after episode 0");
        assert_eq!(training.exploration, config.min_exploration, "ends on the floor");
    }

    #[test]
    fn exit_reward_ends_episode() {
        // From the entry, the only valid move lands on the exit
        let maze = GridMaze::corridor(2);
        let training = train(&maze, &QLearningConfig::new(5, 1.0, 0.9, 1.0), &mut rng()).unwrap();

        for report in &training.episodes {
            assert_eq!(report.steps, 1, "episode ends on the exit");
            assert_eq!(report.reward, 100.0, "exit reward");
        }
        assert_eq!(training.q_table[((0, 0), Action::Right)], 100.0, "alpha 1 copies the target");
        assert_eq!(training.q_table.values((0, 1)), [0.0; 4], "exit is never updated");
    }

    #[test]
    fn wall_collisions_are_penalized() {
        // The only move out of the entry is blocked, so every step is a collision
        let maze = GridMaze::new(1, 2, (0, 0), (0, 1)).with_wall((0, 0), (0, 1));
        let config = QLearningConfig {
            max_steps: 10,
            ..QLearningConfig::new(1, 1.0, 0.0, 0.0)
        };
        let training = train(&maze, &config, &mut rng()).unwrap();

        let report = training.episodes[0];
        assert_eq!(report.steps, 10, "agent stays stuck");
        assert!((report.reward + 10.0).abs() < 1e-5, "each collision costs exactly 1");
        assert_eq!(training.q_table[((0, 0), Action::Right)], -1.0, "wall penalty learned");
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let maze = GridMaze::new(4, 4, (0, 0), (3, 3)).with_wall((1, 1), (1, 2));
        let config = QLearningConfig::new(50, 0.3, 0.9, 1.0);

        let a = train(&maze, &config, &mut rng()).unwrap();
        let b = train(&maze, &config, &mut rng()).unwrap();
        assert_eq!(a.q_table, b.q_table, "same seed, same table");
        assert_eq!(a.first_hit, b.first_hit);
        assert_eq!(a.episodes, b.episodes);
    }
}
