use std::{collections::HashSet, error::Error, fs, path::Path};

use log::info;
use qmaze::{
    env::{transition, valid_actions},
    gym::GridMaze,
    solve, Maze, Pos, QLearningConfig, Solution,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

const ROWS: usize = 20;
const COLS: usize = 20;
const SEED: u64 = 2024;

/// Carve a perfect maze with a randomized depth-first search
fn carve(rng: &mut StdRng) -> GridMaze {
    let mut maze = GridMaze::walled(ROWS, COLS, (0, 0), (ROWS - 1, COLS - 1));
    let mut visited = HashSet::from([maze.entry()]);
    let mut stack = vec![maze.entry()];

    while let Some(&cell) = stack.last() {
        let unvisited = valid_actions(cell, ROWS, COLS)
            .into_iter()
            .filter_map(|action| transition(cell, action))
            .filter(|next| !visited.contains(next))
            .collect::<Vec<_>>();

        match unvisited.choose(rng) {
            Some(&next) => {
                maze.remove_wall(cell, next);
                visited.insert(next);
                stack.push(next);
            }
            None => {
                stack.pop();
            }
        }
    }

    maze
}

fn render(maze: &GridMaze, path: &[Pos]) -> String {
    let on_path = path.iter().collect::<HashSet<_>>();
    let mut out = String::from("+");
    out.push_str(&"---+".repeat(maze.cols()));
    out.push('\n');

    for row in 0..maze.rows() {
        let mut cells = String::from("|");
        let mut floor = String::from("+");
        for col in 0..maze.cols() {
            let pos = (row, col);
            let mark = if pos == maze.entry() {
                " E "
            } else if pos == maze.exit() {
                " X "
            } else if on_path.contains(&pos) {
                " * "
            } else {
                "   "
            };
            cells.push_str(mark);
            let east = col + 1 == maze.cols() || maze.is_wall_between(pos, (row, col + 1));
            cells.push(if east { '|' } else { ' ' });

            let south = row + 1 == maze.rows() || maze.is_wall_between(pos, (row + 1, col));
            floor.push_str(if south { "---+" } else { "   +" });
        }
        out.push_str(&cells);
        out.push('\n');
        out.push_str(&floor);
        out.push('\n');
    }

    out
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = Path::new("demos");
    let mut rng = StdRng::seed_from_u64(SEED);

    let maze = carve(&mut rng);
    let config = QLearningConfig::new(2000, 0.1, 0.99, 1.0);
    let Solution { training, path: found } = solve(&maze, &config, &mut rng)?;

    fs::create_dir_all(path.join("out"))?;
    let mut wtr = csv::Writer::from_path(path.join("out/q_learning_maze.csv"))?;
    wtr.write_record(["episode", "steps", "reward", "epsilon", "reached_exit"])?;
    for (i, report) in training.episodes.iter().enumerate() {
        wtr.write_record(&[
            i.to_string(),
            report.steps.to_string(),
            report.reward.to_string(),
            report.exploration.to_string(),
            report.reached_exit.to_string(),
        ])?;
    }
    wtr.flush()?;

    println!("{}", render(&maze, &found.states));
    if found.is_solved() {
        info!(
            "Solved in {} moves, exit first reached in episode {}",
            found.cost(),
            training.first_hit
        );
    } else {
        info!("Policy did not converge: {:?}", found.status);
    }

    found.into_result()?;
    Ok(())
}
