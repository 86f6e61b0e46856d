mod action;
mod reward;

pub use action::{transition, valid_actions, Action};
pub use reward::{evaluate, reward, Outcome, RewardScheme, Step};

use crate::error::{Error, Result};

/// A `(row, column)` coordinate in the maze
pub type Pos = (usize, usize);

/// The maze the solver navigates
///
/// The solver never mutates a maze. It only queries its dimensions, the two endpoints,
/// and whether a wall separates two neighbouring cells.
pub trait Maze {
    /// Number of rows in the grid
    fn rows(&self) -> usize;

    /// Number of columns in the grid
    fn cols(&self) -> usize;

    /// The cell every episode starts from
    fn entry(&self) -> Pos;

    /// The goal cell
    fn exit(&self) -> Pos;

    /// Determine if a wall blocks direct movement between two neighbouring cells
    fn is_wall_between(&self, a: Pos, b: Pos) -> bool;

    /// Determine if a coordinate lies inside the grid
    fn contains(&self, (row, col): Pos) -> bool {
        row < self.rows() && col < self.cols()
    }
}

/// Check that a maze can be navigated at all
///
/// **Returns** [`Error::InvalidMaze`] if either dimension is zero or the entry or exit
/// lies outside the grid
pub fn validate<M: Maze + ?Sized>(maze: &M) -> Result<()> {
    let (rows, cols) = (maze.rows(), maze.cols());
    if rows < 1 || cols < 1 {
        return Err(Error::InvalidMaze {
            reason: format!("grid must be at least 1x1, got {rows}x{cols}"),
        });
    }

    for (name, pos) in [("entry", maze.entry()), ("exit", maze.exit())] {
        if !maze.contains(pos) {
            return Err(Error::InvalidMaze {
                reason: format!("{name} {pos:?} is outside the {rows}x{cols} grid"),
            });
        }
    }

    Ok(())
}
