use std::collections::HashSet;

use crate::env::{transition, valid_actions, Maze, Pos};

/// A rectangular maze with walls between neighbouring cells
///
/// Walls are symmetric: a wall between `a` and `b` also blocks the move from `b` to `a`.
/// Cells that are not orthogonal neighbours never have a wall between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMaze {
    rows: usize,
    cols: usize,
    entry: Pos,
    exit: Pos,
    walls: HashSet<(Pos, Pos)>,
}

impl GridMaze {
    /// Create an open grid without any internal walls
    pub fn new(rows: usize, cols: usize, entry: Pos, exit: Pos) -> Self {
        Self {
            rows,
            cols,
            entry,
            exit,
            walls: HashSet::new(),
        }
    }

    /// Create a grid with a wall between every pair of neighbours, ready to be carved
    pub fn walled(rows: usize, cols: usize, entry: Pos, exit: Pos) -> Self {
        let mut maze = Self::new(rows, cols, entry, exit);
        for row in 0..rows {
            for col in 0..cols {
                maze.enclose((row, col));
            }
        }
        maze
    }

    /// Create a `1 x len` corridor running from the leftmost to the rightmost cell
    pub fn corridor(len: usize) -> Self {
        Self::new(1, len, (0, 0), (0, len.saturating_sub(1)))
    }

    /// Add a wall between two neighbouring cells, consuming the maze
    pub fn with_wall(mut self, a: Pos, b: Pos) -> Self {
        self.add_wall(a, b);
        self
    }

    /// Add a wall between two neighbouring cells
    ///
    /// **Returns** `false` if the cells are not neighbours or the wall already exists
    pub fn add_wall(&mut self, a: Pos, b: Pos) -> bool {
        is_neighbour(a, b) && self.walls.insert(edge(a, b))
    }

    /// Knock down the wall between two cells
    ///
    /// **Returns** `true` if there was a wall to remove
    pub fn remove_wall(&mut self, a: Pos, b: Pos) -> bool {
        self.walls.remove(&edge(a, b))
    }

    /// Wall off every in-bounds neighbour of a cell
    pub fn enclose(&mut self, pos: Pos) {
        for action in valid_actions(pos, self.rows, self.cols) {
            if let Some(neighbour) = transition(pos, action) {
                self.add_wall(pos, neighbour);
            }
        }
    }

    /// Number of walls currently standing
    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }
}

impl Maze for GridMaze {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn entry(&self) -> Pos {
        self.entry
    }

    fn exit(&self) -> Pos {
        self.exit
    }

    fn is_wall_between(&self, a: Pos, b: Pos) -> bool {
        self.walls.contains(&edge(a, b))
    }
}

/// Normalize an unordered pair of cells
fn edge(a: Pos, b: Pos) -> (Pos, Pos) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn is_neighbour(a: Pos, b: Pos) -> bool {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_are_symmetric() {
        let mut maze = GridMaze::new(2, 2, (0, 0), (1, 1));
        assert!(maze.add_wall((0, 0), (0, 1)), "wall added");
        assert!(!maze.add_wall((0, 1), (0, 0)), "same wall from the other side");

        assert!(maze.is_wall_between((0, 0), (0, 1)), "blocks left to right");
        assert!(maze.is_wall_between((0, 1), (0, 0)), "blocks right to left");
        assert!(!maze.is_wall_between((0, 0), (1, 0)), "other edges open");

        assert!(maze.remove_wall((0, 1), (0, 0)), "wall removed");
        assert!(!maze.is_wall_between((0, 0), (0, 1)), "edge open again");
    }

    #[test]
    fn only_neighbours_get_walls() {
        let mut maze = GridMaze::new(3, 3, (0, 0), (2, 2));
        assert!(!maze.add_wall((0, 0), (1, 1)), "diagonal rejected");
        assert!(!maze.add_wall((0, 0), (0, 2)), "distant cell rejected");
        assert!(!maze.add_wall((1, 1), (1, 1)), "self rejected");
        assert_eq!(maze.wall_count(), 0, "no walls added");
    }

    #[test]
    fn enclose_and_walled() {
        let mut maze = GridMaze::new(3, 3, (0, 0), (2, 2));
        maze.enclose((1, 1));
        assert_eq!(maze.wall_count(), 4, "interior cell has four walls");
        maze.enclose((0, 0));
        assert_eq!(maze.wall_count(), 6, "corner adds two walls");

        // 2 * r * c - r - c internal edges
        let maze = GridMaze::walled(3, 4, (0, 0), (2, 3));
        assert_eq!(maze.wall_count(), 17, "every internal edge walled");
    }

    #[test]
    fn corridor_shape() {
        let maze = GridMaze::corridor(5);
        assert_eq!((maze.rows(), maze.cols()), (1, 5), "dimensions");
        assert_eq!(maze.entry(), (0, 0), "entry on the left");
        assert_eq!(maze.exit(), (0, 4), "exit on the right");
        assert_eq!(maze.wall_count(), 0, "corridor is open");
    }
}
