use std::collections::{HashMap, HashSet};

use super::{SearchOutcome, reconstruct_path};
use crate::maze::{Cell, Maze};

/// Depth-first search: strict LIFO frontier. A cell may sit on the stack
/// several times with different parents; whichever copy is popped first
/// (the most recently pushed) closes the cell and fixes its parent, and
/// later copies are skipped.
pub fn solve_dfs(maze: &Maze) -> SearchOutcome {
    let start = maze.start();
    let goal = maze.goal();

    let mut stack: Vec<(Cell, Option<Cell>)> = vec![(start, None)];
    let mut closed = HashSet::new();
    let mut parents = HashMap::new();
    let mut explored = Vec::new();

    while let Some((current, parent)) = stack.pop() {
        if !closed.insert(current) {
            continue;
        }
        if let Some(parent) = parent {
            parents.insert(current, parent);
        }
        explored.push(current);

        if current == goal {
            return SearchOutcome {
                explored,
                path: reconstruct_path(&parents, goal),
            };
        }

        // Pushed in up/down/left/right order, so popped right-first.
        for neighbor in maze.neighbors(current) {
            if !closed.contains(&neighbor) {
                stack.push((neighbor, Some(current)));
            }
        }
    }

    SearchOutcome {
        explored,
        path: Vec::new(),
    }
}
