use std::collections::{HashMap, HashSet, VecDeque};

use super::{SearchOutcome, reconstruct_path};
use crate::maze::Maze;

/// Breadth-first search: strict FIFO frontier, cells marked seen when
/// enqueued so nothing is ever enqueued twice. On an unweighted grid the
/// first time the goal is closed is also the shortest path to it.
pub fn solve_bfs(maze: &Maze) -> SearchOutcome {
    let start = maze.start();
    let goal = maze.goal();

    let mut queue = VecDeque::from([start]);
    let mut seen = HashSet::from([start]);
    let mut parents = HashMap::new();
    let mut explored = Vec::new();

    while let Some(current) = queue.pop_front() {
        explored.push(current);

        if current == goal {
            return SearchOutcome {
                explored,
                path: reconstruct_path(&parents, goal),
            };
        }

        for neighbor in maze.neighbors(current) {
            if seen.insert(neighbor) {
                parents.insert(neighbor, current);
                queue.push_back(neighbor);
            }
        }
    }

    SearchOutcome {
        explored,
        path: Vec::new(),
    }
}
