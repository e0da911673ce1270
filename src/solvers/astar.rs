use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::{ScoredCell, SearchOutcome, reconstruct_path};
use crate::maze::Maze;

/// A* search ordered by `f = g + h` with the Manhattan heuristic.
///
/// The frontier is a min-heap with lazy deletion: relaxing a cell pushes
/// a fresh entry with the improved score, and stale entries are skipped
/// when popped because the cell is already closed. Ties on `f` resolve in
/// push order through the sequence number.
pub fn solve_astar(maze: &Maze) -> SearchOutcome {
    let start = maze.start();
    let goal = maze.goal();

    let mut open = BinaryHeap::new();
    let mut g_scores = HashMap::from([(start, 0u32)]);
    let mut parents = HashMap::new();
    let mut closed = HashSet::new();
    let mut explored = Vec::new();
    let mut seq = 0u64;

    open.push(Reverse(ScoredCell {
        score: start.manhattan(goal),
        seq,
        cell: start,
    }));

    while let Some(Reverse(entry)) = open.pop() {
        let current = entry.cell;
        if !closed.insert(current) {
            continue;
        }
        explored.push(current);

        if current == goal {
            return SearchOutcome {
                explored,
                path: reconstruct_path(&parents, goal),
            };
        }

        let current_g = g_scores[&current];
        for neighbor in maze.neighbors(current) {
            if closed.contains(&neighbor) {
                continue;
            }
            let tentative_g = current_g + 1;
            match g_scores.get(&neighbor) {
                Some(&g) if tentative_g >= g => continue,
                _ => {}
            }
            g_scores.insert(neighbor, tentative_g);
            parents.insert(neighbor, current);
            seq += 1;
            open.push(Reverse(ScoredCell {
                score: tentative_g + neighbor.manhattan(goal),
                seq,
                cell: neighbor,
            }));
        }
    }

    SearchOutcome {
        explored,
        path: Vec::new(),
    }
}
