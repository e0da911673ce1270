use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::{ScoredCell, SearchOutcome, reconstruct_path};
use crate::maze::Maze;

/// Greedy best-first search ordered by the Manhattan heuristic alone.
///
/// First discoverer wins: a cell's parent and score are fixed the first
/// time it is pushed and never revised, so the path it draws can be
/// noticeably longer than the shortest one. That behavior is deliberate
/// and must stay.
pub fn solve_greedy(maze: &Maze) -> SearchOutcome {
    let start = maze.start();
    let goal = maze.goal();

    let mut open = BinaryHeap::new();
    let mut parents: HashMap<_, _> = HashMap::new();
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

        for neighbor in maze.neighbors(current) {
            if closed.contains(&neighbor) {
                continue;
            }
            // No relaxation: only ever discovered once.
            if let std::collections::hash_map::Entry::Vacant(slot) = parents.entry(neighbor) {
                slot.insert(current);
                seq += 1;
                open.push(Reverse(ScoredCell {
                    score: neighbor.manhattan(goal),
                    seq,
                    cell: neighbor,
                }));
            }
        }
    }

    SearchOutcome {
        explored,
        path: Vec::new(),
    }
}
