use std::collections::HashMap;

mod astar;
mod bfs;
mod dfs;
mod greedy;

use crate::maze::{Cell, Maze};
use astar::solve_astar;
use bfs::solve_bfs;
use dfs::solve_dfs;
use greedy::solve_greedy;

/// The four search algorithms the visualizer can animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Solver {
    Bfs,
    Dfs,
    AStar,
    Greedy,
}

impl Solver {
    pub const ALL: [Solver; 4] = [Solver::Bfs, Solver::Dfs, Solver::AStar, Solver::Greedy];

    /// Short label for pane headers and stats lines.
    pub fn short_name(self) -> &'static str {
        match self {
            Solver::Bfs => "BFS",
            Solver::Dfs => "DFS",
            Solver::AStar => "A*",
            Solver::Greedy => "Greedy",
        }
    }
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::Dfs => write!(f, "Depth-First Search (DFS)"),
            Solver::AStar => write!(f, "A* Search"),
            Solver::Greedy => write!(f, "Greedy Best-First Search"),
        }
    }
}

/// What a single solver run produced: the cells it closed, in closing
/// order and duplicate-free, and the start-to-goal path. An empty path
/// means the frontier emptied without reaching the goal, which the
/// generator's connectivity guarantee should make impossible in practice.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub explored: Vec<Cell>,
    pub path: Vec<Cell>,
}

/// Run the given solver against the maze. Search itself is free of
/// randomness, so the outcome is fully determined by the maze.
pub fn solve(maze: &Maze, solver: Solver) -> SearchOutcome {
    match solver {
        Solver::Bfs => solve_bfs(maze),
        Solver::Dfs => solve_dfs(maze),
        Solver::AStar => solve_astar(maze),
        Solver::Greedy => solve_greedy(maze),
    }
}

/// Follow parent back-links from the goal to the start and reverse.
/// The start cell has no entry in the map, which is what ends the walk.
fn reconstruct_path(parents: &HashMap<Cell, Cell>, goal: Cell) -> Vec<Cell> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&parent) = parents.get(&current) {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}

/// Frontier entry for the heap-based solvers, ordered by score and then
/// by push sequence number so ties resolve in insertion order.
#[derive(Debug, PartialEq, Eq)]
struct ScoredCell {
    score: u32,
    seq: u64,
    cell: Cell,
}

impl Ord for ScoredCell {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.score
            .cmp(&other.score)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for ScoredCell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::generate_maze;

    /// Every consecutive pair of path cells must be a cardinal move
    /// between open cells, starting at start and ending at goal.
    fn assert_valid_path(maze: &Maze, path: &[Cell]) {
        assert!(!path.is_empty(), "expected a non-empty path");
        assert_eq!(path[0], maze.start());
        assert_eq!(*path.last().unwrap(), maze.goal());
        for pair in path.windows(2) {
            assert!(maze.is_open(pair[0]));
            assert!(maze.is_open(pair[1]));
            assert_eq!(pair[0].manhattan(pair[1]), 1, "non-adjacent step {} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_all_solvers_find_valid_paths() {
        for seed in 0..10 {
            let maze = generate_maze(15, Some(seed)).unwrap();
            for solver in Solver::ALL {
                let outcome = solve(&maze, solver);
                assert_valid_path(&maze, &outcome.path);
                assert!(!outcome.explored.is_empty());
            }
        }
    }

    #[test]
    fn test_bfs_and_astar_agree_on_shortest_length() {
        for seed in 0..10 {
            let maze = generate_maze(21, Some(seed)).unwrap();
            let bfs = solve(&maze, Solver::Bfs);
            let astar = solve(&maze, Solver::AStar);
            assert_eq!(
                bfs.path.len(),
                astar.path.len(),
                "A* path not shortest with seed {seed}"
            );
        }
    }

    #[test]
    fn test_explored_cells_are_distinct() {
        let maze = generate_maze(15, Some(5)).unwrap();
        for solver in Solver::ALL {
            let outcome = solve(&maze, solver);
            let unique: std::collections::HashSet<Cell> =
                outcome.explored.iter().copied().collect();
            assert_eq!(unique.len(), outcome.explored.len(), "{solver} closed a cell twice");
        }
    }

    #[test]
    fn test_search_is_deterministic() {
        let maze = generate_maze(15, Some(11)).unwrap();
        for solver in Solver::ALL {
            let a = solve(&maze, solver);
            let b = solve(&maze, solver);
            assert_eq!(a.explored, b.explored);
            assert_eq!(a.path, b.path);
        }
    }

    #[test]
    fn test_minimal_maze_scenario() {
        // size 5 forces start (1,1) and goal (3,3); the direct carve
        // guarantees the 5-cell L-path exists, and manhattan distance 4
        // means no path can have fewer than 5 cells.
        let maze = generate_maze(5, Some(0)).unwrap();
        assert_eq!(maze.goal(), Cell::new(3, 3));
        let bfs = solve(&maze, Solver::Bfs);
        assert_eq!(bfs.path.len(), 5);
        assert!(!bfs.explored.is_empty());
    }

    #[test]
    fn test_unreachable_goal_returns_empty_path() {
        // Goal (3,3) walled off: the run must still finish cleanly.
        let maze = Maze::from_rows(&[
            "#####", //
            "#...#", //
            "#.###", //
            "#.###", //
            "#####",
        ]);
        for solver in Solver::ALL {
            let outcome = solve(&maze, solver);
            assert!(outcome.path.is_empty());
            assert!(!outcome.explored.is_empty());
        }
    }

    #[test]
    fn test_greedy_first_parent_wins() {
        // An open room: greedy walks straight toward the goal by
        // heuristic and never reconsiders a parent, so its path is still
        // valid but its explored set hugs the diagonal.
        let maze = Maze::from_rows(&[
            "#######", //
            "#.....#", //
            "#.....#", //
            "#.....#", //
            "#.....#", //
            "#.....#", //
            "#######",
        ]);
        let greedy = solve(&maze, Solver::Greedy);
        assert_valid_path(&maze, &greedy.path);
        let bfs = solve(&maze, Solver::Bfs);
        // Both are shortest here (open room), but greedy must have
        // explored no more cells than it pathed through plus frontier
        // pops along the diagonal; it never floods the whole room.
        assert!(greedy.explored.len() < bfs.explored.len());
    }

    #[test]
    fn test_dfs_path_need_not_be_shortest() {
        // DFS is valid but unconstrained; just pin down validity and that
        // it closed at least the path cells.
        let maze = generate_maze(15, Some(3)).unwrap();
        let dfs = solve(&maze, Solver::Dfs);
        assert_valid_path(&maze, &dfs.path);
        // Every path cell was closed at some point.
        let closed: std::collections::HashSet<Cell> = dfs.explored.iter().copied().collect();
        assert!(dfs.path.iter().all(|c| closed.contains(c)));
    }
}
