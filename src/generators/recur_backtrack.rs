use rand::{Rng, rngs::StdRng};

use crate::maze::{Cell, CellState, Maze};

/// Iterative randomized depth-first carve ("recursive backtracker").
///
/// Carves a spanning tree over the odd-coordinate sub-lattice: every loop
/// iteration looks at the top of the stack, jumps two cells in a random
/// unvisited cardinal direction, and opens both the target and the wall
/// cell between them. Dead ends pop the stack.
pub fn recursive_backtrack(size: u16, rng: &mut StdRng) -> Maze {
    let n = size as usize;
    let mut cells = vec![CellState::Wall; n * n].into_boxed_slice();
    let idx = |cell: Cell| cell.row as usize * n + cell.col as usize;

    let start = Cell::new(1, 1);
    let goal = Cell::new(size - 2, size - 2);
    cells[idx(start)] = CellState::Open;

    let mut stack = vec![start];
    let mut candidates: Vec<(Cell, Cell)> = Vec::with_capacity(4);

    while let Some(&current) = stack.last() {
        // Unvisited cells two steps away in each cardinal direction,
        // paired with the wall cell between them and `current`.
        candidates.clear();
        let (row, col) = (current.row as i32, current.col as i32);
        for (dr, dc) in [(-2i32, 0i32), (2, 0), (0, -2), (0, 2)] {
            let (tr, tc) = (row + dr, col + dc);
            // Interior bounds only: the outermost ring stays walled.
            if tr <= 0 || tr >= size as i32 - 1 || tc <= 0 || tc >= size as i32 - 1 {
                continue;
            }
            let target = Cell::new(tr as u16, tc as u16);
            if cells[idx(target)] == CellState::Wall {
                let wall = Cell::new((row + dr / 2) as u16, (col + dc / 2) as u16);
                candidates.push((target, wall));
            }
        }

        if candidates.is_empty() {
            stack.pop();
            continue;
        }
        let (target, wall) = candidates[rng.random_range(0..candidates.len())];
        cells[idx(target)] = CellState::Open;
        cells[idx(wall)] = CellState::Open;
        stack.push(target);
    }

    // Idempotent safety net before the forced carve.
    cells[idx(start)] = CellState::Open;
    cells[idx(goal)] = CellState::Open;
    carve_direct_route(&mut cells, n, start, goal);

    Maze::from_cells(size, cells)
}

/// Walk greedily from start toward goal, opening every visited cell.
///
/// Prefers stepping down while above the goal row, then right while left
/// of the goal column, then up, then left. This may add a second route
/// between some cells, which is intentional: the maze stays solvable even
/// if the carve above ever changes.
fn carve_direct_route(cells: &mut [CellState], n: usize, start: Cell, goal: Cell) {
    let mut pos = start;
    while pos != goal {
        if pos.row < goal.row {
            pos.row += 1;
        } else if pos.col < goal.col {
            pos.col += 1;
        } else if pos.row > goal.row {
            pos.row -= 1;
        } else {
            pos.col -= 1;
        }
        cells[pos.row as usize * n + pos.col as usize] = CellState::Open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_direct_route_is_fully_open() {
        let mut rng = StdRng::seed_from_u64(3);
        let maze = recursive_backtrack(9, &mut rng);
        // The forced carve opens the L-shaped walk: down the start column,
        // then right along the goal row.
        for row in 1..=7 {
            assert!(maze.is_open(Cell::new(row, 1)), "carved column broken at row {row}");
        }
        for col in 1..=7 {
            assert!(maze.is_open(Cell::new(7, col)), "carved row broken at col {col}");
        }
    }
}
