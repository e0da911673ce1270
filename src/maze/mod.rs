pub mod cell;

pub use cell::{Cell, CellState};

/// An immutable square maze of open and wall cells.
///
/// The maze is built once by a generator and never mutated afterwards,
/// which is what makes it safe to share by reference (or `Arc`) across
/// concurrently running solvers. Start is fixed at (1,1) and goal at
/// (size-2, size-2).
pub struct Maze {
    cells: Box<[CellState]>,
    size: u16,
    start: Cell,
    goal: Cell,
}

impl Maze {
    /// Assemble a maze from a finished cell buffer. Only generators (and
    /// tests) construct mazes; everyone else receives a shared reference.
    pub(crate) fn from_cells(size: u16, cells: Box<[CellState]>) -> Self {
        debug_assert_eq!(cells.len(), size as usize * size as usize);
        Maze {
            cells,
            size,
            start: Cell::new(1, 1),
            goal: Cell::new(size - 2, size - 2),
        }
    }

    /// Build a maze from ASCII rows, `#` for wall and anything else open.
    #[cfg(test)]
    pub fn from_rows(rows: &[&str]) -> Self {
        let size = rows.len() as u16;
        let mut cells = Vec::with_capacity(rows.len() * rows.len());
        for row in rows {
            assert_eq!(row.len(), rows.len(), "maze rows must form a square");
            for ch in row.chars() {
                cells.push(if ch == '#' {
                    CellState::Wall
                } else {
                    CellState::Open
                });
            }
        }
        Maze::from_cells(size, cells.into_boxed_slice())
    }

    pub fn size(&self) -> u16 {
        self.size
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    fn ravel_index(&self, cell: Cell) -> usize {
        // Overflow-safe since row and col are u16 (assuming usize is at least 32 bits)
        cell.row as usize * self.size as usize + cell.col as usize
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.size && cell.col < self.size
    }

    pub fn is_open(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && self.cells[self.ravel_index(cell)] == CellState::Open
    }

    /// The cardinally adjacent open cells of `cell`, in the fixed order
    /// up, down, left, right. DFS exploration order depends on this
    /// ordering, so it must not change.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        let (row, col) = (cell.row, cell.col);
        [
            // Wrapping row - 1 / col - 1 to u16::MAX on underflow is fine:
            // the bounds check in is_open filters those out.
            Cell::new(row.wrapping_sub(1), col),
            Cell::new(row.saturating_add(1), col),
            Cell::new(row, col.wrapping_sub(1)),
            Cell::new(row, col.saturating_add(1)),
        ]
        .into_iter()
        .filter(move |&c| self.is_open(c))
    }

    /// Count of open cells, used by connectivity checks.
    pub fn open_cell_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&c| c == CellState::Open)
            .count()
    }
}

impl std::ops::Index<Cell> for Maze {
    type Output = CellState;

    fn index(&self, cell: Cell) -> &Self::Output {
        &self.cells[self.ravel_index(cell)]
    }
}
