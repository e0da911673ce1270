use std::fmt;

/// A grid coordinate, 0-indexed from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: u16,
    pub col: u16,
}

impl Cell {
    pub const fn new(row: u16, col: u16) -> Self {
        Cell { row, col }
    }

    /// Manhattan distance to `other`: |Δrow| + |Δcol|.
    pub fn manhattan(self, other: Cell) -> u32 {
        self.row.abs_diff(other.row) as u32 + self.col.abs_diff(other.col) as u32
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Binary state of a maze cell. The maze never changes state after
/// generation completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Wall,
    Open,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan_distance() {
        let a = Cell::new(1, 1);
        let b = Cell::new(3, 3);
        assert_eq!(a.manhattan(b), 4);
        assert_eq!(b.manhattan(a), 4);
        assert_eq!(a.manhattan(a), 0);
    }
}
