use std::io::{Stdout, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::{
    cursor, queue,
    style::{self, Color, Stylize},
};

use crate::animate::{RunEvent, RunResult, VisEvent};
use crate::maze::{Cell, Maze};
use crate::solvers::Solver;

/// Display color for each algorithm's explored overlay.
fn solver_color(solver: Solver) -> Color {
    match solver {
        Solver::Bfs => Color::Cyan,
        Solver::Dfs => Color::Magenta,
        Solver::AStar => Color::Green,
        Solver::Greedy => Color::DarkYellow,
    }
}

/// A renderable cell glyph. Each one occupies exactly two character
/// widths so the board lines up in a terminal grid.
#[derive(Debug, Clone, Copy)]
enum Tile {
    Wall,
    Open,
    Start,
    Goal,
    Explored(Solver),
    PathStep,
}

impl Tile {
    /// The width of each tile when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;

    fn styled(self) -> style::StyledContent<&'static str> {
        let styled = match self {
            Tile::Wall => "⬜".with(Color::White),
            Tile::Open => "  ".with(Color::Reset),
            Tile::Start => "🟩".with(Color::Green),
            Tile::Goal => "🟥".with(Color::Red),
            Tile::Explored(solver) => "* ".with(solver_color(solver)),
            Tile::PathStep => "o ".with(Color::Yellow),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled.content().width(),
                Tile::CELL_WIDTH as usize,
                "Each tile must occupy exactly two character widths."
            );
        }

        styled
    }
}

/// Where panes sit on screen: one pane for a single run, a 2x2 grid of
/// panes for compare mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Single(Solver),
    Compare,
}

impl Layout {
    /// Terminal cell footprint of the whole layout for a maze of the
    /// given size: (columns, rows).
    pub fn footprint(self, size: u16) -> (u16, u16) {
        let pane_cols = size * Tile::CELL_WIDTH + PANE_GAP_COLS;
        let pane_rows = size + PANE_HEADER_ROWS + PANE_FOOTER_ROWS;
        match self {
            Layout::Single(_) => (pane_cols, pane_rows),
            Layout::Compare => (pane_cols * 2, pane_rows * 2),
        }
    }

    fn origin(self, solver: Solver, size: u16) -> (u16, u16) {
        let pane_cols = size * Tile::CELL_WIDTH + PANE_GAP_COLS;
        let pane_rows = size + PANE_HEADER_ROWS + PANE_FOOTER_ROWS;
        match self {
            Layout::Single(_) => (0, 0),
            Layout::Compare => match solver {
                Solver::Bfs => (0, 0),
                Solver::Dfs => (pane_cols, 0),
                Solver::AStar => (0, pane_rows),
                Solver::Greedy => (pane_cols, pane_rows),
            },
        }
    }

    fn solvers(self) -> Vec<Solver> {
        match self {
            Layout::Single(solver) => vec![solver],
            Layout::Compare => Solver::ALL.to_vec(),
        }
    }
}

const PANE_GAP_COLS: u16 = 4;
const PANE_HEADER_ROWS: u16 = 1;
const PANE_FOOTER_ROWS: u16 = 2;

/// How often the render loop wakes up to check the stop flag when no
/// events are arriving.
const EVENT_RECV_TIMEOUT: Duration = Duration::from_millis(100);

/// Draws the maze panes and paints run events as they stream in. Runs on
/// its own thread; exits when the event channel disconnects or the stop
/// flag is raised.
pub struct Renderer {
    stdout: Stdout,
    maze: Arc<Maze>,
    layout: Layout,
}

impl Renderer {
    pub fn new(maze: Arc<Maze>, layout: Layout) -> Self {
        Renderer {
            stdout: std::io::stdout(),
            maze,
            layout,
        }
    }

    /// Receive and paint events until the stream ends.
    pub fn render(
        &mut self,
        rx: Receiver<VisEvent>,
        should_stop: &AtomicBool,
    ) -> std::io::Result<()> {
        self.draw_panes()?;

        loop {
            if should_stop.load(Ordering::Acquire) {
                tracing::debug!("[render] stop flag set, exiting render loop");
                return Ok(());
            }
            let event = match rx.recv_timeout(EVENT_RECV_TIMEOUT) {
                Ok(event) => event,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("[render] event channel closed, exiting render loop");
                    return Ok(());
                }
            };
            match event {
                VisEvent::Run { solver, event } => self.paint_run_event(solver, event)?,
                VisEvent::CompareComplete => {
                    let (_, rows) = self.layout.footprint(self.maze.size());
                    queue!(
                        self.stdout,
                        cursor::MoveTo(0, rows),
                        style::PrintStyledContent("All four algorithms finished.".with(Color::Yellow)),
                    )?;
                    self.stdout.flush()?;
                }
            }
        }
    }

    /// Draw every pane's header and untouched maze board.
    fn draw_panes(&mut self) -> std::io::Result<()> {
        let size = self.maze.size();
        for solver in self.layout.solvers() {
            let (x0, y0) = self.layout.origin(solver, size);
            queue!(
                self.stdout,
                cursor::MoveTo(x0, y0),
                style::PrintStyledContent(
                    solver.short_name().with(solver_color(solver)).bold()
                ),
            )?;
            for row in 0..size {
                queue!(self.stdout, cursor::MoveTo(x0, y0 + PANE_HEADER_ROWS + row))?;
                for col in 0..size {
                    let cell = Cell::new(row, col);
                    let tile = if cell == self.maze.start() {
                        Tile::Start
                    } else if cell == self.maze.goal() {
                        Tile::Goal
                    } else if !self.maze.is_open(cell) {
                        Tile::Wall
                    } else {
                        Tile::Open
                    };
                    queue!(self.stdout, style::PrintStyledContent(tile.styled()))?;
                }
            }
        }
        self.stdout.flush()
    }

    fn paint_run_event(&mut self, solver: Solver, event: RunEvent) -> std::io::Result<()> {
        match event {
            RunEvent::NodeExplored { cell } => {
                self.paint_cell(solver, cell, Tile::Explored(solver))?;
            }
            RunEvent::PathCell { cell, index: _ } => {
                self.paint_cell(solver, cell, Tile::PathStep)?;
            }
            RunEvent::RunComplete { result } => self.draw_stats(&result)?,
        }
        self.stdout.flush()
    }

    /// Paint one overlay tile, leaving the start and goal markers alone.
    fn paint_cell(&mut self, solver: Solver, cell: Cell, tile: Tile) -> std::io::Result<()> {
        if cell == self.maze.start() || cell == self.maze.goal() {
            return Ok(());
        }
        let (x0, y0) = self.layout.origin(solver, self.maze.size());
        queue!(
            self.stdout,
            cursor::MoveTo(x0 + cell.col * Tile::CELL_WIDTH, y0 + PANE_HEADER_ROWS + cell.row),
            style::PrintStyledContent(tile.styled()),
        )
    }

    fn draw_stats(&mut self, result: &RunResult) -> std::io::Result<()> {
        let size = self.maze.size();
        let (x0, y0) = self.layout.origin(result.solver, size);
        let line = format!(
            "{}: {} nodes | {} path | {}ms",
            result.solver.short_name(),
            result.nodes_explored,
            result.path_len,
            result.elapsed.as_millis()
        );
        queue!(
            self.stdout,
            cursor::MoveTo(x0, y0 + PANE_HEADER_ROWS + size),
            style::PrintStyledContent(line.with(solver_color(result.solver))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_panes_do_not_overlap() {
        let size = 9u16;
        let mut origins: Vec<(u16, u16)> = Solver::ALL
            .into_iter()
            .map(|s| Layout::Compare.origin(s, size))
            .collect();
        origins.sort();
        origins.dedup();
        assert_eq!(origins.len(), 4);

        let pane_cols = size * Tile::CELL_WIDTH + PANE_GAP_COLS;
        let pane_rows = size + PANE_HEADER_ROWS + PANE_FOOTER_ROWS;
        for (x, y) in origins {
            assert!(x == 0 || x == pane_cols);
            assert!(y == 0 || y == pane_rows);
        }
    }

    #[test]
    fn test_single_footprint_fits_one_pane() {
        let (cols, rows) = Layout::Single(Solver::Bfs).footprint(9);
        let (ccols, crows) = Layout::Compare.footprint(9);
        assert_eq!(ccols, cols * 2);
        assert_eq!(crows, rows * 2);
    }
}
