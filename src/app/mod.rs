mod renderer;

use std::io::{Stdout, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, KeyCode, KeyEventKind},
    execute, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::animate::{Pacing, VisEvent};
use crate::app::renderer::{Layout, Renderer};
use crate::session::Session;
use crate::solvers::Solver;

/// Maximum number of run events to buffer between the run workers and the
/// render thread.
const MAX_EVENTS_IN_CHANNEL_BUFFER: usize = 1000;
/// How often the main loop polls for key events while a run is animating.
const RUN_INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// What the main menu offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Run(Solver),
    CompareAll,
    Regenerate,
    Quit,
}

impl std::fmt::Display for MenuAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuAction::Run(solver) => write!(f, "Solve with {solver}"),
            MenuAction::CompareAll => write!(f, "Compare all four algorithms"),
            MenuAction::Regenerate => write!(f, "Generate a new maze"),
            MenuAction::Quit => write!(f, "Quit"),
        }
    }
}

/// Base animation speed presets, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Speed {
    Slow,
    Normal,
    Fast,
}

impl Speed {
    fn base_ms(self) -> u64 {
        match self {
            Speed::Slow => 300,
            Speed::Normal => Pacing::DEFAULT_SPEED_MS,
            Speed::Fast => 50,
        }
    }
}

impl std::fmt::Display for Speed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speed::Slow => write!(f, "Slow"),
            Speed::Normal => write!(f, "Normal"),
            Speed::Fast => write!(f, "Fast"),
        }
    }
}

#[derive(Default)]
pub struct App {}

impl App {
    const MENU: [MenuAction; 7] = [
        MenuAction::Run(Solver::Bfs),
        MenuAction::Run(Solver::Dfs),
        MenuAction::Run(Solver::AStar),
        MenuAction::Run(Solver::Greedy),
        MenuAction::CompareAll,
        MenuAction::Regenerate,
        MenuAction::Quit,
    ];

    /// Set a panic hook to restore terminal state on panic, even if the
    /// panic occurs on another thread.
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen.
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Leave alternate screen and disable raw mode.
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Main application loop: ask for the maze setup once, then run
    /// solver animations until the user quits.
    pub fn run(&self, stdout: &mut Stdout) -> std::io::Result<()> {
        let Some(size) = App::ask_grid_size(stdout)? else {
            return Ok(());
        };
        let Some(speed) = App::select_from_menu(
            stdout,
            "Select animation speed (arrow keys and Enter, Esc to exit):",
            &[Speed::Slow, Speed::Normal, Speed::Fast],
        )?
        else {
            return Ok(());
        };

        let mut session = Session::new(size, None).map_err(std::io::Error::other)?;

        loop {
            execute!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
            let action = App::select_from_menu(
                stdout,
                "Maze pathfinding visualizer (arrow keys and Enter, Esc to exit):",
                &App::MENU,
            )?;
            match action {
                None | Some(MenuAction::Quit) => break,
                Some(MenuAction::Regenerate) => {
                    session.regenerate(size, None).map_err(std::io::Error::other)?;
                }
                Some(MenuAction::Run(solver)) => {
                    self.animate(stdout, &mut session, Layout::Single(solver), speed)?;
                }
                Some(MenuAction::CompareAll) => {
                    self.animate(stdout, &mut session, Layout::Compare, speed)?;
                }
            }
        }
        Ok(())
    }

    /// Run one animation (single pane or 2x2 compare) to completion or
    /// Esc-cancellation.
    fn animate(
        &self,
        stdout: &mut Stdout,
        session: &mut Session,
        layout: Layout,
        speed: Speed,
    ) -> std::io::Result<()> {
        let maze = session.maze();
        let (need_cols, need_rows) = layout.footprint(maze.size());
        let (term_cols, term_rows) = terminal::size()?;
        if term_cols < need_cols || term_rows < need_rows + 1 {
            execute!(
                stdout,
                terminal::Clear(ClearType::All),
                cursor::MoveTo(0, 0),
                style::PrintStyledContent(
                    format!(
                        "Terminal is too small ({term_cols}x{term_rows}) for this view ({need_cols}x{need_rows}). Resize and try again.\r\n"
                    )
                    .with(Color::Yellow)
                    .attribute(Attribute::Bold)
                ),
            )?;
            App::wait_for_keypress()?;
            return Ok(());
        }

        execute!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;

        let (tx, rx) = std::sync::mpsc::sync_channel::<VisEvent>(MAX_EVENTS_IN_CHANNEL_BUFFER);
        let should_stop = Arc::new(AtomicBool::new(false));

        let stop_for_render = Arc::clone(&should_stop);
        let maze_for_render = Arc::clone(&maze);
        let render_thread_handle = std::thread::spawn(move || {
            Renderer::new(maze_for_render, layout).render(rx, &stop_for_render)
        });

        let started = match layout {
            Layout::Single(solver) => session.start_single(
                solver,
                Pacing::from_speed(solver, speed.base_ms()),
                tx,
            ),
            Layout::Compare => session.start_compare(speed.base_ms(), tx),
        };
        if let Err(e) = started {
            tracing::error!("failed to start run: {e}");
            should_stop.store(true, Ordering::Release);
        }

        // Watch for Esc while the run animates. The render thread exits on
        // its own once every event sender is gone.
        while !render_thread_handle.is_finished() {
            if !event::poll(RUN_INPUT_POLL_TIMEOUT)? {
                continue;
            }
            if let event::Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
                && key.code == KeyCode::Esc
            {
                tracing::info!("Esc pressed, cancelling active run");
                session.cancel_active();
                should_stop.store(true, Ordering::Release);
                break;
            }
        }

        session.wait();
        should_stop.store(true, Ordering::Release);
        render_thread_handle
            .join()
            .expect("render thread panicked")?;

        execute!(
            stdout,
            cursor::MoveTo(0, need_rows + 1),
            style::PrintStyledContent(
                "Press any key to return to the menu..."
                    .with(Color::Blue)
                    .attribute(Attribute::Bold)
            ),
        )?;
        App::wait_for_keypress()?;
        Ok(())
    }

    /// Prompt for an odd grid size between 5 and 99. Returns `None` if
    /// the user backs out with Esc.
    fn ask_grid_size(stdout: &mut Stdout) -> std::io::Result<Option<u16>> {
        execute!(
            stdout,
            style::Print("Enter grid size (odd number, 5-99), then Enter. Esc to exit:\r\n"),
        )?;
        let mut buffer = String::new();
        loop {
            let event::Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Esc => return Ok(None),
                KeyCode::Char(c) if c.is_ascii_digit() && buffer.len() < 2 => {
                    buffer.push(c);
                    execute!(stdout, style::Print(c))?;
                }
                KeyCode::Backspace if !buffer.is_empty() => {
                    buffer.pop();
                    execute!(
                        stdout,
                        cursor::MoveLeft(1),
                        style::Print(' '),
                        cursor::MoveLeft(1)
                    )?;
                }
                KeyCode::Enter => {
                    match buffer.parse::<u16>() {
                        Ok(size) if size >= 5 && size % 2 == 1 => return Ok(Some(size)),
                        _ => {
                            buffer.clear();
                            execute!(
                                stdout,
                                style::Print("\r\n"),
                                style::PrintStyledContent(
                                    "Size must be an odd number between 5 and 99.\r\n"
                                        .with(Color::Yellow)
                                ),
                            )?;
                        }
                    };
                }
                _ => {}
            }
        }
    }

    /// Arrow-key menu over a fixed list of options. Enter picks, Esc
    /// backs out.
    fn select_from_menu<T: std::fmt::Display + Copy>(
        stdout: &mut Stdout,
        prompt: &str,
        options: &[T],
    ) -> std::io::Result<Option<T>> {
        execute!(stdout, style::Print(format!("{prompt}\r\n")))?;
        let mut selected = 0usize;
        loop {
            for (i, option) in options.iter().enumerate() {
                let line = format!("{} {}\r\n", if i == selected { ">" } else { " " }, option);
                if i == selected {
                    queue!(
                        stdout,
                        style::PrintStyledContent(line.with(Color::Cyan).attribute(Attribute::Bold))
                    )?;
                } else {
                    queue!(stdout, style::Print(line))?;
                }
            }
            stdout.flush()?;

            loop {
                let event::Event::Key(key) = event::read()? else {
                    continue;
                };
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Up => {
                        selected = selected.saturating_sub(1);
                        break;
                    }
                    KeyCode::Down => {
                        selected = (selected + 1).min(options.len() - 1);
                        break;
                    }
                    KeyCode::Enter => return Ok(Some(options[selected])),
                    KeyCode::Esc => return Ok(None),
                    _ => {}
                }
            }
            queue!(stdout, cursor::MoveUp(options.len() as u16), cursor::MoveToColumn(0))?;
        }
    }

    /// Block until any key is pressed.
    fn wait_for_keypress() -> std::io::Result<()> {
        loop {
            if let event::Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                return Ok(());
            }
        }
    }
}
