use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::SyncSender;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use crate::animate::{self, Pacing, RunResult, VisEvent};
use crate::error::Error;
use crate::generators::generate_maze;
use crate::maze::Maze;
use crate::solvers::{self, Solver};

/// A handle on whatever is currently animating: its cancellation flag and
/// the thread to join once it should be gone for good.
struct ActiveRun {
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// The per-maze context object: owns the current maze, the single
/// is-anything-running flag that gates new requests, and the handle of
/// the active run. There is no global state; every run is started through
/// a session.
pub struct Session {
    maze: Arc<Maze>,
    running: Arc<AtomicBool>,
    active: Option<ActiveRun>,
}

impl Session {
    pub fn new(size: u16, seed: Option<u64>) -> Result<Self, Error> {
        Ok(Session {
            maze: Arc::new(generate_maze(size, seed)?),
            running: Arc::new(AtomicBool::new(false)),
            active: None,
        })
    }

    pub fn maze(&self) -> Arc<Maze> {
        Arc::clone(&self.maze)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Throw away the current maze and build a fresh one. Any in-flight
    /// run is cancelled and joined first, so no stale pacing can emit
    /// events against the new maze.
    pub fn regenerate(&mut self, size: u16, seed: Option<u64>) -> Result<(), Error> {
        self.cancel_active();
        self.maze = Arc::new(generate_maze(size, seed)?);
        Ok(())
    }

    /// Run one solver against the current maze, streaming paced events
    /// into `tx`. Rejected without any state change while another run is
    /// active.
    pub fn start_single(
        &mut self,
        solver: Solver,
        pacing: Pacing,
        tx: SyncSender<VisEvent>,
    ) -> Result<(), Error> {
        self.reserve()?;

        let maze = Arc::clone(&self.maze);
        let running = Arc::clone(&self.running);
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_for_worker = Arc::clone(&cancel);

        let handle = std::thread::spawn(move || {
            run_one(&maze, solver, pacing, &tx, &cancel_for_worker);
            running.store(false, Ordering::Release);
        });
        self.active = Some(ActiveRun { cancel, handle });
        Ok(())
    }

    /// Run all four solvers concurrently against the same maze, one
    /// isolated worker each, and emit `CompareComplete` once every worker
    /// has finished with a result. Cancelling any worker suppresses the
    /// join marker.
    pub fn start_compare(&mut self, base_speed_ms: u64, tx: SyncSender<VisEvent>) -> Result<(), Error> {
        self.reserve()?;

        let maze = Arc::clone(&self.maze);
        let running = Arc::clone(&self.running);
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_for_coordinator = Arc::clone(&cancel);

        let handle = std::thread::spawn(move || {
            let workers: Vec<JoinHandle<Option<RunResult>>> = Solver::ALL
                .into_iter()
                .map(|solver| {
                    let maze = Arc::clone(&maze);
                    let tx = tx.clone();
                    let cancel = Arc::clone(&cancel_for_coordinator);
                    let pacing = Pacing::from_speed(solver, base_speed_ms);
                    std::thread::spawn(move || run_one(&maze, solver, pacing, &tx, &cancel))
                })
                .collect();

            // Fan-in: compare mode only finalizes once all four are done.
            let mut results = Vec::with_capacity(workers.len());
            for worker in workers {
                match worker.join() {
                    Ok(result) => results.push(result),
                    Err(_) => {
                        tracing::error!("compare worker panicked");
                        results.push(None);
                    }
                }
            }

            if results.iter().all(Option::is_some)
                && !cancel_for_coordinator.load(Ordering::Acquire)
            {
                for result in results.iter().flatten() {
                    tracing::info!(
                        "[compare] {:?}: {} nodes, {} path cells, {}ms",
                        result.solver,
                        result.nodes_explored,
                        result.path_len,
                        result.elapsed.as_millis()
                    );
                }
                tx.send(VisEvent::CompareComplete).ok();
            }
            running.store(false, Ordering::Release);
        });
        self.active = Some(ActiveRun { cancel, handle });
        Ok(())
    }

    /// Stop whatever is animating and wait for it to wind down. After
    /// this returns, no further events from the cancelled run can arrive.
    pub fn cancel_active(&mut self) {
        if let Some(run) = self.active.take() {
            run.cancel.store(true, Ordering::Release);
            if run.handle.join().is_err() {
                tracing::error!("run thread panicked during cancellation");
            }
            self.running.store(false, Ordering::Release);
        }
    }

    /// Block until the active run (if any) completes on its own.
    pub fn wait(&mut self) {
        if let Some(run) = self.active.take()
            && run.handle.join().is_err()
        {
            tracing::error!("run thread panicked");
        }
    }

    /// Claim the running flag, reaping a finished-but-unjoined run first.
    fn reserve(&mut self) -> Result<(), Error> {
        if self.running.load(Ordering::Acquire) {
            return Err(Error::RunInProgress);
        }
        // The previous run finished by itself; join its thread.
        self.wait();
        self.running.store(true, Ordering::Release);
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel_active();
    }
}

/// Solve, then replay the outcome as a paced event stream. This is the
/// body of every worker thread, single and compare mode alike.
fn run_one(
    maze: &Maze,
    solver: Solver,
    pacing: Pacing,
    tx: &SyncSender<VisEvent>,
    cancel: &AtomicBool,
) -> Option<RunResult> {
    let started = Instant::now();
    tracing::info!("[{:?}] run starting", solver);
    let outcome = solvers::solve(maze, solver);
    let result = animate::run_paced(solver, &outcome, tx, cancel, pacing, started);
    match &result {
        Some(result) => tracing::info!(
            "[{:?}] run complete: {} nodes, {} path cells, {}ms",
            solver,
            result.nodes_explored,
            result.path_len,
            result.elapsed.as_millis()
        ),
        None => tracing::info!("[{:?}] run cancelled", solver),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animate::RunEvent;
    use std::sync::mpsc::{Receiver, sync_channel};
    use std::time::Duration;

    const BUFFER: usize = 8192;

    fn drain(rx: &Receiver<VisEvent>) -> Vec<VisEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_single_run_completes_and_clears_flag() {
        let mut session = Session::new(9, Some(4)).unwrap();
        let (tx, rx) = sync_channel(BUFFER);
        session
            .start_single(Solver::Bfs, Pacing::immediate(), tx)
            .unwrap();
        session.wait();
        assert!(!session.is_running());

        let events = drain(&rx);
        let last = events.last().expect("run must emit events");
        assert!(matches!(
            last,
            VisEvent::Run {
                solver: Solver::Bfs,
                event: RunEvent::RunComplete { .. }
            }
        ));
    }

    #[test]
    fn test_second_request_is_rejected_while_running() {
        let mut session = Session::new(9, Some(4)).unwrap();
        let (tx, _rx) = sync_channel(BUFFER);
        let slow = Pacing {
            explore_delay: Duration::from_millis(50),
            path_delay: Duration::from_millis(50),
        };
        session.start_single(Solver::Bfs, slow, tx.clone()).unwrap();
        assert_eq!(
            session.start_single(Solver::Dfs, Pacing::immediate(), tx),
            Err(Error::RunInProgress)
        );
        session.cancel_active();
    }

    #[test]
    fn test_compare_emits_four_results_then_join_marker() {
        let mut session = Session::new(9, Some(8)).unwrap();
        let (tx, rx) = sync_channel(BUFFER);
        // Base speed low enough that the fastest divisor still rounds to
        // a 1ms delay; keeps the test quick.
        session.start_compare(1, tx).unwrap();
        session.wait();

        let events = drain(&rx);
        assert_eq!(events.last(), Some(&VisEvent::CompareComplete));

        let mut completions = Vec::new();
        for event in &events {
            if let VisEvent::Run {
                event: RunEvent::RunComplete { result },
                ..
            } = event
            {
                assert!(result.path_len > 0, "{:?} found no path", result.solver);
                completions.push(result.solver);
            }
        }
        completions.sort_by_key(|s| format!("{s:?}"));
        let mut expected = Solver::ALL.to_vec();
        expected.sort_by_key(|s| format!("{s:?}"));
        assert_eq!(completions, expected);
    }

    #[test]
    fn test_compare_runs_are_isolated_per_solver() {
        let mut session = Session::new(9, Some(8)).unwrap();
        let (tx, rx) = sync_channel(BUFFER);
        session.start_compare(1, tx).unwrap();
        session.wait();

        // Events for one solver must match a fresh standalone solve of
        // the same maze, regardless of how the four streams interleaved.
        let maze = session.maze();
        let expected = solvers::solve(&maze, Solver::Greedy);
        let explored: Vec<_> = drain(&rx)
            .into_iter()
            .filter_map(|event| match event {
                VisEvent::Run {
                    solver: Solver::Greedy,
                    event: RunEvent::NodeExplored { cell },
                } => Some(cell),
                _ => None,
            })
            .collect();
        assert_eq!(explored, expected.explored);
    }

    #[test]
    fn test_cancel_stops_all_streams_and_suppresses_join() {
        let mut session = Session::new(11, Some(2)).unwrap();
        let (tx, rx) = sync_channel(BUFFER);
        session.start_compare(200, tx).unwrap();
        // Let the workers get going, then pull the plug.
        std::thread::sleep(Duration::from_millis(30));
        session.cancel_active();

        let events_after_cancel = drain(&rx);
        // cancel_active joined the threads, so the channel stays silent.
        std::thread::sleep(Duration::from_millis(50));
        assert!(drain(&rx).is_empty());
        assert!(!events_after_cancel.contains(&VisEvent::CompareComplete));
        assert!(!session.is_running());
    }

    #[test]
    fn test_regenerate_cancels_in_flight_run() {
        let mut session = Session::new(11, Some(2)).unwrap();
        let (tx, rx) = sync_channel(BUFFER);
        let slow = Pacing {
            explore_delay: Duration::from_millis(20),
            path_delay: Duration::from_millis(20),
        };
        session.start_single(Solver::AStar, slow, tx).unwrap();
        std::thread::sleep(Duration::from_millis(30));
        session.regenerate(9, Some(3)).unwrap();

        drain(&rx);
        std::thread::sleep(Duration::from_millis(50));
        assert!(drain(&rx).is_empty(), "stale events after regeneration");
        assert_eq!(session.maze().size(), 9);
        // The session accepts a new run immediately.
        let (tx2, rx2) = sync_channel(BUFFER);
        session
            .start_single(Solver::Bfs, Pacing::immediate(), tx2)
            .unwrap();
        session.wait();
        assert!(drain(&rx2).iter().any(|event| matches!(
            event,
            VisEvent::Run {
                event: RunEvent::RunComplete { .. },
                ..
            }
        )));
    }
}
