use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::SyncSender;
use std::time::{Duration, Instant};

use crate::maze::Cell;
use crate::solvers::{SearchOutcome, Solver};

/// Statistics for one finished run, reported through `RunEvent::RunComplete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub solver: Solver,
    pub nodes_explored: usize,
    pub path_len: usize,
    pub elapsed: Duration,
}

/// One observable step of a run, in the exact order the algorithm closed
/// cells and then drew path cells. This ordering is part of the contract
/// with whoever renders the events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    NodeExplored { cell: Cell },
    PathCell { cell: Cell, index: usize },
    RunComplete { result: RunResult },
}

/// Channel payload delivered to the renderer: per-run events tagged with
/// their algorithm, plus the compare-mode join marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisEvent {
    Run { solver: Solver, event: RunEvent },
    CompareComplete,
}

/// Per-phase pacing delays. Exploration and path drawing are tuned
/// independently.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub explore_delay: Duration,
    pub path_delay: Duration,
}

impl Pacing {
    /// Default base speed in milliseconds, matching a mid-range slider.
    pub const DEFAULT_SPEED_MS: u64 = 150;

    /// Derive phase delays from one base speed: BFS/DFS step fast
    /// (base/50), the scored solvers step slower (base/10) so their
    /// frontier choices stay visible, and path drawing sits in between
    /// (base/20). Every delay is at least 1ms.
    pub fn from_speed(solver: Solver, base_ms: u64) -> Self {
        let explore_divisor = match solver {
            Solver::Bfs | Solver::Dfs => 50,
            Solver::AStar | Solver::Greedy => 10,
        };
        Pacing {
            explore_delay: Duration::from_millis((base_ms / explore_divisor).max(1)),
            path_delay: Duration::from_millis((base_ms / 20).max(1)),
        }
    }

    /// No delays at all, for tests and profiling.
    pub fn immediate() -> Self {
        Pacing {
            explore_delay: Duration::ZERO,
            path_delay: Duration::ZERO,
        }
    }
}

/// Replay a finished search as a paced event stream.
///
/// Every explored cell is emitted in closing order, then every path cell
/// with its index, then `RunComplete`. The cancel flag is checked before
/// each send; once it is set (or the receiver is gone) nothing further is
/// emitted and no result is returned. Sleeping between emissions is the
/// suspension point that lets concurrent compare-mode runs interleave.
pub fn run_paced(
    solver: Solver,
    outcome: &SearchOutcome,
    tx: &SyncSender<VisEvent>,
    cancel: &AtomicBool,
    pacing: Pacing,
    started: Instant,
) -> Option<RunResult> {
    for &cell in &outcome.explored {
        emit(solver, RunEvent::NodeExplored { cell }, tx, cancel)?;
        sleep(pacing.explore_delay);
    }
    for (index, &cell) in outcome.path.iter().enumerate() {
        emit(solver, RunEvent::PathCell { cell, index }, tx, cancel)?;
        sleep(pacing.path_delay);
    }

    let result = RunResult {
        solver,
        nodes_explored: outcome.explored.len(),
        path_len: outcome.path.len(),
        elapsed: started.elapsed(),
    };
    emit(
        solver,
        RunEvent::RunComplete {
            result: result.clone(),
        },
        tx,
        cancel,
    )?;
    Some(result)
}

fn emit(
    solver: Solver,
    event: RunEvent,
    tx: &SyncSender<VisEvent>,
    cancel: &AtomicBool,
) -> Option<()> {
    if cancel.load(Ordering::Acquire) {
        tracing::debug!("[{:?}] pacing cancelled, discarding remaining events", solver);
        return None;
    }
    // A dropped receiver means the renderer is gone; treat it like a
    // cancellation rather than an error.
    tx.send(VisEvent::Run { solver, event }).ok()
}

fn sleep(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}
