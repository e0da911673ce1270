use rand::{SeedableRng, rngs::StdRng};

mod recur_backtrack;

use crate::error::Error;
use crate::maze::Maze;
use recur_backtrack::recursive_backtrack;

/// Get a random number generator, optionally seeded for reproducibility.
fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Generate a maze of the given size with a randomized depth-first carve.
///
/// The size must be odd and at least 5; anything else is rejected before
/// any generation work happens. Every open cell of the result is
/// reachable from the start, and a direct start-to-goal route is carved
/// on top of the spanning tree so the maze stays solvable no matter what
/// the carve produced.
pub fn generate_maze(size: u16, seed: Option<u64>) -> Result<Maze, Error> {
    if size < 5 || size % 2 == 0 {
        return Err(Error::InvalidGridSize(size));
    }
    let mut rng = get_rng(seed);
    Ok(recursive_backtrack(size, &mut rng))
}
