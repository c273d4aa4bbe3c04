//! Monte Carlo playouts (random game simulation).
//!
//! A playout drops tokens into uniformly random legal columns until the game
//! ends. Games last at most 42 plies, so every playout terminates quickly.
//! The random source is always passed in by the caller so that searches are
//! reproducible from a seed.

use crate::board::{Board, Outcome};
use crate::constants::COLS;

/// Pick a uniformly random legal column, or `None` on a full board.
#[inline]
pub fn random_move(board: &Board, rng: &mut fastrand::Rng) -> Option<usize> {
    let mut legal = [0usize; COLS];
    let mut n = 0;
    for col in 0..COLS {
        if board.is_legal(col) {
            legal[n] = col;
            n += 1;
        }
    }
    if n == 0 {
        return None;
    }
    Some(legal[rng.usize(..n)])
}

/// Play random moves from `board` until the game is over and return the result.
///
/// The caller's board is not modified.
pub fn rollout(board: &Board, rng: &mut fastrand::Rng) -> Outcome {
    let mut board = *board;
    loop {
        if let Some(outcome) = board.outcome() {
            return outcome;
        }
        // A board without an outcome always has a legal column.
        let Some(col) = random_move(&board, rng) else {
            return Outcome::Draw;
        };
        board.play(col);
    }
}
