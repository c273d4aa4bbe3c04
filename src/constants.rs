//! Constants for board geometry, search defaults, and heuristic weights.
//!
//! The board is the standard 6x7 Connect Four grid. Row 0 is the bottom row,
//! so a token dropped into an empty column lands at row 0.

// =============================================================================
// Board Geometry
// =============================================================================

/// Number of rows on the board.
pub const ROWS: usize = 6;

/// Number of columns on the board.
pub const COLS: usize = 7;

/// Total number of cells, which is also the maximum game length.
pub const CELLS: usize = ROWS * COLS;

/// Tokens in a row needed to win.
pub const CONNECT: usize = 4;

/// Column visiting order for search: centre first, then outwards.
pub const MOVE_ORDER: [usize; COLS] = [3, 2, 4, 1, 5, 0, 6];

// =============================================================================
// Minimax Parameters
// =============================================================================

/// Default search depth in plies.
pub const DEFAULT_DEPTH: u32 = 4;

/// Score of a realized four-in-a-row. Larger than any heuristic sum.
pub const WIN_SCORE: i32 = 1_000_000;

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Default number of simulations per move.
pub const N_SIMS: usize = 1000;

/// UCB1 exploration constant.
pub const EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 0x5eed;

// =============================================================================
// Heuristic Weights
// =============================================================================

/// Window weight indexed by the number of same-colour tokens in an
/// otherwise empty window. Index 4 is never used: a full window is a win.
pub const WINDOW_WEIGHTS: [i32; CONNECT] = [0, 1, 10, 100];

/// Bonus for a token in the centre column, decreasing by one per column away.
pub const CENTER_BONUS: i32 = 3;
