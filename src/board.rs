//! Connect Four board: grid, turn tracking, legality and terminal detection.
//!
//! The board is a small `Copy` value. Search code that explores many lines
//! mutates one exclusive copy with paired `apply`/`undo`; code that needs
//! independent snapshots (MCTS nodes, rollouts) simply copies it.
//!
//! Row 0 is the bottom row. Red always moves first.

use std::fmt;
use std::str::FromStr;

use crate::constants::{CELLS, COLS, CONNECT, ROWS};
use crate::error::GameError;

/// The two sides. Red moves first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    Red,
    Yellow,
}

impl Player {
    /// Get the other player
    pub fn other(self) -> Player {
        match self {
            Player::Red => Player::Yellow,
            Player::Yellow => Player::Red,
        }
    }

    /// Convert player to cell type
    pub fn to_cell(self) -> Cell {
        match self {
            Player::Red => Cell::Red,
            Player::Yellow => Cell::Yellow,
        }
    }

    /// Get player name for display
    pub fn name(self) -> &'static str {
        match self {
            Player::Red => "Red",
            Player::Yellow => "Yellow",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

/// Final result of a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win(Player),
    Draw,
}

/// A Connect Four position.
///
/// Besides the grid, the board keeps per-column heights for O(1) legality,
/// the move history (needed to validate `undo`), and the winner if the last
/// move completed four in a row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
    heights: [u8; COLS],
    to_move: Player,
    moves: u8,
    history: [u8; CELLS],
    winner: Option<Player>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with Red to move.
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
            heights: [0; COLS],
            to_move: Player::Red,
            moves: 0,
            history: [0; CELLS],
            winner: None,
        }
    }

    /// Build a board by playing the given columns in order from the empty board.
    pub fn from_moves<I>(columns: I) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut board = Self::new();
        for col in columns {
            board.apply(col)?;
        }
        Ok(board)
    }

    /// Get the cell at `(row, col)`. Row 0 is the bottom.
    ///
    /// # Panics
    /// Panics if the coordinates are off the board.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Number of tokens in a column.
    pub fn height(&self, col: usize) -> usize {
        self.heights[col] as usize
    }

    /// The player whose turn it is.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Number of tokens placed so far.
    pub fn move_count(&self) -> usize {
        self.moves as usize
    }

    /// Column of the most recent move, if any.
    pub fn last_move(&self) -> Option<usize> {
        self.moves
            .checked_sub(1)
            .map(|i| self.history[i as usize] as usize)
    }

    /// Columns played so far, in order.
    pub fn history(&self) -> impl Iterator<Item = usize> + '_ {
        self.history[..self.moves as usize]
            .iter()
            .map(|&c| c as usize)
    }

    /// Number of tokens `player` has on the board.
    pub fn count(&self, player: Player) -> usize {
        let cell = player.to_cell();
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&c| c == cell)
            .count()
    }

    /// True if a token can be dropped into `col`.
    #[inline]
    pub fn is_legal(&self, col: usize) -> bool {
        col < COLS && (self.heights[col] as usize) < ROWS
    }

    /// All columns that are not full, in ascending order.
    ///
    /// Legality only depends on column heights: a won board that still has
    /// room reports its open columns. Check [`Board::outcome`] first.
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..COLS).filter(|&c| self.is_legal(c)).collect()
    }

    /// True if every column is full.
    pub fn is_full(&self) -> bool {
        self.moves as usize == CELLS
    }

    /// The player who completed four in a row, if any.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Terminal state of the board: a win, a draw, or `None` while in play.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.winner {
            Some(p) => Some(Outcome::Win(p)),
            None if self.is_full() => Some(Outcome::Draw),
            None => None,
        }
    }

    /// True if the game is over.
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    /// Drop the mover's token into `col` and pass the turn.
    ///
    /// Returns the row where the token landed.
    pub fn apply(&mut self, col: usize) -> Result<usize, GameError> {
        if col >= COLS {
            return Err(GameError::ColumnOutOfRange(col));
        }
        if !self.is_legal(col) {
            return Err(GameError::ColumnFull(col));
        }
        if self.winner.is_some() {
            return Err(GameError::GameOver);
        }
        Ok(self.play(col))
    }

    /// Take back the most recent move, which must have been played in `col`.
    pub fn undo(&mut self, col: usize) -> Result<(), GameError> {
        let last = self.last_move();
        if last != Some(col) {
            return Err(GameError::UndoMismatch { column: col, last });
        }
        self.unplay(col);
        Ok(())
    }

    /// Unchecked drop for the search hot path. The caller guarantees that
    /// `col` is legal and the game is not over.
    #[inline]
    pub(crate) fn play(&mut self, col: usize) -> usize {
        debug_assert!(self.is_legal(col) && self.winner.is_none());
        let row = self.heights[col] as usize;
        self.cells[row][col] = self.to_move.to_cell();
        self.heights[col] += 1;
        self.history[self.moves as usize] = col as u8;
        self.moves += 1;
        if self.check_win(row, col) {
            self.winner = Some(self.to_move);
        }
        self.to_move = self.to_move.other();
        row
    }

    /// Unchecked undo for the search hot path. The caller guarantees that
    /// `col` holds the most recent move.
    #[inline]
    pub(crate) fn unplay(&mut self, col: usize) {
        debug_assert_eq!(self.last_move(), Some(col));
        self.heights[col] -= 1;
        self.cells[self.heights[col] as usize][col] = Cell::Empty;
        self.moves -= 1;
        self.history[self.moves as usize] = 0;
        // `apply` refuses to play on a won board, so the position before the
        // last move had no winner.
        self.winner = None;
        self.to_move = self.to_move.other();
    }

    /// Check whether the token at `(row, col)` is part of four in a row.
    fn check_win(&self, row: usize, col: usize) -> bool {
        let cell = self.cells[row][col];
        if cell == Cell::Empty {
            return false;
        }

        // Horizontal, vertical, diagonal up-right, diagonal down-right
        const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

        DIRECTIONS.iter().any(|&(dr, dc)| {
            1 + self.run_length(row, col, dr, dc, cell) + self.run_length(row, col, -dr, -dc, cell)
                >= CONNECT
        })
    }

    /// Count consecutive `cell` tokens starting next to `(row, col)` in one direction.
    fn run_length(&self, row: usize, col: usize, dr: isize, dc: isize, cell: Cell) -> usize {
        let mut count = 0;
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while (0..ROWS as isize).contains(&r)
            && (0..COLS as isize).contains(&c)
            && self.cells[r as usize][c as usize] == cell
        {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }
}

/// Parses a game record written as column digits, e.g. `"3342"`.
/// Whitespace is ignored.
impl FromStr for Board {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut board = Self::new();
        for ch in s.chars().filter(|c| !c.is_whitespace()) {
            let col = ch.to_digit(10).ok_or(GameError::InvalidMoveChar(ch))?;
            board.apply(col as usize)?;
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for col in 0..COLS {
            write!(f, "{col} ")?;
        }
        writeln!(f)?;
        for row in (0..ROWS).rev() {
            for col in 0..COLS {
                let ch = match self.cells[row][col] {
                    Cell::Red => 'X',
                    Cell::Yellow => 'O',
                    Cell::Empty => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
