//! Static evaluation of a Connect Four position.
//!
//! The score sums a weight over every length-4 window on the board. A window
//! holding only one side's tokens is still completable by that side and is
//! worth `WINDOW_WEIGHTS[count]` to it; mixed and empty windows are worth
//! nothing. Tokens near the centre column earn a small bonus. The score is
//! antisymmetric: `evaluate(b, p) == -evaluate(b, p.other())`.

use crate::board::{Board, Cell, Outcome, Player};
use crate::constants::{CENTER_BONUS, COLS, CONNECT, ROWS, WIN_SCORE, WINDOW_WEIGHTS};

/// Window start offsets and step for each direction: (row step, col step).
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Score `board` from `player`'s point of view. Higher is better for `player`.
///
/// A completed four-in-a-row returns `±WIN_SCORE`, a full drawn board 0.
pub fn evaluate(board: &Board, player: Player) -> i32 {
    match board.outcome() {
        Some(Outcome::Win(p)) if p == player => return WIN_SCORE,
        Some(Outcome::Win(_)) => return -WIN_SCORE,
        Some(Outcome::Draw) => return 0,
        None => {}
    }

    let own = player.to_cell();
    let mut score = 0;

    for &(dr, dc) in &DIRECTIONS {
        for row in 0..ROWS as isize {
            for col in 0..COLS as isize {
                if let Some(window) = window_counts(board, row, col, dr, dc, own) {
                    score += score_window(window);
                }
            }
        }
    }

    score + center_bonus(board, own)
}

/// Weight of a window holding `own` and `opp` tokens.
fn score_window((own, opp): (usize, usize)) -> i32 {
    match (own, opp) {
        (0, 0) => 0,
        (n, 0) => WINDOW_WEIGHTS[n],
        (0, n) => -WINDOW_WEIGHTS[n],
        _ => 0,
    }
}

/// Count (own, opponent) tokens in the window starting at `(row, col)`.
/// Returns `None` if the window runs off the board.
fn window_counts(
    board: &Board,
    row: isize,
    col: isize,
    dr: isize,
    dc: isize,
    own: Cell,
) -> Option<(usize, usize)> {
    let last = CONNECT as isize - 1;
    let (end_r, end_c) = (row + dr * last, col + dc * last);
    if !(0..ROWS as isize).contains(&end_r) || !(0..COLS as isize).contains(&end_c) {
        return None;
    }

    let mut counts = (0, 0);
    for i in 0..CONNECT as isize {
        match board.get((row + dr * i) as usize, (col + dc * i) as usize) {
            Cell::Empty => {}
            c if c == own => counts.0 += 1,
            _ => counts.1 += 1,
        }
    }
    Some(counts)
}

/// Centre-column preference: `CENTER_BONUS - distance` per token, floored at 0.
fn center_bonus(board: &Board, own: Cell) -> i32 {
    let center = COLS / 2;
    let mut bonus = 0;
    for col in 0..COLS {
        let weight = (CENTER_BONUS - center.abs_diff(col) as i32).max(0);
        if weight == 0 {
            continue;
        }
        for row in 0..board.height(col) {
            match board.get(row, col) {
                c if c == own => bonus += weight,
                Cell::Empty => {}
                _ => bonus -= weight,
            }
        }
    }
    bonus
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_is_zero() {
        let board = Board::new();
        assert_eq!(evaluate(&board, Player::Red), 0);
        assert_eq!(evaluate(&board, Player::Yellow), 0);
    }

    #[test]
    fn test_window_count() {
        // 24 horizontal + 21 vertical + 12 + 12 diagonal windows
        let mut windows = 0;
        let own = Player::Red.to_cell();
        let board = Board::new();
        for &(dr, dc) in &DIRECTIONS {
            for row in 0..ROWS as isize {
                for col in 0..COLS as isize {
                    if window_counts(&board, row, col, dr, dc, own).is_some() {
                        windows += 1;
                    }
                }
            }
        }
        assert_eq!(windows, 69);
    }

    #[test]
    fn test_single_centre_token() {
        // Centre bottom cell: 4 horizontal, 1 vertical, 1 + 1 diagonal windows,
        // plus the full centre bonus.
        let board = Board::from_moves([3]).unwrap();
        assert_eq!(evaluate(&board, Player::Red), 7 * WINDOW_WEIGHTS[1] + CENTER_BONUS);
    }

    #[test]
    fn test_antisymmetric() {
        let board = Board::from_moves([3, 2, 3, 4, 1, 1, 5]).unwrap();
        assert_eq!(
            evaluate(&board, Player::Red),
            -evaluate(&board, Player::Yellow)
        );
    }

    #[test]
    fn test_three_beats_two() {
        let two = Board::from_moves([0, 6, 1, 6]).unwrap();
        let three = Board::from_moves([0, 6, 1, 6, 2, 5]).unwrap();
        assert!(evaluate(&three, Player::Red) > evaluate(&two, Player::Red));
    }

    #[test]
    fn test_win_is_extremal() {
        let board = Board::from_moves([0, 1, 0, 1, 0, 1, 0]).unwrap();
        assert_eq!(evaluate(&board, Player::Red), WIN_SCORE);
        assert_eq!(evaluate(&board, Player::Yellow), -WIN_SCORE);
    }

    #[test]
    fn test_mixed_window_scores_zero() {
        assert_eq!(score_window((2, 1)), 0);
        assert_eq!(score_window((0, 0)), 0);
        assert_eq!(score_window((3, 0)), 100);
        assert_eq!(score_window((0, 2)), -10);
    }
}
