//! Depth-limited minimax search with alpha-beta pruning.
//!
//! The searcher copies the caller's board once and then explores every line
//! on that single scratch board, pairing each `play` with an `unplay`.
//! Scores are always from the point of view of the player to move at the
//! root ("maximizer"):
//! - a win at the root player's hands scores `WIN_SCORE + remaining_depth`,
//!   so faster wins score higher
//! - a loss scores `-(WIN_SCORE + remaining_depth)`, so slower losses score higher
//! - a draw scores 0
//! - at the depth horizon, [`evaluate`] is used
//!
//! Moves are tried in centre-out order. Among equally scored root moves the
//! one leaving the opponent the fewest immediate wins is kept, then the first
//! in that order. When every move loses to a double threat this still picks a
//! blocking column. The root search window keeps tied scores exact, so pruned
//! and unpruned searches return the same move and score.

use tracing::debug;

use crate::agent::{Agent, SearchResult, SearchStats};
use crate::board::{Board, Outcome, Player};
use crate::constants::{COLS, DEFAULT_DEPTH, MOVE_ORDER, WIN_SCORE};
use crate::error::{ConfigError, GameError};
use crate::eval::evaluate;

/// Minimax configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinimaxConfig {
    /// Search depth in plies. Must be at least 1.
    pub depth: u32,
    /// Enable alpha-beta cutoffs. Disabling them only costs time.
    pub alpha_beta: bool,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            alpha_beta: true,
        }
    }
}

impl MinimaxConfig {
    /// Alpha-beta search to the given depth.
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::Validation("depth must be >= 1".to_string()));
        }
        Ok(())
    }
}

/// Minimax player.
pub struct MinimaxPlayer {
    config: MinimaxConfig,
    /// Player to move at the root of the current search
    root: Player,
    /// Nodes visited by the current search
    nodes: u64,
}

impl MinimaxPlayer {
    pub fn new(config: MinimaxConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            root: Player::Red,
            nodes: 0,
        })
    }

    pub fn config(&self) -> &MinimaxConfig {
        &self.config
    }

    /// Score of a finished game, adjusted so that earlier results weigh more.
    fn terminal_score(&self, outcome: Outcome, depth: u32) -> i32 {
        match outcome {
            Outcome::Win(p) if p == self.root => WIN_SCORE + depth as i32,
            Outcome::Win(_) => -(WIN_SCORE + depth as i32),
            Outcome::Draw => 0,
        }
    }

    /// Recursive search. `maximizing` is true when the root player is to move.
    fn minimax(
        &mut self,
        board: &mut Board,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.nodes += 1;

        if let Some(outcome) = board.outcome() {
            return self.terminal_score(outcome, depth);
        }
        if depth == 0 {
            return evaluate(board, self.root);
        }

        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for col in MOVE_ORDER {
            if !board.is_legal(col) {
                continue;
            }
            board.play(col);
            let score = self.minimax(board, depth - 1, alpha, beta, !maximizing);
            board.unplay(col);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }
            if self.config.alpha_beta && alpha >= beta {
                break;
            }
        }

        best
    }
}

/// Number of columns that would win on the spot for the player to move.
fn immediate_wins(board: &mut Board) -> usize {
    if board.is_terminal() {
        return 0;
    }
    let mut wins = 0;
    for col in 0..COLS {
        if !board.is_legal(col) {
            continue;
        }
        board.play(col);
        if board.winner().is_some() {
            wins += 1;
        }
        board.unplay(col);
    }
    wins
}

impl Agent for MinimaxPlayer {
    fn name(&self) -> String {
        if self.config.alpha_beta {
            format!("minimax(d={})", self.config.depth)
        } else {
            format!("minimax(d={}, no-ab)", self.config.depth)
        }
    }

    fn search(&mut self, board: &Board) -> Result<SearchResult, GameError> {
        if board.is_terminal() {
            return Err(GameError::NoLegalMove);
        }

        self.root = board.to_move();
        self.nodes = 0;

        let mut scratch = *board;
        // (column, score, opponent's immediate wins after the move)
        let mut best: Option<(usize, i32, usize)> = None;

        for col in MOVE_ORDER {
            if !scratch.is_legal(col) {
                continue;
            }
            // One below the best score so that equal scores come back exact
            let alpha = match best {
                Some((_, score, _)) if self.config.alpha_beta => score.saturating_sub(1),
                _ => i32::MIN,
            };

            scratch.play(col);
            let score = self.minimax(&mut scratch, self.config.depth - 1, alpha, i32::MAX, false);
            let replaces = match best {
                None => true,
                Some((_, b, _)) if score > b => true,
                Some((_, b, threats)) if score == b => immediate_wins(&mut scratch) < threats,
                Some(_) => false,
            };
            if replaces {
                best = Some((col, score, immediate_wins(&mut scratch)));
            }
            scratch.unplay(col);
        }

        let (column, score, _) = best.ok_or(GameError::NoLegalMove)?;
        debug!(
            player = self.root.name(),
            column,
            score,
            nodes = self.nodes,
            depth = self.config.depth,
            "minimax move"
        );

        Ok(SearchResult {
            column,
            stats: SearchStats::Minimax {
                score,
                nodes: self.nodes,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(depth: u32, alpha_beta: bool) -> MinimaxPlayer {
        MinimaxPlayer::new(MinimaxConfig { depth, alpha_beta }).unwrap()
    }

    fn score_of(result: &SearchResult) -> i32 {
        match result.stats {
            SearchStats::Minimax { score, .. } => score,
            _ => panic!("expected minimax stats"),
        }
    }

    #[test]
    fn test_zero_depth_rejected() {
        assert!(MinimaxPlayer::new(MinimaxConfig::with_depth(0)).is_err());
    }

    #[test]
    fn test_empty_board_prefers_centre() {
        let mut p = player(4, true);
        assert_eq!(p.choose_move(&Board::new()).unwrap(), 3);
    }

    #[test]
    fn test_takes_immediate_win() {
        // Red has three stacked in column 0
        let board = Board::from_moves([0, 1, 0, 1, 0, 2]).unwrap();
        for depth in 1..=5 {
            let mut p = player(depth, true);
            let result = p.search(&board).unwrap();
            assert_eq!(result.column, 0, "depth {depth}");
            assert_eq!(score_of(&result), WIN_SCORE + depth as i32 - 1);
        }
    }

    #[test]
    fn test_board_left_untouched() {
        let board = Board::from_moves([3, 3, 4, 2, 5]).unwrap();
        let copy = board;
        let mut p = player(5, true);
        p.choose_move(&board).unwrap();
        assert_eq!(board, copy);
    }

    #[test]
    fn test_terminal_board_is_error() {
        let board = Board::from_moves([0, 1, 0, 1, 0, 1, 0]).unwrap();
        let mut p = player(3, true);
        assert_eq!(p.choose_move(&board), Err(GameError::NoLegalMove));
    }

    #[test]
    fn test_pruning_visits_fewer_nodes() {
        let board = Board::from_moves([3, 3, 2, 4]).unwrap();
        let nodes = |alpha_beta| match player(5, alpha_beta).search(&board).unwrap().stats {
            SearchStats::Minimax { nodes, .. } => nodes,
            _ => unreachable!(),
        };
        assert!(nodes(true) < nodes(false));
    }

    #[test]
    fn test_blocks_vertical_threat() {
        // Yellow threatens to complete column 2 next move; only blocking survives.
        let board = Board::from_moves([0, 2, 6, 2, 0, 2]).unwrap();
        let mut p = player(4, true);
        assert_eq!(p.choose_move(&board).unwrap(), 2);
    }

    #[test]
    fn test_blocks_three_open_at_both_ends() {
        // Yellow holds (0,1)-(0,3); every move loses, but 0 or 4 delays it
        let board = Board::from_moves([6, 1, 6, 2, 5, 3]).unwrap();
        for depth in 2..=5 {
            for alpha_beta in [true, false] {
                let result = player(depth, alpha_beta).search(&board).unwrap();
                assert_eq!(result.column, 4, "depth {depth} alpha_beta {alpha_beta}");
                assert_eq!(score_of(&result), -(WIN_SCORE + depth as i32 - 2));
            }
        }
    }

    #[test]
    fn test_immediate_wins() {
        let mut board = Board::from_moves([6, 1, 6, 2, 5, 3]).unwrap();
        board.play(3);
        assert_eq!(immediate_wins(&mut board), 2);
        board.unplay(3);
        board.play(4);
        assert_eq!(immediate_wins(&mut board), 1);
    }

    #[test]
    fn test_name() {
        assert_eq!(player(4, true).name(), "minimax(d=4)");
        assert_eq!(player(2, false).name(), "minimax(d=2, no-ab)");
    }
}
