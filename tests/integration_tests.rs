//! Integration tests for connect4-engine
//!
//! End-to-end checks of the board model and both searchers through the
//! public `Agent` interface.

use connect4_engine::agent::{Agent, SearchStats};
use connect4_engine::board::{Board, Outcome, Player};
use connect4_engine::constants::{COLS, WIN_SCORE};
use connect4_engine::error::GameError;
use connect4_engine::mcts::{MctsConfig, MctsPlayer};
use connect4_engine::minimax::{MinimaxConfig, MinimaxPlayer};

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

/// Build a board from a string of column digits, e.g. "3342".
fn setup_board(moves: &str) -> Board {
    moves.parse().unwrap()
}

fn minimax(depth: u32, alpha_beta: bool) -> MinimaxPlayer {
    MinimaxPlayer::new(MinimaxConfig { depth, alpha_beta }).unwrap()
}

fn mcts(simulations: usize, seed: u64) -> MctsPlayer {
    MctsPlayer::new(MctsConfig {
        simulations,
        seed,
        ..Default::default()
    })
    .unwrap()
}

fn minimax_score(result: &connect4_engine::agent::SearchResult) -> i32 {
    match result.stats {
        SearchStats::Minimax { score, .. } => score,
        ref other => panic!("expected minimax stats, got {other:?}"),
    }
}

/// Mid-game positions without a winner, used for search comparisons.
const MID_GAMES: &[&str] = &[
    "3324",
    "324451",
    "3333242",
    "234332441",
    "0615334224",
    "343443255110",
    "66655401",
];

/// A full 42-move game that ends without four in a row.
const DRAWN_GAME: &str = "146660203633536103043506522512202545444111";

// =============================================================================
// Board model
// =============================================================================

#[test]
fn test_horizontal_win_at_row_zero() {
    // Red fills columns 0-3 of the bottom row
    let board = setup_board("0011223");
    assert_eq!(board.outcome(), Some(Outcome::Win(Player::Red)));
    for col in 0..4 {
        assert_eq!(board.get(0, col), Player::Red.to_cell());
    }
}

#[test]
fn test_win_in_every_direction() {
    let cases = [
        ("0011223", "horizontal"),
        ("0101010", "vertical"),
        ("01122323353", "diagonal /"),
        ("65544343313", "diagonal \\"),
    ];
    for (moves, name) in cases {
        let board = setup_board(moves);
        assert_eq!(
            board.outcome(),
            Some(Outcome::Win(Player::Red)),
            "{name} win not detected"
        );
    }
}

#[test]
fn test_full_board_draw() {
    let board = setup_board(DRAWN_GAME);
    assert_eq!(board.outcome(), Some(Outcome::Draw));
    assert!(board.legal_moves().is_empty());
}

#[test]
fn test_apply_undo_sequence_restores_empty_board() {
    let moves = [3, 3, 2, 4, 0, 1, 5, 5, 6, 6];
    let mut board = Board::new();
    for &col in &moves {
        board.apply(col).unwrap();
    }
    for &col in moves.iter().rev() {
        board.undo(col).unwrap();
    }
    assert_eq!(board, Board::new());
}

#[test]
fn test_illegal_moves() {
    let mut board = setup_board("000000");
    let err = board.apply(0).unwrap_err();
    assert_eq!(err, GameError::ColumnFull(0));
    assert!(err.is_illegal_move());

    let err = board.apply(COLS).unwrap_err();
    assert_eq!(err, GameError::ColumnOutOfRange(COLS));
    assert!(err.is_illegal_move());
}

// =============================================================================
// Minimax
// =============================================================================

#[test]
fn test_alpha_beta_matches_plain_minimax() {
    for moves in MID_GAMES {
        let board = setup_board(moves);
        let pruned = minimax(4, true).search(&board).unwrap();
        let plain = minimax(4, false).search(&board).unwrap();

        assert_eq!(pruned.column, plain.column, "column differs on {moves}");
        assert_eq!(
            minimax_score(&pruned),
            minimax_score(&plain),
            "score differs on {moves}"
        );
    }
}

#[test]
fn test_minimax_takes_winning_column_at_any_depth() {
    // Red: column 0 x3, Yellow: column 1 x2 and column 2
    let board = setup_board("010102");
    for depth in 1..=6 {
        let result = minimax(depth, true).search(&board).unwrap();
        assert_eq!(result.column, 0, "depth {depth}");
        assert_eq!(minimax_score(&result), WIN_SCORE + depth as i32 - 1);
    }
}

#[test]
fn test_minimax_blocks_horizontal_three() {
    // Yellow holds columns 0-2 of the bottom row; Red must take column 3
    let board = setup_board("606152");
    assert_eq!(board.to_move(), Player::Red);
    assert_eq!(minimax(4, true).choose_move(&board).unwrap(), 3);
}

#[test]
fn test_minimax_blocks_three_open_at_both_ends() {
    // Yellow holds columns 1-3 of the bottom row with 0 and 4 both open.
    // The game is lost, but Red still has to block one end.
    let board = setup_board("616253");
    assert_eq!(board.to_move(), Player::Red);
    for depth in 2..=5 {
        let pruned = minimax(depth, true).search(&board).unwrap();
        let plain = minimax(depth, false).search(&board).unwrap();

        assert!([0, 4].contains(&pruned.column), "depth {depth}: {}", pruned.column);
        assert_eq!(pruned.column, plain.column);
        assert_eq!(minimax_score(&pruned), minimax_score(&plain));
    }
}

#[test]
fn test_minimax_blocks_vertical_three() {
    let board = setup_board("026202");
    assert_eq!(minimax(4, true).choose_move(&board).unwrap(), 2);
}

#[test]
fn test_minimax_does_not_hand_over_a_win() {
    // In each position one column lets Yellow complete four on the reply
    let positions = [("064435666455", 3), ("6545121624", 3), ("40343402114143", 2)];
    for (moves, poisoned) in positions {
        let board = setup_board(moves);
        assert_eq!(board.to_move(), Player::Red);
        for depth in [2, 3, 4] {
            let col = minimax(depth, true).choose_move(&board).unwrap();
            assert_ne!(col, poisoned, "{moves} at depth {depth}");

            let mut after = board;
            after.apply(col).unwrap();
            let yellow_wins = after.legal_moves().into_iter().any(|reply| {
                let mut next = after;
                next.apply(reply).unwrap();
                next.winner() == Some(Player::Yellow)
            });
            assert!(!yellow_wins, "{moves} at depth {depth} played {col}");
        }
    }
}

#[test]
fn test_minimax_on_finished_game() {
    let board = setup_board(DRAWN_GAME);
    assert_eq!(
        minimax(3, true).choose_move(&board),
        Err(GameError::NoLegalMove)
    );
}

// =============================================================================
// MCTS
// =============================================================================

#[test]
fn test_mcts_single_simulation_is_legal() {
    for moves in MID_GAMES {
        let board = setup_board(moves);
        let col = mcts(1, 0).choose_move(&board).unwrap();
        assert!(board.is_legal(col), "{moves}: {col}");
    }
}

#[test]
fn test_mcts_visits_sum_to_budget() {
    let board = setup_board("3324");
    for budget in [1, 7, 64, 500] {
        let result = mcts(budget, 1).search(&board).unwrap();
        let SearchStats::Mcts { children } = result.stats else {
            panic!("expected mcts stats");
        };
        let total: u32 = children.iter().map(|c| c.visits).sum();
        assert_eq!(total as usize, budget);

        // The chosen column is the most visited child
        let best = children.iter().map(|c| c.visits).max().unwrap();
        let chosen = children.iter().find(|c| c.column == result.column).unwrap();
        assert_eq!(chosen.visits, best);
    }
}

#[test]
fn test_mcts_reproducible_with_seed() {
    for moves in MID_GAMES {
        let board = setup_board(moves);
        let a = mcts(300, 42).choose_move(&board).unwrap();
        let b = mcts(300, 42).choose_move(&board).unwrap();
        assert_eq!(a, b, "{moves}");
    }
}

#[test]
fn test_mcts_takes_winning_column() {
    let board = setup_board("010102");
    assert_eq!(mcts(2000, 7).choose_move(&board).unwrap(), 0);
}

#[test]
fn test_mcts_on_finished_game() {
    let board = setup_board("0101010");
    assert_eq!(mcts(10, 0).choose_move(&board), Err(GameError::NoLegalMove));
}

// =============================================================================
// Agents are interchangeable
// =============================================================================

#[test]
fn test_agents_behind_trait_objects() {
    let board = setup_board("3324");
    let mut agents: Vec<Box<dyn Agent>> = vec![Box::new(minimax(3, true)), Box::new(mcts(100, 3))];
    for agent in agents.iter_mut() {
        let col = agent.choose_move(&board).unwrap();
        assert!(board.is_legal(col), "{} chose {col}", agent.name());
    }
}
