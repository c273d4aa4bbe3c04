//! Connect Four search engine with two algorithms: depth-limited minimax
//! with alpha-beta pruning, and Monte Carlo Tree Search with UCB1.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions, search defaults and heuristic weights
//! - [`board`] - Board model (moves, undo, win/draw detection)
//! - [`eval`] - Window-scanning evaluation heuristic used by minimax
//! - [`minimax`] - Minimax search with alpha-beta pruning
//! - [`mcts`] - Monte Carlo Tree Search with UCB1 selection
//! - [`playout`] - Random game simulation for MCTS
//! - [`agent`] - The `Agent` trait shared by all players
//! - [`game`] - Game and match drivers
//! - [`protocol`] - Text protocol for terminals and GUIs
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use connect4_engine::agent::Agent;
//! use connect4_engine::board::Board;
//! use connect4_engine::minimax::{MinimaxConfig, MinimaxPlayer};
//!
//! // Red has three stacked in column 0
//! let board = Board::from_moves([0, 1, 0, 1, 0, 2]).unwrap();
//!
//! let mut player = MinimaxPlayer::new(MinimaxConfig::with_depth(4)).unwrap();
//! assert_eq!(player.choose_move(&board).unwrap(), 0);
//! ```

pub mod agent;
pub mod board;
pub mod constants;
pub mod error;
pub mod eval;
pub mod game;
pub mod mcts;
pub mod minimax;
pub mod playout;
pub mod protocol;
