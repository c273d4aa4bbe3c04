//! The player interface shared by every move-choosing algorithm.
//!
//! Drivers (the CLI, the text protocol, match runners) hold a
//! `Box<dyn Agent>` and never need to know which algorithm is behind it.

use crate::board::Board;
use crate::constants::{DEFAULT_DEPTH, DEFAULT_SEED, EXPLORATION, N_SIMS};
use crate::error::{ConfigError, GameError};
use crate::mcts::{MctsConfig, MctsPlayer};
use crate::minimax::{MinimaxConfig, MinimaxPlayer};

/// Statistics for one root child after an MCTS search.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildStats {
    pub column: usize,
    pub visits: u32,
    /// Sum of rewards from the point of view of the player choosing `column`.
    pub reward: f64,
}

impl ChildStats {
    /// Mean reward in [-1, 1], or 0.0 if never visited.
    pub fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.reward / self.visits as f64
        }
    }
}

/// Algorithm-specific details of a search.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchStats {
    /// Backed-up minimax score of the chosen move and nodes visited.
    Minimax { score: i32, nodes: u64 },
    /// Per-child statistics at the root, in creation order.
    Mcts { children: Vec<ChildStats> },
    /// No search was performed.
    None,
}

/// The chosen column plus how it was chosen.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub column: usize,
    pub stats: SearchStats,
}

/// Something that picks a column for the player to move.
pub trait Agent {
    /// Short display name, e.g. `minimax(d=4)`.
    fn name(&self) -> String;

    /// Search `board` and report the chosen column with statistics.
    ///
    /// Fails with [`GameError::NoLegalMove`] if the board is already terminal.
    fn search(&mut self, board: &Board) -> Result<SearchResult, GameError>;

    /// Pick a column for the player to move on `board`.
    fn choose_move(&mut self, board: &Board) -> Result<usize, GameError> {
        self.search(board).map(|r| r.column)
    }
}

/// Baseline agent that plays a uniformly random legal column.
pub struct RandomAgent {
    rng: fastrand::Rng,
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> String {
        "random".to_string()
    }

    fn search(&mut self, board: &Board) -> Result<SearchResult, GameError> {
        if board.is_terminal() {
            return Err(GameError::NoLegalMove);
        }
        let legal = board.legal_moves();
        let column = legal[self.rng.usize(..legal.len())];
        Ok(SearchResult {
            column,
            stats: SearchStats::None,
        })
    }
}

/// Which algorithm a driver should construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum EngineKind {
    Minimax,
    Mcts,
    Random,
}

impl EngineKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "minimax" => Some(EngineKind::Minimax),
            "mcts" => Some(EngineKind::Mcts),
            "random" => Some(EngineKind::Random),
            _ => None,
        }
    }
}

/// Everything needed to build an agent of any kind.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineSettings {
    pub kind: EngineKind,
    pub depth: u32,
    /// Minimax only: prune with alpha-beta
    pub alpha_beta: bool,
    pub simulations: usize,
    pub exploration: f64,
    pub seed: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            kind: EngineKind::Minimax,
            depth: DEFAULT_DEPTH,
            alpha_beta: true,
            simulations: N_SIMS,
            exploration: EXPLORATION,
            seed: DEFAULT_SEED,
        }
    }
}

impl EngineSettings {
    /// Construct the configured agent, validating its configuration.
    pub fn build(&self) -> Result<Box<dyn Agent>, ConfigError> {
        let agent: Box<dyn Agent> = match self.kind {
            EngineKind::Minimax => {
                Box::new(MinimaxPlayer::new(MinimaxConfig {
                    depth: self.depth,
                    alpha_beta: self.alpha_beta,
                })?)
            }
            EngineKind::Mcts => Box::new(MctsPlayer::new(MctsConfig {
                simulations: self.simulations,
                exploration: self.exploration,
                seed: self.seed,
            })?),
            EngineKind::Random => Box::new(RandomAgent::new(self.seed)),
        };
        Ok(agent)
    }
}
