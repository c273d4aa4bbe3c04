//! Monte Carlo Tree Search (MCTS) with UCB1 selection.
//!
//! Every simulation runs four phases:
//! - Selection: descend from the root through fully expanded nodes, picking
//!   the child with the highest UCB1 score
//! - Expansion: add one child for an untried column
//! - Simulation: random playout from the new node
//! - Backpropagation: walk parent handles back to the root, updating visits
//!   and rewards
//!
//! Nodes live in an arena (`Vec<TreeNode>`) and refer to each other by
//! [`NodeId`]. A node's parent handle is only used for backpropagation; the
//! arena owns every node. A fresh tree is built for each decision.
//!
//! A node's reward is kept from the point of view of the player who made the
//! move leading to it, i.e. the player to move at its parent. The parent can
//! therefore maximize its children's mean reward directly, and the sign flips
//! at every level of the tree.

use tracing::{debug, trace};

use crate::agent::{Agent, ChildStats, SearchResult, SearchStats};
use crate::board::{Board, Outcome, Player};
use crate::constants::{DEFAULT_SEED, EXPLORATION, MOVE_ORDER, N_SIMS};
use crate::error::{ConfigError, GameError};
use crate::playout::rollout;

/// MCTS configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct MctsConfig {
    /// Number of simulations per move. Must be at least 1.
    pub simulations: usize,
    /// UCB1 exploration constant `C`.
    pub exploration: f64,
    /// Seed for the rollout random source.
    pub seed: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            simulations: N_SIMS,
            exploration: EXPLORATION,
            seed: DEFAULT_SEED,
        }
    }
}

impl MctsConfig {
    /// Create a new config with the specified number of simulations.
    pub fn with_simulations(simulations: usize) -> Self {
        Self {
            simulations,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulations == 0 {
            return Err(ConfigError::Validation(
                "simulations must be >= 1".to_string(),
            ));
        }
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(ConfigError::Validation(format!(
                "exploration must be a finite non-negative number (got {})",
                self.exploration
            )));
        }
        Ok(())
    }
}

/// Index into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// A node in the MCTS search tree.
#[derive(Clone, Debug)]
pub struct TreeNode {
    /// The position at this node
    pub board: Board,
    /// Handle of the parent (None for the root)
    pub parent: Option<NodeId>,
    /// Column played to reach this node (None for the root)
    pub column: Option<usize>,
    /// Expanded children as (column, handle), in creation order
    pub children: Vec<(usize, NodeId)>,
    /// Legal columns without a child yet; popped from the back, centre first
    untried: Vec<usize>,
    /// Number of visits
    pub visits: u32,
    /// Sum of rewards for the player who moved into this node
    pub reward: f64,
}

impl TreeNode {
    fn new(board: Board, parent: Option<NodeId>, column: Option<usize>) -> Self {
        let untried = if board.is_terminal() {
            Vec::new()
        } else {
            MOVE_ORDER
                .iter()
                .rev()
                .copied()
                .filter(|&c| board.is_legal(c))
                .collect()
        };
        Self {
            board,
            parent,
            column,
            children: Vec::new(),
            untried,
            visits: 0,
            reward: 0.0,
        }
    }

    /// The player whose move produced this node.
    #[inline]
    pub fn mover(&self) -> Player {
        self.board.to_move().other()
    }

    /// Mean reward, or 0.0 for an unvisited node.
    #[inline]
    pub fn mean(&self) -> f64 {
        if self.visits > 0 {
            self.reward / self.visits as f64
        } else {
            0.0
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.board.is_terminal()
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// Reward of `outcome` for the player who moved into this node.
    fn reward_for(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Win(p) if p == self.mover() => 1.0,
            Outcome::Win(_) => -1.0,
            Outcome::Draw => 0.0,
        }
    }
}

/// UCB1 score of a child: `mean + C * sqrt(ln(N) / n)`. Unvisited children
/// score +infinity so that they are always tried first.
pub fn ucb1(child: &TreeNode, parent_visits: u32, exploration: f64) -> f64 {
    if child.visits == 0 {
        return f64::INFINITY;
    }
    let n = child.visits as f64;
    child.mean() + exploration * ((parent_visits as f64).ln() / n).sqrt()
}

/// Arena-allocated search tree.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    /// Create a tree holding only a root for `board`.
    pub fn new(board: Board) -> Self {
        Self {
            nodes: vec![TreeNode::new(board, None, None)],
        }
    }

    /// Get a node by handle.
    ///
    /// # Panics
    /// Panics if the handle does not belong to this tree.
    pub fn get(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    fn get_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }

    pub fn root(&self) -> &TreeNode {
        self.get(NodeId::ROOT)
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn add(&mut self, node: TreeNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Child of `id` with the highest UCB1 score. Ties go to the child created first.
    fn most_urgent(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(id);
        let mut best: Option<(NodeId, f64)> = None;
        for &(_, child) in &node.children {
            let score = ucb1(self.get(child), node.visits, exploration);
            if best.is_none_or(|(_, b)| score > b) {
                best = Some((child, score));
            }
        }
        best.map(|(child, _)| child)
    }

    /// Selection: descend until reaching a terminal node or one with untried columns.
    fn tree_descend(&self, exploration: f64) -> NodeId {
        let mut id = NodeId::ROOT;
        loop {
            let node = self.get(id);
            if node.is_terminal() || !node.is_fully_expanded() {
                return id;
            }
            match self.most_urgent(id, exploration) {
                Some(child) => id = child,
                None => return id,
            }
        }
    }

    /// Expansion: add one child for an untried column of `id`.
    ///
    /// Returns the new child, or `id` itself if there is nothing to expand.
    fn expand(&mut self, id: NodeId) -> NodeId {
        let Some(col) = self.get_mut(id).untried.pop() else {
            return id;
        };
        let mut board = self.get(id).board;
        board.play(col);
        let child = self.add(TreeNode::new(board, Some(id), Some(col)));
        self.get_mut(id).children.push((col, child));
        child
    }

    /// Backpropagation: update every node from `leaf` up to the root.
    fn tree_update(&mut self, leaf: NodeId, outcome: Outcome) {
        let mut next = Some(leaf);
        while let Some(id) = next {
            let node = self.get_mut(id);
            node.visits += 1;
            node.reward += node.reward_for(outcome);
            next = node.parent;
        }
    }

    /// Root children statistics, in creation order.
    pub fn root_stats(&self) -> Vec<ChildStats> {
        self.root()
            .children
            .iter()
            .map(|&(column, id)| {
                let child = self.get(id);
                ChildStats {
                    column,
                    visits: child.visits,
                    reward: child.reward,
                }
            })
            .collect()
    }

    /// The most visited root child. Ties go to the child created first.
    pub fn best_move(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for &(column, id) in &self.root().children {
            let visits = self.get(id).visits;
            if best.is_none_or(|(_, v)| visits > v) {
                best = Some((column, visits));
            }
        }
        best.map(|(column, _)| column)
    }
}

/// Run `sims` simulations on `tree` and return the most visited root column.
pub fn tree_search(
    tree: &mut Tree,
    sims: usize,
    exploration: f64,
    rng: &mut fastrand::Rng,
) -> Option<usize> {
    for i in 0..sims {
        let selected = tree.tree_descend(exploration);
        let leaf = if tree.get(selected).is_terminal() {
            selected
        } else {
            tree.expand(selected)
        };

        let outcome = rollout(&tree.get(leaf).board, rng);
        tree.tree_update(leaf, outcome);

        trace!(sim = i, leaf = leaf.0, ?outcome, "mcts simulation");
    }

    tree.best_move()
}

/// MCTS player.
pub struct MctsPlayer {
    config: MctsConfig,
    rng: fastrand::Rng,
}

impl MctsPlayer {
    pub fn new(config: MctsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = fastrand::Rng::with_seed(config.seed);
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Build a fresh tree for `board` and search it. The tree is returned
    /// for inspection.
    pub fn search_tree(&mut self, board: &Board) -> Result<Tree, GameError> {
        if board.is_terminal() {
            return Err(GameError::NoLegalMove);
        }
        let mut tree = Tree::new(*board);
        tree_search(
            &mut tree,
            self.config.simulations,
            self.config.exploration,
            &mut self.rng,
        );
        Ok(tree)
    }
}

impl Agent for MctsPlayer {
    fn name(&self) -> String {
        format!("mcts(n={})", self.config.simulations)
    }

    fn search(&mut self, board: &Board) -> Result<SearchResult, GameError> {
        let tree = self.search_tree(board)?;
        let column = tree.best_move().ok_or(GameError::NoLegalMove)?;
        let children = tree.root_stats();

        for child in &children {
            debug!(
                column = child.column,
                visits = child.visits,
                mean = child.mean(),
                "mcts root child"
            );
        }
        debug!(
            player = board.to_move().name(),
            column,
            nodes = tree.len(),
            simulations = self.config.simulations,
            "mcts move"
        );

        Ok(SearchResult {
            column,
            stats: SearchStats::Mcts { children },
        })
    }
}
