//! Line-oriented text protocol for driving the engine.
//!
//! The protocol follows the shape of GTP: one command per line, an optional
//! numeric id in front, and responses of the form `=id message` on success or
//! `?id message` on failure, each followed by a blank line. It lets a human
//! at a terminal, or an external GUI, play against either search algorithm.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version` - Engine identification
//! - `list_commands` - List all supported commands
//! - `known_command <cmd>` - Check if a command is supported
//! - `quit` - Exit the loop
//! - `clear_board` - Start a new game
//! - `play <col>` - Drop a token for the side to move
//! - `undo` - Take back the last move
//! - `genmove` - Let the engine choose and play a move
//! - `showboard` - Print the board
//! - `engine <minimax|mcts|random>` - Select the algorithm
//! - `depth <n>` / `simulations <n>` / `seed <n>` - Tune the algorithm
//! - `alphabeta <on|off>` - Toggle minimax pruning
//!
//! ## Example
//!
//! ```ignore
//! use connect4_engine::protocol::ProtocolEngine;
//! let mut engine = ProtocolEngine::new();
//! engine.run(std::io::stdin().lock(), std::io::stdout())?;
//! ```

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::agent::{EngineKind, EngineSettings};
use crate::board::{Board, Outcome};

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "alphabeta",
    "clear_board",
    "depth",
    "engine",
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "seed",
    "showboard",
    "simulations",
    "undo",
    "version",
];

/// Protocol engine state.
pub struct ProtocolEngine {
    /// Current game position
    board: Board,
    /// Algorithm used by `genmove`
    settings: EngineSettings,
}

impl Default for ProtocolEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolEngine {
    /// Create an engine with default settings.
    pub fn new() -> Self {
        Self::with_settings(EngineSettings::default())
    }

    pub fn with_settings(settings: EngineSettings) -> Self {
        Self {
            board: Board::new(),
            settings,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end == 0 {
            return (None, trimmed);
        }
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute one command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "1".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => match args.first() {
                Some(cmd) => {
                    let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                    (true, known.to_string())
                }
                None => (false, "missing argument".to_string()),
            },

            "quit" => (true, String::new()),

            "clear_board" => {
                self.board = Board::new();
                (true, String::new())
            }

            "play" => {
                let Some(col) = args.first().and_then(|a| a.parse::<usize>().ok()) else {
                    return (false, "expected a column number".to_string());
                };
                match self.board.apply(col) {
                    Ok(_) => (true, self.status()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "undo" => {
                let Some(col) = self.board.last_move() else {
                    return (false, "nothing to undo".to_string());
                };
                match self.board.undo(col) {
                    Ok(()) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "genmove" => self.genmove(),

            "showboard" => (true, format!("\n{}", self.board)),

            "engine" => match args.first().and_then(|a| EngineKind::parse(a)) {
                Some(kind) => {
                    self.settings.kind = kind;
                    (true, String::new())
                }
                None => (false, "expected one of: minimax, mcts, random".to_string()),
            },

            "depth" => match args.first().and_then(|a| a.parse::<u32>().ok()) {
                Some(depth) if depth >= 1 => {
                    self.settings.depth = depth;
                    (true, String::new())
                }
                _ => (false, "depth must be a positive integer".to_string()),
            },

            "alphabeta" => match args.first().map(|a| a.to_lowercase()).as_deref() {
                Some("on") => {
                    self.settings.alpha_beta = true;
                    (true, String::new())
                }
                Some("off") => {
                    self.settings.alpha_beta = false;
                    (true, String::new())
                }
                _ => (false, "expected on or off".to_string()),
            },

            "simulations" => match args.first().and_then(|a| a.parse::<usize>().ok()) {
                Some(n) if n >= 1 => {
                    self.settings.simulations = n;
                    (true, String::new())
                }
                _ => (false, "simulations must be a positive integer".to_string()),
            },

            "seed" => match args.first().and_then(|a| a.parse::<u64>().ok()) {
                Some(seed) => {
                    self.settings.seed = seed;
                    (true, String::new())
                }
                None => (false, "invalid seed".to_string()),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }

    /// Choose a move with the configured engine and play it.
    fn genmove(&mut self) -> (bool, String) {
        let mut agent = match self.settings.build() {
            Ok(agent) => agent,
            Err(e) => return (false, e.to_string()),
        };
        let col = match agent.choose_move(&self.board) {
            Ok(col) => col,
            Err(e) => return (false, e.to_string()),
        };
        if let Err(e) = self.board.apply(col) {
            return (false, e.to_string());
        }
        debug!(engine = agent.name(), column = col, "genmove");

        let status = self.status();
        if status.is_empty() {
            (true, col.to_string())
        } else {
            (true, format!("{col} {status}"))
        }
    }

    /// Short description of a finished game, empty while in play.
    fn status(&self) -> String {
        match self.board.outcome() {
            Some(Outcome::Win(p)) => format!("{} wins", p.name()),
            Some(Outcome::Draw) => "draw".to_string(),
            None => String::new(),
        }
    }
}
