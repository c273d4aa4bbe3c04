//! Connect Four engine command line.
//!
//! ## Usage
//!
//! - `connect4-engine` - Minimax (Red) against MCTS (Yellow), one game
//! - `connect4-engine play --red mcts --yellow random` - Pick the players
//! - `connect4-engine bench --engine mcts --opponent minimax --games 20` - Short match
//! - `connect4-engine protocol` - Text protocol on stdin/stdout

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use connect4_engine::agent::{EngineKind, EngineSettings};
use connect4_engine::board::{Board, Outcome};
use connect4_engine::constants::{DEFAULT_DEPTH, DEFAULT_SEED, EXPLORATION, N_SIMS};
use connect4_engine::game::{play_game, run_match};
use connect4_engine::protocol::ProtocolEngine;

/// Connect Four engine: minimax with alpha-beta pruning and MCTS with UCB1
#[derive(Parser)]
#[command(name = "connect4-engine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game between two engines, printing the board after each move
    Play {
        #[arg(long, value_enum, default_value_t = EngineKind::Minimax)]
        red: EngineKind,
        #[arg(long, value_enum, default_value_t = EngineKind::Mcts)]
        yellow: EngineKind,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Play a series with alternating colours and report the results
    Bench {
        #[arg(long, value_enum, default_value_t = EngineKind::Mcts)]
        engine: EngineKind,
        #[arg(long, value_enum, default_value_t = EngineKind::Random)]
        opponent: EngineKind,
        #[arg(long, default_value_t = 10)]
        games: usize,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Start the text protocol server for use with a terminal or GUI
    Protocol {
        #[arg(long, value_enum, default_value_t = EngineKind::Minimax)]
        engine: EngineKind,
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Args, Clone)]
struct SearchArgs {
    /// Minimax search depth in plies
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth: u32,
    /// Run minimax without alpha-beta pruning
    #[arg(long)]
    no_alpha_beta: bool,
    /// MCTS simulations per move
    #[arg(long, default_value_t = N_SIMS)]
    simulations: usize,
    /// UCB1 exploration constant
    #[arg(long, default_value_t = EXPLORATION)]
    exploration: f64,
    /// Seed for MCTS rollouts and the random player
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

impl SearchArgs {
    fn settings(&self, kind: EngineKind, seed_offset: u64) -> EngineSettings {
        EngineSettings {
            kind,
            depth: self.depth,
            alpha_beta: !self.no_alpha_beta,
            simulations: self.simulations,
            exploration: self.exploration,
            seed: self.seed.wrapping_add(seed_offset),
        }
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Some(Commands::Play {
            red,
            yellow,
            search,
        }) => run_play(red, yellow, &search),
        Some(Commands::Bench {
            engine,
            opponent,
            games,
            search,
        }) => run_bench(engine, opponent, games, &search),
        Some(Commands::Protocol { engine, search }) => {
            let mut engine = ProtocolEngine::with_settings(search.settings(engine, 0));
            engine
                .run(std::io::stdin().lock(), std::io::stdout())
                .context("protocol loop failed")
        }
        None => {
            let search = SearchArgs {
                depth: DEFAULT_DEPTH,
                no_alpha_beta: false,
                simulations: N_SIMS,
                exploration: EXPLORATION,
                seed: DEFAULT_SEED,
            };
            run_play(EngineKind::Minimax, EngineKind::Mcts, &search)
        }
    }
}

fn run_play(red: EngineKind, yellow: EngineKind, search: &SearchArgs) -> Result<()> {
    let mut red = search.settings(red, 0).build().context("invalid red engine")?;
    let mut yellow = search
        .settings(yellow, 1)
        .build()
        .context("invalid yellow engine")?;

    println!("{} (X) vs {} (O)\n", red.name(), yellow.name());

    let record = play_game(red.as_mut(), yellow.as_mut(), Board::new(), |board, col| {
        let mover = board.to_move().other();
        println!("{} plays {col}", mover.name());
        println!("{board}");
    })
    .context("game aborted")?;

    match record.outcome {
        Outcome::Win(p) => println!("{} wins after {} moves", p.name(), record.board.move_count()),
        Outcome::Draw => println!("Draw"),
    }
    println!(
        "Thinking time: Red {:.3}s, Yellow {:.3}s",
        record.think_time[0].as_secs_f64(),
        record.think_time[1].as_secs_f64()
    );
    Ok(())
}

fn run_bench(
    engine: EngineKind,
    opponent: EngineKind,
    games: usize,
    search: &SearchArgs,
) -> Result<()> {
    let mut agent = search.settings(engine, 0).build().context("invalid engine")?;
    let mut opponent = search
        .settings(opponent, 1)
        .build()
        .context("invalid opponent")?;

    println!("Benchmarking {} against {} ({games} games)...", agent.name(), opponent.name());
    let summary = run_match(agent.as_mut(), opponent.as_mut(), games).context("match aborted")?;

    let pct = |n: usize| {
        if summary.games == 0 {
            0.0
        } else {
            100.0 * n as f64 / summary.games as f64
        }
    };
    println!("\n{} Results:", agent.name());
    println!("{}", "=".repeat(40));
    println!("Games Played:     {}", summary.games);
    println!("Wins:             {} ({:.1}%)", summary.wins, pct(summary.wins));
    println!("Draws:            {} ({:.1}%)", summary.draws, pct(summary.draws));
    println!("Losses:           {} ({:.1}%)", summary.losses, pct(summary.losses));
    println!(
        "Avg Move Time:    {:.3}s",
        summary.avg_move_time().as_secs_f64()
    );
    println!("Total Moves:      {}", summary.moves);
    Ok(())
}
