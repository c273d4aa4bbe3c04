//! Game driver: plays agents against each other.
//!
//! `play_game` runs one game to completion; `run_match` plays a short series
//! with alternating colours and tallies the results from the first agent's
//! point of view.

use std::time::{Duration, Instant};

use tracing::info;

use crate::agent::Agent;
use crate::board::{Board, Outcome, Player};
use crate::error::GameError;

/// A finished game.
#[derive(Clone, Debug)]
pub struct GameRecord {
    pub board: Board,
    pub outcome: Outcome,
    /// Total thinking time, indexed Red then Yellow.
    pub think_time: [Duration; 2],
}

impl GameRecord {
    /// Columns played, in order.
    pub fn moves(&self) -> Vec<usize> {
        self.board.history().collect()
    }
}

fn side(player: Player) -> usize {
    match player {
        Player::Red => 0,
        Player::Yellow => 1,
    }
}

/// Play from `start` until the game ends. `on_move` is called after every
/// move with the new board and the column played.
pub fn play_game<F>(
    red: &mut dyn Agent,
    yellow: &mut dyn Agent,
    start: Board,
    mut on_move: F,
) -> Result<GameRecord, GameError>
where
    F: FnMut(&Board, usize),
{
    let mut board = start;
    let mut think_time = [Duration::ZERO; 2];

    let outcome = loop {
        if let Some(outcome) = board.outcome() {
            break outcome;
        }
        let mover = board.to_move();
        let agent: &mut dyn Agent = match mover {
            Player::Red => &mut *red,
            Player::Yellow => &mut *yellow,
        };

        let started = Instant::now();
        let col = agent.choose_move(&board)?;
        think_time[side(mover)] += started.elapsed();

        board.apply(col)?;
        on_move(&board, col);
    };

    Ok(GameRecord {
        board,
        outcome,
        think_time,
    })
}

/// Results of a match from the first agent's point of view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchSummary {
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    /// Moves made by the first agent
    pub moves: usize,
    /// Thinking time of the first agent
    pub think_time: Duration,
}

impl MatchSummary {
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }

    pub fn avg_move_time(&self) -> Duration {
        if self.moves == 0 {
            Duration::ZERO
        } else {
            self.think_time.div_f64(self.moves as f64)
        }
    }
}

/// Play `games` games of `agent` against `opponent`. `agent` takes Red in
/// even-numbered games and Yellow in odd-numbered ones.
pub fn run_match(
    agent: &mut dyn Agent,
    opponent: &mut dyn Agent,
    games: usize,
) -> Result<MatchSummary, GameError> {
    let mut summary = MatchSummary::default();

    for game in 0..games {
        let colour = if game % 2 == 0 {
            Player::Red
        } else {
            Player::Yellow
        };
        let record = match colour {
            Player::Red => play_game(agent, opponent, Board::new(), |_, _| {})?,
            Player::Yellow => play_game(opponent, agent, Board::new(), |_, _| {})?,
        };

        summary.games += 1;
        match record.outcome {
            Outcome::Win(p) if p == colour => summary.wins += 1,
            Outcome::Win(_) => summary.losses += 1,
            Outcome::Draw => summary.draws += 1,
        }
        // Red makes the odd-numbered plies
        let plies = record.board.move_count();
        summary.moves += match colour {
            Player::Red => plies.div_ceil(2),
            Player::Yellow => plies / 2,
        };
        summary.think_time += record.think_time[side(colour)];

        info!(
            game,
            colour = colour.name(),
            outcome = ?record.outcome,
            plies,
            "game finished"
        );
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::RandomAgent;
    use crate::minimax::{MinimaxConfig, MinimaxPlayer};

    #[test]
    fn test_random_game_terminates() {
        let mut red = RandomAgent::new(1);
        let mut yellow = RandomAgent::new(2);
        let mut calls = 0;
        let record = play_game(&mut red, &mut yellow, Board::new(), |_, _| calls += 1).unwrap();

        assert!(record.board.is_terminal());
        assert_eq!(Some(record.outcome), record.board.outcome());
        assert_eq!(calls, record.board.move_count());
        assert_eq!(record.moves().len(), calls);
    }

    #[test]
    fn test_play_game_from_terminal_board() {
        let mut red = RandomAgent::new(1);
        let mut yellow = RandomAgent::new(2);
        let start = Board::from_moves([0, 1, 0, 1, 0, 1, 0]).unwrap();
        let record = play_game(&mut red, &mut yellow, start, |_, _| {}).unwrap();
        assert_eq!(record.outcome, Outcome::Win(Player::Red));
        assert_eq!(record.board, start);
    }

    #[test]
    fn test_minimax_beats_random() {
        let mut minimax = MinimaxPlayer::new(MinimaxConfig::with_depth(3)).unwrap();
        let mut random = RandomAgent::new(5);
        let summary = run_match(&mut minimax, &mut random, 4).unwrap();

        assert_eq!(summary.games, 4);
        assert_eq!(summary.wins + summary.draws + summary.losses, 4);
        assert!(summary.wins >= 3, "{summary:?}");
        assert!(summary.moves > 0);
    }

    #[test]
    fn test_summary_rates() {
        let summary = MatchSummary {
            games: 4,
            wins: 3,
            draws: 1,
            losses: 0,
            moves: 10,
            think_time: Duration::from_millis(100),
        };
        assert!((summary.win_rate() - 0.75).abs() < 1e-12);
        assert_eq!(summary.avg_move_time(), Duration::from_millis(10));
        assert_eq!(MatchSummary::default().avg_move_time(), Duration::ZERO);
    }

    #[test]
    fn test_avg_move_time_beyond_u32_moves() {
        let summary = MatchSummary {
            moves: u32::MAX as usize + 1,
            think_time: Duration::from_secs(u32::MAX as u64 + 1),
            ..Default::default()
        };
        let avg = summary.avg_move_time().as_secs_f64();
        assert!((avg - 1.0).abs() < 1e-6, "{avg}");
    }
}
