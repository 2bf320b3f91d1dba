//! Game driver.
//!
//! Runs the turn loop over a [`GameState`]: asks the seated provider of the
//! color to move for a move, applies it or records a pass, keeps the clocks,
//! and ends the game once every active seat has passed in a row or every
//! clock has run out. On that transition each color's territory is scored
//! exactly once and the winners are fixed.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::{Board, Point};
use crate::config::GameConfig;
use crate::error::GoError;
use crate::player::{Budget, MoveProvider, Placement, SeatKind};
use crate::state::{Color, GameState};

const SEATS: usize = Color::PLAYERS.len();

/// One line of the move log. A pass has no point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub color: Color,
    pub point: Option<Point>,
    pub captured: u32,
}

/// Per-color game clocks with a fixed increment after every turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clocks {
    remaining: [Duration; SEATS],
    increment: Duration,
}

impl Clocks {
    pub fn new(limit: Duration, increment: Duration) -> Self {
        Self::from_remaining([limit; SEATS], increment)
    }

    pub fn from_remaining(remaining: [Duration; SEATS], increment: Duration) -> Self {
        Self {
            remaining,
            increment,
        }
    }

    pub fn remaining(&self, color: Color) -> Duration {
        color.slot().map_or(Duration::ZERO, |i| self.remaining[i])
    }

    pub fn all_remaining(&self) -> [Duration; SEATS] {
        self.remaining
    }

    pub fn increment(&self) -> Duration {
        self.increment
    }

    fn charge(&mut self, color: Color, spent: Duration) {
        if let Some(i) = color.slot() {
            self.remaining[i] = self.remaining[i]
                .saturating_sub(spent)
                .saturating_add(self.increment);
        }
    }
}

/// Final result of a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub scores: [u32; SEATS],
    pub winners: Vec<Color>,
}

impl Outcome {
    pub fn is_draw(&self) -> bool {
        self.winners.len() > 1
    }
}

/// What happened on one call to [`Game::step`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Turn {
    Played(Color, Placement),
    Passed(Color),
    /// Nobody sits at this color; its turn was skipped.
    Skipped(Color),
    /// An interactive seat is to move: call [`Game::play_point`] or [`Game::pass`].
    AwaitingInput(Color),
    Finished,
}

/// A game in progress.
pub struct Game {
    state: GameState,
    seats: [Option<Box<dyn MoveProvider>>; SEATS],
    clocks: Option<Clocks>,
    passes: usize,
    log: Vec<LogEntry>,
    waiting_since: Option<Instant>,
    outcome: Option<Outcome>,
}

impl Game {
    pub fn new(
        state: GameState,
        seats: [Option<Box<dyn MoveProvider>>; SEATS],
        clocks: Option<Clocks>,
    ) -> Self {
        Self {
            state,
            seats,
            clocks,
            passes: 0,
            log: Vec::new(),
            waiting_since: None,
            outcome: None,
        }
    }

    /// Set up a fresh game from configuration.
    pub fn from_config(config: &GameConfig) -> Result<Self, GoError> {
        let board = Board::new(config.width, config.height)?;
        let seats = build_seats(config.players, config.seed);
        let clocks = config.time_limit().map(|limit| Clocks::new(limit, config.increment()));
        Ok(Self::new(GameState::new(board), seats, clocks))
    }

    /// Continue a saved game.
    pub fn resume(
        state: GameState,
        seats: [Option<Box<dyn MoveProvider>>; SEATS],
        clocks: Option<Clocks>,
        log: Vec<LogEntry>,
        passes: usize,
    ) -> Self {
        let mut game = Self::new(state, seats, clocks);
        game.log = log;
        game.passes = passes;
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn clocks(&self) -> Option<&Clocks> {
        self.clocks.as_ref()
    }

    /// Consecutive passes since the last stone was played.
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn seat_kinds(&self) -> [SeatKind; SEATS] {
        std::array::from_fn(|i| self.seats[i].as_ref().map_or(SeatKind::None, |s| s.kind()))
    }

    pub fn active_seats(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Play one turn for the color to move.
    pub fn step(&mut self) -> Turn {
        if self.outcome.is_some() {
            return Turn::Finished;
        }
        if self.should_end() {
            self.finish();
            return Turn::Finished;
        }

        let color = self.state.turn();
        let Some(slot) = color.slot() else {
            return Turn::Finished;
        };
        let interactive = match &self.seats[slot] {
            Some(seat) => seat.is_interactive(),
            None => {
                self.state.next_turn();
                return Turn::Skipped(color);
            }
        };

        let remaining = self.clocks.as_ref().map(|c| c.remaining(color));
        if remaining == Some(Duration::ZERO) {
            info!(%color, "out of time");
            return self.record_pass(color, Duration::ZERO);
        }
        if interactive {
            self.waiting_since.get_or_insert_with(Instant::now);
            return Turn::AwaitingInput(color);
        }

        let started = Instant::now();
        let budget = Budget::from_remaining(remaining);
        let placed = self.seats[slot]
            .as_mut()
            .and_then(|seat| seat.select_move(&mut self.state, budget));
        let spent = started.elapsed();

        match placed {
            Some(placed) => self.record_move(color, placed, spent),
            None => self.record_pass(color, spent),
        }
    }

    /// Step until the game ends or an interactive seat has to move.
    pub fn run(&mut self) -> Turn {
        loop {
            match self.step() {
                turn @ (Turn::AwaitingInput(_) | Turn::Finished) => return turn,
                _ => {}
            }
        }
    }

    /// Play a point for the color to move, on behalf of an interactive seat.
    ///
    /// An illegal point leaves the game unchanged so the user can try again.
    pub fn play_point(&mut self, pt: Point) -> Result<Placement, GoError> {
        let color = self.state.turn();
        let captured = self.state.play(pt)?;
        let placed = Placement { point: pt, captured };
        let spent = self.take_waiting_time();
        self.record_move(color, placed, spent);
        Ok(placed)
    }

    /// Pass on behalf of the color to move.
    pub fn pass(&mut self) -> Turn {
        let color = self.state.turn();
        let spent = self.take_waiting_time();
        self.record_pass(color, spent)
    }

    /// The winning interactive color and its score, when it deserves a
    /// leaderboard entry: a single winner, seated by a human, above zero.
    pub fn leaderboard_entry(&self) -> Option<(Color, u32)> {
        let outcome = self.outcome.as_ref()?;
        let &[winner] = outcome.winners.as_slice() else {
            return None;
        };
        let slot = winner.slot()?;
        let human = self.seats[slot].as_ref().is_some_and(|s| s.is_interactive());
        let score = self.state.score(winner);
        (human && score > 0).then_some((winner, score))
    }

    fn take_waiting_time(&mut self) -> Duration {
        self.waiting_since
            .take()
            .map_or(Duration::ZERO, |since| since.elapsed())
    }

    fn record_move(&mut self, color: Color, placed: Placement, spent: Duration) -> Turn {
        info!(%color, point = ?placed.point, captured = placed.captured, "move");
        self.passes = 0;
        self.charge(color, spent);
        self.log.push(LogEntry {
            color,
            point: Some(placed.point),
            captured: placed.captured,
        });
        self.after_turn(Turn::Played(color, placed))
    }

    fn record_pass(&mut self, color: Color, spent: Duration) -> Turn {
        info!(%color, "pass");
        self.passes += 1;
        self.charge(color, spent);
        self.state.pass_turn();
        self.log.push(LogEntry {
            color,
            point: None,
            captured: 0,
        });
        self.after_turn(Turn::Passed(color))
    }

    fn after_turn(&mut self, turn: Turn) -> Turn {
        if self.should_end() {
            self.finish();
        }
        turn
    }

    fn charge(&mut self, color: Color, spent: Duration) {
        if let Some(clocks) = self.clocks.as_mut() {
            clocks.charge(color, spent);
        }
    }

    fn should_end(&self) -> bool {
        let active = self.active_seats();
        if active == 0 || self.passes >= active {
            return true;
        }
        self.clocks.as_ref().is_some_and(|clocks| {
            Color::PLAYERS
                .into_iter()
                .filter(|c| c.slot().is_some_and(|i| self.seats[i].is_some()))
                .all(|c| clocks.remaining(c).is_zero())
        })
    }

    fn finish(&mut self) {
        for color in Color::PLAYERS {
            let gained = self.state.score_territory(color);
            if gained > 0 {
                info!(%color, gained, "territory");
            }
        }
        let outcome = Outcome {
            scores: self.state.scores(),
            winners: self.state.winners(),
        };
        if outcome.is_draw() {
            info!(scores = ?outcome.scores, "game ended in a draw");
        } else {
            info!(winner = %outcome.winners[0], scores = ?outcome.scores, "game over");
        }
        self.outcome = Some(outcome);
    }
}

/// Build one provider per color. A shared seed is spread over the seats so
/// that two computer players do not mirror each other's shuffles.
pub fn build_seats(
    kinds: [SeatKind; SEATS],
    seed: Option<u64>,
) -> [Option<Box<dyn MoveProvider>>; SEATS] {
    std::array::from_fn(|i| {
        let seat_seed = seed.map(|s| s.wrapping_add(i as u64));
        kinds[i].build(Color::PLAYERS[i], seat_seed)
    })
}
