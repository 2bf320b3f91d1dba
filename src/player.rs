//! Move providers: the players a driver asks for moves.
//!
//! Every seat at the table implements [`MoveProvider`]. Computer players
//! search under a [`Budget`]; the search checks its [`Deadline`] between
//! candidates only, so a timed-out search never leaves a tentative stone on
//! the board. Tentative stones are placed through [`Tentative`], which puts
//! the original points back when it goes out of scope.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::board::Point;
use crate::constants::TIME_BUDGET_FACTOR;
use crate::heuristic::HeuristicPlayer;
use crate::random::RandomPlayer;
use crate::state::{Color, GameState};

/// Time a provider may spend choosing a move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Budget {
    Unbounded,
    Limited(Duration),
    /// Give up after evaluating this many candidates, regardless of time.
    Candidates(usize),
}

impl Budget {
    /// Budget for a color with `remaining` time on its clock.
    ///
    /// Only [`TIME_BUDGET_FACTOR`] of the remaining time is handed out.
    pub fn from_remaining(remaining: Option<Duration>) -> Self {
        match remaining {
            Some(left) => Budget::Limited(left.mul_f64(TIME_BUDGET_FACTOR)),
            None => Budget::Unbounded,
        }
    }

    /// Start counting down.
    pub fn start(self) -> Deadline {
        Deadline {
            at: match self {
                Budget::Unbounded | Budget::Candidates(_) => None,
                Budget::Limited(limit) => Some(Instant::now() + limit),
            },
        }
    }
}

/// The instant a search must give up, if any.
#[derive(Copy, Clone, Debug)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    pub fn expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }
}

/// A stone a provider put on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub point: Point,
    pub captured: u32,
}

/// A player seated at one color.
pub trait MoveProvider {
    fn color(&self) -> Color;

    fn kind(&self) -> SeatKind;

    /// Interactive seats get their moves from the driver's caller instead.
    fn is_interactive(&self) -> bool {
        false
    }

    /// Choose and play a move for this provider's color.
    ///
    /// Does nothing unless it is this color's turn. Returns `None` when the
    /// provider found no legal move or ran out of time: the caller should
    /// record a pass.
    fn select_move(&mut self, state: &mut GameState, budget: Budget) -> Option<Placement>;
}

/// A human seat. Moves are entered by the user and applied by the driver.
#[derive(Debug, Clone)]
pub struct Interactive {
    color: Color,
}

impl Interactive {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl MoveProvider for Interactive {
    fn color(&self) -> Color {
        self.color
    }

    fn kind(&self) -> SeatKind {
        SeatKind::Human
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn select_move(&mut self, _state: &mut GameState, _budget: Budget) -> Option<Placement> {
        None
    }
}

/// Who sits at a color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatKind {
    /// Nobody: the color's turns are skipped.
    #[default]
    None,
    Human,
    Random,
    Heuristic,
}

impl SeatKind {
    /// Build the provider for this seat, or `None` for an empty seat.
    pub fn build(self, color: Color, seed: Option<u64>) -> Option<Box<dyn MoveProvider>> {
        match self {
            SeatKind::None => None,
            SeatKind::Human => Some(Box::new(Interactive::new(color))),
            SeatKind::Random => Some(Box::new(match seed {
                Some(seed) => RandomPlayer::with_seed(color, seed),
                None => RandomPlayer::new(color),
            })),
            SeatKind::Heuristic => Some(Box::new(match seed {
                Some(seed) => HeuristicPlayer::with_seed(color, seed),
                None => HeuristicPlayer::new(color),
            })),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeatKind::None => "none",
            SeatKind::Human => "human",
            SeatKind::Random => "random",
            SeatKind::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for SeatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "-" => Ok(SeatKind::None),
            "human" => Ok(SeatKind::Human),
            "random" => Ok(SeatKind::Random),
            "heuristic" | "clever" => Ok(SeatKind::Heuristic),
            other => Err(format!("unknown player kind: {other}")),
        }
    }
}

/// Raised when a search reaches its deadline between two candidates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Timeout;

/// Deadline bookkeeping for one search: remembers the last candidate entered.
pub(crate) struct Progress {
    deadline: Deadline,
    entries_left: Option<usize>,
    current: Option<Point>,
}

impl Progress {
    pub(crate) fn new(budget: Budget) -> Self {
        Self {
            deadline: budget.start(),
            entries_left: match budget {
                Budget::Candidates(n) => Some(n),
                _ => None,
            },
            current: None,
        }
    }

    /// Begin evaluating `pt`, unless the budget is spent.
    pub(crate) fn enter(&mut self, pt: Point) -> Result<(), Timeout> {
        if self.deadline.expired() {
            return Err(Timeout);
        }
        if let Some(left) = self.entries_left.as_mut() {
            if *left == 0 {
                return Err(Timeout);
            }
            *left -= 1;
        }
        self.current = Some(pt);
        Ok(())
    }

    /// The last candidate whose evaluation started.
    pub(crate) fn current(&self) -> Option<Point> {
        self.current
    }
}

/// Play `pt` for the side to move; a rejected move yields `None`.
pub(crate) fn try_play(state: &mut GameState, pt: Point) -> Option<Placement> {
    state
        .play(pt)
        .ok()
        .map(|captured| Placement { point: pt, captured })
}

/// Scoped tentative placement.
///
/// Stones placed through the guard are taken back, in reverse order, when the
/// guard is dropped.
pub(crate) struct Tentative<'a> {
    state: &'a mut GameState,
    saved: Vec<(Point, Color)>,
}

impl<'a> Tentative<'a> {
    pub(crate) fn new(state: &'a mut GameState) -> Self {
        Self {
            state,
            saved: Vec::new(),
        }
    }

    pub(crate) fn place(&mut self, pt: Point, color: Color) {
        self.saved.push((pt, self.state.get(pt)));
        self.state.put(pt, color);
    }

    pub(crate) fn state(&self) -> &GameState {
        &*self.state
    }

    /// Number of points placed so far.
    pub(crate) fn placed(&self) -> usize {
        self.saved.len()
    }
}

impl Drop for Tentative<'_> {
    fn drop(&mut self) {
        while let Some((pt, color)) = self.saved.pop() {
            self.state.put(pt, color);
        }
    }
}
