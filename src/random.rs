//! Random-legal player.
//!
//! Shuffles the empty points and plays the first one the rules accept.
//! The shuffle is reproducible when the player is built with a seed.

use tracing::debug;

use crate::player::{Budget, MoveProvider, Placement, Progress, SeatKind, Timeout, try_play};
use crate::state::{Color, GameState};

/// Plays a uniformly random legal move.
pub struct RandomPlayer {
    color: Color,
    rng: fastrand::Rng,
}

impl RandomPlayer {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(color: Color, seed: u64) -> Self {
        Self {
            color,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    fn find_point(
        &mut self,
        state: &mut GameState,
        progress: &mut Progress,
    ) -> Result<Option<Placement>, Timeout> {
        let mut candidates = state.free_points();
        self.rng.shuffle(&mut candidates);

        for pt in candidates {
            progress.enter(pt)?;
            if let Some(placed) = try_play(state, pt) {
                return Ok(Some(placed));
            }
        }
        Ok(None)
    }
}

impl MoveProvider for RandomPlayer {
    fn color(&self) -> Color {
        self.color
    }

    fn kind(&self) -> SeatKind {
        SeatKind::Random
    }

    fn select_move(&mut self, state: &mut GameState, budget: Budget) -> Option<Placement> {
        if state.turn() != self.color {
            return None;
        }
        let mut progress = Progress::new(budget);
        match self.find_point(state, &mut progress) {
            Ok(found) => found,
            Err(Timeout) => {
                debug!(color = %self.color, "random search out of time");
                None
            }
        }
    }
}
