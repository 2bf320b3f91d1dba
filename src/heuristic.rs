//! Heuristic player.
//!
//! Candidates are the empty points in one random order. Four passes are made
//! over them, each skipping points an earlier pass found illegal or harmful:
//!
//! 1. Immediate capture: a point that takes away an enemy group's last liberty.
//! 2. Rescue: a point that joins an own group in atari. Points that would leave
//!    the new stone in atari without capturing are ruled out here. Points
//!    touching an enemy are scored by a capture-region search and tried in
//!    ascending order of that score.
//! 3. Safe contact: a point touching an enemy where the new stone keeps more
//!    than one liberty.
//! 4. Anything legal.
//!
//! The deadline is checked before each candidate. When it passes, the last
//! candidate entered is played as a best-effort move if the rules allow it.

use tracing::debug;

use crate::board::Point;
use crate::player::{
    Budget, MoveProvider, Placement, Progress, SeatKind, Tentative, Timeout, try_play,
};
use crate::state::{Color, GameState};

/// Picks captures and rescues first, then safe contact moves.
pub struct HeuristicPlayer {
    color: Color,
    rng: fastrand::Rng,
}

impl HeuristicPlayer {
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
        let board = state.board();
        let mut candidates = state.free_points();
        self.rng.shuffle(&mut candidates);
        let mut forbidden = vec![false; board.area()];

        for &pt in &candidates {
            progress.enter(pt)?;
            if forbidden[board.index(pt)] || !self.threatens_capture(state, pt) {
                continue;
            }
            match try_play(state, pt) {
                Some(placed) => {
                    debug!(color = %self.color, ?pt, "capturing move");
                    return Ok(Some(placed));
                }
                None => forbidden[board.index(pt)] = true,
            }
        }

        let mut ranked: Vec<(u32, Point)> = Vec::new();
        for &pt in &candidates {
            progress.enter(pt)?;
            if forbidden[board.index(pt)] {
                continue;
            }
            if self.is_self_atari(state, pt) {
                forbidden[board.index(pt)] = true;
                continue;
            }
            if self.rescues_group(state, pt) {
                match try_play(state, pt) {
                    Some(placed) => {
                        debug!(color = %self.color, ?pt, "rescuing group in atari");
                        return Ok(Some(placed));
                    }
                    None => {
                        forbidden[board.index(pt)] = true;
                        continue;
                    }
                }
            }
            if self.touches_enemy(state, pt) {
                let value = self.capture_value(state, pt);
                if value > 0 {
                    ranked.push((value, pt));
                }
            }
        }

        // Smallest region first; equal values are tried latest-found first.
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        while let Some((value, pt)) = ranked.pop() {
            progress.enter(pt)?;
            match try_play(state, pt) {
                Some(placed) => {
                    debug!(color = %self.color, ?pt, value, "pressuring enemy group");
                    return Ok(Some(placed));
                }
                None => forbidden[board.index(pt)] = true,
            }
        }

        for &pt in &candidates {
            progress.enter(pt)?;
            if forbidden[board.index(pt)] || !self.touches_enemy(state, pt) {
                continue;
            }
            if self.liberties_if_placed(state, pt, pt) > 1 {
                match try_play(state, pt) {
                    Some(placed) => {
                        debug!(color = %self.color, ?pt, "safe contact move");
                        return Ok(Some(placed));
                    }
                    None => forbidden[board.index(pt)] = true,
                }
            }
        }

        for &pt in &candidates {
            progress.enter(pt)?;
            if forbidden[board.index(pt)] {
                continue;
            }
            match try_play(state, pt) {
                Some(placed) => return Ok(Some(placed)),
                None => forbidden[board.index(pt)] = true,
            }
        }

        Ok(None)
    }

    fn is_enemy(&self, c: Color) -> bool {
        c != Color::Empty && c != self.color
    }

    fn touches_enemy(&self, state: &GameState, pt: Point) -> bool {
        state
            .board()
            .neighbors4(pt)
            .any(|n| self.is_enemy(state.get(n)))
    }

    /// Liberties of the group at `target` with our stone tentatively on `pt`.
    fn liberties_if_placed(&self, state: &mut GameState, pt: Point, target: Point) -> usize {
        let mut t = Tentative::new(state);
        t.place(pt, self.color);
        t.state().liberty_count(target)
    }

    /// Would a stone on `pt` leave some neighboring group without liberties?
    fn threatens_capture(&self, state: &mut GameState, pt: Point) -> bool {
        for n in state.board().neighbors4(pt) {
            if state.get(n) != self.color && self.liberties_if_placed(state, pt, n) == 0 {
                return true;
            }
        }
        false
    }

    /// A stone on `pt` would have one liberty and capture nothing.
    fn is_self_atari(&self, state: &mut GameState, pt: Point) -> bool {
        let board = state.board();
        let mut t = Tentative::new(state);
        t.place(pt, self.color);
        let s = t.state();
        s.liberty_count(pt) == 1 && board.neighbors4(pt).all(|n| s.liberty_count(n) != 0)
    }

    /// `pt` touches one of our groups that is down to its last liberty.
    fn rescues_group(&self, state: &GameState, pt: Point) -> bool {
        state
            .board()
            .neighbors4(pt)
            .any(|n| state.get(n) == self.color && state.liberty_count(n) == 1)
    }

    /// Estimate how many of our stones it takes to capture something near `start`.
    ///
    /// Grows a region of tentative stones from `start`, admitting empty points
    /// in the 3x3 block around each member that touch an enemy stone. Returns
    /// the region size at the first point where some neighbor has no liberties
    /// left, or 0 if the region runs out first.
    fn capture_value(&self, state: &mut GameState, start: Point) -> u32 {
        let board = state.board();
        let mut t = Tentative::new(state);
        let mut stack = vec![start];

        while let Some(pt) = stack.pop() {
            if t.state().get(pt) != Color::Empty {
                continue;
            }
            t.place(pt, self.color);

            let s = t.state();
            if board.neighbors4(pt).any(|n| s.liberty_count(n) == 0) {
                return t.placed() as u32;
            }
            for next in board.neighbors8(pt) {
                if s.get(next) == Color::Empty
                    && board.neighbors4(next).any(|n| self.is_enemy(s.get(n)))
                {
                    stack.push(next);
                }
            }
        }
        0
    }
}

impl MoveProvider for HeuristicPlayer {
    fn color(&self) -> Color {
        self.color
    }

    fn kind(&self) -> SeatKind {
        SeatKind::Heuristic
    }

    fn select_move(&mut self, state: &mut GameState, budget: Budget) -> Option<Placement> {
        if state.turn() != self.color {
            return None;
        }
        let mut progress = Progress::new(budget);
        match self.find_point(state, &mut progress) {
            Ok(found) => found,
            Err(Timeout) => {
                let pt = progress.current()?;
                debug!(color = %self.color, ?pt, "out of time, trying last candidate");
                try_play(state, pt)
            }
        }
    }
}
