//! Game state: stones, turn rotation, scoring, and the rules of play.
//!
//! This module provides the core game logic, including:
//! - Per-point occupancy stored as a flat row-major array
//! - Group, border and liberty discovery by explicit-stack flood fill
//! - Move legality (occupied point, suicide) and capture resolution
//! - Territory scoring and the text encoding of a grid
//!
//! Three colors share the board and move in the fixed cyclic order
//! Black, Grey, White. Every capture is credited to the color that moved.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Board, Point};
use crate::constants::{ROW_SEPARATOR, SYMBOL_BLACK, SYMBOL_EMPTY, SYMBOL_GREY, SYMBOL_WHITE};
use crate::error::GoError;

/// Occupancy of a point, and the identity of a player.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[default]
    Empty,
    Black,
    Grey,
    White,
}

impl Color {
    /// Player colors in turn order.
    pub const PLAYERS: [Color; 3] = [Color::Black, Color::Grey, Color::White];

    /// Position of this color in [`Color::PLAYERS`], or `None` for `Empty`.
    pub fn slot(self) -> Option<usize> {
        Self::PLAYERS.iter().position(|&c| c == self)
    }

    /// The color that moves after this one. `Empty` has no successor.
    pub fn next(self) -> Color {
        match self.slot() {
            Some(i) => Self::PLAYERS[(i + 1) % Self::PLAYERS.len()],
            None => Color::Empty,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Color::Empty => SYMBOL_EMPTY,
            Color::Black => SYMBOL_BLACK,
            Color::Grey => SYMBOL_GREY,
            Color::White => SYMBOL_WHITE,
        }
    }

    pub fn from_symbol(c: char) -> Option<Color> {
        match c {
            SYMBOL_EMPTY => Some(Color::Empty),
            SYMBOL_BLACK => Some(Color::Black),
            SYMBOL_GREY => Some(Color::Grey),
            SYMBOL_WHITE => Some(Color::White),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Empty => "empty",
            Color::Black => "Black",
            Color::Grey => "Grey",
            Color::White => "White",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A maximal 4-connected set of same-colored points and what surrounds it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Group {
    /// Members of the group, in discovery order.
    pub stones: Vec<Point>,
    /// Adjacent points of a different color, each listed once.
    pub border: Vec<Point>,
}

/// Mutable game state: stones on the board, whose turn it is, and the score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    cells: Vec<Color>,
    turn: Color,
    score: [u32; Color::PLAYERS.len()],
}

impl GameState {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            cells: vec![Color::Empty; board.area()],
            turn: Color::PLAYERS[0],
            score: [0; Color::PLAYERS.len()],
        }
    }

    pub fn board(&self) -> Board {
        self.board
    }

    /// Occupancy of every point in row-major order.
    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    /// Occupancy of a point.
    ///
    /// # Panics
    /// If `pt` is not on the board.
    #[inline]
    pub fn get(&self, pt: Point) -> Color {
        self.cells[self.board.index(pt)]
    }

    /// Overwrite a point without any legality check.
    ///
    /// Used for setup and loading; normal play goes through [`GameState::play`].
    pub fn set(&mut self, pt: Point, color: Color) -> Result<(), GoError> {
        if !self.board.contains(pt) {
            return Err(GoError::OutOfBounds(pt));
        }
        self.put(pt, color);
        Ok(())
    }

    #[inline]
    pub(crate) fn put(&mut self, pt: Point, color: Color) {
        let idx = self.board.index(pt);
        self.cells[idx] = color;
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Force the turn, e.g. when restoring a saved game. `Empty` is ignored.
    pub fn set_turn(&mut self, color: Color) {
        if color.slot().is_some() {
            self.turn = color;
        }
    }

    /// Hand the turn to the next color.
    pub fn next_turn(&mut self) {
        self.turn = self.turn.next();
    }

    /// Pass: the turn advances and nothing else changes.
    pub fn pass_turn(&mut self) {
        self.next_turn();
    }

    pub fn score(&self, color: Color) -> u32 {
        color.slot().map_or(0, |i| self.score[i])
    }

    /// Scores of Black, Grey and White, in turn order.
    pub fn scores(&self) -> [u32; Color::PLAYERS.len()] {
        self.score
    }

    /// Overwrite a score. Only for restoring a saved game.
    pub fn set_score(&mut self, color: Color, value: u32) {
        if let Some(i) = color.slot() {
            self.score[i] = value;
        }
    }

    fn credit(&mut self, color: Color, points: u32) {
        if let Some(i) = color.slot() {
            self.score[i] += points;
        }
    }

    /// Number of stones on the board.
    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Color::Empty).count()
    }

    /// All empty points, in row-major order.
    pub fn free_points(&self) -> Vec<Point> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == Color::Empty)
            .map(|(i, _)| self.board.point(i))
            .collect()
    }

    /// Play a stone of the current color at `pt`.
    ///
    /// Suicide is tested before captures are resolved, so a stone with no
    /// liberties of its own is rejected even if it would have captured.
    /// On success the captured stones are credited to the mover, the turn
    /// advances, and the number of captured stones is returned.
    ///
    /// # Errors
    /// - [`GoError::OutOfBounds`] if `pt` is not on the board
    /// - [`GoError::CellOccupied`] if `pt` already holds a stone
    /// - [`GoError::SuicideMove`] if the new stone's group has no liberties;
    ///   the board is left unchanged
    pub fn play(&mut self, pt: Point) -> Result<u32, GoError> {
        if !self.board.contains(pt) {
            return Err(GoError::OutOfBounds(pt));
        }
        if self.get(pt) != Color::Empty {
            return Err(GoError::CellOccupied(pt));
        }

        let mover = self.turn;
        self.put(pt, mover);

        if self.liberty_count(pt) == 0 {
            self.put(pt, Color::Empty);
            return Err(GoError::SuicideMove(pt));
        }

        let captured = self.take_stones(pt);
        self.credit(mover, captured);
        if captured > 0 {
            debug!(color = %mover, ?pt, captured, "stones captured");
        }

        self.next_turn();
        Ok(captured)
    }

    /// Remove every neighboring group of another color left without liberties.
    ///
    /// Liberties are recomputed per neighbor, after earlier removals.
    fn take_stones(&mut self, pt: Point) -> u32 {
        let mover = self.get(pt);
        let mut taken = 0;
        for n in self.board.neighbors4(pt) {
            if self.get(n) != mover && self.liberty_count(n) == 0 {
                taken += self.capture(n);
            }
        }
        taken
    }

    /// Flood fill from `start` over points of the same color.
    ///
    /// Works for empty points too: the result is then the empty region
    /// containing `start`, bordered by the stones around it.
    pub fn group_and_border(&self, start: Point) -> Group {
        let color = self.get(start);
        let area = self.board.area();
        let mut in_group = vec![false; area];
        let mut in_border = vec![false; area];
        let mut stack = vec![start];
        let mut group = Group::default();

        in_group[self.board.index(start)] = true;
        while let Some(pt) = stack.pop() {
            group.stones.push(pt);
            for n in self.board.neighbors4(pt) {
                let i = self.board.index(n);
                if self.cells[i] == color {
                    if !in_group[i] {
                        in_group[i] = true;
                        stack.push(n);
                    }
                } else if !in_border[i] {
                    in_border[i] = true;
                    group.border.push(n);
                }
            }
        }
        group
    }

    /// Empty points adjacent to the group at `pt`.
    ///
    /// An empty point is its own single liberty.
    pub fn liberties(&self, pt: Point) -> Vec<Point> {
        if self.get(pt) == Color::Empty {
            return vec![pt];
        }
        self.group_and_border(pt)
            .border
            .into_iter()
            .filter(|&b| self.get(b) == Color::Empty)
            .collect()
    }

    /// Count the liberties of the group at `pt`.
    pub fn liberty_count(&self, pt: Point) -> usize {
        if self.get(pt) == Color::Empty {
            return 1;
        }
        self.group_and_border(pt)
            .border
            .iter()
            .filter(|&&b| self.get(b) == Color::Empty)
            .count()
    }

    /// Remove the group at `pt` from the board and return its size.
    ///
    /// The caller decides whom to credit. Capturing an empty point is a no-op.
    pub fn capture(&mut self, pt: Point) -> u32 {
        if self.get(pt) == Color::Empty {
            return 0;
        }
        let group = self.group_and_border(pt);
        for &stone in &group.stones {
            self.put(stone, Color::Empty);
        }
        group.stones.len() as u32
    }

    /// Credit `color` with every empty region bordered only by its stones.
    ///
    /// Call once per color when play has ended: a second call on the same
    /// board counts the same regions again. Returns the points credited.
    pub fn score_territory(&mut self, color: Color) -> u32 {
        let mut visited = vec![false; self.board.area()];
        let mut gained = 0;

        for pt in self.free_points() {
            if visited[self.board.index(pt)] {
                continue;
            }
            let region = self.group_and_border(pt);
            for &p in &region.stones {
                visited[self.board.index(p)] = true;
            }
            if region.border.iter().all(|&b| self.get(b) == color) {
                gained += region.stones.len() as u32;
            }
        }

        self.credit(color, gained);
        gained
    }

    /// Every color holding the top score. Ties produce several winners.
    pub fn winners(&self) -> Vec<Color> {
        let best = self.score.iter().copied().max().unwrap_or(0);
        Color::PLAYERS
            .into_iter()
            .filter(|&c| self.score(c) == best)
            .collect()
    }

    /// Encode the grid row by row, one symbol per point, each row followed by `;`.
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.board.area() + self.board.height());
        for row in self.cells.chunks(self.board.width()) {
            out.extend(row.iter().map(|c| c.symbol()));
            out.push_str(ROW_SEPARATOR);
        }
        out
    }

    /// Decode a grid written as rows joined by `separator`.
    ///
    /// Empty rows (from leading or trailing separators) are skipped. The board
    /// size is taken from the number of rows and the length of the first one.
    /// The result has Black to move and all scores at zero.
    pub fn deserialize(text: &str, separator: &str) -> Result<GameState, GoError> {
        if separator.is_empty() {
            return Err(GoError::Format("empty row separator".into()));
        }
        let rows: Vec<&str> = text.split(separator).filter(|r| !r.is_empty()).collect();
        let Some(first) = rows.first() else {
            return Err(GoError::Format("no rows".into()));
        };

        let width = first.chars().count();
        let board = Board::new(width, rows.len()).map_err(|e| GoError::Format(e.to_string()))?;
        let mut state = GameState::new(board);

        for (y, row) in rows.iter().enumerate() {
            let len = row.chars().count();
            if len != width {
                return Err(GoError::Format(format!(
                    "row {y} has {len} points, expected {width}"
                )));
            }
            for (x, ch) in row.chars().enumerate() {
                let color = Color::from_symbol(ch).ok_or_else(|| {
                    GoError::Format(format!("unknown symbol {ch:?} at ({x}, {y})"))
                })?;
                state.put((x, y), color);
            }
        }
        Ok(state)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.board.width()) {
            for c in row {
                write!(f, "{} ", c.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
