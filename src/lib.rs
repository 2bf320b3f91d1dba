//! Trigo: Go for three players.
//!
//! Black, Grey and White take turns on a rectangular grid. Stones are
//! captured when their group loses its last liberty, suicide is illegal, and
//! at the end every empty region bordered by a single color counts as that
//! color's territory.
//!
//! ## Modules
//!
//! - [`board`] - Grid geometry: points, bounds, 4- and 8-neighborhoods
//! - [`state`] - Core game logic (stones, turns, captures, territory)
//! - [`player`] - The move-provider interface and time budgets
//! - [`random`] - Random-legal computer player
//! - [`heuristic`] - Tiered heuristic computer player
//! - [`game`] - Turn loop, clocks, passes and the end of a game
//! - [`snapshot`] - Saving and resuming games
//! - [`scoreboard`] - Persistent leaderboard per board size
//! - [`config`] - Game settings from TOML
//!
//! ## Example
//!
//! ```
//! use trigo::board::Board;
//! use trigo::player::{Budget, MoveProvider};
//! use trigo::heuristic::HeuristicPlayer;
//! use trigo::state::{Color, GameState};
//!
//! let mut state = GameState::new(Board::new(9, 9).unwrap());
//! state.play((4, 4)).unwrap();
//!
//! let mut grey = HeuristicPlayer::new(Color::Grey);
//! let placed = grey.select_move(&mut state, Budget::Unbounded);
//! assert!(placed.is_some());
//! assert_eq!(state.turn(), Color::White);
//! ```

pub mod board;
pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod heuristic;
pub mod player;
pub mod random;
pub mod scoreboard;
pub mod snapshot;
pub mod state;
