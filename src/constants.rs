//! Constants for grid encoding, turn order, and time budgeting.
//!
//! Board dimensions are chosen at runtime (see [`crate::board::Board`]), so this
//! module only carries the fixed parts of the game: the text symbols used to
//! encode a grid, the time headroom reserved by the driver, and CLI defaults.

// =============================================================================
// Grid Encoding
// =============================================================================

/// Black stone.
pub const SYMBOL_BLACK: char = 'X';

/// Grey stone.
pub const SYMBOL_GREY: char = '#';

/// White stone.
pub const SYMBOL_WHITE: char = 'O';

/// Empty point.
pub const SYMBOL_EMPTY: char = '.';

/// Row terminator written by [`crate::state::GameState::serialize`].
pub const ROW_SEPARATOR: &str = ";";

// =============================================================================
// Time Budget
// =============================================================================

/// Share of a color's remaining clock handed to its move provider.
/// The rest is headroom for the driver's own bookkeeping.
pub const TIME_BUDGET_FACTOR: f64 = 0.7;

// =============================================================================
// Defaults
// =============================================================================

/// Default board width and height.
pub const DEFAULT_SIZE: (usize, usize) = (9, 9);

/// Default leaderboard file.
pub const DEFAULT_SCOREBOARD_FILE: &str = "scores.json";
