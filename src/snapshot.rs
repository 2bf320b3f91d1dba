//! Saving and loading a whole game.
//!
//! A snapshot is a JSON document holding the grid text together with
//! everything the driver needs to carry on: seats, scores, turn, clocks and
//! the move log. On disk the document is zlib-compressed. Loading never
//! touches a running game; a bad file only fails the load.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::Board;
use crate::constants::ROW_SEPARATOR;
use crate::error::PersistError;
use crate::game::{Clocks, Game, LogEntry, build_seats};
use crate::player::SeatKind;
use crate::state::{Color, GameState};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Width and height.
    pub size: (usize, usize),
    /// Grid text as written by [`GameState::serialize`].
    pub state: String,
    pub players: [SeatKind; 3],
    pub scores: [u32; 3],
    pub turn: Color,
    /// Remaining clock per color in milliseconds, for clocked games.
    #[serde(default)]
    pub time: Option<[u64; 3]>,
    /// Clock increment in milliseconds.
    #[serde(default)]
    pub increment: u64,
    #[serde(default)]
    pub log: Vec<LogEntry>,
    #[serde(default)]
    pub passes: usize,
}

impl Snapshot {
    pub fn capture(game: &Game) -> Self {
        let state = game.state();
        let board = state.board();
        let clocks = game.clocks();
        Snapshot {
            size: (board.width(), board.height()),
            state: state.serialize(),
            players: game.seat_kinds(),
            scores: state.scores(),
            turn: state.turn(),
            time: clocks.map(|c| c.all_remaining().map(|d| d.as_millis() as u64)),
            increment: clocks.map_or(0, |c| c.increment().as_millis() as u64),
            log: game.log().to_vec(),
            passes: game.passes(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        let io_err = |source: std::io::Error| PersistError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(io_err)?;
        let mut encoder = ZlibEncoder::new(BufWriter::new(file), Compression::default());
        serde_json::to_writer(&mut encoder, self)?;
        encoder.finish().and_then(|mut out| out.flush()).map_err(io_err)?;
        info!(path = %path.display(), "game saved");
        Ok(())
    }

    /// Read and check a snapshot file.
    pub fn load(path: &Path) -> Result<Self, PersistError> {
        let file = File::open(path).map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = ZlibDecoder::new(BufReader::new(file));
        let snapshot: Snapshot = serde_json::from_reader(reader)?;
        snapshot.grid()?;
        info!(path = %path.display(), "game loaded");
        Ok(snapshot)
    }

    /// Rebuild the game. `seed` seeds the computer seats.
    pub fn restore(&self, seed: Option<u64>) -> Result<Game, PersistError> {
        let mut state = self.grid()?;
        state.set_turn(self.turn);
        for (color, &score) in Color::PLAYERS.into_iter().zip(&self.scores) {
            state.set_score(color, score);
        }

        let clocks = self.time.map(|ms| {
            Clocks::from_remaining(
                ms.map(Duration::from_millis),
                Duration::from_millis(self.increment),
            )
        });
        Ok(Game::resume(
            state,
            build_seats(self.players, seed),
            clocks,
            self.log.clone(),
            self.passes,
        ))
    }

    /// Decode the grid and check it against the rest of the envelope.
    fn grid(&self) -> Result<GameState, PersistError> {
        let (width, height) = self.size;
        let board = Board::new(width, height)?;
        let state = GameState::deserialize(&self.state, ROW_SEPARATOR)?;
        if state.board() != board {
            return Err(PersistError::Invalid(format!(
                "grid is {}, expected {board}",
                state.board()
            )));
        }
        if self.turn.slot().is_none() {
            return Err(PersistError::Invalid("turn must be a player color".into()));
        }
        if self.players.iter().all(|&p| p == SeatKind::None) {
            return Err(PersistError::Invalid("no seated players".into()));
        }
        if let Some(entry) = self.log.iter().find(|e| e.color.slot().is_none()) {
            return Err(PersistError::Invalid(format!(
                "log entry without a player color: {entry:?}"
            )));
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot {
            size: (3, 2),
            state: "X#.;..O;".into(),
            players: [SeatKind::Human, SeatKind::Random, SeatKind::None],
            scores: [1, 0, 4],
            turn: Color::White,
            time: Some([1000, 2000, 3000]),
            increment: 500,
            log: vec![LogEntry {
                color: Color::Black,
                point: Some((0, 0)),
                captured: 0,
            }],
            passes: 1,
        }
    }

    #[test]
    fn test_restore() {
        let game = sample().restore(Some(5)).unwrap();
        let state = game.state();
        assert_eq!(state.get((1, 0)), Color::Grey);
        assert_eq!(state.turn(), Color::White);
        assert_eq!(state.scores(), [1, 0, 4]);
        assert_eq!(game.passes(), 1);
        assert_eq!(game.log().len(), 1);
        let clocks = game.clocks().unwrap();
        assert_eq!(clocks.remaining(Color::Grey), Duration::from_secs(2));
        assert_eq!(clocks.increment(), Duration::from_millis(500));
        assert_eq!(
            game.seat_kinds(),
            [SeatKind::Human, SeatKind::Random, SeatKind::None]
        );
    }

    #[test]
    fn test_capture_matches_restore() {
        let game = sample().restore(None).unwrap();
        assert_eq!(Snapshot::capture(&game), sample());
    }

    #[test]
    fn test_size_mismatch() {
        let bad = Snapshot {
            size: (2, 2),
            ..sample()
        };
        assert!(matches!(bad.restore(None), Err(PersistError::Invalid(_))));
    }

    #[test]
    fn test_bad_grid() {
        let bad = Snapshot {
            state: "X?.;..O;".into(),
            ..sample()
        };
        assert!(matches!(bad.restore(None), Err(PersistError::Format(_))));
    }

    #[test]
    fn test_empty_turn() {
        let bad = Snapshot {
            turn: Color::Empty,
            ..sample()
        };
        assert!(matches!(bad.restore(None), Err(PersistError::Invalid(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        sample().save(&path).unwrap();
        assert_eq!(Snapshot::load(&path).unwrap(), sample());
    }

    #[test]
    fn test_saved_file_is_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        sample().save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes[0], 0x78);
        assert!(serde_json::from_slice::<Snapshot>(&bytes).is_err());

        let mut json = String::new();
        std::io::Read::read_to_string(&mut ZlibDecoder::new(bytes.as_slice()), &mut json).unwrap();
        assert_eq!(serde_json::from_str::<Snapshot>(&json).unwrap(), sample());
    }

    #[test]
    fn test_load_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        std::fs::write(&path, "{\"size\": [3, 2]}").unwrap();
        assert!(matches!(Snapshot::load(&path), Err(PersistError::Json(_))));
        assert!(matches!(
            Snapshot::load(&dir.path().join("missing.json")),
            Err(PersistError::Io { .. })
        ));
    }
}
