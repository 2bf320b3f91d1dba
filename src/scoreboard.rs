//! Leaderboard kept in a JSON file, one list of `[name, score]` pairs per
//! board size.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};

use crate::board::Board;
use crate::error::PersistError;

pub struct Scoreboard {
    path: PathBuf,
    scores: BTreeMap<String, Vec<(String, u32)>>,
}

impl Scoreboard {
    /// Open the scoreboard at `path`, creating an empty one if it is missing.
    ///
    /// Entries that are not a `[name, positive score]` pair are skipped.
    pub fn open(path: &Path) -> Result<Self, PersistError> {
        let io_err = |e: std::io::Error| PersistError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        if !path.exists() {
            info!(path = %path.display(), "creating scoreboard");
            std::fs::write(path, "{}").map_err(io_err)?;
        }
        let text = std::fs::read_to_string(path).map_err(io_err)?;
        let raw: Value = serde_json::from_str(&text)?;

        Ok(Self {
            path: path.to_path_buf(),
            scores: check(raw),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a score for a board size and write the file back.
    pub fn add_score(&mut self, size: Board, name: &str, score: u32) -> Result<(), PersistError> {
        if score == 0 {
            return Err(PersistError::Invalid("score must be positive".into()));
        }
        let key = size.to_string();
        info!(%key, name, score, "adding scoreboard record");
        self.scores
            .entry(key)
            .or_default()
            .push((name.to_string(), score));

        let text = serde_json::to_string(&self.scores)?;
        std::fs::write(&self.path, text).map_err(|e| PersistError::Io {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Records for a board size, best first.
    pub fn scores(&self, size: Board) -> Vec<(String, u32)> {
        let mut list = self
            .scores
            .get(&size.to_string())
            .cloned()
            .unwrap_or_default();
        list.sort_by(|a, b| b.1.cmp(&a.1));
        list
    }

    /// Board sizes with at least one list, in key order.
    pub fn sizes(&self) -> impl Iterator<Item = &str> {
        self.scores.keys().map(String::as_str)
    }
}

fn check(raw: Value) -> BTreeMap<String, Vec<(String, u32)>> {
    let mut result = BTreeMap::new();
    let Value::Object(map) = raw else {
        warn!("scoreboard is not a JSON object, ignoring its contents");
        return result;
    };

    for (key, values) in map {
        let Value::Array(values) = values else {
            warn!(%key, "scoreboard entry is not a list, skipping");
            continue;
        };
        let mut items = Vec::new();
        for value in values {
            match check_item(&value) {
                Some(item) => items.push(item),
                None => warn!(%key, %value, "malformed scoreboard record, skipping"),
            }
        }
        result.insert(key, items);
    }
    result
}

fn check_item(value: &Value) -> Option<(String, u32)> {
    let [name, score] = value.as_array()?.as_slice() else {
        return None;
    };
    let name = name.as_str()?;
    let score = u32::try_from(score.as_u64()?).ok()?;
    (score > 0).then(|| (name.to_string(), score))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(w: usize, h: usize) -> Board {
        Board::new(w, h).unwrap()
    }

    #[test]
    fn test_open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let sb = Scoreboard::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(sb.path(), path.as_path());
        assert!(sb.scores(board(9, 9)).is_empty());
    }

    #[test]
    fn test_add_and_sort() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let mut sb = Scoreboard::open(&path).unwrap();
        sb.add_score(board(9, 9), "ann", 3).unwrap();
        sb.add_score(board(9, 9), "bob", 12).unwrap();
        sb.add_score(board(5, 5), "cid", 7).unwrap();

        let reopened = Scoreboard::open(&path).unwrap();
        assert_eq!(
            reopened.scores(board(9, 9)),
            vec![("bob".to_string(), 12), ("ann".to_string(), 3)]
        );
        assert_eq!(reopened.scores(board(5, 5)).len(), 1);
        assert_eq!(reopened.sizes().collect::<Vec<_>>(), vec!["5x5", "9x9"]);
    }

    #[test]
    fn test_rejects_zero_score() {
        let dir = tempfile::tempdir().unwrap();
        let mut sb = Scoreboard::open(&dir.path().join("s.json")).unwrap();
        assert!(matches!(
            sb.add_score(board(3, 3), "zed", 0),
            Err(PersistError::Invalid(_))
        ));
        assert!(sb.scores(board(3, 3)).is_empty());
    }

    #[test]
    fn test_skips_malformed_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(
            &path,
            r#"{"9x9": [["ann", 4], ["bob"], [3, 3], ["cid", -1], ["dee", 2.5], ["eve", 0], "x", ["fay", 9]],
                "5x5": 17}"#,
        )
        .unwrap();
        let sb = Scoreboard::open(&path).unwrap();
        assert_eq!(
            sb.scores(board(9, 9)),
            vec![("fay".to_string(), 9), ("ann".to_string(), 4)]
        );
        assert!(sb.scores(board(5, 5)).is_empty());
    }

    #[test]
    fn test_non_object_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        let sb = Scoreboard::open(&path).unwrap();
        assert_eq!(sb.sizes().count(), 0);
    }

    #[test]
    fn test_invalid_json_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(Scoreboard::open(&path), Err(PersistError::Json(_))));
    }
}
