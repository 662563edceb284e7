//! High score persistence backed by a small JSON file.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use snake_arcade_session::{HighScoreStore, StoreError};
use tracing::warn;

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
}

/// Stores the high score as `{"high_score": N}` at a fixed path.
#[derive(Clone, Debug)]
pub(crate) struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(path: &Path) -> Result<u32, StoreError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(error) => return Err(error.into()),
        };
        let record: HighScoreRecord = serde_json::from_str(&text)
            .map_err(|error| StoreError::Malformed(error.to_string()))?;
        Ok(record.high_score)
    }
}

impl HighScoreStore for FileStore {
    fn load(&mut self) -> u32 {
        match Self::read(&self.path) {
            Ok(score) => score,
            Err(error) => {
                warn!(%error, path = %self.path.display(), "ignoring unreadable high score");
                0
            }
        }
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&HighScoreRecord { high_score: score })
            .map_err(|error| StoreError::Malformed(error.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
