//! Implements a struct that holds the state of the REST server.

use std::path::{Path, PathBuf};

use axum::extract::FromRef;

use crate::{
    Error,
    history::{HISTORY_FILE_NAME, HistoryStore},
    sample::SAMPLE_FILE_NAME,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The append-only log of classified transactions.
    pub history: HistoryStore,

    /// Where the example upload file is written the first time it is requested.
    pub sample_path: PathBuf,
}

impl AppState {
    /// Create a new [AppState] that keeps its files in `data_dir`.
    ///
    /// The history file is created with a header row if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the data directory or history file cannot be created.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, Error> {
        let data_dir = data_dir.as_ref();
        let history = HistoryStore::open(data_dir.join(HISTORY_FILE_NAME))?;

        Ok(Self {
            history,
            sample_path: data_dir.join(SAMPLE_FILE_NAME),
        })
    }
}

impl FromRef<AppState> for HistoryStore {
    fn from_ref(state: &AppState) -> Self {
        state.history.clone()
    }
}
