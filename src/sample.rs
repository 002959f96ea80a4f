//! The example upload file offered on the home page.

use std::path::{Path, PathBuf};

use axum::{
    extract::{FromRef, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{AppState, Error};

/// The file name of the example upload, both on disk and in the download.
pub const SAMPLE_FILE_NAME: &str = "sample_transactions.csv";

const SAMPLE_HEADER: [&str; 3] = ["amount", "merchant", "method"];

const SAMPLE_ROWS: [[&str; 3]; 3] = [
    ["1200", "Alpha", "credit"],
    ["50", "Grocery", "upi"],
    ["60000", "Electro", "credit"],
];

/// The state needed for serving the sample file.
#[derive(Debug, Clone)]
pub struct SampleState {
    /// Where the sample file lives once it has been generated.
    pub sample_path: PathBuf,
}

impl FromRef<AppState> for SampleState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            sample_path: state.sample_path.clone(),
        }
    }
}

/// Write the sample file to `path` unless it already exists.
///
/// An existing file is left untouched, even if it was edited by hand.
fn ensure_sample_file(path: &Path) -> Result<(), Error> {
    if path.exists() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(SAMPLE_HEADER)?;

    for row in SAMPLE_ROWS {
        writer.write_record(row)?;
    }

    writer.flush()?;
    tracing::info!("Wrote sample upload file to {}", path.display());

    Ok(())
}

/// Route handler that sends the sample CSV as a file attachment.
pub async fn download_sample(State(state): State<SampleState>) -> Result<Response, Error> {
    ensure_sample_file(&state.sample_path)?;
    let contents = std::fs::read(&state.sample_path)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{SAMPLE_FILE_NAME}\""),
            ),
        ],
        contents,
    )
        .into_response())
}
