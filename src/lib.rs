//! Fraud Checker is a small web app that flags suspicious card and UPI transactions.
//!
//! Transactions arrive either as an uploaded CSV file or as a single manual
//! entry. Each one is labeled by a fixed set of rules, appended to an
//! append-only CSV history file, and the history is re-aggregated on demand to
//! serve the charts and summary pages.
//!
//! This library provides a REST API that directly serves HTML pages and JSON.

#![warn(missing_docs)]

use std::{io, net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod charts;
mod classifier;
mod endpoints;
mod error_pages;
mod history;
mod history_page;
mod home;
mod html;
mod logging;
mod method_page;
mod navigation;
mod prediction;
mod routing;
mod sample;
mod stats;
mod summary;
#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use classifier::{
    AMOUNT_THRESHOLD, CREDIT_AMOUNT_THRESHOLD, FLAGGED_MERCHANT_KEYWORDS, FraudLabel,
    PaymentMethod, Transaction, classify, parse_amount_lenient,
};
pub use history::{HISTORY_FILE_NAME, HISTORY_HEADER, HistoryStore, LabeledRecord, Source};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use sample::SAMPLE_FILE_NAME;
pub use summary::{LabelDistribution, Summary, label_distribution, summarize};

use crate::error_pages::InternalServerError;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The upload request did not contain a file in the `file` field.
    #[error("no file uploaded")]
    NoFileUploaded,

    /// The multipart form could not be read.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The uploaded file could not be parsed as CSV.
    ///
    /// The message comes from the CSV parser and is shown to the client as is.
    #[error("{0}")]
    InvalidCSV(String),

    /// The uploaded CSV is missing one of the columns needed for classification.
    #[error("missing column {0}")]
    MissingColumn(&'static str),

    /// Reading or writing one of the data files failed.
    ///
    /// The error string should only be logged on the server.
    #[error("could not access data file: {0}")]
    Io(String),

    /// The history file could not be encoded or decoded as CSV.
    #[error("could not read or write history CSV: {0}")]
    HistoryCsv(String),

    /// Could not acquire the lock that serializes appends to the history file.
    #[error("could not acquire the history file lock")]
    HistoryLockError,
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        tracing::error!("an unhandled I/O error occurred: {value}");
        Error::Io(value.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        if value.is_io_error() {
            tracing::error!("an I/O error occurred while handling CSV: {value}");
            return Error::Io(value.to_string());
        }

        tracing::error!("an unhandled CSV error occurred: {value}");
        Error::HistoryCsv(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::HistoryLockError => InternalServerError {
                description: "The history file is busy",
                fix: "Another request is writing to the history file, please try again.",
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

/// The body of an error response from one of the JSON endpoints.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl Error {
    /// Whether the error was caused by the client's request rather than the server.
    fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::NoFileUploaded
                | Error::MultipartError(_)
                | Error::InvalidCSV(_)
                | Error::MissingColumn(_)
        )
    }

    /// Convert the error into a JSON response of the form `{"error": "..."}`.
    ///
    /// Client errors are returned with a 400 status code and their message.
    /// Server errors are logged and replaced with a generic message.
    fn into_json_response(self) -> Response {
        if self.is_client_error() {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: self.to_string(),
                }),
            )
                .into_response();
        }

        tracing::error!("An unexpected error occurred: {}", self);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: "An unexpected error occurred, check the server logs for more details."
                    .to_owned(),
            }),
        )
            .into_response()
    }
}
