//! Prediction endpoints
//!
//! Classifies uploaded CSV files and manual entries, records every labeled
//! transaction in the history store and returns the predictions as JSON.

mod csv;
mod manual;
mod upload;

pub use manual::{ManualPrediction, predict_manual};
pub use upload::{UploadResponse, upload_transactions};
