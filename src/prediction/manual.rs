//! The manual entry endpoint.

use axum::{Json, extract::State, response::Response};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    Error,
    classifier::{FraudLabel, Transaction, parse_amount_lenient},
    history::{HistoryStore, LabeledRecord, Source},
};

/// A transaction typed in by hand on the home page.
///
/// Every field is optional. Missing text fields are empty and a missing
/// amount is zero.
#[derive(Debug, Default, Deserialize)]
pub struct ManualEntry {
    /// The amount, as a JSON number or a numeric string.
    #[serde(default, deserialize_with = "deserialize_amount_lenient")]
    pub amount: f64,
    /// The name of the merchant that was paid.
    #[serde(default)]
    pub merchant: Option<String>,
    /// The payment method, in any case.
    #[serde(default)]
    pub method: Option<String>,
}

impl From<ManualEntry> for Transaction {
    fn from(entry: ManualEntry) -> Self {
        Self {
            amount: entry.amount,
            merchant: entry.merchant.unwrap_or_default(),
            method: entry.method.unwrap_or_default().to_lowercase(),
        }
    }
}

/// Accept numbers, numeric strings and `null` for the amount.
///
/// Anything that is not a number, or parses as `NaN`, becomes zero.
fn deserialize_amount_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number
            .as_f64()
            .filter(|amount| !amount.is_nan())
            .unwrap_or(0.0),
        Some(Value::String(text)) => parse_amount_lenient(&text),
        _ => 0.0,
    };

    Ok(amount)
}

/// The label given to a manual entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualPrediction {
    /// The label given to the transaction.
    pub is_fraud: FraudLabel,
}

/// Route handler for classifying a single hand-entered transaction.
///
/// The method is lowercased before it is classified and stored, and the
/// record is appended to the history with the `manual` source.
pub async fn predict_manual(
    State(history): State<HistoryStore>,
    Json(entry): Json<ManualEntry>,
) -> Result<Json<ManualPrediction>, Response> {
    let record = LabeledRecord::classify(entry.into(), Source::Manual);

    history
        .append(std::slice::from_ref(&record))
        .map_err(Error::into_json_response)?;

    tracing::info!(
        "Classified manual entry for {:?} paid by {:?} as {}",
        record.merchant,
        record.method,
        record.is_fraud.name()
    );

    Ok(Json(ManualPrediction {
        is_fraud: record.is_fraud,
    }))
}
