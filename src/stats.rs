//! The JSON summary of the whole history.

use axum::{Json, extract::State, response::Response};

use crate::{Error, history::HistoryStore, summary::Summary};

/// Route handler for the aggregate summary of every stored record.
pub async fn get_stats(State(history): State<HistoryStore>) -> Result<Json<Summary>, Response> {
    history
        .summary()
        .map(Json)
        .map_err(Error::into_json_response)
}

#[cfg(test)]
mod get_stats_tests {
    use axum::{Json, extract::State};
    use tempfile::TempDir;

    use crate::{
        classifier::{FraudLabel, Transaction},
        history::{HistoryStore, LabeledRecord, Source},
        summary::Summary,
    };

    use super::get_stats;

    #[tokio::test]
    async fn empty_history_has_zero_counts() {
        let temp_dir = TempDir::new().unwrap();
        let store = HistoryStore::open(temp_dir.path().join("history.csv")).unwrap();

        let Json(summary) = get_stats(State(store)).await.unwrap();

        assert_eq!(summary, Summary::default());
    }

    #[tokio::test]
    async fn counts_every_appended_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = HistoryStore::open(temp_dir.path().join("history.csv")).unwrap();
        store
            .append(&[
                LabeledRecord::classify(
                    Transaction::from_raw("60000", "Electro", "credit"),
                    Source::Upload,
                ),
                LabeledRecord::classify(
                    Transaction::from_raw("50", "Grocery", "upi"),
                    Source::Manual,
                ),
            ])
            .unwrap();

        let Json(summary) = get_stats(State(store)).await.unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.fraud, 1);
        assert_eq!(summary.by_method.get("credit"), Some(&1));
        assert_eq!(summary.by_method.get("upi"), Some(&0));
        assert_eq!(
            summary.credit_chart.get(&FraudLabel::Fraud.to_string()),
            Some(&1)
        );
        assert_eq!(
            summary.upi_chart.get(&FraudLabel::Legitimate.to_string()),
            Some(&1)
        );
    }
}
