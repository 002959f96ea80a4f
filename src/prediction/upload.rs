//! The CSV upload endpoint.

use axum::{
    Json,
    extract::{Multipart, State, multipart::Field},
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    classifier::FraudLabel,
    history::{HistoryStore, LabeledRecord, Source},
    summary::{LabelDistribution, fraud_count, label_distribution},
};

use super::csv::parse_transactions_csv;

/// The number of predictions sent back to the client for an upload.
///
/// Every row of the upload is still classified and stored.
pub const PREVIEW_ROW_LIMIT: usize = 50;

/// The name of the multipart field holding the uploaded file.
const FILE_FIELD: &str = "file";

/// A single prediction in the upload response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    /// The amount, after lenient parsing.
    pub amount: f64,
    /// The merchant, as uploaded.
    pub merchant: String,
    /// The payment method, as uploaded.
    pub method: String,
    /// The label given to the transaction.
    pub is_fraud: FraudLabel,
}

impl From<&LabeledRecord> for PredictionRow {
    fn from(record: &LabeledRecord) -> Self {
        Self {
            amount: record.amount,
            merchant: record.merchant.clone(),
            method: record.method.clone(),
            is_fraud: record.is_fraud,
        }
    }
}

/// The response to a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// The label distribution of every row in the upload.
    pub chart: LabelDistribution,
    /// The number of rows labeled as fraud.
    pub fraud_count: u64,
    /// The first [PREVIEW_ROW_LIMIT] predictions, in file order.
    pub rows: Vec<PredictionRow>,
}

/// Route handler for classifying an uploaded CSV file of transactions.
///
/// Every row is labeled and appended to the history with the `upload` source.
/// Client errors are returned as `400 {"error": ...}`.
pub async fn upload_transactions(
    State(history): State<HistoryStore>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, Response> {
    let start_time = std::time::Instant::now();

    let text = read_uploaded_file(&mut multipart)
        .await
        .inspect_err(|error| tracing::debug!("Rejected upload: {error}"))
        .map_err(Error::into_json_response)?;

    let records: Vec<LabeledRecord> = parse_transactions_csv(&text)
        .inspect_err(|error| tracing::debug!("Could not parse uploaded CSV: {error}"))
        .map_err(Error::into_json_response)?
        .into_iter()
        .map(|transaction| LabeledRecord::classify(transaction, Source::Upload))
        .collect();

    history.append(&records).map_err(Error::into_json_response)?;

    let chart = label_distribution(records.iter().map(|record| record.is_fraud));
    let fraud_count = fraud_count(&chart);
    let rows = records
        .iter()
        .take(PREVIEW_ROW_LIMIT)
        .map(PredictionRow::from)
        .collect();

    tracing::info!(
        "Classified {} uploaded transactions ({fraud_count} fraud) in {}ms",
        records.len(),
        start_time.elapsed().as_millis()
    );

    Ok(Json(UploadResponse {
        chart,
        fraud_count,
        rows,
    }))
}

/// Find the [FILE_FIELD] part of the form and read it as text.
///
/// Parts without a file name are skipped, so a plain text `file` field does
/// not count as an upload.
async fn read_uploaded_file(multipart: &mut Multipart) -> Result<String, Error> {
    while let Some(field) = multipart.next_field().await.map_err(|error| {
        tracing::error!("Could not read multipart form field: {error}");
        Error::MultipartError(error.body_text())
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        match field.file_name() {
            None => continue,
            Some("") => return Err(Error::NoFileUploaded),
            Some(_) => return read_field_text(field).await,
        }
    }

    Err(Error::NoFileUploaded)
}

async fn read_field_text(field: Field<'_>) -> Result<String, Error> {
    let data = field.bytes().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError(error.body_text())
    })?;

    String::from_utf8(data.to_vec())
        .map_err(|error| Error::InvalidCSV(format!("file is not valid UTF-8: {error}")))
}

#[cfg(test)]
mod upload_transactions_tests {
    use axum::{
        extract::{FromRequest, Multipart, State},
        http::StatusCode,
        response::Response,
    };
    use serde_json::Value;
    use tempfile::TempDir;

    use crate::{
        classifier::FraudLabel,
        history::{HistoryStore, Source},
        test_utils::{multipart_request, multipart_request_without_file},
    };

    use super::{PREVIEW_ROW_LIMIT, upload_transactions};

    fn get_test_store() -> (TempDir, HistoryStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = HistoryStore::open(temp_dir.path().join("history.csv")).unwrap();

        (temp_dir, store)
    }

    async fn must_make_multipart(csv: &str) -> Multipart {
        Multipart::from_request(multipart_request(csv), &{})
            .await
            .unwrap()
    }

    async fn error_message(response: Response) -> (StatusCode, String) {
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();

        (status, body["error"].as_str().unwrap_or_default().to_owned())
    }

    #[tokio::test]
    async fn classifies_and_stores_every_row() {
        let (_temp_dir, store) = get_test_store();
        let multipart =
            must_make_multipart("amount,merchant,method\n1200,Alpha,credit\n50,Grocery,upi\n60000,Electro,credit")
                .await;

        let response = upload_transactions(State(store.clone()), multipart)
            .await
            .unwrap()
            .0;

        assert_eq!(response.fraud_count, 1);
        assert_eq!(response.chart.get("0"), Some(&2));
        assert_eq!(response.chart.get("1"), Some(&1));
        let labels: Vec<_> = response.rows.iter().map(|row| row.is_fraud).collect();
        assert_eq!(
            labels,
            vec![
                FraudLabel::Legitimate,
                FraudLabel::Legitimate,
                FraudLabel::Fraud
            ]
        );

        let stored = store.read_all().unwrap();
        assert_eq!(stored.len(), 3);
        assert!(stored.iter().all(|record| record.source == Source::Upload));
        assert_eq!(stored[2].merchant, "Electro");
    }

    #[tokio::test]
    async fn only_previews_first_rows() {
        let (_temp_dir, store) = get_test_store();
        let mut csv = "amount,merchant,method".to_owned();
        for i in 0..(PREVIEW_ROW_LIMIT + 10) {
            csv.push_str(&format!("\n{i},Shop {i},upi"));
        }
        let multipart = must_make_multipart(&csv).await;

        let response = upload_transactions(State(store.clone()), multipart)
            .await
            .unwrap()
            .0;

        assert_eq!(response.rows.len(), PREVIEW_ROW_LIMIT);
        assert_eq!(response.rows[0].merchant, "Shop 0");
        assert_eq!(response.chart.get("0"), Some(&(PREVIEW_ROW_LIMIT as u64 + 10)));
        assert_eq!(store.read_all().unwrap().len(), PREVIEW_ROW_LIMIT + 10);
    }

    #[tokio::test]
    async fn method_is_stored_as_uploaded() {
        let (_temp_dir, store) = get_test_store();
        let multipart = must_make_multipart("amount,merchant,method\n60000,Electro,CREDIT").await;

        let response = upload_transactions(State(store.clone()), multipart)
            .await
            .unwrap()
            .0;

        assert_eq!(response.rows[0].method, "CREDIT");
        assert_eq!(response.rows[0].is_fraud, FraudLabel::Fraud);
        assert_eq!(store.read_all().unwrap()[0].method, "CREDIT");
    }

    #[tokio::test]
    async fn missing_file_is_rejected() {
        let (_temp_dir, store) = get_test_store();
        let multipart = Multipart::from_request(multipart_request_without_file(), &{})
            .await
            .unwrap();

        let response = upload_transactions(State(store.clone()), multipart)
            .await
            .unwrap_err();

        assert_eq!(
            error_message(response).await,
            (StatusCode::BAD_REQUEST, "no file uploaded".to_owned())
        );
        assert!(store.read_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_column_is_rejected() {
        let (_temp_dir, store) = get_test_store();
        let multipart = must_make_multipart("amount,method\n10,upi").await;

        let response = upload_transactions(State(store.clone()), multipart)
            .await
            .unwrap_err();

        assert_eq!(
            error_message(response).await,
            (StatusCode::BAD_REQUEST, "missing column merchant".to_owned())
        );
        assert!(store.read_all().unwrap().is_empty());
    }
}
