//! Application router configuration.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::{
    AppState, endpoints,
    error_pages::{get_404_not_found, get_internal_server_error_page},
    history_page::get_history_page,
    home::get_home_page,
    method_page::{get_credit_page, get_upi_page},
    prediction::{predict_manual, upload_transactions},
    sample::download_sample,
    stats::get_stats,
};

/// The largest CSV upload accepted, in bytes.
const UPLOAD_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_home_page))
        .route(endpoints::UPI_VIEW, get(get_upi_page))
        .route(endpoints::CREDIT_VIEW, get(get_credit_page))
        .route(endpoints::HISTORY_VIEW, get(get_history_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .route(endpoints::STATS_API, get(get_stats))
        .route(
            endpoints::UPLOAD_API,
            post(upload_transactions).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(endpoints::PREDICT_MANUAL_API, post(predict_manual))
        .route(endpoints::DOWNLOAD_SAMPLE, get(download_sample))
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use axum_test::{
        TestServer,
        multipart::{MultipartForm, Part},
    };
    use serde_json::{Value, json};
    use tempfile::TempDir;

    use crate::{
        AppState, build_router,
        classifier::FraudLabel,
        endpoints,
        prediction::{ManualPrediction, UploadResponse},
        summary::Summary,
    };

    fn get_test_server() -> (TempDir, TestServer) {
        let temp_dir = TempDir::new().unwrap();
        let state = AppState::new(temp_dir.path()).expect("Could not create app state");
        let app = build_router(state);
        let server = TestServer::try_new(app).expect("Could not create test server.");

        (temp_dir, server)
    }

    fn csv_form(csv: &str) -> MultipartForm {
        let part = Part::bytes(csv.as_bytes().to_vec())
            .file_name("transactions.csv")
            .mime_type("text/csv");

        MultipartForm::new().add_part("file", part)
    }

    #[tokio::test]
    async fn pages_render() {
        let (_temp_dir, server) = get_test_server();

        for endpoint in [
            endpoints::ROOT,
            endpoints::UPI_VIEW,
            endpoints::CREDIT_VIEW,
            endpoints::HISTORY_VIEW,
        ] {
            let response = server.get(endpoint).await;

            response.assert_status_ok();
            assert_eq!(
                response.header("content-type"),
                "text/html; charset=utf-8",
                "for {endpoint}"
            );
        }
    }

    #[tokio::test]
    async fn unknown_path_is_not_found_page() {
        let (_temp_dir, server) = get_test_server();

        let response = server.get("/does-not-exist").await;

        response.assert_status_not_found();
        assert!(response.text().contains("404"));
    }

    #[tokio::test]
    async fn stats_on_empty_store_are_zero() {
        let (_temp_dir, server) = get_test_server();

        let response = server.get(endpoints::STATS_API).await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "total": 0,
            "fraud": 0,
            "by_method": {},
            "method_counts": {},
            "credit_chart": {},
            "upi_chart": {},
        }));
    }

    #[tokio::test]
    async fn manual_predictions_are_counted_in_stats() {
        let (_temp_dir, server) = get_test_server();
        let entries = [
            (json!({"amount": 60000, "merchant": "Electro", "method": "credit"}), FraudLabel::Fraud),
            (json!({"amount": 50, "merchant": "Grocery", "method": "upi"}), FraudLabel::Legitimate),
            (json!({"amount": 21000, "merchant": "Shop", "method": "upi"}), FraudLabel::Fraud),
            (json!({"amount": 10, "merchant": "Totally Fake Store", "method": "upi"}), FraudLabel::Fraud),
        ];

        for (entry, want) in &entries {
            let response = server.post(endpoints::PREDICT_MANUAL_API).json(entry).await;

            response.assert_status_ok();
            assert_eq!(response.json::<ManualPrediction>().is_fraud, *want, "for {entry}");
        }

        let stats = server.get(endpoints::STATS_API).await.json::<Summary>();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.fraud, 3);
        assert_eq!(stats.by_method.get("upi"), Some(&2));
        assert_eq!(stats.method_counts.get("upi"), Some(&3));
        assert_eq!(stats.upi_chart.get("1"), Some(&2));
        assert_eq!(stats.credit_chart.get("1"), Some(&1));
    }

    #[tokio::test]
    async fn manual_prediction_responds_with_integer_flag() {
        let (_temp_dir, server) = get_test_server();

        let response = server
            .post(endpoints::PREDICT_MANUAL_API)
            .json(&json!({"amount": "60000", "merchant": "Electro", "method": "CREDIT"}))
            .await;

        response.assert_json(&json!({"is_fraud": 1}));
    }

    #[tokio::test]
    async fn upload_then_stats_grow_by_row_count() {
        let (_temp_dir, server) = get_test_server();
        let csv = "amount,merchant,method\n1200,Alpha,credit\n50,Grocery,upi\n60000,Electro,credit\n";

        let response = server
            .post(endpoints::UPLOAD_API)
            .multipart(csv_form(csv))
            .await;

        response.assert_status_ok();
        let body = response.json::<UploadResponse>();
        assert_eq!(body.fraud_count, 1);
        assert_eq!(body.rows.len(), 3);

        server
            .post(endpoints::UPLOAD_API)
            .multipart(csv_form(csv))
            .await
            .assert_status_ok();

        let stats = server.get(endpoints::STATS_API).await.json::<Summary>();
        assert_eq!(stats.total, 6);
        assert_eq!(stats.fraud, 2);
    }

    #[tokio::test]
    async fn upload_without_required_column_is_bad_request() {
        let (_temp_dir, server) = get_test_server();

        let response = server
            .post(endpoints::UPLOAD_API)
            .multipart(csv_form("merchant,method\nAlpha,credit\n"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["error"],
            "missing column amount"
        );
    }

    #[tokio::test]
    async fn upload_without_file_is_bad_request() {
        let (_temp_dir, server) = get_test_server();

        let response = server
            .post(endpoints::UPLOAD_API)
            .multipart(MultipartForm::new().add_text("note", "no file"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({"error": "no file uploaded"}));
    }

    #[tokio::test]
    async fn sample_download_is_an_attachment() {
        let (temp_dir, server) = get_test_server();

        let response = server.get(endpoints::DOWNLOAD_SAMPLE).await;

        response.assert_status_ok();
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=\"sample_transactions.csv\""
        );
        assert!(response.text().starts_with("amount,merchant,method\n"));
        assert!(temp_dir.path().join("sample_transactions.csv").is_file());
    }
}
