//! The API endpoints URIs.

/// The landing page with the upload and manual entry forms.
pub const ROOT: &str = "/";
/// The information page about UPI fraud.
pub const UPI_VIEW: &str = "/upi";
/// The information page about credit card fraud.
pub const CREDIT_VIEW: &str = "/credit";
/// The page showing the aggregate summary and the most recent records.
pub const HISTORY_VIEW: &str = "/history";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route for the aggregate statistics as JSON.
pub const STATS_API: &str = "/stats";
/// The route to upload a CSV file of transactions for classification.
pub const UPLOAD_API: &str = "/upload";
/// The route to classify a single transaction sent as JSON.
pub const PREDICT_MANUAL_API: &str = "/predict_manual";
/// The route to download an example CSV file for uploading.
pub const DOWNLOAD_SAMPLE: &str = "/download-sample";

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::UPI_VIEW);
        assert_endpoint_is_valid_uri(endpoints::CREDIT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::HISTORY_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);

        assert_endpoint_is_valid_uri(endpoints::STATS_API);
        assert_endpoint_is_valid_uri(endpoints::UPLOAD_API);
        assert_endpoint_is_valid_uri(endpoints::PREDICT_MANUAL_API);
        assert_endpoint_is_valid_uri(endpoints::DOWNLOAD_SAMPLE);
    }
}
