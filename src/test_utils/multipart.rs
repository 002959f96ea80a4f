use axum::{body::Body, http::Request};

use crate::endpoints;

const BOUNDARY: &str = "MY_BOUNDARY123456789";

fn build_request(parts: &[String]) -> Request<Body> {
    let mut lines: Vec<String> = Vec::new();

    for part in parts {
        lines.push(format!("--{BOUNDARY}"));
        lines.push(part.clone());
    }

    lines.push(format!("--{BOUNDARY}--"));

    let data = lines.join("\r\n").into_bytes();

    Request::builder()
        .method("POST")
        .uri(endpoints::UPLOAD_API)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(data.into())
        .unwrap()
}

/// A multipart upload request with `csv` in the `file` field.
pub(crate) fn multipart_request(csv: &str) -> Request<Body> {
    let part = [
        "Content-Disposition: form-data; name=\"file\"; filename=\"transactions.csv\"",
        "Content-Type: text/csv",
        "",
        csv,
    ]
    .join("\r\n");

    build_request(&[part])
}

/// A multipart request that only has a plain text field.
pub(crate) fn multipart_request_without_file() -> Request<Body> {
    let part = [
        "Content-Disposition: form-data; name=\"note\"",
        "",
        "no file here",
    ]
    .join("\r\n");

    build_request(&[part])
}
