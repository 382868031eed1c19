//! Assertions for the backend's JSON error contract
//! (`{message, code, status, trace_id}` plus an `x-trace-id` header),
//! written without depending on backend types.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ErrorBodyLike {
    pub message: String,
    pub code: String,
    pub status: u16,
    pub trace_id: String,
}

/// Check status, code, message and trace id parity on raw response parts.
pub fn assert_error_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    expected_status: StatusCode,
    expected_code: &str,
    expected_message: &str,
) -> ErrorBodyLike {
    assert_eq!(status, expected_status, "unexpected status");

    let parsed: ErrorBodyLike = serde_json::from_slice(body).unwrap_or_else(|e| {
        panic!(
            "error body is not valid JSON ({e}): {}",
            String::from_utf8_lossy(body)
        )
    });

    let header = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8");
    assert_eq!(
        parsed.trace_id, header,
        "trace_id in body should match x-trace-id header"
    );

    assert_eq!(parsed.status, expected_status.as_u16());
    assert_eq!(parsed.code, expected_code);
    assert_eq!(parsed.message, expected_message);
    parsed
}

/// Same as [`assert_error_parts`], reading the body of a `ServiceResponse`.
pub async fn assert_error_response<B>(
    resp: ServiceResponse<B>,
    expected_status: StatusCode,
    expected_code: &str,
    expected_message: &str,
) -> ErrorBodyLike
where
    B: actix_web::body::MessageBody + 'static,
{
    let resp: ServiceResponse<BoxBody> = resp.map_into_boxed_body();
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;

    assert_error_parts(
        status,
        &headers,
        &body,
        expected_status,
        expected_code,
        expected_message,
    )
}
