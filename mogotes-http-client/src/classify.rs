//! Mapping of Mogotes API responses onto [`ApiError`].

use http::{HeaderMap, StatusCode, header};
use serde_json::Value;

use crate::{ApiError, CORRELATION_ID_HEADER};

/// Wait suggested for a 429 whose `Retry-After` is absent or not numeric.
pub const DEFAULT_RETRY_AFTER_SECONDS: u64 = 60;

const UNAUTHORIZED_MESSAGE: &str = "Unauthorized. Check your Mogotes API key.";
const CONFLICT_MESSAGE: &str = "The idempotency key was already used with a different payload.";
const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded. Try again later.";

/// Classify a response.
///
/// Returns `None` for 2xx. `body` is the parsed JSON body, or `Value::Null`
/// when the body was empty or not JSON. `idempotency_key` is the key that was
/// sent with the request, echoed back on conflicts.
pub fn classify(
    status: StatusCode,
    headers: &HeaderMap,
    body: &Value,
    idempotency_key: Option<&str>,
) -> Option<ApiError> {
    if status.is_success() {
        return None;
    }

    let error = match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized {
            message: error_message(body).unwrap_or_else(|| UNAUTHORIZED_MESSAGE.to_string()),
        },
        StatusCode::CONFLICT => ApiError::IdempotencyConflict {
            message: error_message(body).unwrap_or_else(|| CONFLICT_MESSAGE.to_string()),
            idempotency_key: idempotency_key.map(str::to_string),
            correlation_id: header_str(headers, CORRELATION_ID_HEADER).map(str::to_string),
        },
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited {
            message: error_message(body).unwrap_or_else(|| RATE_LIMITED_MESSAGE.to_string()),
            retry_after_seconds: retry_after_seconds(headers),
        },
        _ => ApiError::Generic {
            message: error_message(body)
                .unwrap_or_else(|| format!("Error {} from Mogotes", status.as_u16())),
            code: body
                .pointer("/error/code")
                .and_then(Value::as_str)
                .map(str::to_string),
            http_status: status.as_u16(),
        },
    };

    Some(error)
}

fn error_message(body: &Value) -> Option<String> {
    body.pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn retry_after_seconds(headers: &HeaderMap) -> u64 {
    header_str(headers, header::RETRY_AFTER.as_str())
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map(|secs| secs.max(1) as u64)
        .unwrap_or(DEFAULT_RETRY_AFTER_SECONDS)
}
