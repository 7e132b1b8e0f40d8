//! HTTP response wrapper.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{ApiError, Result, classify};

/// Fully buffered Mogotes API response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ApiResponse {
    /// Buffer a reqwest response. A body that cannot be read counts as a
    /// connection failure.
    pub(crate) async fn from_reqwest(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::connection(&e))?;

        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Create a response from parts.
    pub fn from_parts(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Check if the response was successful (2xx).
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Get the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a specific header value.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// Get the response body as bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec()).map_err(|e| ApiError::InvalidBody(e.to_string()))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| ApiError::InvalidBody(e.to_string()))
    }

    /// Parse the body as JSON, yielding `Null` for empty or non-JSON bodies.
    pub fn json_value(&self) -> Value {
        if self.body.is_empty() {
            return Value::Null;
        }
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    /// Classify the response, returning it unchanged on 2xx.
    ///
    /// `idempotency_key` is the key sent with the request, if any.
    pub fn into_result(self, idempotency_key: Option<&str>) -> Result<Self> {
        match classify(self.status, &self.headers, &self.json_value(), idempotency_key) {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    /// Classify the response and return the parsed JSON body on 2xx.
    pub fn into_json_value(self, idempotency_key: Option<&str>) -> Result<Value> {
        let body = self.json_value();
        match classify(self.status, &self.headers, &body, idempotency_key) {
            Some(err) => Err(err),
            None => Ok(body),
        }
    }
}
