//! Request builder.

use crate::{API_KEY_HEADER, ApiError, ApiResponse, ConfigurationError, MogotesClient, Result};
use http::{HeaderMap, HeaderName, HeaderValue, Method, header};
use serde::Serialize;
use tracing::{debug, warn};

/// Authenticated request against the Mogotes API.
///
/// Created by [`MogotesClient::build_request`]; every instance is independent.
pub struct ApiRequest<'a> {
    client: &'a MogotesClient,
    method: Method,
    path: String,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    body_error: Option<String>,
}

impl std::fmt::Debug for ApiRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl<'a> ApiRequest<'a> {
    /// Assemble the base headers.
    ///
    /// Order matters: default headers may replace `Accept`, but the API key
    /// and user agent are inserted last and always win.
    pub(crate) fn new(
        client: &'a MogotesClient,
        method: Method,
        path: String,
        api_key: &str,
    ) -> Result<Self> {
        let config = client.config();
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        for (name, value) in &config.default_headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "Skipping invalid default header"),
            }
        }

        let mut key_value =
            HeaderValue::try_from(api_key).map_err(|_| ConfigurationError::InvalidApiKey)?;
        key_value.set_sensitive(true);
        headers.insert(HeaderName::from_static("x-mogotes-api-key"), key_value);

        match HeaderValue::try_from(config.user_agent.as_str()) {
            Ok(value) => {
                headers.insert(header::USER_AGENT, value);
            }
            Err(_) => warn!("Configured user agent is not a valid header value"),
        }

        Ok(Self {
            client,
            method,
            path,
            headers,
            query: Vec::new(),
            body: None,
            body_error: None,
        })
    }

    /// Add a header to the request.
    ///
    /// The API key header cannot be replaced this way.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        if name.eq_ignore_ascii_case(API_KEY_HEADER) {
            return self;
        }
        match (
            HeaderName::try_from(name),
            HeaderValue::try_from(value.as_ref()),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => warn!(header = %name, "Skipping invalid request header"),
        }
        self
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add multiple query parameters.
    pub fn queries<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in params {
            self.query.push((k.into(), v.into()));
        }
        self
    }

    /// Set the request body as JSON.
    ///
    /// Encoding failures surface from [`build`](Self::build) or [`send`](Self::send).
    pub fn json<T: Serialize + ?Sized>(mut self, json: &T) -> Self {
        match serde_json::to_vec(json) {
            Ok(bytes) => {
                self.headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                self.body = Some(bytes);
            }
            Err(e) => self.body_error = Some(e.to_string()),
        }
        self
    }

    /// Method of this request.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Headers that will be sent.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Build the transport request without sending it.
    pub fn build(self) -> Result<reqwest::Request> {
        if let Some(e) = self.body_error {
            return Err(ApiError::InvalidBody(e));
        }

        let mut url = self.client.url_for(&self.path)?;
        if !self.query.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                query_pairs.append_pair(key, value);
            }
        }

        let mut request = reqwest::Request::new(self.method, url);
        *request.headers_mut() = self.headers;
        if let Some(body) = self.body {
            *request.body_mut() = Some(body.into());
        }
        Ok(request)
    }

    /// Send the request. Exactly one network call is made.
    pub async fn send(self) -> Result<ApiResponse> {
        let client = self.client;
        let request = self.build()?;
        debug!(method = %request.method(), path = request.url().path(), "Sending Mogotes request");
        client.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;

    const KEY: &str = "mk_secret_value_123";

    fn client() -> MogotesClient {
        let config = ClientConfig::builder()
            .base_url("https://api.mogotes.test")
            .api_key(KEY)
            .user_agent("acme-app/2.0")
            .default_header("X-Tenant", "acme")
            .default_header("X-Mogotes-Api-Key", "spoofed")
            .default_header("User-Agent", "spoofed")
            .build();
        MogotesClient::new(config).unwrap()
    }

    #[test]
    fn test_required_headers() {
        let client = client();
        let request = client.get("/v1/logs").unwrap().build().unwrap();

        let headers = request.headers();
        assert_eq!(headers["x-mogotes-api-key"], KEY);
        assert_eq!(headers["user-agent"], "acme-app/2.0");
        assert_eq!(headers["accept"], "application/json");
        assert_eq!(headers["x-tenant"], "acme");
        assert_eq!(request.url().as_str(), "https://api.mogotes.test/v1/logs");
    }

    #[test]
    fn test_api_key_never_in_url() {
        let client = client();
        let paths = [
            "/v1/feature-flags",
            "/v1/logs",
            "/v1/notifications",
        ];

        for path in paths {
            let request = client
                .get(path)
                .unwrap()
                .query("scope_id", "user_1")
                .build()
                .unwrap();
            assert!(!request.url().as_str().contains(KEY));
        }

        let request = client
            .post("/v1/notifications")
            .unwrap()
            .json(&serde_json::json!({"to": "a@b.c"}))
            .build()
            .unwrap();
        assert!(!request.url().as_str().contains(KEY));
    }

    #[test]
    fn test_api_key_header_cannot_be_overridden() {
        let client = client();
        let request = client
            .get("/v1/logs")
            .unwrap()
            .header("x-mogotes-api-key", "other")
            .build()
            .unwrap();
        assert_eq!(request.headers()["x-mogotes-api-key"], KEY);
    }

    #[test]
    fn test_invalid_request_header_is_skipped() {
        let client = client();
        let request = client
            .get("/v1/logs")
            .unwrap()
            .header("bad header", "x")
            .header("x-trace", "line\nbreak")
            .header("x-request-id", "req-1")
            .build()
            .unwrap();

        let headers = request.headers();
        assert!(headers.get("x-trace").is_none());
        assert_eq!(headers["x-request-id"], "req-1");
        assert_eq!(headers["x-mogotes-api-key"], KEY);
    }

    #[test]
    fn test_query_encoding() {
        let client = client();
        let request = client
            .get("/v1/feature-flags")
            .unwrap()
            .query("scope_id", "user@example.com/1")
            .build()
            .unwrap();
        assert_eq!(
            request.url().query(),
            Some("scope_id=user%40example.com%2F1")
        );
    }

    #[test]
    fn test_json_body() {
        let client = client();
        let request = client
            .post("/v1/logs")
            .unwrap()
            .json(&serde_json::json!({"level": "info"}))
            .build()
            .unwrap();

        assert_eq!(request.headers()["content-type"], "application/json");
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, br#"{"level":"info"}"#);
    }

    #[test]
    fn test_invalid_api_key_characters() {
        let config = ClientConfig::builder()
            .base_url("https://api.mogotes.test")
            .api_key("bad\nkey")
            .build();
        let client = MogotesClient::new(config).unwrap();
        assert_eq!(
            client.get("/v1/logs").unwrap_err(),
            ApiError::Misconfigured(ConfigurationError::InvalidApiKey)
        );
    }
}
