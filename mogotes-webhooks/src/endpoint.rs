//! Framework-neutral inbound webhook endpoint
//!
//! Hosts route requests for the configured path here and write the returned
//! response back as-is.

use bytes::Bytes;
use http::{HeaderValue, Method, Request, Response, StatusCode, header};
use serde_json::json;

use crate::{Result, WebhookConfig, WebhookHandler, WebhookReceiver};
use crate::config::DEFAULT_WEBHOOK_PATH;

/// Message returned to Mogotes on success
pub const SUCCESS_MESSAGE: &str = "Webhook recibido correctamente";

/// `POST <path>` endpoint backed by a [`WebhookReceiver`]
#[derive(Debug, Clone)]
pub struct WebhookEndpoint {
    path: String,
    receiver: WebhookReceiver,
}

impl WebhookEndpoint {
    /// Create an endpoint on the default path
    pub fn new(receiver: WebhookReceiver) -> Self {
        Self {
            path: DEFAULT_WEBHOOK_PATH.to_string(),
            receiver,
        }
    }

    /// Build the endpoint from configuration.
    ///
    /// Returns `Ok(None)` when `register_route` is off.
    pub fn from_config(config: &WebhookConfig) -> Result<Option<Self>> {
        if !config.register_route {
            return Ok(None);
        }
        let receiver = WebhookReceiver::from_config(config)?;
        Ok(Some(Self::new(receiver).with_path(&config.path)))
    }

    /// Set the path. A missing leading `/` is added.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        self
    }

    /// Path this endpoint answers on
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Underlying receiver
    pub fn receiver(&self) -> &WebhookReceiver {
        &self.receiver
    }

    /// Register a handler on the underlying receiver
    pub fn on<H>(&mut self, handler: H) -> &mut Self
    where
        H: WebhookHandler + 'static,
    {
        self.receiver.on(handler);
        self
    }

    /// Handle a request using the system clock
    pub fn handle(&self, request: Request<Bytes>) -> Response<Bytes> {
        self.handle_at(request, chrono::Utc::now().timestamp())
    }

    /// Handle a request using an explicit clock reading
    pub fn handle_at(&self, request: Request<Bytes>, now: i64) -> Response<Bytes> {
        if request.uri().path() != self.path {
            return json_response(
                StatusCode::NOT_FOUND,
                json!({"error": {"code": "not_found", "message": "Not found"}}),
            );
        }
        if request.method() != Method::POST {
            let mut response = json_response(
                StatusCode::METHOD_NOT_ALLOWED,
                json!({"error": {"code": "method_not_allowed", "message": "Method not allowed"}}),
            );
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST"));
            return response;
        }

        let (parts, body) = request.into_parts();
        match self.receiver.receive_at(&parts.headers, body, now) {
            Ok(_) => json_response(
                StatusCode::OK,
                json!({"status": "success", "message": SUCCESS_MESSAGE}),
            ),
            Err(err) => json_response(
                err.status(),
                json!({"error": {"code": err.code(), "message": err.to_string()}}),
            ),
        }
    }
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response<Bytes> {
    let mut response = Response::new(Bytes::from(body.to_string()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WebhookEvent;
    use crate::signature::sign;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    const NOW: i64 = 1_700_000_000;

    fn request(method: Method, path: &str, ts: i64, body: &'static str, secret: &str) -> Request<Bytes> {
        Request::builder()
            .method(method)
            .uri(path)
            .header("Mogotes-Signature", sign(ts, body.as_bytes(), secret))
            .header("Mogotes-Timestamp", ts.to_string())
            .body(Bytes::from_static(body.as_bytes()))
            .unwrap()
    }

    fn body_json(response: &Response<Bytes>) -> Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    #[test]
    fn test_accepts_signed_webhook() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut endpoint = WebhookEndpoint::new(WebhookReceiver::new("s"));
        endpoint.on(move |event: &WebhookEvent| {
            sink.lock().unwrap().push(event.event_type().map(str::to_string));
        });

        let response = endpoint.handle_at(
            request(Method::POST, "/mogotes/webhook", NOW, r#"{"event":"x"}"#, "s"),
            NOW,
        );

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(
            body_json(&response),
            json!({"status": "success", "message": "Webhook recibido correctamente"})
        );
        assert_eq!(*seen.lock().unwrap(), vec![Some("x".to_string())]);
    }

    #[test]
    fn test_stale_webhook_forbidden() {
        let endpoint = WebhookEndpoint::new(WebhookReceiver::new("s").with_max_age(300));
        let response = endpoint.handle_at(
            request(Method::POST, "/mogotes/webhook", NOW - 600, r#"{"event":"x"}"#, "s"),
            NOW,
        );

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(&response);
        assert_eq!(body["error"]["code"], "invalid_signature");
        assert!(body["error"]["message"].as_str().unwrap().contains("300"));
    }

    #[test]
    fn test_wrong_secret_forbidden() {
        let endpoint = WebhookEndpoint::new(WebhookReceiver::new("s"));
        let response = endpoint.handle_at(
            request(Method::POST, "/mogotes/webhook", NOW, r#"{"event":"x"}"#, "other"),
            NOW,
        );
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_missing_headers_forbidden() {
        let endpoint = WebhookEndpoint::new(WebhookReceiver::new("s"));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/mogotes/webhook")
            .body(Bytes::from_static(b"{}"))
            .unwrap();

        let response = endpoint.handle_at(request, NOW);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(&response)["error"]["code"], "invalid_signature");
    }

    #[test]
    fn test_invalid_payload_bad_request() {
        let endpoint = WebhookEndpoint::new(WebhookReceiver::new("s"));
        let response =
            endpoint.handle_at(request(Method::POST, "/mogotes/webhook", NOW, "[1]", "s"), NOW);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(&response)["error"]["code"], "invalid_payload");
    }

    #[test]
    fn test_routing() {
        let endpoint = WebhookEndpoint::new(WebhookReceiver::new("s")).with_path("/hooks");

        let response = endpoint.handle_at(request(Method::POST, "/mogotes/webhook", NOW, "{}", "s"), NOW);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = endpoint.handle_at(request(Method::GET, "/hooks", NOW, "{}", "s"), NOW);
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["allow"], "POST");

        let response = endpoint.handle_at(request(Method::POST, "/hooks?x=1", NOW, "{}", "s"), NOW);
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_from_config() {
        let disabled = WebhookConfig::builder()
            .register_route(false)
            .secret("s")
            .build();
        assert!(WebhookEndpoint::from_config(&disabled).unwrap().is_none());

        let missing_secret = WebhookConfig::default();
        assert!(WebhookEndpoint::from_config(&missing_secret).is_err());

        let config = WebhookConfig::builder()
            .path("/custom")
            .secret("s")
            .max_age_seconds(10)
            .build();
        let endpoint = WebhookEndpoint::from_config(&config).unwrap().unwrap();
        assert_eq!(endpoint.path(), "/custom");
        assert_eq!(endpoint.receiver().window().max_age_seconds(), 10);
    }

    #[test]
    fn test_path_without_leading_slash() {
        let config = WebhookConfig::builder()
            .path("mogotes/hooks")
            .secret("s")
            .build();
        let endpoint = WebhookEndpoint::from_config(&config).unwrap().unwrap();
        assert_eq!(endpoint.path(), "/mogotes/hooks");

        let response =
            endpoint.handle_at(request(Method::POST, "/mogotes/hooks", NOW, "{}", "s"), NOW);
        assert_eq!(response.status(), StatusCode::OK);
    }
}
