//! Webhook receiver for handling incoming Mogotes webhooks

use bytes::Bytes;
use http::HeaderMap;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::signature::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::{ReplayWindow, Result, WebhookConfig, WebhookError, WebhookEvent, WebhookSignature};

/// Observer notified of every verified webhook.
///
/// Any `Fn(&WebhookEvent)` closure is a handler.
pub trait WebhookHandler: Send + Sync {
    /// Handle a verified event
    fn handle(&self, event: &WebhookEvent);
}

impl<F> WebhookHandler for F
where
    F: Fn(&WebhookEvent) + Send + Sync,
{
    fn handle(&self, event: &WebhookEvent) {
        self(event)
    }
}

/// Inbound webhook with its verification headers extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedWebhookRequest {
    /// Body exactly as received
    pub raw_body: Bytes,
    /// Value of `Mogotes-Signature`
    pub signature: String,
    /// Value of `Mogotes-Timestamp`
    pub timestamp: i64,
}

impl SignedWebhookRequest {
    /// Extract the signature headers.
    ///
    /// The signature header is checked before the timestamp header.
    pub fn from_headers(headers: &HeaderMap, raw_body: impl Into<Bytes>) -> Result<Self> {
        // A present but non-ASCII signature is kept and fails verification
        let signature = headers
            .get(SIGNATURE_HEADER)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .ok_or(WebhookError::MissingSignature)?;

        let timestamp = headers
            .get(TIMESTAMP_HEADER)
            .ok_or(WebhookError::MissingTimestamp)?;
        let timestamp = timestamp
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .ok_or_else(|| {
                WebhookError::MalformedTimestamp(
                    String::from_utf8_lossy(timestamp.as_bytes()).into_owned(),
                )
            })?;

        Ok(Self {
            raw_body: raw_body.into(),
            signature,
            timestamp,
        })
    }
}

/// Receiver for incoming Mogotes webhooks.
///
/// Each delivery passes the gates in order: headers present, timestamp
/// within the replay window, signature matches. Only then is the body
/// decoded and every handler invoked in registration order. Duplicate
/// deliveries are verified and emitted again.
#[derive(Clone)]
pub struct WebhookReceiver {
    signature: WebhookSignature,
    window: ReplayWindow,
    handlers: Vec<Arc<dyn WebhookHandler>>,
}

impl WebhookReceiver {
    /// Create a new receiver with the given secret and the default window
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            signature: WebhookSignature::new(secret),
            window: ReplayWindow::default(),
            handlers: Vec::new(),
        }
    }

    /// Create a receiver from configuration. Fails without a secret.
    pub fn from_config(config: &WebhookConfig) -> Result<Self> {
        let secret = config
            .secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(WebhookError::SecretNotConfigured)?;

        Ok(Self::new(secret).with_max_age(config.max_age_seconds))
    }

    /// Set the replay window in seconds
    pub fn with_max_age(mut self, seconds: u64) -> Self {
        self.window = ReplayWindow::new(seconds);
        self
    }

    /// Replay window in effect
    pub fn window(&self) -> ReplayWindow {
        self.window
    }

    /// Register a handler
    pub fn on<H>(&mut self, handler: H) -> &mut Self
    where
        H: WebhookHandler + 'static,
    {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Register a handler, builder style
    pub fn with_handler<H>(mut self, handler: H) -> Self
    where
        H: WebhookHandler + 'static,
    {
        self.on(handler);
        self
    }

    /// Number of registered handlers
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Verify a request against an explicit clock reading.
    ///
    /// Pure: no handlers are invoked.
    pub fn verify_at(&self, request: &SignedWebhookRequest, now: i64) -> Result<WebhookEvent> {
        self.window.check(request.timestamp, now)?;

        if !self
            .signature
            .verify(&request.raw_body, &request.signature, request.timestamp)
        {
            return Err(WebhookError::SignatureMismatch);
        }

        let payload = decode_payload(&request.raw_body)?;
        Ok(WebhookEvent::new(
            payload,
            request.signature.clone(),
            request.timestamp,
        ))
    }

    /// Verify a request and notify handlers, using the system clock
    pub fn receive(&self, headers: &HeaderMap, raw_body: impl Into<Bytes>) -> Result<WebhookEvent> {
        self.receive_at(headers, raw_body, chrono::Utc::now().timestamp())
    }

    /// Verify a request and notify handlers, using an explicit clock reading
    pub fn receive_at(
        &self,
        headers: &HeaderMap,
        raw_body: impl Into<Bytes>,
        now: i64,
    ) -> Result<WebhookEvent> {
        let result = SignedWebhookRequest::from_headers(headers, raw_body)
            .and_then(|request| self.verify_at(&request, now));

        match result {
            Ok(event) => {
                self.emit(&event);
                info!(
                    event = event.event_type().unwrap_or("unknown"),
                    mogotes_id = ?event.mogotes_id(),
                    "Mogotes webhook received"
                );
                Ok(event)
            }
            Err(err) => {
                warn!(reason = err.reason(), error = %err, "Mogotes webhook rejected");
                Err(err)
            }
        }
    }

    fn emit(&self, event: &WebhookEvent) {
        debug!(handlers = self.handlers.len(), "Dispatching Mogotes webhook");
        for handler in &self.handlers {
            handler.handle(event);
        }
    }
}

impl std::fmt::Debug for WebhookReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookReceiver")
            .field("window", &self.window)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// An empty body decodes to an empty payload.
fn decode_payload(raw_body: &[u8]) -> Result<Map<String, Value>> {
    if raw_body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(raw_body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(WebhookError::InvalidPayload("expected a JSON object".into())),
        Err(e) => Err(WebhookError::InvalidPayload(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::sign;
    use http::{HeaderName, HeaderValue};
    use std::sync::Mutex;

    const SECRET: &str = "s";
    const NOW: i64 = 1_700_000_000;
    const BODY: &[u8] = br#"{"event":"x"}"#;

    fn headers(signature: Option<&str>, timestamp: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(sig) = signature {
            map.insert(
                HeaderName::from_static("mogotes-signature"),
                HeaderValue::from_str(sig).unwrap(),
            );
        }
        if let Some(ts) = timestamp {
            map.insert(
                HeaderName::from_static("mogotes-timestamp"),
                HeaderValue::from_str(ts).unwrap(),
            );
        }
        map
    }

    fn signed(ts: i64, body: &[u8]) -> HeaderMap {
        headers(Some(sign(ts, body, SECRET).as_str()), Some(ts.to_string().as_str()))
    }

    #[test]
    fn test_receive_valid() {
        let receiver = WebhookReceiver::new(SECRET);
        let event = receiver.receive_at(&signed(NOW, BODY), BODY, NOW).unwrap();

        assert_eq!(event.event_type(), Some("x"));
        assert_eq!(event.timestamp(), NOW);
        assert_eq!(event.signature(), sign(NOW, BODY, SECRET));
    }

    #[test]
    fn test_missing_signature_checked_first() {
        let receiver = WebhookReceiver::new(SECRET);

        let err = receiver.receive_at(&headers(None, None), BODY, NOW).unwrap_err();
        assert_eq!(err, WebhookError::MissingSignature);

        let err = receiver
            .receive_at(&headers(None, Some("1700000000")), BODY, NOW)
            .unwrap_err();
        assert_eq!(err, WebhookError::MissingSignature);
    }

    #[test]
    fn test_missing_timestamp() {
        let receiver = WebhookReceiver::new(SECRET);
        let err = receiver
            .receive_at(&headers(Some("abc"), None), BODY, NOW)
            .unwrap_err();
        assert_eq!(err, WebhookError::MissingTimestamp);
    }

    #[test]
    fn test_malformed_timestamp() {
        let receiver = WebhookReceiver::new(SECRET);
        let err = receiver
            .receive_at(&headers(Some("abc"), Some("yesterday")), BODY, NOW)
            .unwrap_err();
        assert_eq!(err, WebhookError::MalformedTimestamp("yesterday".into()));
        assert_eq!(err.code(), "invalid_signature");
    }

    #[test]
    fn test_window_checked_before_signature() {
        let receiver = WebhookReceiver::new(SECRET);

        // Valid signature, stale timestamp
        let ts = NOW - 600;
        let err = receiver.receive_at(&signed(ts, BODY), BODY, NOW).unwrap_err();
        assert!(matches!(err, WebhookError::TimestampOutOfWindow { .. }));

        // Invalid signature, stale timestamp: still the window reason
        let err = receiver
            .receive_at(&headers(Some("deadbeef"), Some(ts.to_string().as_str())), BODY, NOW)
            .unwrap_err();
        assert_eq!(
            err,
            WebhookError::TimestampOutOfWindow {
                timestamp: ts,
                max_age_seconds: 300,
            }
        );
    }

    #[test]
    fn test_future_timestamp_rejected() {
        let receiver = WebhookReceiver::new(SECRET);
        let ts = NOW + 301;
        let err = receiver.receive_at(&signed(ts, BODY), BODY, NOW).unwrap_err();
        assert!(matches!(err, WebhookError::TimestampOutOfWindow { .. }));
    }

    #[test]
    fn test_signature_mismatch() {
        let receiver = WebhookReceiver::new(SECRET);
        let tampered = br#"{"event":"y"}"#;
        let err = receiver
            .receive_at(&signed(NOW, BODY), &tampered[..], NOW)
            .unwrap_err();
        assert_eq!(err, WebhookError::SignatureMismatch);
    }

    #[test]
    fn test_non_ascii_signature_is_a_mismatch() {
        let receiver = WebhookReceiver::new(SECRET);
        let mut map = headers(None, Some(NOW.to_string().as_str()));
        map.insert(
            HeaderName::from_static("mogotes-signature"),
            HeaderValue::from_bytes(b"\xffabc").unwrap(),
        );

        let err = receiver.receive_at(&map, BODY, NOW).unwrap_err();
        assert_eq!(err, WebhookError::SignatureMismatch);
    }

    #[test]
    fn test_non_object_body() {
        let receiver = WebhookReceiver::new(SECRET);

        for body in [&b"[1,2]"[..], b"not json", b"42"] {
            let err = receiver.receive_at(&signed(NOW, body), body, NOW).unwrap_err();
            assert!(matches!(err, WebhookError::InvalidPayload(_)));
        }
    }

    #[test]
    fn test_empty_body_is_empty_payload() {
        let receiver = WebhookReceiver::new(SECRET);
        let event = receiver.receive_at(&signed(NOW, b""), &b""[..], NOW).unwrap();
        assert!(event.payload().is_empty());
    }

    #[test]
    fn test_handlers_in_registration_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut receiver = WebhookReceiver::new(SECRET);

        for name in ["first", "second", "third"] {
            let calls = calls.clone();
            receiver.on(move |event: &WebhookEvent| {
                calls
                    .lock()
                    .unwrap()
                    .push(format!("{name}:{}", event.event_type().unwrap_or_default()));
            });
        }

        receiver.receive_at(&signed(NOW, BODY), BODY, NOW).unwrap();
        assert_eq!(*calls.lock().unwrap(), vec!["first:x", "second:x", "third:x"]);
    }

    #[test]
    fn test_rejected_webhook_does_not_emit() {
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let receiver = WebhookReceiver::new(SECRET).with_handler(move |_: &WebhookEvent| {
            *counter.lock().unwrap() += 1;
        });

        let _ = receiver.receive_at(&signed(NOW - 1_000, BODY), BODY, NOW);
        let _ = receiver.receive_at(&headers(Some("00"), Some("1700000000")), BODY, NOW);
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_delivery_emits_again() {
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let receiver = WebhookReceiver::new(SECRET).with_handler(move |_: &WebhookEvent| {
            *counter.lock().unwrap() += 1;
        });

        let headers = signed(NOW, BODY);
        receiver.receive_at(&headers, BODY, NOW).unwrap();
        receiver.receive_at(&headers, BODY, NOW + 10).unwrap();
        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[test]
    fn test_verify_at_is_pure() {
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let receiver = WebhookReceiver::new(SECRET).with_handler(move |_: &WebhookEvent| {
            *counter.lock().unwrap() += 1;
        });

        let request = SignedWebhookRequest::from_headers(&signed(NOW, BODY), BODY).unwrap();
        let first = receiver.verify_at(&request, NOW).unwrap();
        let second = receiver.verify_at(&request, NOW).unwrap();

        assert_eq!(first, second);
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_from_config_requires_secret() {
        let config = WebhookConfig::default();
        assert_eq!(
            WebhookReceiver::from_config(&config).unwrap_err(),
            WebhookError::SecretNotConfigured
        );

        let config = WebhookConfig::builder().secret("").build();
        assert!(WebhookReceiver::from_config(&config).is_err());

        let config = WebhookConfig::builder().secret("abc").max_age_seconds(30).build();
        let receiver = WebhookReceiver::from_config(&config).unwrap();
        assert_eq!(receiver.window().max_age_seconds(), 30);
    }
}
