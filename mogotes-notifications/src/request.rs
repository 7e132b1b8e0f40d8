//! Notification request types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Email.
    Email,
    /// WhatsApp.
    Whatsapp,
    /// SMS.
    Sms,
    /// Mobile push.
    Push,
}

impl Channel {
    /// Wire name of the channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Whatsapp => "whatsapp",
            Self::Sms => "sms",
            Self::Push => "push",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A template notification to send.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    /// Delivery channel.
    pub channel: Channel,
    /// Template identifier.
    pub template_key: String,
    /// Recipient address for the channel: email, phone number, device.
    pub recipient: String,
    /// Template variables.
    pub data: Map<String, Value>,
    /// Idempotency key. Generated at send time when absent.
    pub idempotency_key: Option<String>,
}

impl NotificationRequest {
    /// Create a request with no template data.
    pub fn new(channel: Channel, template_key: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            channel,
            template_key: template_key.into(),
            recipient: recipient.into(),
            data: Map::new(),
            idempotency_key: None,
        }
    }

    /// Create an email request.
    pub fn email(template_key: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(Channel::Email, template_key, to)
    }

    /// Create a WhatsApp request.
    pub fn whatsapp(template_key: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(Channel::Whatsapp, template_key, to)
    }

    /// Set a template variable.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Merge template variables, later keys win.
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data.extend(data);
        self
    }

    /// Set the idempotency key.
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

/// Body of `POST /v1/notifications`.
#[derive(Debug, Serialize)]
pub(crate) struct NotificationPayload<'a> {
    pub channel: Channel,
    pub template_key: &'a str,
    pub to: &'a str,
    pub data: &'a Map<String, Value>,
    pub idempotency_key: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_names() {
        assert_eq!(Channel::Email.to_string(), "email");
        assert_eq!(Channel::Whatsapp.as_str(), "whatsapp");
        assert_eq!(serde_json::to_value(Channel::Sms).unwrap(), json!("sms"));
        assert_eq!(
            serde_json::from_value::<Channel>(json!("push")).unwrap(),
            Channel::Push
        );
    }

    #[test]
    fn test_builder() {
        let request = NotificationRequest::email("welcome", "ana@example.com")
            .with("name", "Ana")
            .with("plan", "pro")
            .idempotency_key("order-1");

        assert_eq!(request.channel, Channel::Email);
        assert_eq!(request.template_key, "welcome");
        assert_eq!(request.recipient, "ana@example.com");
        assert_eq!(request.data["name"], "Ana");
        assert_eq!(request.idempotency_key.as_deref(), Some("order-1"));
    }

    #[test]
    fn test_payload_shape() {
        let data = json!({"code": 1234}).as_object().cloned().unwrap();
        let payload = NotificationPayload {
            channel: Channel::Whatsapp,
            template_key: "otp",
            to: "+5491100000000",
            data: &data,
            idempotency_key: "k1",
        };

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "channel": "whatsapp",
                "template_key": "otp",
                "to": "+5491100000000",
                "data": {"code": 1234},
                "idempotency_key": "k1"
            })
        );
    }
}
