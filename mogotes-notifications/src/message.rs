//! Notification messages addressed to host-side recipients.

use serde_json::{Map, Value};

use crate::{Channel, NotificationRequest};

/// A template message not yet bound to a recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationMessage {
    /// Template identifier.
    pub template: String,
    /// Delivery channel.
    pub channel: Channel,
    /// Template variables.
    pub data: Map<String, Value>,
}

impl NotificationMessage {
    /// Create a message with no data.
    pub fn new(template: impl Into<String>, channel: Channel) -> Self {
        Self {
            template: template.into(),
            channel,
            data: Map::new(),
        }
    }

    /// Merge variables into the message, later keys win.
    pub fn with<I, K, V>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in data {
            self.data.insert(key.into(), value.into());
        }
        self
    }

    /// Bind the message to a recipient.
    pub fn into_request(self, recipient: impl Into<String>) -> NotificationRequest {
        NotificationRequest::new(self.channel, self.template, recipient).with_data(self.data)
    }
}

/// Something that can receive Mogotes notifications.
///
/// Implemented by host types such as a user record.
pub trait Notifiable {
    /// Recipient address for the given channel.
    fn route_notification_for_mogotes(&self, channel: Channel) -> String;
}
