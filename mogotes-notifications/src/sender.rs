//! Notification sender.

use mogotes_http_client::{MogotesClient, Result};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::request::NotificationPayload;
use crate::{Channel, Notifiable, NotificationMessage, NotificationRequest};

/// Notifications endpoint.
pub const NOTIFICATIONS_PATH: &str = "/v1/notifications";

/// Sends template notifications through `POST /v1/notifications`.
///
/// Every send carries an idempotency key; one is generated when the request
/// has none. Each call makes exactly one request and never retries, so a
/// caller retrying after a failure should reuse the same key.
#[derive(Debug, Clone)]
pub struct NotificationSender {
    client: MogotesClient,
}

impl NotificationSender {
    /// Create a sender over an existing client.
    pub fn new(client: MogotesClient) -> Self {
        Self { client }
    }

    /// Send a notification.
    ///
    /// Both `201 Created` and `200 OK` (an idempotent replay) succeed and
    /// return the response body as sent by the server.
    pub async fn send(&self, request: NotificationRequest) -> Result<Value> {
        let idempotency_key = request
            .idempotency_key
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let payload = NotificationPayload {
            channel: request.channel,
            template_key: &request.template_key,
            to: &request.recipient,
            data: &request.data,
            idempotency_key: &idempotency_key,
        };

        debug!(
            channel = %request.channel,
            template = %request.template_key,
            idempotency_key = %idempotency_key,
            "Sending Mogotes notification"
        );

        let response = self
            .client
            .post(NOTIFICATIONS_PATH)?
            .json(&payload)
            .send()
            .await?;
        let status = response.status();

        match response.into_json_value(Some(&idempotency_key)) {
            Ok(body) => {
                info!(
                    channel = %request.channel,
                    template = %request.template_key,
                    status = status.as_u16(),
                    "Mogotes notification accepted"
                );
                Ok(body)
            }
            Err(err) => {
                warn!(
                    channel = %request.channel,
                    template = %request.template_key,
                    status = status.as_u16(),
                    error = %err,
                    "Mogotes notification failed"
                );
                Err(err)
            }
        }
    }

    /// Send an email notification.
    pub async fn email(
        &self,
        template: impl Into<String>,
        to: impl Into<String>,
        data: Map<String, Value>,
        idempotency_key: Option<String>,
    ) -> Result<Value> {
        self.send_on(Channel::Email, template, to, data, idempotency_key)
            .await
    }

    /// Send a WhatsApp notification.
    pub async fn whatsapp(
        &self,
        template: impl Into<String>,
        to: impl Into<String>,
        data: Map<String, Value>,
        idempotency_key: Option<String>,
    ) -> Result<Value> {
        self.send_on(Channel::Whatsapp, template, to, data, idempotency_key)
            .await
    }

    /// Send a message to a notifiable recipient.
    pub async fn notify<N>(&self, notifiable: &N, message: NotificationMessage) -> Result<Value>
    where
        N: Notifiable + ?Sized,
    {
        let recipient = notifiable.route_notification_for_mogotes(message.channel);
        self.send(message.into_request(recipient)).await
    }

    async fn send_on(
        &self,
        channel: Channel,
        template: impl Into<String>,
        to: impl Into<String>,
        data: Map<String, Value>,
        idempotency_key: Option<String>,
    ) -> Result<Value> {
        let mut request = NotificationRequest::new(channel, template, to).with_data(data);
        request.idempotency_key = idempotency_key;
        self.send(request).await
    }
}
