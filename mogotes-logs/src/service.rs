//! Logs service.

use mogotes_http_client::{MogotesClient, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{LogFilters, LogLevel};

/// Logs endpoint.
pub const LOGS_PATH: &str = "/v1/logs";

#[derive(Serialize)]
struct LogEntry<'a> {
    level: &'a LogLevel,
    message: &'a str,
    context: &'a Map<String, Value>,
}

/// Ships log entries to Mogotes and queries them back.
#[derive(Debug, Clone)]
pub struct LogsService {
    client: MogotesClient,
}

impl LogsService {
    /// Create a service over an existing client.
    pub fn new(client: MogotesClient) -> Self {
        Self { client }
    }

    /// Send a log entry. Returns the response body.
    pub async fn log(
        &self,
        level: impl Into<LogLevel>,
        message: &str,
        context: Map<String, Value>,
    ) -> Result<Value> {
        let level = level.into();
        let entry = LogEntry {
            level: &level,
            message,
            context: &context,
        };

        debug!(%level, "Shipping log entry to Mogotes");

        let result = self
            .client
            .post(LOGS_PATH)?
            .json(&entry)
            .send()
            .await?
            .into_json_value(None);

        if let Err(err) = &result {
            warn!(%level, error = %err, "Mogotes rejected log entry");
        }
        result
    }

    /// Send an `info` entry.
    pub async fn info(&self, message: &str, context: Map<String, Value>) -> Result<Value> {
        self.log(LogLevel::Info, message, context).await
    }

    /// Send an `error` entry.
    pub async fn error(&self, message: &str, context: Map<String, Value>) -> Result<Value> {
        self.log(LogLevel::Error, message, context).await
    }

    /// Send a `warning` entry.
    pub async fn warning(&self, message: &str, context: Map<String, Value>) -> Result<Value> {
        self.log(LogLevel::Warning, message, context).await
    }

    /// Send a `debug` entry.
    pub async fn debug(&self, message: &str, context: Map<String, Value>) -> Result<Value> {
        self.log(LogLevel::Debug, message, context).await
    }

    /// List stored logs.
    ///
    /// The response is returned as sent; pagination is left to the caller.
    pub async fn list(&self, filters: &LogFilters) -> Result<Value> {
        self.client
            .get(LOGS_PATH)?
            .queries(filters.to_query())
            .send()
            .await?
            .into_json_value(None)
    }
}
