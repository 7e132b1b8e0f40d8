//! Query filters for `GET /v1/logs`.

use crate::LogLevel;

/// Filters for listing logs. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilters {
    /// Level to match.
    pub level: Option<LogLevel>,
    /// Log type to match.
    pub log_type: Option<String>,
    /// Lower date bound, in the format the API accepts.
    pub from_date: Option<String>,
    /// Upper date bound.
    pub to_date: Option<String>,
    /// Page size.
    pub per_page: Option<u32>,
}

impl LogFilters {
    /// Create empty filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by level.
    pub fn level(mut self, level: impl Into<LogLevel>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Filter by log type.
    pub fn log_type(mut self, log_type: impl Into<String>) -> Self {
        self.log_type = Some(log_type.into());
        self
    }

    /// Set the lower date bound.
    pub fn from_date(mut self, date: impl Into<String>) -> Self {
        self.from_date = Some(date.into());
        self
    }

    /// Set the upper date bound.
    pub fn to_date(mut self, date: impl Into<String>) -> Self {
        self.to_date = Some(date.into());
        self
    }

    /// Set the page size.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Query pairs in a stable order.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(level) = &self.level {
            query.push(("level", level.to_string()));
        }
        if let Some(log_type) = &self.log_type {
            query.push(("type", log_type.clone()));
        }
        if let Some(from) = &self.from_date {
            query.push(("from_date", from.clone()));
        }
        if let Some(to) = &self.to_date {
            query.push(("to_date", to.clone()));
        }
        if let Some(per_page) = self.per_page {
            query.push(("per_page", per_page.to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters() {
        assert!(LogFilters::new().to_query().is_empty());
    }

    #[test]
    fn test_only_set_fields() {
        let filters = LogFilters::new()
            .level(LogLevel::Error)
            .log_type("application")
            .per_page(50);

        assert_eq!(
            filters.to_query(),
            vec![
                ("level", "error".to_string()),
                ("type", "application".to_string()),
                ("per_page", "50".to_string()),
            ]
        );
    }

    #[test]
    fn test_date_range() {
        let filters = LogFilters::new()
            .from_date("2024-01-01")
            .to_date("2024-01-31");

        assert_eq!(
            filters.to_query(),
            vec![
                ("from_date", "2024-01-01".to_string()),
                ("to_date", "2024-01-31".to_string()),
            ]
        );
    }
}
