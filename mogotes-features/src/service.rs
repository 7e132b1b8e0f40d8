//! Feature flags service.

use mogotes_http_client::{MogotesClient, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{FlagCache, FlagScope, FlagSet};

/// Feature flags endpoint.
pub const FEATURE_FLAGS_PATH: &str = "/v1/feature-flags";

/// Default cache lifetime, in seconds.
pub const DEFAULT_TTL_SECONDS: u64 = 300;

/// Feature flag evaluation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlagsConfig {
    /// How long a fetched flag set is reused.
    pub ttl_seconds: u64,
    /// Whether fetched flag sets are cached at all.
    pub cache_enabled: bool,
}

impl Default for FeatureFlagsConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
            cache_enabled: true,
        }
    }
}

/// Evaluates remote feature flags.
///
/// Clones share the cache.
#[derive(Debug, Clone)]
pub struct FeatureFlagsService {
    client: MogotesClient,
    cache: Option<Arc<FlagCache>>,
}

impl FeatureFlagsService {
    /// Create a service with the default cache settings.
    pub fn new(client: MogotesClient) -> Self {
        Self::with_config(client, FeatureFlagsConfig::default())
    }

    /// Create a service with explicit cache settings.
    pub fn with_config(client: MogotesClient, config: FeatureFlagsConfig) -> Self {
        let cache = config
            .cache_enabled
            .then(|| Arc::new(FlagCache::new(Duration::from_secs(config.ttl_seconds))));
        Self { client, cache }
    }

    /// The cache, when enabled.
    pub fn cache(&self) -> Option<&FlagCache> {
        self.cache.as_deref()
    }

    /// Fetch the flags for a scope, bypassing the cache.
    pub async fn fetch(&self, scope: Option<&str>) -> Result<FlagSet> {
        let mut request = self.client.get(FEATURE_FLAGS_PATH)?;
        if let Some(scope_id) = scope {
            request = request.query("scope_id", scope_id);
        }

        let body = request.send().await?.into_json_value(None)?;
        let flags = FlagSet::from_response(&body);
        debug!(scope = ?scope, flags = flags.len(), "Fetched Mogotes feature flags");
        Ok(flags)
    }

    /// Flags for a scope, served from the cache when fresh.
    pub async fn flags(&self, scope: Option<&str>) -> Result<FlagSet> {
        let Some(cache) = &self.cache else {
            return self.fetch(scope).await;
        };

        if let Some(flags) = cache.get(scope) {
            return Ok(flags);
        }

        let flags = self.fetch(scope).await?;
        cache.insert(scope, flags.clone());
        Ok(flags)
    }

    /// Evaluate a flag, surfacing any error.
    pub async fn try_is_active(&self, name: &str, scope: Option<&str>) -> Result<bool> {
        Ok(self.flags(scope).await?.is_active(name))
    }

    /// Evaluate a flag. Any failure evaluates to `false`.
    pub async fn is_active(&self, name: &str, scope: Option<&str>) -> bool {
        match self.try_is_active(name, scope).await {
            Ok(active) => active,
            Err(err) => {
                warn!(flag = name, scope = ?scope, error = %err, "Feature flag evaluation failed, treating as inactive");
                false
            }
        }
    }

    /// Evaluate a flag for a host-defined scope.
    pub async fn is_active_for<S>(&self, name: &str, scope: &S) -> bool
    where
        S: FlagScope + ?Sized,
    {
        let scope_id = scope.flag_scope_id();
        self.is_active(name, scope_id.as_deref()).await
    }

    /// Drop the cached flags for a scope.
    pub fn forget(&self, scope: Option<&str>) {
        if let Some(cache) = &self.cache {
            cache.forget(scope);
        }
    }

    /// Drop every cached flag set.
    pub fn flush(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }
}
