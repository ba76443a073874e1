//! Chart Orchestrator
//!
//! Request lifecycle: validate, count against the daily quota, serve from
//! cache or compute on the blocking pool, then cache in the background.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::cache::{
    chart_cache_key, extras_cache_key, CacheStats, CachedEnvelope, ResultCache, CHART_COLLECTION,
    EXTRAS_COLLECTION,
};
use crate::chart::{ChartAssembler, ExtrasCalculator};
use crate::ephemeris::EphemerisProvider;
use crate::error::{ChartError, Result};
use crate::models::{ChartEnvelope, ChartRequestBody, ExtrasEnvelope, ExtrasRequestBody, UserId};
use crate::rate_limit::{RateDecision, RateLimiter};
use crate::store::DocumentStore;

/// Default wall-clock budget of one request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// == Chart Orchestrator ==
pub struct ChartOrchestrator {
    provider: Arc<dyn EphemerisProvider>,
    store: Arc<dyn DocumentStore>,
    limiter: RateLimiter,
    chart_cache: ResultCache<ChartEnvelope>,
    extras_cache: ResultCache<ExtrasEnvelope>,
    request_timeout: Duration,
}

impl ChartOrchestrator {
    pub fn new(
        provider: Arc<dyn EphemerisProvider>,
        store: Arc<dyn DocumentStore>,
        daily_limit: u32,
        request_timeout: Duration,
    ) -> Self {
        Self {
            limiter: RateLimiter::new(Arc::clone(&store), daily_limit),
            chart_cache: ResultCache::new(Arc::clone(&store), CHART_COLLECTION),
            extras_cache: ResultCache::new(Arc::clone(&store), EXTRAS_COLLECTION),
            provider,
            store,
            request_timeout,
        }
    }

    pub fn provider_tag(&self) -> &'static str {
        self.provider.tag()
    }

    // == Chart ==
    pub async fn get_chart(&self, user: &UserId, body: ChartRequestBody) -> Result<ChartEnvelope> {
        let request = body.validate()?;
        let key = chart_cache_key(&request);

        self.within_budget(async {
            self.enforce_quota(user).await?;
            self.serve(&self.chart_cache, key, move |provider| {
                ChartAssembler::new(provider).assemble(&request)
            })
            .await
        })
        .await
    }

    // == Extras ==
    pub async fn get_extras(
        &self,
        user: &UserId,
        body: ExtrasRequestBody,
    ) -> Result<ExtrasEnvelope> {
        let request = body.validate()?;
        let key = extras_cache_key(&request);

        self.within_budget(async {
            self.enforce_quota(user).await?;
            self.serve(&self.extras_cache, key, move |provider| {
                ExtrasCalculator::new(provider).compute(&request)
            })
            .await
        })
        .await
    }

    // == Stats ==
    pub async fn chart_cache_stats(&self) -> CacheStats {
        self.chart_cache.stats().await
    }

    pub async fn extras_cache_stats(&self) -> CacheStats {
        self.extras_cache.stats().await
    }

    pub async fn stored_documents(&self) -> usize {
        self.store.len().await
    }

    // == Pipeline Steps ==
    async fn within_budget<T>(&self, work: impl Future<Output = Result<T>>) -> Result<T> {
        match timeout(self.request_timeout, work).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout = ?self.request_timeout, "Request exceeded time budget");
                Err(ChartError::Unavailable(format!(
                    "computation did not finish within {} seconds",
                    self.request_timeout.as_secs_f64()
                )))
            }
        }
    }

    /// Only an exceeded quota fails the request; limiter errors let it through.
    async fn enforce_quota(&self, user: &UserId) -> Result<()> {
        match self.limiter.check(user).await {
            Ok(RateDecision::Allowed { count }) => {
                debug!(user = %user, count, "Quota check passed");
                Ok(())
            }
            Ok(RateDecision::Exceeded { limit }) => {
                info!(user = %user, limit, "Daily quota exceeded");
                Err(ChartError::QuotaExceeded { limit })
            }
            Err(err) => {
                warn!(user = %user, error = %err, "Rate limiter unavailable, allowing request");
                Ok(())
            }
        }
    }

    async fn serve<E, F>(&self, cache: &ResultCache<E>, key: String, compute: F) -> Result<E>
    where
        E: CachedEnvelope,
        F: FnOnce(&dyn EphemerisProvider) -> Result<E> + Send + 'static,
    {
        match cache.lookup(&key).await {
            Ok(Some(hit)) => {
                debug!(collection = cache.collection(), key = %key, "Cache hit");
                return Ok(hit);
            }
            Ok(None) => {}
            Err(err) => {
                warn!(collection = cache.collection(), error = %err, "Cache read failed, computing");
            }
        }

        let provider = Arc::clone(&self.provider);
        let mut envelope = tokio::task::spawn_blocking(move || compute(provider.as_ref()))
            .await
            .map_err(|err| ChartError::Internal(format!("computation task failed: {err}")))??;

        envelope.set_cached(false);
        cache.store_detached(key, envelope.clone());
        Ok(envelope)
    }
}
