//! API Handlers
//!
//! HTTP request handlers for each chart service endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};

use crate::config::Config;
use crate::ephemeris::EphemerisProvider;
use crate::error::{ChartError, Result};
use crate::models::{
    ChartEnvelope, ChartRequestBody, ExtrasEnvelope, ExtrasRequestBody, HealthResponse,
    StatsResponse, UserId,
};
use crate::orchestrator::ChartOrchestrator;
use crate::store::{DocumentStore, MemoryStore};

/// Header carrying the caller identity, set by the authenticating gateway
pub const USER_ID_HEADER: &str = "x-user-id";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ChartOrchestrator>,
    /// Backing store, shared with the TTL sweep task
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(orchestrator: ChartOrchestrator, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            store,
        }
    }

    /// Wires an in-memory store and the given provider per the Config.
    pub fn from_config(config: &Config, provider: Arc<dyn EphemerisProvider>) -> Self {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let orchestrator = ChartOrchestrator::new(
            provider,
            Arc::clone(&store),
            config.rate_limit_per_day,
            config.request_timeout(),
        );
        Self::new(orchestrator, store)
    }
}

fn caller(headers: &HeaderMap) -> Result<UserId> {
    let raw = headers
        .get(USER_ID_HEADER)
        .map(|value| {
            value.to_str().map_err(|_| {
                ChartError::InvalidInput(format!("{USER_ID_HEADER} must be valid ASCII"))
            })
        })
        .transpose()?
        .unwrap_or_default();
    UserId::new(raw)
}

fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ChartError::InvalidInput(rejection.body_text()))
}

/// Handler for POST /v1/chart
pub async fn chart_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<ChartRequestBody>, JsonRejection>,
) -> Result<Json<ChartEnvelope>> {
    let user = caller(&headers)?;
    let body = json_body(payload)?;

    let envelope = state.orchestrator.get_chart(&user, body).await?;
    Ok(Json(envelope))
}

/// Handler for POST /v1/extras
pub async fn extras_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<ExtrasRequestBody>, JsonRejection>,
) -> Result<Json<ExtrasEnvelope>> {
    let user = caller(&headers)?;
    let body = json_body(payload)?;

    let envelope = state.orchestrator.get_extras(&user, body).await?;
    Ok(Json(envelope))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let orchestrator = &state.orchestrator;
    Json(StatsResponse {
        chart_cache: orchestrator.chart_cache_stats().await.into(),
        extras_cache: orchestrator.extras_cache_stats().await.into(),
        stored_documents: state.store.len().await,
    })
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.orchestrator.provider_tag()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::AnalyticEphemeris;
    use axum::http::HeaderValue;

    fn test_state(limit: u32) -> AppState {
        let config = Config {
            rate_limit_per_day: limit,
            ..Config::default()
        };
        AppState::from_config(&config, Arc::new(AnalyticEphemeris::open(None).unwrap()))
    }

    fn headers(user: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_str(user).unwrap());
        headers
    }

    fn chart_body() -> ChartRequestBody {
        serde_json::from_value(serde_json::json!({
            "utcISO": "2000-01-01T12:00:00Z",
            "lat": 51.5074,
            "lon": -0.1278,
            "zodiacSystem": "tropical",
            "houseSystem": "placidus"
        }))
        .unwrap()
    }

    #[test]
    fn test_caller_requires_header() {
        let err = caller(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, ChartError::Unauthenticated(_)));

        let err = caller(&headers("   ")).unwrap_err();
        assert!(matches!(err, ChartError::Unauthenticated(_)));

        assert_eq!(caller(&headers("alice")).unwrap().as_str(), "alice");
    }

    #[tokio::test]
    async fn test_chart_handler_computes() {
        let state = test_state(10);
        let Json(envelope) =
            chart_handler(State(state), headers("alice"), Ok(Json(chart_body())))
                .await
                .unwrap();

        assert!(!envelope.meta.cached);
        assert_eq!(envelope.chart.houses.cusps_deg.len(), 12);
        assert!(envelope.chart.bodies.contains_key("Sun"));
    }

    #[tokio::test]
    async fn test_chart_handler_without_user() {
        let state = test_state(10);
        let result = chart_handler(State(state), HeaderMap::new(), Ok(Json(chart_body()))).await;
        assert!(matches!(result, Err(ChartError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn test_stats_handler_counts_documents() {
        let state = test_state(10);
        chart_handler(State(state.clone()), headers("alice"), Ok(Json(chart_body())))
            .await
            .unwrap();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.chart_cache.misses, 1);
        assert!(response.stored_documents >= 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler(State(test_state(10))).await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.provider, "analytic");
    }
}
