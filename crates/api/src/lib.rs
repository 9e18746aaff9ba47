mod rate_limit;

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::{Body, Bytes};
use axum::extract::{ConnectInfo, Json, State};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use travelbot_agents::{Capabilities, TravelPlanner};
use travelbot_core::{CityInfo, PlanRequest, PoiCatalog};
use travelbot_enrichment::{EnrichmentConfig, EnrichmentStack, GoogleMapsClient, OpenAiNarrator};
use travelbot_observability::{AppMetrics, MetricsSnapshot};

pub use crate::rate_limit::IpRateLimiter;

const MAX_BODY_BYTES: usize = 64 * 1024;

pub type Planner = TravelPlanner<GoogleMapsClient, OpenAiNarrator>;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub enrichment: EnrichmentConfig,
    pub catalog_path: Option<PathBuf>,
    pub allowed_origins: Vec<String>,
    pub rate_limit_window: Duration,
    pub rate_limit_max: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            enrichment: EnrichmentConfig::from_env(),
            catalog_path: env::var("TRAVELBOT_CATALOG_PATH")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
            allowed_origins: parse_allowed_origins(
                env::var("TRAVELBOT_ALLOWED_ORIGINS").ok().as_deref(),
            ),
            rate_limit_window: Duration::from_secs(
                env::var("TRAVELBOT_RATE_LIMIT_WINDOW_SECONDS")
                    .ok()
                    .and_then(|value| value.parse::<u64>().ok())
                    .unwrap_or(60),
            ),
            rate_limit_max: env::var("TRAVELBOT_RATE_LIMIT_MAX")
                .ok()
                .and_then(|value| value.parse::<usize>().ok())
                .unwrap_or(60),
        }
    }

    /// Built-in catalog, no external services, permissive CORS.
    pub fn offline() -> Self {
        Self {
            enrichment: EnrichmentConfig::offline(),
            catalog_path: None,
            allowed_origins: parse_allowed_origins(None),
            rate_limit_window: Duration::from_secs(60),
            rate_limit_max: 60,
        }
    }
}

#[derive(Clone)]
pub struct ApiState {
    pub planner: Arc<Planner>,
    pub metrics: Arc<AppMetrics>,
    pub limiter: IpRateLimiter,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: MetricsSnapshot,
    capabilities: Capabilities,
}

#[derive(Debug, Serialize)]
struct CitiesResponse {
    cities: Vec<CityInfo>,
}

pub fn build_app(config: AppConfig) -> Result<Router> {
    let metrics = AppMetrics::shared();

    let catalog = match config.catalog_path.as_ref() {
        Some(path) => Arc::new(
            PoiCatalog::from_path(path)
                .with_context(|| format!("failed loading POI catalog from {}", path.display()))?,
        ),
        None => PoiCatalog::builtin(),
    };

    let stack = EnrichmentStack::from_config(config.enrichment)
        .context("failed to initialize enrichment services")?;

    let planner = Arc::new(TravelPlanner::new(
        catalog,
        Arc::new(stack.maps),
        Arc::new(stack.narrator),
        metrics.clone(),
    ));

    let state = ApiState {
        planner,
        metrics,
        limiter: IpRateLimiter::new(config.rate_limit_window, config.rate_limit_max),
    };

    Ok(build_router(state, &config.allowed_origins))
}

pub fn build_router(state: ApiState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/cities", get(cities))
        .route("/plan", post(plan))
        .layer(build_cors_layer(allowed_origins))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
        capabilities: state.planner.capabilities(),
    };
    (StatusCode::OK, Json(payload))
}

async fn cities(State(state): State<ApiState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(CitiesResponse {
            cities: state.planner.cities(),
        }),
    )
}

/// Parses the body as JSON whatever the declared content type.
async fn plan(State(state): State<ApiState>, body: Bytes) -> impl IntoResponse {
    let input = match serde_json::from_slice::<PlanRequest>(&body) {
        Ok(input) => input,
        Err(error) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "invalid_json",
                    "message": error.to_string()
                })),
            )
                .into_response()
        }
    };

    let request = match input.resolve() {
        Ok(request) => request,
        Err(error) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "invalid_preference",
                    "message": error.to_string()
                })),
            )
                .into_response()
        }
    };

    match state.planner.plan(request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(error) => {
            warn!(error = %error, "plan request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "plan_failed",
                    "message": error.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// Comma-separated origins; unset, empty or `*` allows any origin.
fn parse_allowed_origins(raw: Option<&str>) -> Vec<String> {
    let origins = raw
        .map(|value| {
            value
                .split(',')
                .map(|origin| origin.trim().trim_end_matches('/').to_string())
                .filter(|origin| !origin.is_empty())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if origins.is_empty() {
        vec!["*".to_string()]
    } else {
        origins
    }
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok())
                .collect::<Vec<_>>(),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn rate_limit_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let ip = request_ip(&request);
    if !state.limiter.allow(&ip) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "error": "rate_limited",
                "message": "rate limit exceeded for this IP"
            })),
        )
            .into_response();
    }

    next.run(request).await
}

/// First `x-forwarded-for` hop, else the peer address.
fn request_ip(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(peer)| peer.ip().to_string())
        })
        .unwrap_or_else(|| "local".to_string())
}

async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    response
}
