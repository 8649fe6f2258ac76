use std::sync::Arc;
use std::time::Duration;

use axum::{BoxError, Json, middleware, Router};
use axum::error_handling::HandleErrorLayer;
use axum::http::header;
use axum::routing::get;
use http::{HeaderValue, Method, StatusCode, Uri};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower::timeout::error::Elapsed;
use tower::timeout::TimeoutLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::propagate_header::PropagateHeaderLayer;
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use crate::config::settings::Settings;
use crate::error::errors::ApiError;
use crate::middleware::request_id_mw::{generate_request_id_mw, REQUEST_ID_HEADER};
use crate::pipeline::diagnose_pipeline::diagnose_pipeline::DiagnosePipeline;
use crate::pipeline::module::placeholder_image::PlaceholderImage;
use crate::response::common_response::{GeneralResponseBuilder, GeneralResponseResult};
use crate::routes::api::diagnose::new_diagnose_route;
use crate::routes::api::generate_style::new_generate_style_route;
use crate::state::diagnose_state::DiagnoseState;
use crate::state::style_state::StyleState;

const LIVENESS_MESSAGE: &str = "AI Top Stylist Backend is running!";
const DEFAULT_REQUEST_TIMEOUT: u64 = 20;
const DEFAULT_BODY_LIMIT_MB: usize = 20;

#[derive(Clone, Serialize, Deserialize)]
struct FallbackResponse {
    message: String,
}

#[derive(Clone)]
pub struct RouterState {
    diagnose_pipeline: Arc<DiagnosePipeline>,
    placeholder_image: Arc<PlaceholderImage>,
}

impl RouterState {
    pub fn new(diagnose_pipeline: DiagnosePipeline, placeholder_image: PlaceholderImage) -> Self {
        RouterState {
            diagnose_pipeline: Arc::new(diagnose_pipeline),
            placeholder_image: Arc::new(placeholder_image),
        }
    }
}

pub fn root_routes(router_state: RouterState, settings: &Settings) -> Router {
    let body_limit = settings.server.body_limit_mb.unwrap_or(DEFAULT_BODY_LIMIT_MB) * 1024 * 1024;

    let api_router = {
        let diagnose_route = new_diagnose_route(body_limit)
            .with_state(DiagnoseState::new(&router_state.diagnose_pipeline));
        let generate_style_route = new_generate_style_route(body_limit)
            .with_state(StyleState::new(&router_state.placeholder_image));

        Router::new()
            .route("/health", get(healthcheck))
            .merge(diagnose_route)
            .merge(generate_style_route)
            .layer(CompressionLayer::new())
            .layer(cors_layer(&settings.cors.allowed_origins))
    };

    let request_timeout = settings.server.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

    Router::new()
        .route("/", get(index))
        .nest("/api", api_router)
        .fallback(fallback)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .layer(TimeoutLayer::new(Duration::from_secs(request_timeout)))
        )
        .layer(PropagateHeaderLayer::new(header::HeaderName::from_static(REQUEST_ID_HEADER)))
        .layer(middleware::from_fn(generate_request_id_mw))
        .layer(SetSensitiveHeadersLayer::new(std::iter::once(header::AUTHORIZATION)))
}

async fn handle_timeout_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        warn!("request exceeded the configured timeout");
        ApiError::Timeout
    } else {
        ApiError::Internal(format!("unhandled middleware error: {err}"))
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("ignoring invalid cors origin {origin:?}: {e}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

async fn fallback(uri: Uri) -> (StatusCode, Json<FallbackResponse>) {
    (StatusCode::NOT_FOUND, Json(FallbackResponse {
        message: format!("No route for {uri}"),
    }))
}

async fn index() -> &'static str {
    LIVENESS_MESSAGE
}

async fn healthcheck() -> GeneralResponseResult<Value> {
    Ok(GeneralResponseBuilder::new()
        .status_code(StatusCode::OK)
        .body(json!({ "status": "ok" }))
        .build())
}
