use axum::extract::DefaultBodyLimit;
use axum::Router;
use axum::routing::post;
use tower_http::limit::RequestBodyLimitLayer;
use crate::handler::generate_style_handler::generate_style;
use crate::state::style_state::StyleState;

pub fn new_generate_style_route(body_limit: usize) -> Router<StyleState> {
    Router::new()
        .route("/generate_style", post(generate_style))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
}
