use axum::extract::DefaultBodyLimit;
use axum::Router;
use axum::routing::post;
use tower_http::limit::RequestBodyLimitLayer;
use crate::handler::diagnose_handler::diagnose;
use crate::state::diagnose_state::DiagnoseState;

pub fn new_diagnose_route(body_limit: usize) -> Router<DiagnoseState> {
    Router::new()
        .route("/diagnose", post(diagnose))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
}
