use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use ecs_logger::extra_fields;
use http::header;
use log::warn;
use uuid::Uuid;
use crate::logger::logger::LoggerExtraFields;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tags the request with a fresh id and attaches it to log lines while the request is served.
pub async fn generate_request_id_mw(mut req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();

    if let Ok(value) = header::HeaderValue::from_str(&request_id) {
        req.headers_mut().insert(header::HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    if let Err(e) = extra_fields::set_extra_fields(LoggerExtraFields { request_id }) {
        warn!("failed to attach request id to logger: {e}");
    }
    let response = next.run(req).await;
    extra_fields::clear_extra_fields();

    response
}
