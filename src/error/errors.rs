use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;

/// Failures of the external collaborators (landmark sidecar, text model).
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} answered with status {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: &'static str },

    #[error("{provider} returned malformed content: {source}")]
    Malformed {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Orchestrator failures; detection absence is not one of them.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("failed to store upload: {0}")]
    Storage(#[from] std::io::Error),

    #[error("failed to decode image: {0}")]
    Decode(#[source] anyhow::Error),

    #[error("landmark detection failed: {0}")]
    Detection(#[source] ProviderError),

    #[error("failed to generate styling proposal: {0}")]
    Proposal(#[source] ProviderError),

    #[error("failed to render image: {0}")]
    Render(#[source] anyhow::Error),
}

/// HTTP-facing error; always rendered as `{"error": "..."}`.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Pipeline(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Timeout => "request timed out".to_string(),
            ApiError::Pipeline(PipelineError::Decode(_)) => "failed to read image".to_string(),
            ApiError::Pipeline(PipelineError::Proposal(e)) => format!("failed to generate AI proposal: {e}"),
            ApiError::Pipeline(PipelineError::Render(_)) => "failed to generate placeholder image".to_string(),
            ApiError::Pipeline(_) | ApiError::Internal(_) => "internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message() }));
        (self.status_code(), body).into_response()
    }
}
