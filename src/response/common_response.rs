use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::{BufMut, BytesMut};
use log::error;
use serde::Serialize;
use crate::error::errors::ApiError;

pub type GeneralResponseResult<T> = Result<GeneralResponse<T>, ApiError>;

#[derive(Debug)]
pub struct GeneralResponse<T: Serialize> {
    pub data: Option<T>,
    pub status_code: StatusCode,
}

pub struct GeneralResponseBuilder<T: Serialize> {
    pub data: Option<T>,
    pub status_code: StatusCode,
}

impl<T> Default for GeneralResponseBuilder<T>
    where
        T: Serialize,
{
    fn default() -> Self {
        Self {
            data: None,
            status_code: StatusCode::OK,
        }
    }
}

impl<T> GeneralResponseBuilder<T>
    where
        T: Serialize,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, body: T) -> Self {
        self.data = Some(body);
        self
    }

    pub fn status_code(mut self, status_code: StatusCode) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn build(self) -> GeneralResponse<T> {
        GeneralResponse {
            data: self.data,
            status_code: self.status_code,
        }
    }
}

impl<T> IntoResponse for GeneralResponse<T>
    where
        T: Serialize,
{
    fn into_response(self) -> Response {
        let data = match self.data {
            Some(data) => data,
            None => return (self.status_code).into_response(),
        };

        let mut bytes = BytesMut::new().writer();
        if let Err(err) = serde_json::to_writer(&mut bytes, &data) {
            error!("Error serializing response body as JSON: {:?}", err);
            return ApiError::Internal("response serialization failed".to_string()).into_response();
        }

        let bytes = bytes.into_inner().freeze();
        let headers = [(header::CONTENT_TYPE, mime::APPLICATION_JSON.to_string())];

        (self.status_code, headers, bytes).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_json_body_and_status() {
        let response = GeneralResponseBuilder::new()
            .status_code(StatusCode::CREATED)
            .body(json!({"status": "ok"}))
            .build()
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"status":"ok"}"#);
    }

    #[test]
    fn test_empty_body() {
        let response = GeneralResponseBuilder::<serde_json::Value>::new().status_code(StatusCode::NO_CONTENT).build().into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
