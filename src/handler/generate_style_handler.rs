use axum::debug_handler;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use http::{header, StatusCode};
use log::{info, warn};
use crate::error::errors::ApiError;
use crate::handler::multipart_fields::read_upload_fields;
use crate::models::style_model::GenerateStyleInput;
use crate::state::style_state::StyleState;

#[debug_handler(state = StyleState)]
pub async fn generate_style(State(state): State<StyleState>, mut payload: Multipart) -> Result<Response, ApiError> {
    info!("received generate style request");

    let fields = read_upload_fields(&mut payload).await?;
    let (photo, prompt) = match (fields.photo, fields.prompt) {
        (Some(photo), Some(prompt)) => (photo, prompt),
        _ => {
            warn!("generate style request is missing the photo or the prompt");
            return Err(ApiError::bad_request("required data front_photo and prompt is missing"))
        }
    };

    let png = state.style_service
        .generate_style(GenerateStyleInput { im_bytes: photo.im_bytes, prompt })
        .await?;
    info!("completed generating style image");

    let headers = [(header::CONTENT_TYPE, mime::IMAGE_PNG.to_string())];
    Ok((StatusCode::OK, headers, png).into_response())
}
