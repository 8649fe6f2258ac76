use axum::debug_handler;
use axum::extract::{Multipart, State};
use http::StatusCode;
use log::{info, warn};
use crate::error::errors::ApiError;
use crate::handler::multipart_fields::read_upload_fields;
use crate::models::diagnose_model::{DiagnoseInput, DiagnoseResultOutput};
use crate::response::common_response::{GeneralResponseBuilder, GeneralResponseResult};
use crate::state::diagnose_state::DiagnoseState;

#[debug_handler(state = DiagnoseState)]
pub async fn diagnose(State(state): State<DiagnoseState>, mut payload: Multipart) -> GeneralResponseResult<DiagnoseResultOutput> {
    info!("received diagnose request");

    let fields = read_upload_fields(&mut payload).await?;
    let photo = match fields.photo {
        Some(photo) => photo,
        None => {
            warn!("diagnose request without a photo");
            return Err(ApiError::bad_request("required file front_photo was not found"))
        }
    };

    let input = DiagnoseInput {
        im_bytes: photo.im_bytes,
        file_name: photo.file_name,
        content_type: photo.content_type,
    };
    let result = state.diagnose_service.diagnose(input).await?;
    info!("completed diagnosis");

    Ok(GeneralResponseBuilder::new()
        .status_code(StatusCode::OK)
        .body(result)
        .build())
}
