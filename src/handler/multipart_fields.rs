use axum::extract::Multipart;
use bytes::Bytes;
use log::error;
use crate::error::errors::ApiError;

pub const PHOTO_FIELD: &str = "front_photo";
pub const PROMPT_FIELD: &str = "prompt";

#[derive(Debug)]
pub struct UploadedPhoto {
    pub im_bytes: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Default)]
pub struct UploadFields {
    pub photo: Option<UploadedPhoto>,
    pub prompt: Option<String>,
}

/// Collects the fields both endpoints understand; unknown fields are skipped.
pub async fn read_upload_fields(payload: &mut Multipart) -> Result<UploadFields, ApiError> {
    let mut fields = UploadFields::default();

    loop {
        let field = match payload.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                error!("failed to read multipart body: {e}");
                return Err(ApiError::bad_request("malformed multipart body"))
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            PHOTO_FIELD => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let im_bytes = match field.bytes().await {
                    Ok(data) => data,
                    Err(e) => {
                        error!("failed to retrieve image from request: {e}");
                        return Err(ApiError::bad_request("failed to read uploaded image"))
                    }
                };
                if im_bytes.is_empty() {
                    continue
                }
                fields.photo = Some(UploadedPhoto { im_bytes, file_name, content_type });
            }
            PROMPT_FIELD => {
                let prompt = match field.text().await {
                    Ok(prompt) => prompt,
                    Err(e) => {
                        error!("failed to retrieve prompt from request: {e}");
                        return Err(ApiError::bad_request("failed to read prompt"))
                    }
                };
                fields.prompt = Some(prompt);
            }
            _ => {}
        }
    }

    Ok(fields)
}
