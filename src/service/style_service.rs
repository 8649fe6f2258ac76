use std::sync::Arc;
use log::{error, info};
use crate::error::errors::PipelineError;
use crate::models::style_model::GenerateStyleInput;
use crate::pipeline::module::placeholder_image::PlaceholderImage;

#[derive(Clone)]
pub struct StyleService {
    placeholder_image: Arc<PlaceholderImage>,
}

impl StyleService {
    pub fn new(placeholder_image: &Arc<PlaceholderImage>) -> Self {
        StyleService {
            placeholder_image: Arc::clone(placeholder_image),
        }
    }

    /// There is no generation model behind this yet; the reference photo is accepted and ignored.
    pub async fn generate_style(&self, input: GenerateStyleInput) -> Result<Vec<u8>, PipelineError> {
        info!("generating style image from a {} byte reference photo", input.im_bytes.len());
        drop(input.im_bytes);

        self.placeholder_image.render(&input.prompt).map_err(|e| {
            error!("failed to render placeholder image: {e:?}");
            PipelineError::Render(e)
        })
    }
}
