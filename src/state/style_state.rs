use std::sync::Arc;
use crate::pipeline::module::placeholder_image::PlaceholderImage;
use crate::service::style_service::StyleService;

#[derive(Clone)]
pub struct StyleState {
    pub style_service: StyleService,
}

impl StyleState {
    pub fn new(placeholder_image: &Arc<PlaceholderImage>) -> Self {
        Self {
            style_service: StyleService::new(placeholder_image),
        }
    }
}
