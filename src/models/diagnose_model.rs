use bytes::Bytes;
use serde::Serialize;
use crate::pipeline::model_config::config::{FaceShape, ShoulderLine};
use crate::pipeline::module::style_advisor::AiProposal;

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResultOutput {
    pub face_shape: FaceShape,
    /// `<season> (<baseColor>)`
    pub season: String,
    pub shoulder_line: ShoulderLine,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnoseResultOutput {
    pub analysis_result: AnalysisResultOutput,
    pub ai_proposals: AiProposal,
}

#[derive(Clone)]
pub struct DiagnoseInput {
    pub im_bytes: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}
