use std::sync::Arc;
use log::error;
use opentelemetry::global;
use opentelemetry::trace::{Span, Status, Tracer};
use opentelemetry::KeyValue;
use crate::error::errors::PipelineError;
use crate::models::diagnose_model::{AnalysisResultOutput, DiagnoseInput, DiagnoseResultOutput};
use crate::pipeline::diagnose_pipeline::diagnose_pipeline::DiagnosePipeline;
use crate::pipeline::utils::temp_file::upload_extension;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Clone)]
pub struct DiagnoseService {
    diagnose_pipeline: Arc<DiagnosePipeline>,
}

impl DiagnoseService {
    pub fn new(diagnose_pipeline: &Arc<DiagnosePipeline>) -> Self {
        DiagnoseService {
            diagnose_pipeline: Arc::clone(diagnose_pipeline),
        }
    }

    pub async fn diagnose(&self, input: DiagnoseInput) -> Result<DiagnoseResultOutput, PipelineError> {
        let mut span = global::tracer("diagnose_service").start("diagnose");
        span.set_attribute(KeyValue::new("upload.size", input.im_bytes.len() as i64));

        let extension = upload_extension(input.file_name.as_deref());
        let content_type = input.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);

        let result = match self.diagnose_pipeline.diagnose(input.im_bytes, extension.as_deref(), content_type).await {
            Ok(result) => result,
            Err(e) => {
                error!("failed to diagnose image: {e:?}");
                span.set_status(Status::error(e.to_string()));
                span.end();
                return Err(e)
            }
        };

        let classification = result.classification;
        span.set_attribute(KeyValue::new("face_shape", classification.face_shape.to_string()));
        span.set_attribute(KeyValue::new("shoulder_line", classification.shoulder_line.to_string()));
        span.set_attribute(KeyValue::new("personal_color", classification.personal_color.label()));
        span.end();

        Ok(DiagnoseResultOutput {
            analysis_result: AnalysisResultOutput {
                face_shape: classification.face_shape,
                season: classification.personal_color.label(),
                shoulder_line: classification.shoulder_line,
            },
            ai_proposals: result.proposal,
        })
    }
}
