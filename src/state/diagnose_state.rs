use std::sync::Arc;
use crate::pipeline::diagnose_pipeline::diagnose_pipeline::DiagnosePipeline;
use crate::service::diagnose_service::DiagnoseService;

#[derive(Clone)]
pub struct DiagnoseState {
    pub diagnose_service: DiagnoseService,
}

impl DiagnoseState {
    pub fn new(pipeline: &Arc<DiagnosePipeline>) -> Self {
        Self {
            diagnose_service: DiagnoseService::new(pipeline),
        }
    }
}
