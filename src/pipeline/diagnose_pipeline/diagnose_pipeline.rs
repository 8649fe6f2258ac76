use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use bytes::Bytes;
use log::info;
use crate::config::settings::Settings;
use crate::error::errors::{PipelineError, ProviderError};
use crate::pipeline::model_config::config::ClassifierConfig;
use crate::pipeline::module::feature_classifier::{ClassificationResult, FeatureClassifier};
use crate::pipeline::module::landmark_detection::{HttpLandmarkDetector, LandmarkDetector};
use crate::pipeline::module::style_advisor::{AiProposal, GeminiStyleAdvisor, StyleAdvisor};
use crate::pipeline::utils::image::read_raster;
use crate::pipeline::utils::temp_file::TempImage;

const DEFAULT_PROVIDER_TIMEOUT: u64 = 30;

#[derive(Clone)]
pub struct DiagnosePipeline {
    landmark_detector: Arc<dyn LandmarkDetector>,
    style_advisor: Arc<dyn StyleAdvisor>,
    feature_classifier: FeatureClassifier,
    temp_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DiagnosisResult {
    pub classification: ClassificationResult,
    pub proposal: AiProposal,
}

impl DiagnosePipeline {
    pub fn new(
        landmark_detector: Arc<dyn LandmarkDetector>,
        style_advisor: Arc<dyn StyleAdvisor>,
        classifier_config: ClassifierConfig,
        temp_dir: PathBuf,
    ) -> Self {
        DiagnosePipeline {
            landmark_detector,
            style_advisor,
            feature_classifier: FeatureClassifier::new(classifier_config),
            temp_dir,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ProviderError> {
        let landmark_detector = HttpLandmarkDetector::new(
            &settings.landmark.endpoint,
            Duration::from_secs(settings.landmark.timeout.unwrap_or(DEFAULT_PROVIDER_TIMEOUT)),
        )?;
        let style_advisor = GeminiStyleAdvisor::new(
            &settings.gemini.base_url,
            &settings.gemini.model,
            &settings.gemini.api_key,
            Duration::from_secs(settings.gemini.timeout.unwrap_or(DEFAULT_PROVIDER_TIMEOUT)),
        )?;

        Ok(Self::new(
            Arc::new(landmark_detector),
            Arc::new(style_advisor),
            ClassifierConfig::new(),
            PathBuf::from(&settings.storage.temp_dir),
        ))
    }

    pub async fn diagnose(&self, im_bytes: Bytes, extension: Option<&str>, content_type: &str) -> Result<DiagnosisResult, PipelineError> {
        // Removed on every return path below.
        let temp_image = TempImage::persist(&self.temp_dir, extension, &im_bytes).await?;

        let path = temp_image.path().to_path_buf();
        let image = tokio::task::spawn_blocking(move || read_raster(&path))
            .await
            .map_err(|e| PipelineError::Decode(e.into()))?
            .map_err(PipelineError::Decode)?;

        let detection = self.landmark_detector
            .detect(im_bytes, content_type)
            .await
            .map_err(PipelineError::Detection)?;

        let classification = self.feature_classifier.classify(detection.face.as_ref(), detection.pose.as_ref(), &image);
        info!(
            "classified image: face_shape={}, shoulder_line={}, personal_color={}",
            classification.face_shape,
            classification.shoulder_line,
            classification.personal_color.label()
        );

        // Landmark geometry and pixels never reach the text provider.
        drop(detection);
        drop(image);

        let proposal = self.style_advisor
            .propose(&classification)
            .await
            .map_err(PipelineError::Proposal)?;

        Ok(DiagnosisResult { classification, proposal })
    }
}
