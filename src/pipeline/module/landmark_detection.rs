use std::time::Duration;
use async_trait::async_trait;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use log::{debug, warn};
use serde::Deserialize;
use crate::error::errors::ProviderError;
use crate::pipeline::utils::coordinate::{FaceLandmarkSet, LandmarkPoint, PoseLandmarkSet};

const PROVIDER: &str = "landmark detector";

/// Landmarks found in one image. Either set may be missing independently.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub face: Option<FaceLandmarkSet>,
    pub pose: Option<PoseLandmarkSet>,
}

#[async_trait]
pub trait LandmarkDetector: Send + Sync {
    async fn detect(&self, im_bytes: Bytes, content_type: &str) -> Result<Detection, ProviderError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetectionResponse {
    #[serde(default)]
    face_landmarks: Option<Vec<LandmarkPoint>>,
    #[serde(default)]
    pose_landmarks: Option<Vec<LandmarkPoint>>,
}

impl From<DetectionResponse> for Detection {
    fn from(resp: DetectionResponse) -> Self {
        let face = resp.face_landmarks
            .and_then(|points| usable_points(points, "face mesh"))
            .and_then(|points| {
                let count = points.len();
                let face = FaceLandmarkSet::new(points);
                if face.is_none() {
                    warn!("discarding incomplete face mesh with {count} points");
                }
                face
            });
        let pose = resp.pose_landmarks
            .and_then(|points| usable_points(points, "pose"))
            .and_then(|points| {
                let count = points.len();
                let pose = PoseLandmarkSet::new(points);
                if pose.is_none() {
                    warn!("discarding incomplete pose with {count} points");
                }
                pose
            });
        Detection { face, pose }
    }
}

fn usable_points(points: Vec<LandmarkPoint>, kind: &str) -> Option<Vec<LandmarkPoint>> {
    match points.iter().position(|p| !p.is_within_frame_range()) {
        Some(index) => {
            warn!("discarding {kind}: landmark {index} is out of range ({}, {})", points[index].x, points[index].y);
            None
        }
        None => Some(points),
    }
}

/// Face mesh and pose estimation served by an inference sidecar over HTTP.
#[derive(Debug, Clone)]
pub struct HttpLandmarkDetector {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLandmarkDetector {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ProviderError::Transport { provider: PROVIDER, source })?;
        Ok(HttpLandmarkDetector {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl LandmarkDetector for HttpLandmarkDetector {
    async fn detect(&self, im_bytes: Bytes, content_type: &str) -> Result<Detection, ProviderError> {
        let response = self.client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, content_type)
            .body(im_bytes)
            .send()
            .await
            .map_err(|source| ProviderError::Transport { provider: PROVIDER, source })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| ProviderError::Transport { provider: PROVIDER, source })?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            })
        }

        let detection = parse_detection(&body)?;
        debug!(
            "landmark detection finished: face={}, pose={}",
            detection.face.is_some(),
            detection.pose.is_some()
        );
        Ok(detection)
    }
}

pub fn parse_detection(body: &[u8]) -> Result<Detection, ProviderError> {
    let resp: DetectionResponse = serde_json::from_slice(body)
        .map_err(|source| ProviderError::Malformed { provider: PROVIDER, source })?;
    Ok(Detection::from(resp))
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use super::*;

    async fn detect_landmarks(headers: HeaderMap, body: Bytes) -> (StatusCode, Json<Value>) {
        let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()).unwrap_or_default();
        if content_type != "image/jpeg" || body.as_ref() != b"jpeg bytes" {
            return (StatusCode::UNSUPPORTED_MEDIA_TYPE, Json(json!({"detail": content_type})))
        }
        (StatusCode::OK, Json(json!({"faceLandmarks": points(468), "poseLandmarks": null})))
    }

    async fn overloaded() -> (StatusCode, &'static str) {
        (StatusCode::SERVICE_UNAVAILABLE, "model is overloaded")
    }

    async fn spawn_sidecar() -> String {
        let app = Router::new()
            .route("/v1/landmarks", post(detect_landmarks))
            .route("/v1/overloaded", post(overloaded));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    fn points(n: usize) -> Vec<serde_json::Value> {
        (0..n).map(|_| json!({"x": 0.5, "y": 0.5, "z": 0.0, "visibility": 0.9})).collect()
    }

    #[test]
    fn test_parse_full_detection() {
        let body = json!({"faceLandmarks": points(478), "poseLandmarks": points(33)}).to_string();
        let detection = parse_detection(body.as_bytes()).unwrap();
        assert!(detection.face.is_some());
        assert_eq!(detection.pose.unwrap().point(11).visibility, Some(0.9));
    }

    #[test]
    fn test_parse_nothing_detected() {
        let detection = parse_detection(br#"{"faceLandmarks": null}"#).unwrap();
        assert!(detection.face.is_none());
        assert!(detection.pose.is_none());
    }

    #[test]
    fn test_incomplete_sets_are_dropped() {
        let body = json!({"faceLandmarks": points(10), "poseLandmarks": points(17)}).to_string();
        let detection = parse_detection(body.as_bytes()).unwrap();
        assert!(detection.face.is_none());
        assert!(detection.pose.is_none());
    }

    #[test]
    fn test_out_of_range_sets_are_dropped() {
        let mut face = points(478);
        face[234] = json!({"x": 1e300, "y": 0.5});
        let mut pose = points(33);
        pose[11] = json!({"x": 0.4, "y": -3.0, "visibility": 0.9});
        let body = json!({"faceLandmarks": face, "poseLandmarks": pose}).to_string();
        let detection = parse_detection(body.as_bytes()).unwrap();
        assert!(detection.face.is_none());
        assert!(detection.pose.is_none());

        let mut face = points(478);
        face[10] = json!({"x": 1.2, "y": -0.1});
        let body = json!({"faceLandmarks": face}).to_string();
        assert!(parse_detection(body.as_bytes()).unwrap().face.is_some());
    }

    #[test]
    fn test_malformed_body() {
        let err = parse_detection(b"<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_detect_forwards_upload() {
        let base = spawn_sidecar().await;
        let detector = HttpLandmarkDetector::new(&format!("{base}/v1/landmarks"), Duration::from_secs(5)).unwrap();

        let detection = detector.detect(Bytes::from_static(b"jpeg bytes"), "image/jpeg").await.unwrap();
        assert!(detection.face.is_some());
        assert!(detection.pose.is_none());

        let err = detector.detect(Bytes::from_static(b"jpeg bytes"), "image/png").await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 415, .. }));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let base = spawn_sidecar().await;
        let detector = HttpLandmarkDetector::new(&format!("{base}/v1/overloaded"), Duration::from_secs(5)).unwrap();

        match detector.detect(Bytes::from_static(b"img"), "image/png").await.unwrap_err() {
            ProviderError::Status { status, body, .. } => {
                assert_eq!(status, 503);
                assert_eq!(body, "model is overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_sidecar_is_transport_error() {
        let detector = HttpLandmarkDetector::new("http://127.0.0.1:9/v1/landmarks", Duration::from_secs(1)).unwrap();
        let err = detector.detect(Bytes::from_static(b"img"), "image/png").await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport { .. }));
    }
}
