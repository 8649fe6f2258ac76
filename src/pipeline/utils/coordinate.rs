use serde::{Deserialize, Serialize};
use crate::pipeline::model_config::config::{
    FACE_MESH_LANDMARK_COUNT, FACE_MESH_REFINED_LANDMARK_COUNT, LANDMARK_COORDINATE_MAX, LANDMARK_COORDINATE_MIN,
    POSE_LANDMARK_COUNT,
};

/// A landmark in normalized image coordinates as reported by the detection provider.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: Option<f64>,
    #[serde(default)]
    pub visibility: Option<f64>,
}

impl LandmarkPoint {
    pub fn new(x: f64, y: f64) -> Self {
        LandmarkPoint {
            x,
            y,
            z: None,
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn is_within_frame_range(&self) -> bool {
        let in_range = |v: f64| v.is_finite() && (LANDMARK_COORDINATE_MIN..=LANDMARK_COORDINATE_MAX).contains(&v);
        in_range(self.x) && in_range(self.y)
    }

    /// Pixel position, truncated toward zero. Saturates for values beyond `i64`.
    pub fn to_pixel(&self, width: usize, height: usize) -> (i64, i64) {
        ((self.x * width as f64) as i64, (self.y * height as f64) as i64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FaceLandmarkSet {
    points: Vec<LandmarkPoint>,
}

impl FaceLandmarkSet {
    /// Accepts the plain mesh or the iris-refined mesh; anything else is treated as not detected.
    pub fn new(points: Vec<LandmarkPoint>) -> Option<Self> {
        match points.len() {
            FACE_MESH_LANDMARK_COUNT | FACE_MESH_REFINED_LANDMARK_COUNT => Some(FaceLandmarkSet { points }),
            _ => None,
        }
    }

    pub fn point(&self, index: usize) -> &LandmarkPoint {
        &self.points[index]
    }

    pub fn polygon(&self, indices: &[usize]) -> Vec<LandmarkPoint> {
        indices.iter().map(|&i| self.points[i]).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoseLandmarkSet {
    points: Vec<LandmarkPoint>,
}

impl PoseLandmarkSet {
    pub fn new(points: Vec<LandmarkPoint>) -> Option<Self> {
        if points.len() != POSE_LANDMARK_COUNT {
            return None
        }
        Some(PoseLandmarkSet { points })
    }

    pub fn point(&self, index: usize) -> &LandmarkPoint {
        &self.points[index]
    }
}
