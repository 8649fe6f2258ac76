use std::fmt;
use serde::{Deserialize, Serialize};

// Face mesh numbering used by the detection provider.
pub const FACE_MESH_LANDMARK_COUNT: usize = 468;
pub const FACE_MESH_REFINED_LANDMARK_COUNT: usize = 478;
pub const FOREHEAD_CENTER: usize = 10;
pub const CHIN: usize = 152;
pub const LEFT_CHEEK: usize = 234;
pub const RIGHT_CHEEK: usize = 454;
pub const LEFT_CHEEK_REGION: [usize; 3] = [230, 240, 250];
pub const FOREHEAD_REGION: [usize; 3] = [104, 69, 108];

// Pose numbering used by the detection provider.
pub const POSE_LANDMARK_COUNT: usize = 33;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;

// Normalized coordinates may fall slightly outside the frame; anything past one frame is rejected.
pub const LANDMARK_COORDINATE_MIN: f64 = -1.0;
pub const LANDMARK_COORDINATE_MAX: f64 = 2.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FaceShape {
    Long,
    Round,
    Oval,
    Undetermined,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShoulderLine {
    Sloped,
    Straight,
    Undetermined,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BaseColor {
    Warm,
    Cool,
    Undetermined,
}

/// Two-bucket season mapping: warm is spring, cool is summer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Undetermined,
}

pub fn match_season(base_color: BaseColor) -> Season {
    match base_color {
        BaseColor::Warm => Season::Spring,
        BaseColor::Cool => Season::Summer,
        BaseColor::Undetermined => Season::Undetermined,
    }
}

impl fmt::Display for FaceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FaceShape::Long => "long",
            FaceShape::Round => "round",
            FaceShape::Oval => "oval",
            FaceShape::Undetermined => "undetermined",
        };
        f.write_str(label)
    }
}

impl fmt::Display for ShoulderLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ShoulderLine::Sloped => "sloped",
            ShoulderLine::Straight => "straight",
            ShoulderLine::Undetermined => "undetermined",
        };
        f.write_str(label)
    }
}

impl fmt::Display for BaseColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BaseColor::Warm => "warm",
            BaseColor::Cool => "cool",
            BaseColor::Undetermined => "undetermined",
        };
        f.write_str(label)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Undetermined => "undetermined",
        };
        f.write_str(label)
    }
}

/// Empirical cutoffs of the feature classifier. Hue bounds are on the 0-180 scale.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub long_face_ratio: f64,
    pub round_face_ratio: f64,
    pub sloped_shoulder_diff: f64,
    pub shoulder_visibility: f64,
    pub warm_hue_low: f64,
    pub warm_hue_high: f64,
}

impl ClassifierConfig {
    pub fn new() -> Self {
        ClassifierConfig {
            long_face_ratio: 1.5,
            round_face_ratio: 1.35,
            sloped_shoulder_diff: 0.03,
            shoulder_visibility: 0.5,
            warm_hue_low: 20.0,
            warm_hue_high: 160.0,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct PlaceholderImageConfig {
    pub image_size: (u32, u32),
    pub background: [u8; 3],
    pub text_color: [u8; 3],
    pub text_origin: (i32, i32),
    pub font_size: f32,
    pub line_height: i32,
    pub max_line_chars: usize,
}

impl PlaceholderImageConfig {
    pub fn new() -> Self {
        PlaceholderImageConfig {
            image_size: (600, 400),
            background: [230, 240, 255],
            text_color: [0, 0, 0],
            text_origin: (10, 10),
            font_size: 16.0,
            line_height: 20,
            max_line_chars: 64,
        }
    }
}
