pub mod feature_classifier;
pub mod landmark_detection;
pub mod placeholder_image;
pub mod style_advisor;
