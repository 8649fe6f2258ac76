use serde::Serialize;
use crate::pipeline::model_config::config::{
    match_season, BaseColor, ClassifierConfig, FaceShape, Season, ShoulderLine, CHIN, FOREHEAD_CENTER,
    FOREHEAD_REGION, LEFT_CHEEK, LEFT_CHEEK_REGION, LEFT_SHOULDER, RIGHT_CHEEK, RIGHT_SHOULDER,
};
use crate::pipeline::utils::coordinate::{FaceLandmarkSet, LandmarkPoint, PoseLandmarkSet};
use crate::pipeline::utils::geometry::{horizontal_span, region_average_hsv, vertical_span};
use crate::pipeline::utils::image::RasterImage;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalColor {
    pub base_color: BaseColor,
    pub season: Season,
}

impl PersonalColor {
    pub fn undetermined() -> Self {
        PersonalColor {
            base_color: BaseColor::Undetermined,
            season: Season::Undetermined,
        }
    }

    /// Display form, e.g. `spring (warm)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.season, self.base_color)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub face_shape: FaceShape,
    pub shoulder_line: ShoulderLine,
    pub personal_color: PersonalColor,
}

/// Fixed-threshold classification of landmark geometry and skin color.
///
/// Every rule degrades to an `Undetermined` label when its inputs are missing or
/// degenerate; `classify` never fails.
#[derive(Debug, Clone, Default)]
pub struct FeatureClassifier {
    config: ClassifierConfig,
}

impl FeatureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        FeatureClassifier { config }
    }

    pub fn classify(
        &self,
        face: Option<&FaceLandmarkSet>,
        pose: Option<&PoseLandmarkSet>,
        image: &RasterImage,
    ) -> ClassificationResult {
        let face_shape = match face {
            Some(face) => self.face_shape(face, image.width(), image.height()),
            None => FaceShape::Undetermined,
        };
        let shoulder_line = match pose {
            Some(pose) => self.shoulder_line(pose),
            None => ShoulderLine::Undetermined,
        };
        let personal_color = match face {
            Some(face) => self.personal_color(face, image),
            None => PersonalColor::undetermined(),
        };

        ClassificationResult {
            face_shape,
            shoulder_line,
            personal_color,
        }
    }

    fn face_shape(&self, face: &FaceLandmarkSet, width: usize, height: usize) -> FaceShape {
        let face_width = horizontal_span(face.point(LEFT_CHEEK), face.point(RIGHT_CHEEK), width);
        let face_height = vertical_span(face.point(FOREHEAD_CENTER), face.point(CHIN), height);
        let measurable = |span: f64| span.is_finite() && span > 0.0;
        if !measurable(face_width) || !measurable(face_height) {
            return FaceShape::Undetermined
        }
        self.face_shape_from_ratio(face_height / face_width)
    }

    pub fn face_shape_from_ratio(&self, ratio: f64) -> FaceShape {
        if ratio > self.config.long_face_ratio {
            FaceShape::Long
        } else if ratio < self.config.round_face_ratio {
            FaceShape::Round
        } else {
            FaceShape::Oval
        }
    }

    fn shoulder_line(&self, pose: &PoseLandmarkSet) -> ShoulderLine {
        let left = pose.point(LEFT_SHOULDER);
        let right = pose.point(RIGHT_SHOULDER);
        let threshold = self.config.shoulder_visibility;
        let visible = |p: &LandmarkPoint| p.visibility.is_some_and(|v| v > threshold);
        let y_diff = (left.y - right.y).abs();
        if !visible(left) || !visible(right) || !y_diff.is_finite() {
            return ShoulderLine::Undetermined
        }
        self.shoulder_line_from_diff(y_diff)
    }

    pub fn shoulder_line_from_diff(&self, y_diff: f64) -> ShoulderLine {
        if y_diff >= self.config.sloped_shoulder_diff {
            ShoulderLine::Sloped
        } else {
            ShoulderLine::Straight
        }
    }

    fn personal_color(&self, face: &FaceLandmarkSet, image: &RasterImage) -> PersonalColor {
        let cheek = region_average_hsv(image, &face.polygon(&LEFT_CHEEK_REGION));
        let forehead = region_average_hsv(image, &face.polygon(&FOREHEAD_REGION));
        match (cheek, forehead) {
            (Some(cheek), Some(forehead)) => self.personal_color_from_hue((cheek.h + forehead.h) / 2.0),
            _ => PersonalColor::undetermined(),
        }
    }

    pub fn personal_color_from_hue(&self, hue: f64) -> PersonalColor {
        let base_color = if hue < self.config.warm_hue_low || hue > self.config.warm_hue_high {
            BaseColor::Warm
        } else {
            BaseColor::Cool
        };
        PersonalColor {
            base_color,
            season: match_season(base_color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_set(edit: impl Fn(&mut Vec<LandmarkPoint>)) -> FaceLandmarkSet {
        let mut points = vec![LandmarkPoint::new(0.5, 0.5); 478];
        edit(&mut points);
        FaceLandmarkSet::new(points).unwrap()
    }

    /// Cheeks at x 0.0 and 0.5, forehead at y 0.0 and chin at y 0.5.
    fn face_with_span() -> FaceLandmarkSet {
        face_set(|p| {
            p[LEFT_CHEEK] = LandmarkPoint::new(0.0, 0.5);
            p[RIGHT_CHEEK] = LandmarkPoint::new(0.5, 0.5);
            p[FOREHEAD_CENTER] = LandmarkPoint::new(0.25, 0.0);
            p[CHIN] = LandmarkPoint::new(0.25, 0.5);
        })
    }

    fn pose_set(left: LandmarkPoint, right: LandmarkPoint) -> PoseLandmarkSet {
        let mut points = vec![LandmarkPoint::default(); 33];
        points[LEFT_SHOULDER] = left;
        points[RIGHT_SHOULDER] = right;
        PoseLandmarkSet::new(points).unwrap()
    }

    fn gray(width: usize, height: usize) -> RasterImage {
        RasterImage::from_fn(width, height, |_, _| [128, 128, 128])
    }

    #[test]
    fn test_face_shape_boundaries() {
        let classifier = FeatureClassifier::default();
        // face width is 100px on a 200px wide image; height is half the image height
        let cases = [
            (300, FaceShape::Oval),
            (270, FaceShape::Oval),
            (320, FaceShape::Long),
            (200, FaceShape::Round),
        ];
        for (image_height, expected) in cases {
            let result = classifier.classify(Some(&face_with_span()), None, &gray(200, image_height));
            assert_eq!(result.face_shape, expected, "image height {image_height}");
        }
    }

    #[test]
    fn test_face_shape_from_ratio() {
        let classifier = FeatureClassifier::default();
        assert_eq!(classifier.face_shape_from_ratio(1.5), FaceShape::Oval);
        assert_eq!(classifier.face_shape_from_ratio(1.35), FaceShape::Oval);
        assert_eq!(classifier.face_shape_from_ratio(1.6), FaceShape::Long);
        assert_eq!(classifier.face_shape_from_ratio(1.0), FaceShape::Round);
    }

    #[test]
    fn test_coinciding_cheeks_are_undetermined() {
        let face = face_set(|p| {
            p[LEFT_CHEEK] = LandmarkPoint::new(0.4, 0.5);
            p[RIGHT_CHEEK] = LandmarkPoint::new(0.4, 0.6);
            p[FOREHEAD_CENTER] = LandmarkPoint::new(0.4, 0.1);
            p[CHIN] = LandmarkPoint::new(0.4, 0.9);
        });
        let result = FeatureClassifier::default().classify(Some(&face), None, &gray(100, 100));
        assert_eq!(result.face_shape, FaceShape::Undetermined);
    }

    #[test]
    fn test_shoulder_line_boundaries() {
        let classifier = FeatureClassifier::default();
        let image = gray(10, 10);

        let exact = pose_set(
            LandmarkPoint::new(0.3, 0.0).with_visibility(0.9),
            LandmarkPoint::new(0.7, 0.03).with_visibility(0.9),
        );
        assert_eq!(classifier.classify(None, Some(&exact), &image).shoulder_line, ShoulderLine::Sloped);

        let below = pose_set(
            LandmarkPoint::new(0.3, 0.0).with_visibility(0.9),
            LandmarkPoint::new(0.7, 0.029999).with_visibility(0.9),
        );
        assert_eq!(classifier.classify(None, Some(&below), &image).shoulder_line, ShoulderLine::Straight);

        assert_eq!(classifier.shoulder_line_from_diff(0.03), ShoulderLine::Sloped);
        assert_eq!(classifier.shoulder_line_from_diff(0.029999), ShoulderLine::Straight);
    }

    #[test]
    fn test_low_visibility_shoulders_are_undetermined() {
        let classifier = FeatureClassifier::default();
        let image = gray(10, 10);

        let hidden = pose_set(
            LandmarkPoint::new(0.3, 0.0).with_visibility(0.5),
            LandmarkPoint::new(0.7, 0.2).with_visibility(0.9),
        );
        assert_eq!(classifier.classify(None, Some(&hidden), &image).shoulder_line, ShoulderLine::Undetermined);

        let unknown = pose_set(LandmarkPoint::new(0.3, 0.0), LandmarkPoint::new(0.7, 0.2));
        assert_eq!(classifier.classify(None, Some(&unknown), &image).shoulder_line, ShoulderLine::Undetermined);
    }

    #[test]
    fn test_personal_color_from_hue() {
        let classifier = FeatureClassifier::default();
        let warm = PersonalColor { base_color: BaseColor::Warm, season: Season::Spring };
        let cool = PersonalColor { base_color: BaseColor::Cool, season: Season::Summer };
        assert_eq!(classifier.personal_color_from_hue(10.0), warm);
        assert_eq!(classifier.personal_color_from_hue(90.0), cool);
        assert_eq!(classifier.personal_color_from_hue(161.0), warm);
        assert_eq!(classifier.personal_color_from_hue(160.0), cool);
        assert_eq!(classifier.personal_color_from_hue(20.0), cool);
    }

    #[test]
    fn test_personal_color_from_skin_pixels() {
        let classifier = FeatureClassifier::default();
        let face = face_with_span();

        let orange = RasterImage::from_fn(40, 40, |_, _| [255, 128, 0]);
        let result = classifier.classify(Some(&face), None, &orange);
        assert_eq!(result.personal_color.base_color, BaseColor::Warm);
        assert_eq!(result.personal_color.season, Season::Spring);

        let blue = RasterImage::from_fn(40, 40, |_, _| [0, 0, 255]);
        let result = classifier.classify(Some(&face), None, &blue);
        assert_eq!(result.personal_color.base_color, BaseColor::Cool);
        assert_eq!(result.personal_color.season, Season::Summer);

        let magenta = RasterImage::from_fn(40, 40, |_, _| [255, 0, 40]);
        let result = classifier.classify(Some(&face), None, &magenta);
        assert_eq!(result.personal_color.base_color, BaseColor::Warm);
    }

    #[test]
    fn test_sample_regions_outside_image_are_undetermined() {
        let face = face_set(|p| {
            for &i in LEFT_CHEEK_REGION.iter() {
                p[i] = LandmarkPoint::new(3.0, 3.0);
            }
        });
        let result = FeatureClassifier::default().classify(Some(&face), None, &gray(20, 20));
        assert_eq!(result.personal_color, PersonalColor::undetermined());
    }

    #[test]
    fn test_extreme_coordinates_still_classify() {
        let face = face_set(|p| {
            p[LEFT_CHEEK_REGION[0]] = LandmarkPoint::new(1e300, 0.5);
            p[FOREHEAD_REGION[0]] = LandmarkPoint::new(-1e300, f64::NAN);
            p[RIGHT_CHEEK] = LandmarkPoint::new(f64::INFINITY, 0.5);
        });
        let orange = RasterImage::from_fn(40, 40, |_, _| [255, 128, 0]);
        let result = FeatureClassifier::default().classify(Some(&face), None, &orange);
        assert_eq!(result.face_shape, FaceShape::Undetermined);
        assert_eq!(result.personal_color.base_color, BaseColor::Warm);

        let pose = pose_set(
            LandmarkPoint::new(0.3, f64::NAN).with_visibility(0.9),
            LandmarkPoint::new(0.7, 0.4).with_visibility(f64::NAN),
        );
        let result = FeatureClassifier::default().classify(None, Some(&pose), &orange);
        assert_eq!(result.shoulder_line, ShoulderLine::Undetermined);
    }

    #[test]
    fn test_missing_face_leaves_face_labels_undetermined() {
        let pose = pose_set(
            LandmarkPoint::new(0.3, 0.4).with_visibility(0.99),
            LandmarkPoint::new(0.7, 0.4).with_visibility(0.99),
        );
        let image = RasterImage::from_fn(20, 20, |_, _| [255, 128, 0]);
        let result = FeatureClassifier::default().classify(None, Some(&pose), &image);
        assert_eq!(result.face_shape, FaceShape::Undetermined);
        assert_eq!(result.personal_color, PersonalColor::undetermined());
        assert_eq!(result.shoulder_line, ShoulderLine::Straight);
    }

    #[test]
    fn test_nothing_detected() {
        let result = FeatureClassifier::default().classify(None, None, &gray(0, 0));
        assert_eq!(result.face_shape, FaceShape::Undetermined);
        assert_eq!(result.shoulder_line, ShoulderLine::Undetermined);
        assert_eq!(result.personal_color, PersonalColor::undetermined());
    }

    #[test]
    fn test_long_face_without_pose() {
        // 100px wide, 160px tall face
        let result = FeatureClassifier::default().classify(Some(&face_with_span()), None, &gray(200, 320));
        assert_eq!(result.face_shape, FaceShape::Long);
        assert_eq!(result.shoulder_line, ShoulderLine::Undetermined);
        // flat gray has hue 0
        assert_eq!(result.personal_color.label(), "spring (warm)");
    }

    #[test]
    fn test_serialized_shape() {
        let result = FeatureClassifier::default().classify(None, None, &gray(1, 1));
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["faceShape"], "undetermined");
        assert_eq!(json["shoulderLine"], "undetermined");
        assert_eq!(json["personalColor"]["baseColor"], "undetermined");
        assert_eq!(json["personalColor"]["season"], "undetermined");
    }
}
