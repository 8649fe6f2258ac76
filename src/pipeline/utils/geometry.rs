use image::{GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use palette::{FromColor, Hsv as ColorHsv, Srgb};
use crate::pipeline::utils::coordinate::LandmarkPoint;
use crate::pipeline::utils::image::RasterImage;

const MASK_ON: Luma<u8> = Luma([255]);

/// 8-bit HSV: hue in [0, 180), saturation and value in [0, 255].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

pub fn horizontal_span(a: &LandmarkPoint, b: &LandmarkPoint, width: usize) -> f64 {
    (a.x - b.x).abs() * width as f64
}

pub fn vertical_span(a: &LandmarkPoint, b: &LandmarkPoint, height: usize) -> f64 {
    (a.y - b.y).abs() * height as f64
}

/// Average color under the polygon spanned by `polygon`, or `None` when it covers no pixel.
pub fn region_average_hsv(image: &RasterImage, polygon: &[LandmarkPoint]) -> Option<Hsv> {
    let (width, height) = (image.width(), image.height());
    let points: Vec<(i64, i64)> = polygon.iter().map(|p| p.to_pixel(width, height)).collect();
    let mask = fill_polygon_mask(width, height, &points);

    let pixels = image.pixels();
    let mut sum = [0f64; 3];
    let mut count: u64 = 0;
    for (x, y, value) in mask.enumerate_pixels() {
        if value[0] == 0 {
            continue
        }
        for c in 0..3 {
            sum[c] += pixels[[y as usize, x as usize, c]] as f64;
        }
        count += 1;
    }

    if count == 0 {
        return None
    }

    let mean = sum.map(|s| (s / count as f64) as u8);
    Some(rgb_to_hsv(mean[0], mean[1], mean[2]))
}

/// Converts to the 8-bit HSV scale: hue halved into [0, 180), saturation and value scaled to [0, 255].
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let hsv: ColorHsv = ColorHsv::from_color(Srgb::new(r, g, b).into_format::<f32>());

    let mut h = (hsv.hue.into_positive_degrees() as f64 / 2.0).round();
    if h >= 180.0 {
        h -= 180.0;
    }

    Hsv {
        h,
        s: (hsv.saturation as f64 * 255.0).round(),
        v: (hsv.value as f64 * 255.0).round(),
    }
}

/// Rasterizes a closed polygon given in pixel coordinates into a mask where covered pixels are 255.
/// Outline pixels are always set, so collinear and single-point polygons still cover what they touch.
pub fn fill_polygon_mask(width: usize, height: usize, points: &[(i64, i64)]) -> GrayImage {
    let mut mask = GrayImage::new(width as u32, height as u32);
    if width == 0 || height == 0 {
        return mask
    }

    // vertices are clamped to one image size around the frame
    let (w, h) = (width as i64, height as i64);
    let mut vertices: Vec<Point<i32>> = Vec::with_capacity(points.len());
    for &(x, y) in points {
        let vertex = Point::new(x.clamp(-w, 2 * w) as i32, y.clamp(-h, 2 * h) as i32);
        if vertices.last() != Some(&vertex) {
            vertices.push(vertex);
        }
    }
    while vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }

    match vertices.as_slice() {
        [] => {}
        [only] => {
            if only.x >= 0 && only.y >= 0 && (only.x as i64) < w && (only.y as i64) < h {
                mask.put_pixel(only.x as u32, only.y as u32, MASK_ON);
            }
        }
        polygon => draw_polygon_mut(&mut mask, polygon, MASK_ON),
    }

    mask
}
