use std::io::Cursor;
use std::path::Path;
use anyhow::{Error, Result};
use image::{ImageFormat, ImageReader, RgbImage};
use ndarray::Array3;

/// Decoded RGB pixels laid out as (height, width, channel).
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixels: Array3<u8>,
}

impl RasterImage {
    pub fn from_rgb(image: RgbImage) -> Result<Self, Error> {
        let (width, height) = image.dimensions();
        let pixels = Array3::from_shape_vec((height as usize, width as usize, 3), image.into_raw())?;
        Ok(RasterImage { pixels })
    }

    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Self
        where
            F: Fn(usize, usize) -> [u8; 3],
    {
        let pixels = Array3::from_shape_fn((height, width, 3), |(y, x, c)| f(x, y)[c]);
        RasterImage { pixels }
    }

    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    pub fn pixels(&self) -> &Array3<u8> {
        &self.pixels
    }
}

#[cfg(test)]
pub fn byte_data_to_raster(im_bytes: &[u8]) -> Result<RasterImage, Error> {
    let decoded = image::load_from_memory(im_bytes)?;
    RasterImage::from_rgb(decoded.to_rgb8())
}

pub fn read_raster(path: &Path) -> Result<RasterImage, Error> {
    let decoded = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?;
    RasterImage::from_rgb(decoded.to_rgb8())
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

#[cfg(test)]
pub fn encode_solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Result<Vec<u8>, Error> {
    encode_png(&RgbImage::from_pixel(width, height, image::Rgb(rgb)))
}
