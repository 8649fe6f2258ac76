use ab_glyph::{FontRef, PxScale};
use anyhow::{anyhow, Error};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use log::info;
use crate::pipeline::model_config::config::PlaceholderImageConfig;
use crate::pipeline::utils::image::encode_png;

const FONT: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSans.ttf");
const CAPTION: &str = "AI generated image (preview)";

/// Stand-in for a generated style image: a flat canvas captioned with the requested prompt.
#[derive(Debug)]
pub struct PlaceholderImage {
    config: PlaceholderImageConfig,
    font: FontRef<'static>,
}

impl PlaceholderImage {
    pub fn new(config: PlaceholderImageConfig) -> Result<Self, Error> {
        let font = FontRef::try_from_slice(FONT).map_err(|e| anyhow!("failed to load placeholder font: {e}"))?;
        Ok(PlaceholderImage { config, font })
    }

    pub fn render(&self, prompt: &str) -> Result<Vec<u8>, Error> {
        info!("rendering placeholder style image for prompt of {} characters", prompt.chars().count());

        let (width, height) = self.config.image_size;
        let mut canvas = RgbImage::from_pixel(width, height, Rgb(self.config.background));
        let scale = PxScale::from(self.config.font_size);

        let (x, mut y) = self.config.text_origin;
        for line in caption_lines(prompt, self.config.max_line_chars) {
            if y + self.config.line_height > height as i32 {
                break
            }
            draw_text_mut(&mut canvas, Rgb(self.config.text_color), x, y, scale, &self.font, &line);
            y += self.config.line_height;
        }

        encode_png(&canvas)
    }
}

fn caption_lines(prompt: &str, max_chars: usize) -> Vec<String> {
    let text = format!("{CAPTION}\nPrompt: {prompt}");
    text.lines()
        .flat_map(|line| {
            let chars: Vec<char> = line.chars().collect();
            if chars.is_empty() {
                return vec![String::new()]
            }
            chars.chunks(max_chars.max(1)).map(|c| c.iter().collect()).collect()
        })
        .collect()
}
