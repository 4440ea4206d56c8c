use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine;
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageError};
use thiserror::Error;

use crate::llm::ImagePayload;

/// Longest edge sent to the vision model.
pub const MAX_VISION_EDGE: u32 = 1568;

#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("Failed to load image: {0}")]
    Load(#[from] ImageError),
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Where the rendered screen comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    /// Remote image, passed to the model as-is
    Url(String),
    /// Local raster, thumbnailed and inlined as a `data:` URL
    Path(PathBuf),
}

impl ImageInput {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("data:")
        {
            ImageInput::Url(trimmed.to_string())
        } else {
            ImageInput::Path(PathBuf::from(trimmed))
        }
    }
}

pub fn load_image(path: &Path) -> Result<DynamicImage, ImageLoadError> {
    if !path.exists() {
        return Err(ImageLoadError::NotFound(path.display().to_string()));
    }
    Ok(image::open(path)?)
}

/// Downscale so the longest edge is at most `max_size`, keeping aspect ratio.
pub fn create_thumbnail(img: &DynamicImage, max_size: u32) -> DynamicImage {
    let (w, h) = img.dimensions();
    if w <= max_size && h <= max_size {
        return img.clone();
    }

    let scale = if w > h {
        max_size as f32 / w as f32
    } else {
        max_size as f32 / h as f32
    };

    let new_w = ((w as f32 * scale) as u32).max(1);
    let new_h = ((h as f32 * scale) as u32).max(1);

    img.resize(new_w, new_h, FilterType::Lanczos3)
}

pub fn encode_png_data_url(img: &DynamicImage) -> Result<String, ImageLoadError> {
    let mut buf = Vec::new();
    let mut cursor = Cursor::new(&mut buf);
    img.write_to(&mut cursor, image::ImageOutputFormat::Png)
        .map_err(|e| ImageLoadError::Encode(e.to_string()))?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&buf)
    ))
}

/// Turn an image input into the reference sent alongside the validation prompt.
pub fn to_image_payload(input: &ImageInput) -> Result<ImagePayload, ImageLoadError> {
    match input {
        ImageInput::Url(url) => Ok(ImagePayload { url: url.clone() }),
        ImageInput::Path(path) => {
            let img = load_image(path)?;
            let thumb = create_thumbnail(&img, MAX_VISION_EDGE);
            Ok(ImagePayload {
                url: encode_png_data_url(&thumb)?,
            })
        }
    }
}
