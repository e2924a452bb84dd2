use std::path::Path;

use anyhow::{Context, Result, anyhow};
use engine::Image;
use image::RgbaImage;

/// Save a decoded image as an RGBA PNG.
pub fn export_png(image: &Image, path: &Path) -> Result<()> {
    let (width, height) = (image.width(), image.height());
    let rgba = RgbaImage::from_raw(width, height, image.to_rgba8())
        .ok_or_else(|| anyhow!("pixel buffer does not match {width}x{height}"))?;
    rgba.save(path)
        .with_context(|| format!("failed to write {:?}", path))
}
