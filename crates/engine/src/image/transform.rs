use super::Image;
use crate::{Interpolate, ResourceError, Result};

impl Image {
    /// Copy `src` into `self` with its top-left corner at (`x`, `y`).
    pub fn blit(&mut self, src: &Image, x: u32, y: u32) -> Result<()> {
        if self.format != src.format {
            return Err(ResourceError::FormatMismatch {
                dst: self.format,
                src: src.format,
            });
        }

        if x as u64 + src.width as u64 > self.width as u64
            || y as u64 + src.height as u64 > self.height as u64
        {
            return Err(ResourceError::OutOfRange {
                x,
                y,
                width: src.width,
                height: src.height,
                dst_width: self.width,
                dst_height: self.height,
            });
        }

        let n = self.channels();
        let row_len = src.width as usize * n;
        for row in 0..src.height as usize {
            let dst_start = ((y as usize + row) * self.width as usize + x as usize) * n;
            let src_start = row * row_len;
            self.pixels[dst_start..dst_start + row_len]
                .copy_from_slice(&src.pixels[src_start..src_start + row_len]);
        }
        Ok(())
    }

    /// Bilinear upscale to `round(width * factor) x round(height * factor)`.
    ///
    /// # Panics
    ///
    /// Panics if `factor < 1.0` (or NaN); downscaling is not supported.
    pub fn scale(&self, factor: f32) -> Image {
        assert!(factor >= 1.0, "Image::scale only upscales (factor = {factor})");

        let new_width = (self.width as f32 * factor).round() as u32;
        let new_height = (self.height as f32 * factor).round() as u32;
        let n = self.channels();
        let mut out = Image::create(self.format, new_width, new_height);
        if self.width == 0 || self.height == 0 {
            return out;
        }

        let src_w = self.width as usize;
        let src_h = self.height as usize;
        let sample = |x: usize, y: usize, c: usize| self.pixels[(y * src_w + x) * n + c] as f32;

        for dst_y in 0..new_height as usize {
            let src_fy = dst_y as f64 * src_h as f64 / new_height as f64;
            let y0 = (src_fy as usize).min(src_h - 1);
            let y1 = (y0 + 1).min(src_h - 1);
            let ty = (src_fy - y0 as f64) as f32;

            for dst_x in 0..new_width as usize {
                let src_fx = dst_x as f64 * src_w as f64 / new_width as f64;
                let x0 = (src_fx as usize).min(src_w - 1);
                let x1 = (x0 + 1).min(src_w - 1);
                let tx = (src_fx - x0 as f64) as f32;

                let dst = (dst_y * new_width as usize + dst_x) * n;
                for c in 0..n {
                    let top = Interpolate::lerp(&sample(x0, y0, c), &sample(x1, y0, c), tx);
                    let bottom = Interpolate::lerp(&sample(x0, y1, c), &sample(x1, y1, c), tx);
                    let value = Interpolate::lerp(&top, &bottom, ty);
                    out.pixels[dst + c] = value.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
        out
    }
}
