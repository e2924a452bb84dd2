//! Canonical CPU-side pixel buffers and the texture record codec.
//!
//! A texture record is a fixed [`TextureHeader`] followed by `data_size` bytes of payload.
//! The header's type tag selects a pixel format and a bit depth from a fixed table;
//! raw payloads are copied verbatim, block-compressed and paletted payloads are
//! validated but not decoded.

mod median;
mod transform;

use bytemuck::{Pod, Zeroable};

use crate::{ByteCursor, ResourceError, Result};

/// In-memory pixel layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    A8,
    Rgb24,
    Bgr24,
    Bgra32,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::A8 => 1,
            PixelFormat::Rgb24 | PixelFormat::Bgr24 => 3,
            PixelFormat::Bgra32 => 4,
        }
    }
}

/// Fixed header at the start of every texture record.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct TextureHeader {
    pub file_id: u32,
    pub unknown: u32,
    pub width: u32,
    pub height: u32,
    pub type_tag: u32,
    pub data_size: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Codec {
    Raw,
    Dxt1,
    Dxt5,
    Paletted16,
}

#[derive(Clone, Copy, Debug)]
struct TextureType {
    tag: u32,
    format: PixelFormat,
    bits_per_pixel: u64,
    codec: Codec,
}

const fn texture_type(
    tag: u32,
    format: PixelFormat,
    bits_per_pixel: u64,
    codec: Codec,
) -> TextureType {
    TextureType {
        tag,
        format,
        bits_per_pixel,
        codec,
    }
}

pub const TYPE_BGR24: u32 = 0x14;
pub const TYPE_BGRA32: u32 = 0x15;
pub const TYPE_DXT1: u32 = u32::from_le_bytes(*b"DXT1");
pub const TYPE_DXT5: u32 = u32::from_le_bytes(*b"DXT5");
pub const TYPE_PALETTED16: u32 = 0x65;
pub const TYPE_RGB24: u32 = 0xF3;
pub const TYPE_A8: u32 = 0xF4;

const TEXTURE_TYPES: &[TextureType] = &[
    texture_type(TYPE_BGR24, PixelFormat::Bgr24, 24, Codec::Raw),
    texture_type(TYPE_BGRA32, PixelFormat::Bgra32, 32, Codec::Raw),
    texture_type(TYPE_DXT1, PixelFormat::Bgr24, 4, Codec::Dxt1),
    texture_type(TYPE_DXT5, PixelFormat::Bgra32, 8, Codec::Dxt5),
    texture_type(TYPE_PALETTED16, PixelFormat::Bgra32, 16, Codec::Paletted16),
    texture_type(TYPE_RGB24, PixelFormat::Rgb24, 24, Codec::Raw),
    texture_type(TYPE_A8, PixelFormat::A8, 8, Codec::Raw),
];

fn lookup_texture_type(tag: u32) -> Result<TextureType> {
    TEXTURE_TYPES
        .iter()
        .find(|entry| entry.tag == tag)
        .copied()
        .ok_or_else(|| ResourceError::UnsupportedFormat(format!("texture type 0x{tag:X}")))
}

/// Decoded pixels. `pixels.len() == width * height * format.channels()` always holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    format: PixelFormat,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Image {
    /// Zero-filled image.
    pub fn create(format: PixelFormat, width: u32, height: u32) -> Self {
        let len = pixel_len(format, width, height);
        Image {
            format,
            width,
            height,
            pixels: vec![0; len],
        }
    }

    pub fn from_pixels(
        format: PixelFormat,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Self> {
        let expected = pixel_len(format, width, height);
        if pixels.len() != expected {
            return Err(ResourceError::SizeMismatch {
                expected: expected as u64,
                actual: pixels.len() as u64,
            });
        }
        Ok(Image {
            format,
            width,
            height,
            pixels,
        })
    }

    /// Parse a whole texture record (header and payload) into an image.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        decode_texture(bytes).map(|(_, image)| image)
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Channel values of the pixel at (`x`, `y`), or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let n = self.channels();
        let start = (y as usize * self.width as usize + x as usize) * n;
        Some(&self.pixels[start..start + n])
    }

    /// Expand to tightly packed RGBA8, e.g. for export. A8 becomes white with alpha.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for px in self.pixels.chunks_exact(self.channels()) {
            let rgba = match self.format {
                PixelFormat::A8 => [255, 255, 255, px[0]],
                PixelFormat::Rgb24 => [px[0], px[1], px[2], 255],
                PixelFormat::Bgr24 => [px[2], px[1], px[0], 255],
                PixelFormat::Bgra32 => [px[2], px[1], px[0], px[3]],
            };
            out.extend_from_slice(&rgba);
        }
        out
    }
}

fn pixel_len(format: PixelFormat, width: u32, height: u32) -> usize {
    width as usize * height as usize * format.channels()
}

/// Parse header and payload, checking the declared size against the dimensions.
pub fn decode_texture(bytes: &[u8]) -> Result<(TextureHeader, Image)> {
    let mut cursor = ByteCursor::new(bytes);
    let header: TextureHeader = cursor.read_pod()?;
    let texture_type = lookup_texture_type(header.type_tag)?;

    let expected = header.width as u64 * header.height as u64 * texture_type.bits_per_pixel / 8;
    if expected != header.data_size as u64 {
        return Err(ResourceError::SizeMismatch {
            expected,
            actual: header.data_size as u64,
        });
    }

    let payload = cursor.read_raw(header.data_size as usize)?;
    cursor.assert_end()?;

    log::trace!(
        "texture 0x{:08X}: {}x{} {:?} ({:?})",
        header.file_id,
        header.width,
        header.height,
        texture_type.format,
        texture_type.codec
    );

    let pixels = match texture_type.codec {
        Codec::Raw => payload.to_vec(),
        Codec::Dxt1 => return Err(ResourceError::NotImplemented("DXT1")),
        Codec::Dxt5 => return Err(ResourceError::NotImplemented("DXT5")),
        Codec::Paletted16 => return Err(ResourceError::NotImplemented("16-bit paletted texture")),
    };

    let image = Image::from_pixels(texture_type.format, header.width, header.height, pixels)?;
    Ok((header, image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::texture_record;

    #[test]
    fn create_sizes_buffer_per_format() {
        for (format, channels) in [
            (PixelFormat::A8, 1),
            (PixelFormat::Rgb24, 3),
            (PixelFormat::Bgr24, 3),
            (PixelFormat::Bgra32, 4),
        ] {
            let image = Image::create(format, 5, 3);
            assert_eq!(image.pixels().len(), 5 * 3 * channels);
            assert_eq!(image.channels(), channels);
        }
    }

    #[test]
    fn decodes_bgra32() {
        let payload: Vec<u8> = (0..16).collect();
        let bytes = texture_record(0x0600_0001, TYPE_BGRA32, 2, 2, 16, &payload);

        let image = Image::decode(&bytes).unwrap();
        assert_eq!(image.format(), PixelFormat::Bgra32);
        assert_eq!((image.width(), image.height()), (2, 2));
        assert_eq!(image.channels(), 4);
        assert_eq!(image.pixels(), &payload[..]);
        assert_eq!(image.pixel(1, 1), Some(&[12u8, 13, 14, 15][..]));
    }

    #[test]
    fn declared_size_must_match_dimensions() {
        let payload = [0u8; 15];
        let bytes = texture_record(0x0600_0001, TYPE_BGRA32, 2, 2, 15, &payload);
        assert!(matches!(
            Image::decode(&bytes),
            Err(ResourceError::SizeMismatch {
                expected: 16,
                actual: 15
            })
        ));
    }

    #[test]
    fn unknown_type_is_unsupported() {
        let bytes = texture_record(0x0600_0001, 0x99, 1, 1, 1, &[0]);
        assert!(matches!(
            Image::decode(&bytes),
            Err(ResourceError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn compressed_payloads_are_not_guessed() {
        // 4x4 DXT1 block = 8 bytes, 4x4 DXT5 block = 16 bytes
        let dxt1 = texture_record(0x0600_0001, TYPE_DXT1, 4, 4, 8, &[0; 8]);
        assert!(matches!(
            Image::decode(&dxt1),
            Err(ResourceError::NotImplemented("DXT1"))
        ));
        let dxt5 = texture_record(0x0600_0001, TYPE_DXT5, 4, 4, 16, &[0; 16]);
        assert!(matches!(
            Image::decode(&dxt5),
            Err(ResourceError::NotImplemented("DXT5"))
        ));
        let paletted = texture_record(0x0600_0001, TYPE_PALETTED16, 2, 1, 4, &[0; 4]);
        assert!(matches!(
            Image::decode(&paletted),
            Err(ResourceError::NotImplemented(_))
        ));
    }

    #[test]
    fn compressed_size_is_checked_before_payload() {
        let dxt1 = texture_record(0x0600_0001, TYPE_DXT1, 4, 4, 9, &[0; 9]);
        assert!(matches!(
            Image::decode(&dxt1),
            Err(ResourceError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn truncated_payload_is_out_of_bounds() {
        let bytes = texture_record(0x0600_0001, TYPE_A8, 2, 2, 4, &[0; 3]);
        assert!(matches!(
            Image::decode(&bytes),
            Err(ResourceError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn extra_payload_is_trailing_data() {
        let bytes = texture_record(0x0600_0001, TYPE_A8, 2, 2, 4, &[0; 5]);
        assert!(matches!(
            Image::decode(&bytes),
            Err(ResourceError::TrailingData { remaining: 1 })
        ));
    }

    #[test]
    fn rgba_expansion_swizzles() {
        let bgr = Image::from_pixels(PixelFormat::Bgr24, 1, 1, vec![1, 2, 3]).unwrap();
        assert_eq!(bgr.to_rgba8(), vec![3, 2, 1, 255]);
        let alpha = Image::from_pixels(PixelFormat::A8, 1, 1, vec![7]).unwrap();
        assert_eq!(alpha.to_rgba8(), vec![255, 255, 255, 7]);
    }

    #[test]
    fn from_pixels_rejects_wrong_length() {
        assert!(Image::from_pixels(PixelFormat::Rgb24, 2, 2, vec![0; 11]).is_err());
    }
}
