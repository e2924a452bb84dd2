use crate::{Image, ResourceError, ResourceId, ResourceType, Result, decode_texture};

/// Texture resource (`0x06` ids): a decoded [`Image`] tagged with its id.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub id: ResourceId,
    pub image: Image,
}

impl Texture {
    pub fn decode(id: ResourceId, bytes: &[u8]) -> Result<Self> {
        let (header, image) = decode_texture(bytes)?;
        if header.file_id != id.0 {
            return Err(ResourceError::assertion(
                "file id",
                0,
                format!("expected {id}, got {}", ResourceId(header.file_id)),
            ));
        }
        ResourceId(header.file_id).expect_kind(ResourceType::Texture, "file id", 0)?;
        Ok(Texture { id, image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PixelFormat, TYPE_RGB24};
    use crate::test_support::texture_record;

    #[test]
    fn decodes_matching_id() {
        let bytes = texture_record(0x0600_0042, TYPE_RGB24, 1, 2, 6, &[1, 2, 3, 4, 5, 6]);
        let texture = Texture::decode(ResourceId(0x0600_0042), &bytes).unwrap();
        assert_eq!(texture.image.format(), PixelFormat::Rgb24);
        assert_eq!((texture.width(), texture.height()), (1, 2));
    }

    #[test]
    fn rejects_foreign_file_id() {
        let bytes = texture_record(0x0600_0043, TYPE_RGB24, 1, 1, 3, &[1, 2, 3]);
        assert!(matches!(
            Texture::decode(ResourceId(0x0600_0042), &bytes),
            Err(ResourceError::AssertionViolation { field: "file id", .. })
        ));
    }
}
