use std::fmt;

use crate::{ResourceError, Result};

/// Kind of resource, stored in the top byte of every identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResourceType {
    Model = 0x01,
    Setup = 0x02,
    Animation = 0x03,
    Palette = 0x04,
    ImgTex = 0x05,
    Texture = 0x06,
    Surface = 0x08,
    Sound = 0x0A,
    Environment = 0x0D,
    Scene = 0x12,
    Region = 0x13,
}

impl ResourceType {
    const ALL: [ResourceType; 11] = [
        ResourceType::Model,
        ResourceType::Setup,
        ResourceType::Animation,
        ResourceType::Palette,
        ResourceType::ImgTex,
        ResourceType::Texture,
        ResourceType::Surface,
        ResourceType::Sound,
        ResourceType::Environment,
        ResourceType::Scene,
        ResourceType::Region,
    ];

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| *kind as u8 == tag)
    }

    pub fn tag(self) -> u8 {
        self as u8
    }
}

/// 32-bit asset identifier. The top byte is the [`ResourceType`] tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u32);

impl ResourceId {
    pub fn tag(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn kind(self) -> Option<ResourceType> {
        ResourceType::from_tag(self.tag())
    }

    pub fn is_kind(self, kind: ResourceType) -> bool {
        self.tag() == kind.tag()
    }

    /// Fails with `AssertionViolation` unless the id carries `kind`'s tag.
    /// `field` and `offset` locate the id inside the record being decoded.
    pub fn expect_kind(
        self,
        kind: ResourceType,
        field: &'static str,
        offset: usize,
    ) -> Result<Self> {
        if self.is_kind(kind) {
            Ok(self)
        } else {
            Err(ResourceError::assertion(
                field,
                offset,
                format!("expected a {kind:?} id, got {self}"),
            ))
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceId(0x{:08X})", self.0)
    }
}
