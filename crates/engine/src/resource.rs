use std::sync::Arc;

use crate::{
    Animation, Region, ResourceCache, ResourceError, ResourceId, ResourceType, Result, Scene,
    Texture,
};

/// Any decoded resource. Published resources are immutable.
#[derive(Debug)]
pub enum Resource {
    Texture(Texture),
    Region(Region),
    Scene(Scene),
    Animation(Animation),
}

/// Shared handle to a decoded resource. The cache and every caller hold clones of it.
pub type ResourceHandle = Arc<Resource>;

impl Resource {
    pub fn id(&self) -> ResourceId {
        match self {
            Resource::Texture(texture) => texture.id,
            Resource::Region(region) => region.id,
            Resource::Scene(scene) => scene.id,
            Resource::Animation(animation) => animation.id,
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        match self {
            Resource::Texture(_) => ResourceType::Texture,
            Resource::Region(_) => ResourceType::Region,
            Resource::Scene(_) => ResourceType::Scene,
            Resource::Animation(_) => ResourceType::Animation,
        }
    }

    pub fn as_texture(&self) -> Option<&Texture> {
        match self {
            Resource::Texture(texture) => Some(texture),
            _ => None,
        }
    }

    pub fn as_region(&self) -> Option<&Region> {
        match self {
            Resource::Region(region) => Some(region),
            _ => None,
        }
    }

    pub fn as_scene(&self) -> Option<&Scene> {
        match self {
            Resource::Scene(scene) => Some(scene),
            _ => None,
        }
    }

    pub fn as_animation(&self) -> Option<&Animation> {
        match self {
            Resource::Animation(animation) => Some(animation),
            _ => None,
        }
    }
}

type Decoder = fn(&ResourceCache, ResourceId, &[u8]) -> Result<Resource>;

/// Resource kind to decoder. Kinds missing here cannot be loaded.
const DECODERS: &[(ResourceType, Decoder)] = &[
    (ResourceType::Animation, |_, id, bytes| {
        Animation::decode(id, bytes).map(Resource::Animation)
    }),
    (ResourceType::Texture, |_, id, bytes| {
        Texture::decode(id, bytes).map(Resource::Texture)
    }),
    (ResourceType::Scene, |_, id, bytes| {
        Scene::decode(id, bytes).map(Resource::Scene)
    }),
    (ResourceType::Region, |cache, id, bytes| {
        Region::decode(cache, id, bytes).map(Resource::Region)
    }),
];

/// Pick the decoder for `id`'s tag and run it over `bytes`.
pub fn decode_resource(cache: &ResourceCache, id: ResourceId, bytes: &[u8]) -> Result<Resource> {
    let decode = DECODERS
        .iter()
        .find(|(kind, _)| id.is_kind(*kind))
        .map(|(_, decode)| *decode)
        .ok_or_else(|| {
            let kind = id
                .kind()
                .map(|kind| format!("{kind:?}"))
                .unwrap_or_else(|| format!("tag 0x{:02X}", id.tag()));
            ResourceError::UnsupportedFormat(format!("no decoder for {kind} resource {id}"))
        })?;
    decode(cache, id, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{scene_record, texture_record};
    use crate::{BlobStack, EvictionPolicy, TYPE_A8};

    fn cache() -> ResourceCache {
        ResourceCache::new(BlobStack::new(), EvictionPolicy::Never)
    }

    #[test]
    fn dispatches_by_tag() {
        let cache = cache();
        let texture = texture_record(0x0600_0001, TYPE_A8, 1, 1, 1, &[9]);
        let resource = decode_resource(&cache, ResourceId(0x0600_0001), &texture).unwrap();
        assert_eq!(resource.resource_type(), ResourceType::Texture);
        assert_eq!(resource.id(), ResourceId(0x0600_0001));
        assert!(resource.as_texture().is_some());
        assert!(resource.as_scene().is_none());

        let scene = scene_record(0x1200_0001, &[]);
        let resource = decode_resource(&cache, ResourceId(0x1200_0001), &scene).unwrap();
        assert!(resource.as_scene().is_some());
    }

    #[test]
    fn wrong_bytes_for_tag_fail() {
        // scene bytes under a texture id go through the texture decoder
        let scene = scene_record(0x1200_0001, &[]);
        assert!(decode_resource(&cache(), ResourceId(0x0600_0001), &scene).is_err());
    }

    #[test]
    fn unknown_kinds_are_unsupported() {
        for raw in [0x0100_0001, 0xAABB_CCDD] {
            assert!(matches!(
                decode_resource(&cache(), ResourceId(raw), &[]),
                Err(ResourceError::UnsupportedFormat(_))
            ));
        }
    }
}
