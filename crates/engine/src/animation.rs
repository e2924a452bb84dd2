use crate::{AnimationHook, ByteCursor, Location, ResourceError, ResourceId, Result};

/// One keyframe: a placement per model of the owning animation plus the hooks fired on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationFrame {
    pub locations: Vec<Location>,
    pub hooks: Vec<AnimationHook>,
}

impl AnimationFrame {
    /// The frame does not record its own model count; the owner supplies `num_models`.
    pub fn read(cursor: &mut ByteCursor<'_>, num_models: u32) -> Result<Self> {
        let mut locations = Vec::new();
        for _ in 0..num_models {
            locations.push(Location::read(cursor)?);
        }

        let num_hooks = cursor.read_u32()?;
        let mut hooks = Vec::new();
        for _ in 0..num_hooks {
            hooks.push(AnimationHook::read(cursor)?);
        }

        Ok(AnimationFrame { locations, hooks })
    }
}

const HAS_ROOT_MOTION: u32 = 0x1;

/// Animation resource (`0x03` ids).
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub id: ResourceId,
    pub num_parts: u32,
    /// Per-frame root motion, present only when the record flags it.
    pub root_motion: Option<Vec<Location>>,
    pub frames: Vec<AnimationFrame>,
}

impl Animation {
    pub fn decode(id: ResourceId, bytes: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(bytes);

        let file_id = ResourceId(cursor.read_u32()?);
        if file_id != id {
            return Err(ResourceError::assertion(
                "animation id",
                cursor.offset(),
                format!("expected {id}, got {file_id}"),
            ));
        }

        let flags = cursor.read_u32()?;
        let num_parts = cursor.read_u32()?;
        let num_frames = cursor.read_u32()?;

        let root_motion = if flags & HAS_ROOT_MOTION != 0 {
            let mut locations = Vec::new();
            for _ in 0..num_frames {
                locations.push(Location::read(&mut cursor)?);
            }
            Some(locations)
        } else {
            None
        };

        let mut frames = Vec::new();
        for _ in 0..num_frames {
            frames.push(AnimationFrame::read(&mut cursor, num_parts)?);
        }

        cursor.assert_end()?;
        log::trace!("animation {id}: {num_frames} frames of {num_parts} parts");
        Ok(Animation {
            id,
            num_parts,
            root_motion,
            frames,
        })
    }
}
