use crate::{ByteCursor, Location, ResourceError, ResourceId, ResourceType, Result};

/// Rule for scattering one object over a landblock.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDesc {
    pub object_id: ResourceId,
    pub base_location: Location,
    pub frequency: f32,
    pub displace_x: f32,
    pub displace_y: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub max_rotation: f32,
    pub min_slope: f32,
    pub max_slope: f32,
    pub align: u32,
    pub orient: u32,
    pub weenie_object: u32,
}

/// Scene resource (`0x12` ids): the object placements referenced by a region's scene types.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub id: ResourceId,
    pub objects: Vec<ObjectDesc>,
}

impl Scene {
    pub fn decode(id: ResourceId, bytes: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(bytes);

        let file_id = ResourceId(cursor.read_u32()?);
        if file_id != id {
            return Err(ResourceError::assertion(
                "scene id",
                cursor.offset(),
                format!("expected {id}, got {file_id}"),
            ));
        }

        let count = cursor.read_u32()?;
        let mut objects = Vec::new();
        for _ in 0..count {
            objects.push(read_object_desc(&mut cursor)?);
        }

        cursor.assert_end()?;
        log::trace!("scene {id}: {} objects", objects.len());
        Ok(Scene { id, objects })
    }
}

fn read_object_desc(cursor: &mut ByteCursor<'_>) -> Result<ObjectDesc> {
    let object_id = ResourceId(cursor.read_u32()?);
    if !object_id.is_kind(ResourceType::Model) && !object_id.is_kind(ResourceType::Setup) {
        return Err(ResourceError::assertion(
            "object id",
            cursor.offset(),
            format!("expected a Model or Setup id, got {object_id}"),
        ));
    }

    let base_location = Location::read(cursor)?;
    let frequency = cursor.read_f32()?;
    let displace_x = cursor.read_f32()?;
    let displace_y = cursor.read_f32()?;

    let min_scale = cursor.read_f32()?;
    let max_scale = cursor.read_f32()?;
    ordered("scale range", cursor.offset(), min_scale, max_scale)?;

    let max_rotation = cursor.read_f32()?;

    let min_slope = cursor.read_f32()?;
    let max_slope = cursor.read_f32()?;
    ordered("slope range", cursor.offset(), min_slope, max_slope)?;

    Ok(ObjectDesc {
        object_id,
        base_location,
        frequency,
        displace_x,
        displace_y,
        min_scale,
        max_scale,
        max_rotation,
        min_slope,
        max_slope,
        align: cursor.read_u32()?,
        orient: cursor.read_u32()?,
        weenie_object: cursor.read_u32()?,
    })
}

fn ordered(field: &'static str, offset: usize, min: f32, max: f32) -> Result<()> {
    if min <= max {
        Ok(())
    } else {
        Err(ResourceError::assertion(field, offset, format!("min {min} > max {max}")))
    }
}
