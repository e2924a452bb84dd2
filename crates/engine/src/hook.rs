//! Event hooks attached to animation keyframes.
//!
//! Every hook starts with `type:u32, direction:i32`; the type selects one entry of
//! [`HOOK_DECODERS`], which reads the rest of the record.

use crate::{ByteCursor, Location, ResourceError, ResourceId, ResourceType, Result, Vec3};

/// Playback direction a hook fires in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookDirection {
    Backward,
    Both,
    Forward,
}

impl HookDirection {
    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        match cursor.read_i32()? {
            -1 => Ok(HookDirection::Backward),
            0 => Ok(HookDirection::Both),
            1 => Ok(HookDirection::Forward),
            other => Err(ResourceError::assertion(
                "hook direction",
                cursor.offset(),
                format!("expected -1, 0 or 1, got {other}"),
            )),
        }
    }
}

/// Linear change of some property over `time` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    pub start: f32,
    pub end: f32,
    pub time: f32,
}

impl Fade {
    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Fade {
            start: cursor.read_f32()?,
            end: cursor.read_f32()?,
            time: cursor.read_f32()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackCone {
    pub part_index: u32,
    pub left: [f32; 2],
    pub right: [f32; 2],
    pub radius: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleEmitter {
    pub emitter_info_id: u32,
    pub part_index: u32,
    pub offset: Location,
    pub emitter_id: u32,
}

impl ParticleEmitter {
    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(ParticleEmitter {
            emitter_info_id: cursor.read_u32()?,
            part_index: cursor.read_u32()?,
            offset: Location::read(cursor)?,
            emitter_id: cursor.read_u32()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HookKind {
    Sound { sound_id: ResourceId },
    SoundTable { sound_type: u32 },
    Attack(AttackCone),
    AnimationDone,
    ReplaceObject {
        part_index: u32,
        part_id: ResourceId,
    },
    Ethereal { ethereal: bool },
    TransparentPart { part_index: u32, fade: Fade },
    Luminous(Fade),
    LuminousPart { part_index: u32, fade: Fade },
    Diffuse(Fade),
    DiffusePart { part_index: u32, fade: Fade },
    Scale { end: f32, time: f32 },
    CreateParticle(ParticleEmitter),
    DestroyParticle { emitter_id: u32 },
    StopParticle { emitter_id: u32 },
    NoDraw { no_draw: bool },
    DefaultScript,
    DefaultScriptPart { part_index: u32 },
    CallPes { pes_id: u32, pause: f32 },
    Transparent(Fade),
    SoundTweaked {
        sound_id: ResourceId,
        priority: f32,
        probability: f32,
        volume: f32,
    },
    SetOmega { axis: Vec3 },
    TextureVelocity { u_speed: f32, v_speed: f32 },
    TextureVelocityPart {
        part_index: u32,
        u_speed: f32,
        v_speed: f32,
    },
    SetLight { lights_on: bool },
    CreateBlockingParticle(ParticleEmitter),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationHook {
    pub direction: HookDirection,
    pub kind: HookKind,
}

type HookDecoder = fn(&mut ByteCursor<'_>) -> Result<HookKind>;

/// Hook type tag to payload decoder.
pub const HOOK_DECODERS: &[(u32, HookDecoder)] = &[
    (1, |c| {
        Ok(HookKind::Sound {
            sound_id: c.read_id(ResourceType::Sound, "sound id")?,
        })
    }),
    (2, |c| {
        Ok(HookKind::SoundTable {
            sound_type: c.read_u32()?,
        })
    }),
    (3, |c| {
        Ok(HookKind::Attack(AttackCone {
            part_index: c.read_u32()?,
            left: [c.read_f32()?, c.read_f32()?],
            right: [c.read_f32()?, c.read_f32()?],
            radius: c.read_f32()?,
            height: c.read_f32()?,
        }))
    }),
    (4, |_| Ok(HookKind::AnimationDone)),
    (5, |c| {
        Ok(HookKind::ReplaceObject {
            part_index: c.read_u32()?,
            part_id: c.read_id(ResourceType::Model, "part id")?,
        })
    }),
    (6, |c| {
        Ok(HookKind::Ethereal {
            ethereal: c.read_i32()? != 0,
        })
    }),
    (7, |c| {
        Ok(HookKind::TransparentPart {
            part_index: c.read_u32()?,
            fade: Fade::read(c)?,
        })
    }),
    (8, |c| Ok(HookKind::Luminous(Fade::read(c)?))),
    (9, |c| {
        Ok(HookKind::LuminousPart {
            part_index: c.read_u32()?,
            fade: Fade::read(c)?,
        })
    }),
    (10, |c| Ok(HookKind::Diffuse(Fade::read(c)?))),
    (11, |c| {
        Ok(HookKind::DiffusePart {
            part_index: c.read_u32()?,
            fade: Fade::read(c)?,
        })
    }),
    (12, |c| {
        Ok(HookKind::Scale {
            end: c.read_f32()?,
            time: c.read_f32()?,
        })
    }),
    (13, |c| Ok(HookKind::CreateParticle(ParticleEmitter::read(c)?))),
    (14, |c| {
        Ok(HookKind::DestroyParticle {
            emitter_id: c.read_u32()?,
        })
    }),
    (15, |c| {
        Ok(HookKind::StopParticle {
            emitter_id: c.read_u32()?,
        })
    }),
    (16, |c| {
        Ok(HookKind::NoDraw {
            no_draw: c.read_u32()? != 0,
        })
    }),
    (17, |_| Ok(HookKind::DefaultScript)),
    (18, |c| {
        Ok(HookKind::DefaultScriptPart {
            part_index: c.read_u32()?,
        })
    }),
    (19, |c| {
        Ok(HookKind::CallPes {
            pes_id: c.read_u32()?,
            pause: c.read_f32()?,
        })
    }),
    (20, |c| Ok(HookKind::Transparent(Fade::read(c)?))),
    (21, |c| {
        Ok(HookKind::SoundTweaked {
            sound_id: c.read_id(ResourceType::Sound, "sound id")?,
            priority: c.read_f32()?,
            probability: c.read_f32()?,
            volume: c.read_f32()?,
        })
    }),
    (22, |c| {
        let axis = Vec3::new(c.read_f32()?, c.read_f32()?, c.read_f32()?);
        Ok(HookKind::SetOmega { axis })
    }),
    (23, |c| {
        Ok(HookKind::TextureVelocity {
            u_speed: c.read_f32()?,
            v_speed: c.read_f32()?,
        })
    }),
    (24, |c| {
        Ok(HookKind::TextureVelocityPart {
            part_index: c.read_u32()?,
            u_speed: c.read_f32()?,
            v_speed: c.read_f32()?,
        })
    }),
    (25, |c| {
        Ok(HookKind::SetLight {
            lights_on: c.read_i32()? != 0,
        })
    }),
    (26, |c| Ok(HookKind::CreateBlockingParticle(ParticleEmitter::read(c)?))),
];

impl AnimationHook {
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let hook_type = cursor.read_u32()?;
        let decode = HOOK_DECODERS
            .iter()
            .find(|(tag, _)| *tag == hook_type)
            .map(|(_, decode)| *decode)
            .ok_or_else(|| {
                ResourceError::UnsupportedFormat(format!("animation hook type {hook_type}"))
            })?;
        let direction = HookDirection::read(cursor)?;
        let kind = decode(cursor)?;
        Ok(AnimationHook { direction, kind })
    }
}
