//! Landscape definition record (`0x13` ids).
//!
//! The layout is reverse-engineered, so every structural field is checked against the
//! one value it has ever been observed to take. A mismatch means corrupt data or an
//! unknown revision and fails the whole decode.

use crate::{
    ByteCursor, ResourceCache, ResourceError, ResourceHandle, ResourceId, ResourceType, Result,
};

pub const REGION_NUMBER: u32 = 1;
pub const REGION_VERSION: u32 = 3;
pub const REGION_NAME: &str = "Dereth";
pub const LAND_HEIGHT_COUNT: usize = 256;

const HEADER_MARKER: u32 = 0xFF;
const HEADER_PADDING: usize = 24;
const HEIGHTS_PADDING: usize = 28;
const CALENDAR_PADDING: usize = 49400;
const TERRAIN_MARKER_A: u32 = 0;
const TERRAIN_MARKER_B: u32 = 0x400;
const TEXTURES_MARKER: u32 = 1;
const TAIL_PADDING: usize = 12;
const MAX_SEASON_START_DAY: u32 = 365;

#[derive(Debug, Clone, PartialEq)]
pub struct DayHour {
    /// Fraction of the day, in `[0, 1]`.
    pub start: f32,
    pub night: bool,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Season {
    pub start_day: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calendar {
    pub hours: Vec<DayHour>,
    pub holidays: Vec<String>,
    pub seasons: Vec<Season>,
}

/// A set of scenes that can be scattered on a terrain cell.
#[derive(Debug, Clone)]
pub struct SceneType {
    pub unknown: u32,
    /// Resolved through the cache; each handle is a `Resource::Scene`.
    pub scenes: Vec<ResourceHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TerrainType {
    pub name: String,
    pub color: u32,
    /// Indices into [`Region::scene_types`].
    pub scene_types: Vec<u32>,
}

/// Alpha map used to blend terrain textures at corners, sides or along roads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlphaTex {
    pub code: u32,
    pub tex_id: ResourceId,
}

/// Inclusive range, `min <= max` checked at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainTex {
    pub tex_id: ResourceId,
    pub tex_tiling: u32,
    pub brightness: ValueRange,
    pub saturation: ValueRange,
    pub hue: ValueRange,
    pub detail_tiling: u32,
    pub detail_tex_id: ResourceId,
}

#[derive(Debug, Clone)]
pub struct Region {
    pub id: ResourceId,
    pub land_heights: Vec<f32>,
    pub calendar: Calendar,
    pub scene_types: Vec<SceneType>,
    pub terrain_types: Vec<TerrainType>,
    pub corner_alpha: Vec<AlphaTex>,
    pub side_alpha: Vec<AlphaTex>,
    pub road_alpha: Vec<AlphaTex>,
    pub terrain_textures: Vec<TerrainTex>,
    pub small_map: u32,
    pub large_map: u32,
}

fn expect_u32(cursor: &mut ByteCursor<'_>, field: &'static str, expected: u32) -> Result<()> {
    let actual = cursor.read_u32()?;
    if actual == expected {
        Ok(())
    } else {
        Err(ResourceError::assertion(
            field,
            cursor.offset(),
            format!("expected 0x{expected:X}, got 0x{actual:X}"),
        ))
    }
}

fn check(
    cursor: &ByteCursor<'_>,
    field: &'static str,
    ok: bool,
    detail: impl FnOnce() -> String,
) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(ResourceError::assertion(field, cursor.offset(), detail()))
    }
}

fn read_range(cursor: &mut ByteCursor<'_>, field: &'static str) -> Result<ValueRange> {
    let max = cursor.read_u32()?;
    let min = cursor.read_u32()?;
    check(cursor, field, min <= max, || format!("min {min} > max {max}"))?;
    Ok(ValueRange { min, max })
}

fn read_calendar(cursor: &mut ByteCursor<'_>) -> Result<Calendar> {
    let mut calendar = Calendar::default();

    let num_hours = cursor.read_u32()?;
    for _ in 0..num_hours {
        let start = cursor.read_f32()?;
        check(cursor, "hour start", (0.0..=1.0).contains(&start), || {
            format!("{start} outside [0, 1]")
        })?;
        let night = cursor.read_u32()?;
        check(cursor, "hour night flag", night <= 1, || format!("expected 0 or 1, got {night}"))?;
        let name = cursor.read_string()?;
        calendar.hours.push(DayHour {
            start,
            night: night == 1,
            name,
        });
    }

    let num_holidays = cursor.read_u32()?;
    for _ in 0..num_holidays {
        calendar.holidays.push(cursor.read_string()?);
    }

    let num_seasons = cursor.read_u32()?;
    for _ in 0..num_seasons {
        let start_day = cursor.read_u32()?;
        check(cursor, "season start day", start_day <= MAX_SEASON_START_DAY, || {
            format!("{start_day} > {MAX_SEASON_START_DAY}")
        })?;
        let name = cursor.read_string()?;
        calendar.seasons.push(Season { start_day, name });
    }

    Ok(calendar)
}

fn read_scene_type(cursor: &mut ByteCursor<'_>, cache: &ResourceCache) -> Result<SceneType> {
    let unknown = cursor.read_u32()?;
    let num_scenes = cursor.read_u32()?;
    let mut scenes = Vec::new();
    for _ in 0..num_scenes {
        let scene_id = cursor.read_id(ResourceType::Scene, "scene id")?;
        scenes.push(cache.get(scene_id)?);
    }
    Ok(SceneType { unknown, scenes })
}

fn read_terrain_type(cursor: &mut ByteCursor<'_>) -> Result<TerrainType> {
    let name = cursor.read_string()?;
    let color = cursor.read_u32()?;
    let num_scene_types = cursor.read_u32()?;
    let mut scene_types = Vec::new();
    for _ in 0..num_scene_types {
        scene_types.push(cursor.read_u32()?);
    }
    Ok(TerrainType {
        name,
        color,
        scene_types,
    })
}

fn read_alpha_layer(cursor: &mut ByteCursor<'_>) -> Result<Vec<AlphaTex>> {
    let count = cursor.read_u32()?;
    let mut layer = Vec::new();
    for _ in 0..count {
        let code = cursor.read_u32()?;
        check(cursor, "alpha code", matches!(code, 8..=10), || {
            format!("expected 8, 9 or 10, got {code}")
        })?;
        let tex_id = cursor.read_id(ResourceType::ImgTex, "alpha texture id")?;
        layer.push(AlphaTex { code, tex_id });
    }
    Ok(layer)
}

fn read_terrain_tex(cursor: &mut ByteCursor<'_>) -> Result<TerrainTex> {
    let tex_id = cursor.read_id(ResourceType::ImgTex, "terrain texture id")?;
    let tex_tiling = cursor.read_u32()?;
    let brightness = read_range(cursor, "brightness range")?;
    let saturation = read_range(cursor, "saturation range")?;
    let hue = read_range(cursor, "hue range")?;
    let detail_tiling = cursor.read_u32()?;
    let detail_tex_id = cursor.read_id(ResourceType::ImgTex, "detail texture id")?;
    Ok(TerrainTex {
        tex_id,
        tex_tiling,
        brightness,
        saturation,
        hue,
        detail_tiling,
        detail_tex_id,
    })
}

impl Region {
    /// Decode a region record. Scene references are resolved through `cache` as they are read.
    pub fn decode(cache: &ResourceCache, id: ResourceId, bytes: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(bytes);

        expect_u32(&mut cursor, "region id", id.0)?;
        expect_u32(&mut cursor, "region number", REGION_NUMBER)?;
        expect_u32(&mut cursor, "region version", REGION_VERSION)?;
        let name = cursor.read_string()?;
        check(&cursor, "region name", name == REGION_NAME, || {
            format!("expected {REGION_NAME:?}, got {name:?}")
        })?;
        expect_u32(&mut cursor, "header marker", HEADER_MARKER)?;
        expect_u32(&mut cursor, "header marker", HEADER_MARKER)?;
        cursor.skip(HEADER_PADDING)?;

        let land_heights = (0..LAND_HEIGHT_COUNT)
            .map(|_| cursor.read_f32())
            .collect::<Result<Vec<_>>>()?;
        cursor.skip(HEIGHTS_PADDING)?;

        let calendar = read_calendar(&mut cursor)?;
        cursor.skip(CALENDAR_PADDING)?;
        log::trace!("region {id}: header and calendar read, offset {}", cursor.offset());

        let num_scene_types = cursor.read_u32()?;
        let mut scene_types = Vec::new();
        for _ in 0..num_scene_types {
            scene_types.push(read_scene_type(&mut cursor, cache)?);
        }

        let num_terrain_types = cursor.read_u32()?;
        let mut terrain_types = Vec::new();
        for _ in 0..num_terrain_types {
            terrain_types.push(read_terrain_type(&mut cursor)?);
        }

        expect_u32(&mut cursor, "terrain marker", TERRAIN_MARKER_A)?;
        expect_u32(&mut cursor, "terrain marker", TERRAIN_MARKER_B)?;

        let corner_alpha = read_alpha_layer(&mut cursor)?;
        let side_alpha = read_alpha_layer(&mut cursor)?;
        let road_alpha = read_alpha_layer(&mut cursor)?;

        let num_terrain_tex = cursor.read_u32()?;
        let mut terrain_textures = Vec::new();
        for i in 0..num_terrain_tex {
            expect_u32(&mut cursor, "terrain texture index", i)?;
            terrain_textures.push(read_terrain_tex(&mut cursor)?);
        }

        expect_u32(&mut cursor, "textures marker", TEXTURES_MARKER)?;
        let small_map = cursor.read_u32()?;
        let large_map = cursor.read_u32()?;
        cursor.skip(TAIL_PADDING)?;
        cursor.assert_end()?;

        log::debug!(
            "region {id}: {} scene types, {} terrain types, {} terrain textures",
            scene_types.len(),
            terrain_types.len(),
            terrain_textures.len()
        );

        Ok(Region {
            id,
            land_heights,
            calendar,
            scene_types,
            terrain_types,
            corner_alpha,
            side_alpha,
            road_alpha,
            terrain_textures,
            small_map,
            large_map,
        })
    }

    /// Scene types a terrain type may draw from, skipping indices that point nowhere.
    pub fn scene_types_for(&self, terrain: &TerrainType) -> impl Iterator<Item = &SceneType> {
        terrain
            .scene_types
            .iter()
            .filter_map(|index| self.scene_types.get(*index as usize))
    }
}
