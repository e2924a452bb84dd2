//! Fixture builders for decoder tests.
//! The engine has no encode path; this only exists under `cfg(test)`.

use crate::{LAND_HEIGHT_COUNT, REGION_NAME, REGION_VERSION};

#[derive(Default)]
pub struct RecordWriter {
    buf: Vec<u8>,
}

impl RecordWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn f32(&mut self, v: f32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn f32s(&mut self, vs: &[f32]) -> &mut Self {
        for v in vs {
            self.f32(*v);
        }
        self
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn zeros(&mut self, n: usize) -> &mut Self {
        self.buf.resize(self.buf.len() + n, 0);
        self
    }

    pub fn string(&mut self, s: &str) -> &mut Self {
        self.u16(s.len() as u16);
        self.buf.extend_from_slice(s.as_bytes());
        while self.buf.len() % 4 != 0 {
            self.buf.push(0);
        }
        self
    }

    /// Identity placement at `origin`.
    pub fn location(&mut self, origin: [f32; 3]) -> &mut Self {
        self.f32s(&origin).f32s(&[1.0, 0.0, 0.0, 0.0])
    }

    pub fn finish(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }
}

pub fn texture_record(
    id: u32,
    type_tag: u32,
    width: u32,
    height: u32,
    data_size: u32,
    payload: &[u8],
) -> Vec<u8> {
    let mut w = RecordWriter::new();
    w.u32(id).u32(0).u32(width).u32(height).u32(type_tag).u32(data_size);
    w.bytes(payload);
    w.finish()
}

/// Scene with one object per entry of `objects`, each placed at the origin.
pub fn scene_record(id: u32, objects: &[u32]) -> Vec<u8> {
    let mut w = RecordWriter::new();
    w.u32(id).u32(objects.len() as u32);
    for object in objects {
        w.u32(*object).location([0.0, 0.0, 0.0]);
        // frequency, displace x/y, min/max scale, max rotation, min/max slope
        w.f32s(&[0.5, 12.0, 12.0, 0.9, 1.1, 360.0, 0.0, 60.0]);
        w.u32(0).u32(1).u32(0);
    }
    w.finish()
}

pub struct TerrainTexFixture {
    pub tex_id: u32,
    pub detail_id: u32,
    /// max/min brightness, max/min saturation, max/min hue
    pub ranges: [u32; 6],
}

impl Default for TerrainTexFixture {
    fn default() -> Self {
        TerrainTexFixture {
            tex_id: 0x0500_0100,
            detail_id: 0x0500_0200,
            ranges: [200, 100, 80, 20, 30, 10],
        }
    }
}

pub struct RegionFixture {
    pub id: u32,
    pub version: u32,
    pub scene_types: Vec<Vec<u32>>,
    pub terrain_types: Vec<(&'static str, Vec<u32>)>,
    pub terrain_textures: Vec<TerrainTexFixture>,
    pub alpha_codes: [u32; 3],
    pub extra_tail: usize,
}

impl RegionFixture {
    pub fn new(id: u32) -> Self {
        RegionFixture {
            id,
            version: REGION_VERSION,
            scene_types: Vec::new(),
            terrain_types: vec![("BarrenRock", vec![0]), ("Grassland", vec![0, 1])],
            terrain_textures: vec![TerrainTexFixture::default(), TerrainTexFixture::default()],
            alpha_codes: [8, 9, 10],
            extra_tail: 0,
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut w = RecordWriter::new();
        w.u32(self.id).u32(1).u32(self.version).string(REGION_NAME);
        w.u32(0xFF).u32(0xFF).zeros(24);
        for i in 0..LAND_HEIGHT_COUNT {
            w.f32(i as f32 * 2.0);
        }
        w.zeros(28);

        // hours
        w.u32(2);
        w.f32(0.25).u32(0).string("Dawnsong");
        w.f32(0.75).u32(1).string("Gloaming");
        // holidays
        w.u32(1).string("Festival");
        // seasons
        w.u32(2);
        w.u32(0).string("Snowreap");
        w.u32(90).string("Coldeve");
        w.zeros(49400);

        w.u32(self.scene_types.len() as u32);
        for scenes in &self.scene_types {
            w.u32(0).u32(scenes.len() as u32);
            for scene in scenes {
                w.u32(*scene);
            }
        }

        w.u32(self.terrain_types.len() as u32);
        for (name, scene_types) in &self.terrain_types {
            w.string(name).u32(0x00FF_8000).u32(scene_types.len() as u32);
            for index in scene_types {
                w.u32(*index);
            }
        }

        w.u32(0).u32(0x400);
        for (layer, code) in self.alpha_codes.iter().enumerate() {
            w.u32(1).u32(*code).u32(0x0500_1000 + layer as u32);
        }

        w.u32(self.terrain_textures.len() as u32);
        for (i, tex) in self.terrain_textures.iter().enumerate() {
            w.u32(i as u32).u32(tex.tex_id).u32(4);
            for v in tex.ranges {
                w.u32(v);
            }
            w.u32(8).u32(tex.detail_id);
        }

        w.u32(1).u32(0x0600_0010).u32(0x0600_0011).zeros(12);
        w.zeros(self.extra_tail);
        w.finish()
    }
}

/// Animation with `parts` models per frame; every frame carries the given hooks.
pub fn animation_record(
    id: u32,
    parts: u32,
    frames: u32,
    root_motion: bool,
    hooks: &[Vec<u8>],
) -> Vec<u8> {
    let mut w = RecordWriter::new();
    w.u32(id).u32(root_motion as u32).u32(parts).u32(frames);
    if root_motion {
        for f in 0..frames {
            w.location([0.0, f as f32, 0.0]);
        }
    }
    for _ in 0..frames {
        for p in 0..parts {
            w.location([p as f32, 0.0, 0.0]);
        }
        w.u32(hooks.len() as u32);
        for hook in hooks {
            w.bytes(hook);
        }
    }
    w.finish()
}
