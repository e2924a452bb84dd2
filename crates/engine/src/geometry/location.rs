use nalgebra::UnitQuaternion;

use crate::{ByteCursor, Mat4, Quat, Result, Vec3};

/// Placement of a part: origin followed by a `w, x, y, z` orientation quaternion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub origin: Vec3,
    pub orientation: Quat,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            origin: Vec3::zeros(),
            orientation: Quat::identity(),
        }
    }
}

impl Location {
    pub const SIZE: usize = 7 * 4;

    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let origin = Vec3::new(cursor.read_f32()?, cursor.read_f32()?, cursor.read_f32()?);
        let w = cursor.read_f32()?;
        let (x, y, z) = (cursor.read_f32()?, cursor.read_f32()?, cursor.read_f32()?);
        Ok(Location {
            origin,
            orientation: Quat::new(w, x, y, z),
        })
    }

    pub fn matrix(&self) -> Mat4 {
        let translation = Mat4::new_translation(&self.origin);
        let rotation = UnitQuaternion::from_quaternion(self.orientation).to_homogeneous();
        translation * rotation
    }
}
