pub type Vec3 = nalgebra::Vector3<f32>;
pub type Quat = nalgebra::Quaternion<f32>;
pub type Mat4 = nalgebra::Matrix4<f32>;

pub trait Interpolate {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for Vec3 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}
