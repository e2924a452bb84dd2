//! Decoding of versioned binary game-asset records into cached, typed resources.

mod animation;
mod cache;
mod config;
mod cursor;
mod engine;
mod error;
mod fs;
mod geometry;
mod hook;
mod image;
mod region;
mod resource;
mod resource_id;
mod scene;
mod texture;

#[cfg(test)]
mod test_support;

pub use animation::*;
pub use cache::*;
pub use config::*;
pub use cursor::*;
pub use engine::*;
pub use error::*;
pub use fs::*;
pub use geometry::*;
pub use hook::*;
pub use image::*;
pub use region::*;
pub use resource::*;
pub use resource_id::*;
pub use scene::*;
pub use texture::*;
