mod location;
mod math;

pub use location::*;
pub use math::*;
