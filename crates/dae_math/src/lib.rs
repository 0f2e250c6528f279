// Re-export glam for convenience
pub use glam::*;

// DAE math types
mod axis;
mod bounds;
pub use axis::{AxisRemap, UpAxis};
pub use bounds::Bounds;
