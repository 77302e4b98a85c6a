//! Transform components.

use glam::Mat4;

pub use crate::transform::Transform;

/// World-space matrix of an entity, refreshed from its [`Transform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalTransform(pub Mat4);

impl Default for GlobalTransform {
    fn default() -> Self {
        Self(Mat4::IDENTITY)
    }
}

impl From<Transform> for GlobalTransform {
    fn from(transform: Transform) -> Self {
        Self(transform.to_matrix())
    }
}
