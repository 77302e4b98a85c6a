//! Physics components for ECS entities.

use glam::Vec3;

use crate::physics::body_set::BodyHandle;

/// Links an entity to its body in the [`RigidBodySet`](crate::RigidBodySet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhysicsBody(pub BodyHandle);

/// Scene-wide gravity acceleration. At most one is expected per world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity(pub Vec3);

impl Default for Gravity {
    fn default() -> Self {
        Self(Vec3::new(0.0, -9.81, 0.0))
    }
}
