//! hecs integration.
//!
//! Entities reference bodies in a [`RigidBodySet`](crate::RigidBodySet) through a
//! [`PhysicsBody`] component. After every fixed step the world receives the new poses through
//! its [`TransformStore`](crate::TransformStore) implementation.

pub mod components;
pub mod systems;

pub mod prelude {
    pub use super::components::physics::{Gravity, PhysicsBody};
    pub use super::components::transform::GlobalTransform;
    pub use super::systems::physics::scene_gravity;
}
