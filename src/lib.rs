//! rigidkit
//!
//! Discrete-time rigid body physics: broad-phase pair pruning, narrow-phase contact
//! generation, generic constraints, sequential-impulse collision response, positional
//! drift correction and semi-implicit integration.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **geom** - Planes, segments and closest-point queries
//! 2. **transform** - Pose type shared by bodies and the external transform store
//! 3. **physics** - Colliders, materials, bodies, constraints and the fixed-step pipeline
//! 4. **ecs** - hecs integration (feature = "ecs")
//!
//! The physics core never owns body storage beyond the [`RigidBodySet`] arena handed to it,
//! and never owns scene composition: poses leave the core through a [`TransformStore`].

pub mod error;
pub mod geom;
pub mod physics;
pub mod transform;

#[cfg(feature = "ecs")]
pub mod ecs;

pub use error::{PhysicsError, Result};

pub use transform::Transform;

pub use physics::body_set::{BodyHandle, RigidBodySet};
pub use physics::collider::{Collider, ColliderShape, ColliderType};
pub use physics::constraint::{Constraint, ConstraintHandle, ConstraintSet, SpringConstraint};
pub use physics::contact::{Contact, ContactManifold, MAX_CONTACTS};
pub use physics::material::{CombineMode, CombinedMaterial, Material};
pub use physics::rigid_body::RigidBody;
pub use physics::{PhysicsConfig, PhysicsWorld, TransformStore};

#[cfg(feature = "ecs")]
pub use ecs::prelude::*;

// Re-export glam for convenience
pub use glam;
