//! Error types for fallible physics operations.
//!
//! The fixed-step pipeline itself never fails: degenerate geometry, separating contacts and
//! unimplemented collider pairs are skipped. Errors only surface from setup calls and from
//! narrow-phase dispatch, where the pipeline logs and discards them.

use thiserror::Error;

use crate::physics::body_set::BodyHandle;
use crate::physics::collider::ColliderType;

/// Errors produced by the physics crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// The handle refers to a body that was removed, or never existed in this set.
    #[error("invalid rigid body handle {0:?}")]
    InvalidBodyHandle(BodyHandle),

    /// No narrow-phase routine exists for this collider pair.
    #[error("collider pair {a:?} x {b:?} is not supported by the narrow phase")]
    UnsupportedColliderPair { a: ColliderType, b: ColliderType },

    /// Material coefficients out of range.
    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    /// Simulation configuration out of range.
    #[error("invalid physics configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, PhysicsError>;
