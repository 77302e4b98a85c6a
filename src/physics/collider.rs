//! Collider shapes, layer masks and world-space shape helpers.

use std::sync::Arc;

use glam::Vec3;

use crate::geom::{Plane, Segment};
use crate::transform::Transform;

use super::material::Material;

/// Collider kind tag. The narrow-phase table is indexed by the primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderType {
    Plane,
    Sphere,
    Box,
    Capsule,
    Mesh,
}

impl ColliderType {
    /// Number of kinds with narrow-phase table entries.
    pub const PRIMITIVE_COUNT: usize = 4;

    /// Row/column of this kind in the narrow-phase table, or `None` for kinds the
    /// contact resolver does not handle.
    pub const fn primitive_index(self) -> Option<usize> {
        match self {
            ColliderType::Plane => Some(0),
            ColliderType::Sphere => Some(1),
            ColliderType::Box => Some(2),
            ColliderType::Capsule => Some(3),
            // Mesh collision goes through ray casts, not the contact resolver
            ColliderType::Mesh => None,
        }
    }
}

/// Shape parameters, in the owning body's local space.
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    /// Half-space boundary `normal · p + constant = 0`.
    Plane { normal: Vec3, constant: f32 },
    Sphere { center: Vec3, radius: f32 },
    /// Box given by its min/max corners.
    Box { min: Vec3, max: Vec3 },
    /// Swept sphere around the segment `a`–`b`.
    Capsule { a: Vec3, b: Vec3, radius: f32 },
    /// Triangle soup, shared between colliders.
    Mesh { triangles: Arc<[[Vec3; 3]]> },
}

impl ColliderShape {
    pub fn collider_type(&self) -> ColliderType {
        match self {
            ColliderShape::Plane { .. } => ColliderType::Plane,
            ColliderShape::Sphere { .. } => ColliderType::Sphere,
            ColliderShape::Box { .. } => ColliderType::Box,
            ColliderShape::Capsule { .. } => ColliderType::Capsule,
            ColliderShape::Mesh { .. } => ColliderType::Mesh,
        }
    }
}

/// Collision geometry attached to a rigid body.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub shape: ColliderShape,
    /// Two colliders can only touch if their masks share at least one bit.
    pub layer_mask: u32,
    pub material: Material,
}

impl Collider {
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            layer_mask: 1,
            material: Material::default(),
        }
    }

    pub fn plane(normal: Vec3, constant: f32) -> Self {
        Self::new(ColliderShape::Plane { normal, constant })
    }

    pub fn sphere(radius: f32) -> Self {
        Self::new(ColliderShape::Sphere {
            center: Vec3::ZERO,
            radius,
        })
    }

    /// Box centered on the body origin.
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::new(ColliderShape::Box {
            min: -half_extents,
            max: half_extents,
        })
    }

    /// Capsule along the local Y axis.
    pub fn capsule(half_height: f32, radius: f32) -> Self {
        Self::new(ColliderShape::Capsule {
            a: Vec3::new(0.0, -half_height, 0.0),
            b: Vec3::new(0.0, half_height, 0.0),
            radius,
        })
    }

    pub fn mesh(triangles: impl Into<Arc<[[Vec3; 3]]>>) -> Self {
        Self::new(ColliderShape::Mesh {
            triangles: triangles.into(),
        })
    }

    pub fn with_layer_mask(mut self, layer_mask: u32) -> Self {
        self.layer_mask = layer_mask;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    #[inline]
    pub fn collider_type(&self) -> ColliderType {
        self.shape.collider_type()
    }

    /// Whether the two colliders share a layer.
    #[inline]
    pub fn interacts_with(&self, other: &Collider) -> bool {
        self.layer_mask & other.layer_mask != 0
    }
}

/// World-space plane from a local plane and the owning body's pose.
#[inline]
pub(crate) fn world_plane(normal: Vec3, constant: f32, transform: &Transform) -> Plane {
    let normal = transform.transform_vector(normal);
    Plane::new(normal, constant - normal.dot(transform.position))
}

/// World-space capsule segment.
#[inline]
pub(crate) fn world_segment(a: Vec3, b: Vec3, transform: &Transform) -> Segment {
    Segment::new(transform.transform_point(a), transform.transform_point(b))
}

/// The eight world-space corners of a box.
pub(crate) fn world_box_corners(min: Vec3, max: Vec3, transform: &Transform) -> [Vec3; 8] {
    [
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(min.x, max.y, max.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(max.x, max.y, max.z),
    ]
    .map(|corner| transform.transform_point(corner))
}
