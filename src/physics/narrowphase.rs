//! Narrowphase contact generation.
//!
//! Contact routines live in a dense table indexed by `[kind of A][kind of B]`. Each routine
//! works in world space and appends at most one manifold. Routines for the reversed order of
//! a canonical pair (e.g. sphere x plane) forward to the canonical routine with the bodies
//! swapped, so the manifold's body A is always the canonical first shape and its normal
//! keeps the canonical convention.
//!
//! Sphere x box, box x box and box x capsule are registered as no-ops and produce no
//! contacts. Mesh colliders have no table entries at all.

use glam::Vec3;
use tracing::trace;

use crate::error::{PhysicsError, Result};
use crate::geom::{closest_point_on_segment, closest_points_between_segments};

use super::body_set::{BodyHandle, RigidBodySet};
use super::broadphase::BroadPhasePair;
use super::collider::{
    world_box_corners, world_plane, world_segment, Collider, ColliderShape, ColliderType,
};
use super::contact::{Contact, ContactManifold};
use super::rigid_body::RigidBody;

/// A body seen by a contact routine.
#[derive(Clone, Copy)]
pub struct BodyView<'a> {
    pub handle: BodyHandle,
    pub body: &'a RigidBody,
    pub collider: &'a Collider,
}

/// Contact routine: appends zero or one manifold for bodies `a` and `b`, in that order.
pub type ContactFn = fn(BodyView<'_>, BodyView<'_>, &mut Vec<ContactManifold>);

const N: usize = ColliderType::PRIMITIVE_COUNT;

const NARROW_PHASE_TABLE: [[ContactFn; N]; N] = [
    [plane_plane, plane_sphere, plane_box, plane_capsule],
    [sphere_plane, sphere_sphere, sphere_box, sphere_capsule],
    [box_plane, box_sphere, box_box, box_capsule],
    [capsule_plane, capsule_sphere, capsule_box, capsule_capsule],
];

/// Run the contact routine for `a` and `b`, appending any manifold to `manifolds`.
///
/// Returns the number of manifolds appended (0 or 1), or
/// [`PhysicsError::UnsupportedColliderPair`] when either collider kind has no table entry.
pub fn collide(
    a: BodyView<'_>,
    b: BodyView<'_>,
    manifolds: &mut Vec<ContactManifold>,
) -> Result<usize> {
    let type_a = a.collider.collider_type();
    let type_b = b.collider.collider_type();

    let (Some(row), Some(column)) = (type_a.primitive_index(), type_b.primitive_index()) else {
        return Err(PhysicsError::UnsupportedColliderPair {
            a: type_a,
            b: type_b,
        });
    };

    let before = manifolds.len();
    NARROW_PHASE_TABLE[row][column](a, b, manifolds);
    Ok(manifolds.len() - before)
}

/// Manifold buffer for the narrow phase, rebuilt every step.
#[derive(Debug, Default)]
pub struct NarrowPhase {
    manifolds: Vec<ContactManifold>,
}

impl NarrowPhase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate manifolds for every broad-phase pair. Unsupported pairs are skipped.
    pub fn update(
        &mut self,
        bodies: &RigidBodySet,
        pairs: &[BroadPhasePair],
    ) -> &[ContactManifold] {
        self.manifolds.clear();

        for pair in pairs {
            let (Some(a), Some(b)) = (view(bodies, pair.body_a), view(bodies, pair.body_b)) else {
                continue;
            };

            if let Err(err) = collide(a, b, &mut self.manifolds) {
                trace!("Skipping pair {:?}: {}", pair, err);
            }
        }

        &self.manifolds
    }

    #[inline]
    pub fn manifolds(&self) -> &[ContactManifold] {
        &self.manifolds
    }
}

/// View a body for the narrow phase, if it exists and has a collider.
pub fn view(bodies: &RigidBodySet, handle: BodyHandle) -> Option<BodyView<'_>> {
    let body = bodies.get(handle)?;
    let collider = body.collider()?;
    Some(BodyView {
        handle,
        body,
        collider,
    })
}

/// Build a single-contact manifold from two overlapping spheres: one centered at `center_a`
/// and one at `center_b`. Coincident centers are skipped to avoid a NaN normal.
fn sphere_contact(
    a: BodyHandle,
    center_a: Vec3,
    radius_a: f32,
    b: BodyHandle,
    center_b: Vec3,
    radius_b: f32,
    manifolds: &mut Vec<ContactManifold>,
) {
    let sum_radii = radius_a + radius_b;
    let difference = center_b - center_a;

    let sqr_distance = difference.length_squared();
    if sqr_distance > sum_radii * sum_radii {
        return;
    }

    // Degenerate: centers identical
    if sqr_distance == 0.0 {
        return;
    }

    let distance = sqr_distance.sqrt();
    let normal = difference / distance;
    let depth = sum_radii - distance;

    let mut manifold = ContactManifold::new(a, b);
    manifold.push(Contact {
        point: center_a + normal * (radius_a - depth * 0.5),
        normal,
        depth,
    });
    manifolds.push(manifold);
}

fn plane_plane(_: BodyView<'_>, _: BodyView<'_>, _: &mut Vec<ContactManifold>) {}

fn plane_sphere(a: BodyView<'_>, b: BodyView<'_>, manifolds: &mut Vec<ContactManifold>) {
    let ColliderShape::Plane { normal, constant } = a.collider.shape else {
        return;
    };
    let ColliderShape::Sphere { center, radius } = b.collider.shape else {
        return;
    };

    let plane = world_plane(normal, constant, a.body.transform());
    let center = b.body.transform().transform_point(center);

    let signed_distance = plane.signed_distance(center);
    if signed_distance > radius {
        return;
    }

    let mut manifold = ContactManifold::new(a.handle, b.handle);
    manifold.push(Contact {
        point: center - plane.normal * radius,
        normal: plane.normal,
        depth: (signed_distance - radius).abs(),
    });
    manifolds.push(manifold);
}

fn plane_box(a: BodyView<'_>, b: BodyView<'_>, manifolds: &mut Vec<ContactManifold>) {
    let ColliderShape::Plane { normal, constant } = a.collider.shape else {
        return;
    };
    let ColliderShape::Box { min, max } = b.collider.shape else {
        return;
    };

    let plane = world_plane(normal, constant, a.body.transform());
    let mut manifold = ContactManifold::new(a.handle, b.handle);

    // Brute force over all corners, keeping the first four that touch
    for corner in world_box_corners(min, max, b.body.transform()) {
        let signed_distance = plane.signed_distance(corner);
        if signed_distance <= 0.0 {
            manifold.push(Contact {
                point: corner,
                normal: plane.normal,
                depth: signed_distance.abs(),
            });
            if manifold.is_full() {
                break;
            }
        }
    }

    if !manifold.is_empty() {
        manifolds.push(manifold);
    }
}

fn plane_capsule(a: BodyView<'_>, b: BodyView<'_>, manifolds: &mut Vec<ContactManifold>) {
    let ColliderShape::Plane { normal, constant } = a.collider.shape else {
        return;
    };
    let ColliderShape::Capsule {
        a: segment_a,
        b: segment_b,
        radius,
    } = b.collider.shape
    else {
        return;
    };

    let plane = world_plane(normal, constant, a.body.transform());
    let segment = world_segment(segment_a, segment_b, b.body.transform());

    let mut manifold = ContactManifold::new(a.handle, b.handle);
    for endpoint in [segment.a, segment.b] {
        let signed_distance = plane.signed_distance(endpoint);
        if signed_distance <= radius {
            manifold.push(Contact {
                point: endpoint - plane.normal * radius,
                normal: plane.normal,
                depth: (signed_distance - radius).abs(),
            });
        }
    }

    if !manifold.is_empty() {
        manifolds.push(manifold);
    }
}

fn sphere_plane(a: BodyView<'_>, b: BodyView<'_>, manifolds: &mut Vec<ContactManifold>) {
    plane_sphere(b, a, manifolds);
}

fn sphere_sphere(a: BodyView<'_>, b: BodyView<'_>, manifolds: &mut Vec<ContactManifold>) {
    let ColliderShape::Sphere {
        center: center_a,
        radius: radius_a,
    } = a.collider.shape
    else {
        return;
    };
    let ColliderShape::Sphere {
        center: center_b,
        radius: radius_b,
    } = b.collider.shape
    else {
        return;
    };

    sphere_contact(
        a.handle,
        a.body.transform().transform_point(center_a),
        radius_a,
        b.handle,
        b.body.transform().transform_point(center_b),
        radius_b,
        manifolds,
    );
}

fn sphere_box(_: BodyView<'_>, _: BodyView<'_>, _: &mut Vec<ContactManifold>) {}

fn sphere_capsule(a: BodyView<'_>, b: BodyView<'_>, manifolds: &mut Vec<ContactManifold>) {
    let ColliderShape::Sphere { center, radius } = a.collider.shape else {
        return;
    };
    let ColliderShape::Capsule {
        a: segment_a,
        b: segment_b,
        radius: capsule_radius,
    } = b.collider.shape
    else {
        return;
    };

    let center = a.body.transform().transform_point(center);
    let segment = world_segment(segment_a, segment_b, b.body.transform());
    let closest = closest_point_on_segment(&segment, center);

    sphere_contact(
        a.handle,
        center,
        radius,
        b.handle,
        closest,
        capsule_radius,
        manifolds,
    );
}

fn box_plane(a: BodyView<'_>, b: BodyView<'_>, manifolds: &mut Vec<ContactManifold>) {
    plane_box(b, a, manifolds);
}

fn box_sphere(_: BodyView<'_>, _: BodyView<'_>, _: &mut Vec<ContactManifold>) {}

fn box_box(_: BodyView<'_>, _: BodyView<'_>, _: &mut Vec<ContactManifold>) {}

fn box_capsule(_: BodyView<'_>, _: BodyView<'_>, _: &mut Vec<ContactManifold>) {}

fn capsule_plane(a: BodyView<'_>, b: BodyView<'_>, manifolds: &mut Vec<ContactManifold>) {
    plane_capsule(b, a, manifolds);
}

fn capsule_sphere(a: BodyView<'_>, b: BodyView<'_>, manifolds: &mut Vec<ContactManifold>) {
    sphere_capsule(b, a, manifolds);
}

fn capsule_box(_: BodyView<'_>, _: BodyView<'_>, _: &mut Vec<ContactManifold>) {}

fn capsule_capsule(a: BodyView<'_>, b: BodyView<'_>, manifolds: &mut Vec<ContactManifold>) {
    let ColliderShape::Capsule {
        a: a0,
        b: a1,
        radius: radius_a,
    } = a.collider.shape
    else {
        return;
    };
    let ColliderShape::Capsule {
        a: b0,
        b: b1,
        radius: radius_b,
    } = b.collider.shape
    else {
        return;
    };

    let segment_a = world_segment(a0, a1, a.body.transform());
    let segment_b = world_segment(b0, b1, b.body.transform());
    let (closest_a, closest_b) = closest_points_between_segments(&segment_a, &segment_b);

    sphere_contact(
        a.handle, closest_a, radius_a, b.handle, closest_b, radius_b, manifolds,
    );
}
