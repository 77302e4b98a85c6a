//! Sequential impulse contact resolution and positional drift correction.

use glam::Vec3;

use super::body_set::RigidBodySet;
use super::contact::ContactManifold;
use super::material::CombinedMaterial;
use super::rigid_body::RigidBody;

/// Penetration allowed before position correction kicks in.
pub const DEFAULT_PENETRATION_SLOP: f32 = 0.01;
/// Fraction of the remaining penetration removed per step (Baumgarte-style).
pub const DEFAULT_CORRECTION_FACTOR: f32 = 0.4;

/// Resolve every manifold with one pass of sequential impulses.
///
/// Each contact's impulse is scaled by `1 / contact_count`, approximating a simultaneous
/// solve over the manifold. Manifolds whose bodies no longer exist are skipped.
pub fn resolve_collisions(manifolds: &[ContactManifold], bodies: &mut RigidBodySet) {
    for manifold in manifolds {
        let Some((body_a, body_b)) = bodies.get_pair_mut(manifold.body_a, manifold.body_b) else {
            continue;
        };
        resolve_manifold(manifold, body_a, body_b);
    }
}

fn resolve_manifold(manifold: &ContactManifold, a: &mut RigidBody, b: &mut RigidBody) {
    if manifold.is_empty() {
        return;
    }

    let material = combined_material(a, b);
    let impulse_scale = 1.0 / manifold.contact_count() as f32;
    let inv_mass_sum = a.inverse_mass() + b.inverse_mass();

    for contact in manifold.contacts() {
        let normal = contact.normal;
        let r_a = contact.point - a.position();
        let r_b = contact.point - b.position();

        let relative_velocity = b.point_velocity(r_b) - a.point_velocity(r_a);
        let contact_velocity = relative_velocity.dot(normal);

        // Separating
        if contact_velocity > 0.0 {
            continue;
        }

        let normal_mass = effective_mass_inverse(a, b, r_a, r_b, normal, inv_mass_sum);
        if normal_mass <= 0.0 {
            continue;
        }

        let normal_impulse =
            -(1.0 + material.restitution) * contact_velocity / normal_mass * impulse_scale;

        let impulse = normal * normal_impulse;
        a.apply_impulse(-impulse, r_a);
        b.apply_impulse(impulse, r_b);

        // Friction direction from the updated relative velocity
        let relative_velocity = b.point_velocity(r_b) - a.point_velocity(r_a);
        let Some(tangent) = (relative_velocity - normal * relative_velocity.dot(normal))
            .try_normalize()
        else {
            continue;
        };

        let tangent_mass = effective_mass_inverse(a, b, r_a, r_b, tangent, inv_mass_sum);
        if tangent_mass <= 0.0 {
            continue;
        }

        let tangent_impulse = relative_velocity.dot(-tangent) / tangent_mass * impulse_scale;
        let tangent_impulse = clamp_friction(tangent_impulse, normal_impulse, &material);

        let impulse = tangent * tangent_impulse;
        a.apply_impulse(-impulse, r_a);
        b.apply_impulse(impulse, r_b);
    }
}

/// Denominator of the impulse formula along `direction`.
#[inline]
fn effective_mass_inverse(
    a: &RigidBody,
    b: &RigidBody,
    r_a: Vec3,
    r_b: Vec3,
    direction: Vec3,
    inv_mass_sum: f32,
) -> f32 {
    let angular_a = (a.world_inverse_inertia() * r_a.cross(direction)).cross(r_a);
    let angular_b = (b.world_inverse_inertia() * r_b.cross(direction)).cross(r_b);
    inv_mass_sum + (angular_a + angular_b).dot(direction)
}

/// Coulomb friction cone. An impulse at or beyond `normal_impulse * static_friction` is
/// replaced by `normal_impulse * dynamic_friction`, keeping its sign.
#[inline]
pub fn clamp_friction(tangent_impulse: f32, normal_impulse: f32, material: &CombinedMaterial) -> f32 {
    if tangent_impulse.abs() >= normal_impulse * material.static_friction {
        (normal_impulse * material.dynamic_friction).copysign(tangent_impulse)
    } else {
        tangent_impulse
    }
}

fn combined_material(a: &RigidBody, b: &RigidBody) -> CombinedMaterial {
    let material_a = a.collider().map(|c| c.material).unwrap_or_default();
    let material_b = b.collider().map(|c| c.material).unwrap_or_default();
    CombinedMaterial::from_pair(&material_a, &material_b)
}

/// Push overlapping bodies apart along the contact normals, weighted by inverse mass.
/// Only positions change; velocities are untouched.
pub fn correct_positions(
    manifolds: &[ContactManifold],
    bodies: &mut RigidBodySet,
    slop: f32,
    factor: f32,
) {
    for manifold in manifolds {
        let Some((a, b)) = bodies.get_pair_mut(manifold.body_a, manifold.body_b) else {
            continue;
        };

        let inv_mass_a = a.inverse_mass();
        let inv_mass_b = b.inverse_mass();
        let inv_mass_sum = inv_mass_a + inv_mass_b;
        if inv_mass_sum <= 0.0 {
            continue;
        }

        for contact in manifold.contacts() {
            let correction =
                contact.normal * ((contact.depth - slop).max(0.0) / inv_mass_sum * factor);
            a.set_position(a.position() - correction * inv_mass_a);
            b.set_position(b.position() + correction * inv_mass_b);
        }
    }
}
