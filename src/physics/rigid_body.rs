//! Rigid body state and semi-implicit Euler integration.

use glam::{Mat3, Quat, Vec3};

use crate::transform::Transform;

use super::body_set::RigidBodySet;
use super::collider::Collider;

/// A rigid body. Static bodies have zero inverse mass and zero inverse inertia, which keeps
/// them immobile in every impulse and correction formula without branching.
#[derive(Debug, Clone)]
pub struct RigidBody {
    transform: Transform,
    previous_transform: Transform,
    mass: f32,
    inverse_mass: f32,
    /// Body-space inertia tensor.
    inertia: Mat3,
    inverse_inertia: Mat3,
    /// Linear damping, per second.
    pub linear_damping: f32,
    /// Angular damping, per second.
    pub angular_damping: f32,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    applied_force: Vec3,
    applied_torque: Vec3,
    collider: Option<Collider>,
}

impl RigidBody {
    /// Create a dynamic body with the given mass and a unit-sphere inertia approximation.
    pub fn new_dynamic(mass: f32) -> Self {
        let mut body = Self::new_static();
        body.set_mass(mass);
        body.set_inertia(Mat3::from_diagonal(Vec3::splat(mass)));
        body
    }

    /// Create an immovable body.
    pub fn new_static() -> Self {
        Self {
            transform: Transform::identity(),
            previous_transform: Transform::identity(),
            mass: 0.0,
            inverse_mass: 0.0,
            inertia: Mat3::ZERO,
            inverse_inertia: Mat3::ZERO,
            linear_damping: 0.0,
            angular_damping: 0.0,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            applied_force: Vec3::ZERO,
            applied_torque: Vec3::ZERO,
            collider: None,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self.previous_transform = self.transform;
        self
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.set_orientation(orientation);
        self.previous_transform = self.transform;
        self
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn with_linear_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Set the mass. A zero mass makes the body static.
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.inverse_mass = if mass != 0.0 { 1.0 / mass } else { 0.0 };
    }

    /// Set the body-space inertia tensor. A singular tensor disables rotation response.
    pub fn set_inertia(&mut self, inertia: Mat3) {
        self.inertia = inertia;
        self.inverse_inertia = if inertia.determinant() != 0.0 {
            inertia.inverse()
        } else {
            Mat3::ZERO
        };
    }

    /// Set position and rotation from `transform`. Body poses stay at unit scale, so any
    /// scale is dropped; colliders are authored at their final size.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = Transform::from_position_rotation(transform.position, transform.rotation);
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    pub fn set_orientation(&mut self, orientation: Quat) {
        self.transform.rotation = orientation;
    }

    pub fn set_collider(&mut self, collider: Option<Collider>) {
        self.collider = collider;
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[inline]
    pub fn previous_transform(&self) -> &Transform {
        &self.previous_transform
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    #[inline]
    pub fn orientation(&self) -> Quat {
        self.transform.rotation
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    #[inline]
    pub fn inertia(&self) -> Mat3 {
        self.inertia
    }

    #[inline]
    pub fn inverse_inertia(&self) -> Mat3 {
        self.inverse_inertia
    }

    #[inline]
    pub fn collider(&self) -> Option<&Collider> {
        self.collider.as_ref()
    }

    #[inline]
    pub fn applied_force(&self) -> Vec3 {
        self.applied_force
    }

    #[inline]
    pub fn applied_torque(&self) -> Vec3 {
        self.applied_torque
    }

    /// Static bodies never move.
    #[inline]
    pub fn is_static(&self) -> bool {
        self.inverse_mass == 0.0
    }

    /// Inverse inertia rotated into world space: `R * I^-1 * R^T`.
    #[inline]
    pub fn world_inverse_inertia(&self) -> Mat3 {
        let rotation = Mat3::from_quat(self.transform.rotation);
        rotation * self.inverse_inertia * rotation.transpose()
    }

    /// Velocity of a point at `radius` from the center of mass.
    #[inline]
    pub fn point_velocity(&self, radius: Vec3) -> Vec3 {
        self.linear_velocity + self.angular_velocity.cross(radius)
    }

    /// Accumulate a force applied at `radius` from the center of mass.
    pub fn apply_force(&mut self, force: Vec3, radius: Vec3) {
        self.applied_force += force;
        self.applied_torque += radius.cross(force);
    }

    pub fn apply_central_force(&mut self, force: Vec3) {
        self.applied_force += force;
    }

    pub fn apply_torque(&mut self, torque: Vec3) {
        self.applied_torque += torque;
    }

    /// Apply an impulse at `radius` from the center of mass, changing velocities immediately.
    pub fn apply_impulse(&mut self, impulse: Vec3, radius: Vec3) {
        self.linear_velocity += impulse * self.inverse_mass;
        self.angular_velocity += self.world_inverse_inertia() * radius.cross(impulse);
    }

    pub fn apply_central_impulse(&mut self, impulse: Vec3) {
        self.linear_velocity += impulse * self.inverse_mass;
    }

    pub fn apply_torque_impulse(&mut self, torque: Vec3) {
        self.angular_velocity += self.world_inverse_inertia() * torque;
    }

    pub fn clear_applied_forces(&mut self) {
        self.applied_force = Vec3::ZERO;
        self.applied_torque = Vec3::ZERO;
    }

    /// Integrate accumulated forces into velocities, then velocities into the pose
    /// (semi-implicit Euler). Clears the force accumulators.
    pub fn integrate(&mut self, dt: f32) {
        // Forces -> velocities
        self.linear_velocity += self.applied_force * self.inverse_mass * dt;
        self.angular_velocity += self.world_inverse_inertia() * self.applied_torque * dt;

        self.linear_velocity *= (1.0 - self.linear_damping * dt).max(0.0);
        self.angular_velocity *= (1.0 - self.angular_damping * dt).max(0.0);

        // Velocities -> pose
        self.previous_transform = self.transform;
        self.transform.position += self.linear_velocity * dt;

        // q' = q + 0.5 * dt * omega_quat * q
        let omega = self.angular_velocity;
        if omega.length_squared() > 0.0 {
            let rotation = self.transform.rotation;
            let spin = Quat::from_xyzw(omega.x, omega.y, omega.z, 0.0) * rotation * 0.5;
            self.transform.rotation = Quat::from_xyzw(
                rotation.x + spin.x * dt,
                rotation.y + spin.y * dt,
                rotation.z + spin.z * dt,
                rotation.w + spin.w * dt,
            )
            .normalize();
        }

        self.clear_applied_forces();
    }

    /// Pose between the previous and current fixed steps.
    pub fn interpolate(&self, alpha: f32) -> Transform {
        self.previous_transform.interpolate(&self.transform, alpha)
    }
}

/// Apply gravity to every dynamic body and integrate it over `dt`.
///
/// Bodies are independent during integration, so with the `parallel` feature the loop runs
/// on the rayon thread pool.
pub fn integrate_bodies(bodies: &mut RigidBodySet, gravity: Option<Vec3>, dt: f32) {
    let step = |body: &mut RigidBody| {
        if body.is_static() {
            body.clear_applied_forces();
            return;
        }
        if let Some(gravity) = gravity {
            body.apply_central_force(gravity * body.mass());
        }
        body.integrate(dt);
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        bodies.par_bodies_mut().for_each(step);
    }

    #[cfg(not(feature = "parallel"))]
    bodies.bodies_mut().for_each(step);
}
