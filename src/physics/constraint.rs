//! Generic constraints solved before contact resolution.

use glam::Vec3;

use super::body_set::{BodyHandle, RigidBodySet};

/// A constraint acting on bodies of a [`RigidBodySet`]. Solved once per fixed step, before
/// any contact impulses.
pub trait Constraint: Send {
    fn solve(&mut self, bodies: &mut RigidBodySet, dt: f32);
}

/// Handle to a constraint in a [`ConstraintSet`]. Never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintHandle(u32);

/// Owned constraints, solved in insertion order.
#[derive(Default)]
pub struct ConstraintSet {
    constraints: Vec<(ConstraintHandle, Box<dyn Constraint>)>,
    next_handle: u32,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, constraint: impl Constraint + 'static) -> ConstraintHandle {
        let handle = ConstraintHandle(self.next_handle);
        self.next_handle += 1;
        self.constraints.push((handle, Box::new(constraint)));
        handle
    }

    pub fn remove(&mut self, handle: ConstraintHandle) -> Option<Box<dyn Constraint>> {
        // Handles are issued in increasing order, so storage stays sorted by handle
        let index = self
            .constraints
            .binary_search_by_key(&handle, |(h, _)| *h)
            .ok()?;
        Some(self.constraints.remove(index).1)
    }

    #[inline]
    pub fn contains(&self, handle: ConstraintHandle) -> bool {
        self.constraints
            .binary_search_by_key(&handle, |(h, _)| *h)
            .is_ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn solve_all(&mut self, bodies: &mut RigidBodySet, dt: f32) {
        for (_, constraint) in &mut self.constraints {
            constraint.solve(bodies, dt);
        }
    }
}

impl std::fmt::Debug for ConstraintSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintSet")
            .field("len", &self.constraints.len())
            .finish()
    }
}

/// Damped spring between points fixed in two bodies.
///
/// Applies `F = -k (|d| - rest) d_hat - c v_rel` where `d` runs from the attachment point
/// on A to the one on B: `-F` on A and `F` on B.
#[derive(Debug, Clone)]
pub struct SpringConstraint {
    body_a: Option<(BodyHandle, Vec3)>,
    body_b: Option<(BodyHandle, Vec3)>,
    resting_length: f32,
    stiffness: f32,
    damping: f32,
}

impl SpringConstraint {
    pub fn new(resting_length: f32, stiffness: f32, damping: f32) -> Self {
        Self {
            body_a: None,
            body_b: None,
            resting_length,
            stiffness,
            damping,
        }
    }

    /// Attach end A at `local_point` in the body's space.
    pub fn attach_a(mut self, body: BodyHandle, local_point: Vec3) -> Self {
        self.body_a = Some((body, local_point));
        self
    }

    /// Attach end B at `local_point` in the body's space.
    pub fn attach_b(mut self, body: BodyHandle, local_point: Vec3) -> Self {
        self.body_b = Some((body, local_point));
        self
    }

    pub fn detach_a(&mut self) {
        self.body_a = None;
    }

    pub fn detach_b(&mut self) {
        self.body_b = None;
    }

    pub fn set_resting_length(&mut self, resting_length: f32) {
        self.resting_length = resting_length;
    }

    pub fn set_stiffness(&mut self, stiffness: f32) {
        self.stiffness = stiffness;
    }

    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping;
    }

    #[inline]
    pub fn body_a(&self) -> Option<(BodyHandle, Vec3)> {
        self.body_a
    }

    #[inline]
    pub fn body_b(&self) -> Option<(BodyHandle, Vec3)> {
        self.body_b
    }

    #[inline]
    pub fn resting_length(&self) -> f32 {
        self.resting_length
    }

    #[inline]
    pub fn stiffness(&self) -> f32 {
        self.stiffness
    }

    #[inline]
    pub fn damping(&self) -> f32 {
        self.damping
    }
}

impl Constraint for SpringConstraint {
    fn solve(&mut self, bodies: &mut RigidBodySet, _dt: f32) {
        let (Some((handle_a, local_a)), Some((handle_b, local_b))) = (self.body_a, self.body_b)
        else {
            return;
        };
        let Some((a, b)) = bodies.get_pair_mut(handle_a, handle_b) else {
            return;
        };

        let r_a = a.orientation() * local_a;
        let r_b = b.orientation() * local_b;

        let relative_velocity = b.point_velocity(r_b) - a.point_velocity(r_a);
        let delta = (b.position() + r_b) - (a.position() + r_a);

        let mut force = -self.damping * relative_velocity;
        // Coincident attachment points have no spring direction
        if let Some(direction) = delta.try_normalize() {
            force -= self.stiffness * (delta.length() - self.resting_length) * direction;
        }

        a.apply_force(-force, r_a);
        b.apply_force(force, r_b);
    }
}
