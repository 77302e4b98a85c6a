//! Arena of rigid bodies addressed by generational handles.

use slotmap::{new_key_type, SlotMap};

use crate::error::{PhysicsError, Result};

use super::collider::Collider;
use super::rigid_body::RigidBody;

new_key_type! {
    /// Handle to a body in a [`RigidBodySet`]. Handles to removed bodies never alias a body
    /// inserted later into the same slot.
    pub struct BodyHandle;
}

/// Storage for the bodies the physics pipeline steps. Iteration follows slot order.
#[derive(Debug, Clone, Default)]
pub struct RigidBodySet {
    bodies: SlotMap<BodyHandle, RigidBody>,
}

impl RigidBodySet {
    pub fn new() -> Self {
        Self {
            bodies: SlotMap::with_key(),
        }
    }

    pub fn insert(&mut self, body: RigidBody) -> BodyHandle {
        self.bodies.insert(body)
    }

    /// Remove a body, returning it. Stale handles return `None`.
    pub fn remove(&mut self, handle: BodyHandle) -> Option<RigidBody> {
        self.bodies.remove(handle)
    }

    #[inline]
    pub fn get(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    #[inline]
    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    /// Borrow two distinct bodies mutably. Returns `None` if the handles are equal or stale.
    pub fn get_pair_mut(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
    ) -> Option<(&mut RigidBody, &mut RigidBody)> {
        let [body_a, body_b] = self.bodies.get_disjoint_mut([a, b])?;
        Some((body_a, body_b))
    }

    #[inline]
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(handle)
    }

    /// Attach or detach the collider of a body.
    pub fn set_collider(&mut self, handle: BodyHandle, collider: Option<Collider>) -> Result<()> {
        let body = self
            .get_mut(handle)
            .ok_or(PhysicsError::InvalidBodyHandle(handle))?;
        body.set_collider(collider);
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut RigidBody)> {
        self.bodies.iter_mut()
    }

    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.bodies.keys()
    }

    pub(crate) fn bodies_mut(&mut self) -> impl Iterator<Item = &mut RigidBody> {
        self.bodies.values_mut()
    }

    #[cfg(feature = "parallel")]
    pub(crate) fn par_bodies_mut(
        &mut self,
    ) -> impl rayon::iter::ParallelIterator<Item = &mut RigidBody> {
        use rayon::prelude::*;
        self.bodies.values_mut().collect::<Vec<_>>().into_par_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_insert_get_remove() {
        let mut bodies = RigidBodySet::new();
        let a = bodies.insert(RigidBody::new_dynamic(1.0));
        let b = bodies.insert(RigidBody::new_static());
        assert_eq!(bodies.len(), 2);
        assert!(bodies.get(a).is_some());
        assert!(bodies.get(b).unwrap().is_static());

        assert!(bodies.remove(a).is_some());
        assert_eq!(bodies.len(), 1);
        assert!(bodies.get(a).is_none());
        assert!(bodies.remove(a).is_none());
    }

    #[test]
    fn test_stale_handle_does_not_alias() {
        let mut bodies = RigidBodySet::new();
        let old = bodies.insert(RigidBody::new_dynamic(1.0));
        bodies.remove(old);

        let new = bodies.insert(RigidBody::new_dynamic(2.0));
        assert_ne!(old, new);
        assert!(bodies.get(old).is_none());
        assert_eq!(bodies.get(new).unwrap().mass(), 2.0);
    }

    #[test]
    fn test_get_pair_mut() {
        let mut bodies = RigidBodySet::new();
        let a = bodies.insert(RigidBody::new_dynamic(1.0));
        let b = bodies.insert(RigidBody::new_dynamic(1.0));

        {
            let (body_b, body_a) = bodies.get_pair_mut(b, a).unwrap();
            body_a.linear_velocity = Vec3::X;
            body_b.linear_velocity = Vec3::Y;
        }
        assert_eq!(bodies.get(a).unwrap().linear_velocity, Vec3::X);
        assert_eq!(bodies.get(b).unwrap().linear_velocity, Vec3::Y);

        assert!(bodies.get_pair_mut(a, a).is_none());
        assert!(bodies.contains(b));
        bodies.remove(b);
        assert!(!bodies.contains(b));
        assert!(bodies.get_pair_mut(a, b).is_none());
    }

    #[test]
    fn test_iteration_in_slot_order() {
        let mut bodies = RigidBodySet::new();
        let handles: Vec<_> = (0..4)
            .map(|i| bodies.insert(RigidBody::new_dynamic(i as f32 + 1.0)))
            .collect();
        bodies.remove(handles[1]);

        let seen: Vec<_> = bodies.handles().collect();
        assert_eq!(seen, vec![handles[0], handles[2], handles[3]]);

        for (_, body) in bodies.iter_mut() {
            body.linear_velocity = Vec3::Z;
        }
        assert!(bodies.iter().all(|(_, body)| body.linear_velocity == Vec3::Z));
    }

    #[test]
    fn test_set_collider_rejects_stale_handle() {
        let mut bodies = RigidBodySet::new();
        let handle = bodies.insert(RigidBody::new_dynamic(1.0));
        bodies
            .set_collider(handle, Some(Collider::sphere(0.5)))
            .unwrap();
        assert!(bodies.get(handle).unwrap().collider().is_some());

        bodies.remove(handle);
        assert_eq!(
            bodies.set_collider(handle, None),
            Err(PhysicsError::InvalidBodyHandle(handle))
        );
    }
}
