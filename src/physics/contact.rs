//! Contact data structures for collision response.

use glam::Vec3;

use super::body_set::BodyHandle;

/// Maximum number of contacts in one manifold.
pub const MAX_CONTACTS: usize = 4;

/// A single contact between two shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Contact {
    /// Contact point in world space.
    pub point: Vec3,
    /// Unit contact normal, from body A towards body B.
    pub normal: Vec3,
    /// Penetration depth, never negative.
    pub depth: f32,
}

/// The contacts describing one pair's overlap. Rebuilt from scratch every step.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactManifold {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    contacts: [Contact; MAX_CONTACTS],
    contact_count: usize,
}

impl ContactManifold {
    pub fn new(body_a: BodyHandle, body_b: BodyHandle) -> Self {
        Self {
            body_a,
            body_b,
            contacts: [Contact::default(); MAX_CONTACTS],
            contact_count: 0,
        }
    }

    /// Add a contact. Returns `false` once the manifold is full.
    pub fn push(&mut self, contact: Contact) -> bool {
        if self.is_full() {
            return false;
        }
        self.contacts[self.contact_count] = contact;
        self.contact_count += 1;
        true
    }

    #[inline]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts[..self.contact_count]
    }

    #[inline]
    pub fn contact_count(&self) -> usize {
        self.contact_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contact_count == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.contact_count == MAX_CONTACTS
    }

    /// This manifold expressed with `first` as body A. Contact points are unchanged; normals
    /// are negated when the roles swap.
    pub fn oriented_from(&self, first: BodyHandle) -> ContactManifold {
        if first == self.body_a {
            return self.clone();
        }

        let mut flipped = ContactManifold::new(self.body_b, self.body_a);
        for contact in self.contacts() {
            flipped.push(Contact {
                normal: -contact.normal,
                ..*contact
            });
        }
        flipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body_set::RigidBodySet;
    use crate::physics::rigid_body::RigidBody;

    fn two_handles() -> (BodyHandle, BodyHandle) {
        let mut bodies = RigidBodySet::new();
        (
            bodies.insert(RigidBody::new_static()),
            bodies.insert(RigidBody::new_dynamic(1.0)),
        )
    }

    #[test]
    fn test_capacity_is_bounded() {
        let (a, b) = two_handles();
        let mut manifold = ContactManifold::new(a, b);
        for _ in 0..MAX_CONTACTS {
            assert!(manifold.push(Contact::default()));
        }
        assert!(!manifold.push(Contact::default()));
        assert_eq!(manifold.contact_count(), MAX_CONTACTS);
        assert!(manifold.is_full());
    }

    #[test]
    fn test_oriented_from_swaps_roles() {
        let (a, b) = two_handles();
        let mut manifold = ContactManifold::new(a, b);
        manifold.push(Contact {
            point: Vec3::new(1.0, 2.0, 3.0),
            normal: Vec3::Y,
            depth: 0.25,
        });

        assert_eq!(manifold.oriented_from(a), manifold);

        let flipped = manifold.oriented_from(b);
        assert_eq!(flipped.body_a, b);
        assert_eq!(flipped.body_b, a);
        assert_eq!(flipped.contacts()[0].normal, Vec3::NEG_Y);
        assert_eq!(flipped.contacts()[0].point, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(flipped.contacts()[0].depth, 0.25);
    }
}
