//! Broadphase pair generation.

use super::body_set::{BodyHandle, RigidBodySet};

/// Unordered pair of bodies that might be touching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BroadPhasePair {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
}

/// All-pairs broadphase, rebuilt every step.
///
/// A pair is kept when both bodies have colliders, the colliders share a layer bit, and at
/// least one body is dynamic. Scenes are small enough that the O(n^2) scan is cheaper than
/// maintaining a spatial structure.
#[derive(Debug, Default)]
pub struct BroadPhase {
    pairs: Vec<BroadPhasePair>,
}

impl BroadPhase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the pair list from the current bodies.
    pub fn update(&mut self, bodies: &RigidBodySet) -> &[BroadPhasePair] {
        self.pairs.clear();

        let entries: Vec<_> = bodies
            .iter()
            .filter_map(|(handle, body)| {
                body.collider()
                    .map(|collider| (handle, collider, body.is_static()))
            })
            .collect();

        for (i, &(handle_a, collider_a, static_a)) in entries.iter().enumerate() {
            for &(handle_b, collider_b, static_b) in &entries[i + 1..] {
                // Skip pairs without a mutual layer
                if !collider_a.interacts_with(collider_b) {
                    continue;
                }

                // Skip static-static pairs
                if static_a && static_b {
                    continue;
                }

                self.pairs.push(BroadPhasePair {
                    body_a: handle_a,
                    body_b: handle_b,
                });
            }
        }

        &self.pairs
    }

    #[inline]
    pub fn pairs(&self) -> &[BroadPhasePair] {
        &self.pairs
    }
}
