//! CPU rigid-body physics with contact generation and sequential impulse resolution.
//!
//! # Architecture
//!
//! Every fixed step runs these phases in order, each consuming the previous one's output:
//!
//! 1. Broadphase: candidate pairs (layer masks, static-static rejection)
//! 2. Narrowphase: contact manifolds from the pair-dispatch table
//! 3. Constraints: user constraints such as springs
//! 4. Resolve: sequential impulses with restitution and Coulomb friction
//! 5. Position correction: partial, inverse-mass weighted push-out
//! 6. Integration: gravity plus semi-implicit Euler, parallel across bodies
//! 7. Pose write-back into a [`TransformStore`]

pub mod body_set;
pub mod broadphase;
pub mod collider;
pub mod constraint;
pub mod contact;
pub mod material;
pub mod narrowphase;
pub mod rigid_body;
pub mod solver;

use std::collections::HashMap;

use glam::Vec3;
use tracing::{debug, trace, warn};

use crate::error::{PhysicsError, Result};
use crate::transform::Transform;

use self::body_set::{BodyHandle, RigidBodySet};
use self::broadphase::{BroadPhase, BroadPhasePair};
use self::constraint::ConstraintSet;
use self::contact::ContactManifold;
use self::narrowphase::NarrowPhase;

/// Configuration for the physics simulation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PhysicsConfig {
    /// Fixed timestep for physics updates in seconds. Default: 1/60.
    pub fixed_timestep: f64,
    /// Maximum number of fixed steps per [`PhysicsWorld::step`] call. Default: 4.
    pub max_substeps: u32,
    /// Penetration tolerated before position correction. Default: 0.01.
    pub penetration_slop: f32,
    /// Fraction of the penetration removed per step. Default: 0.4.
    pub correction_factor: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 4,
            penetration_slop: solver::DEFAULT_PENETRATION_SLOP,
            correction_factor: solver::DEFAULT_CORRECTION_FACTOR,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "fixed_timestep must be positive, got {}",
                self.fixed_timestep
            )));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidConfig(
                "max_substeps must be at least 1".to_string(),
            ));
        }
        if !(self.penetration_slop >= 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "penetration_slop must be non-negative, got {}",
                self.penetration_slop
            )));
        }
        if !(0.0..=1.0).contains(&self.correction_factor) {
            return Err(PhysicsError::InvalidConfig(format!(
                "correction_factor must be in [0, 1], got {}",
                self.correction_factor
            )));
        }
        Ok(())
    }
}

/// Destination for body poses after each fixed step.
pub trait TransformStore {
    fn write_poses(&mut self, bodies: &RigidBodySet);
}

impl TransformStore for HashMap<BodyHandle, Transform> {
    fn write_poses(&mut self, bodies: &RigidBodySet) {
        self.retain(|handle, _| bodies.contains(*handle));
        for (handle, body) in bodies.iter() {
            self.insert(handle, *body.transform());
        }
    }
}

/// The physics world: step-local buffers and the fixed-step clock.
///
/// Bodies and constraints are owned by the caller and passed in on every step.
#[derive(Debug)]
pub struct PhysicsWorld {
    config: PhysicsConfig,
    accumulator: f64,
    time: f64,
    broadphase: BroadPhase,
    narrowphase: NarrowPhase,
}

impl PhysicsWorld {
    /// Create a new physics world, rejecting an invalid configuration.
    pub fn new(config: PhysicsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            accumulator: 0.0,
            time: 0.0,
            broadphase: BroadPhase::new(),
            narrowphase: NarrowPhase::new(),
        })
    }

    /// Step the simulation forward by `delta_time` seconds of wall-clock time.
    ///
    /// Runs up to `max_substeps` fixed steps and returns how many ran. When the accumulator
    /// falls further behind than that, the backlog is dropped.
    pub fn step(
        &mut self,
        bodies: &mut RigidBodySet,
        constraints: &mut ConstraintSet,
        gravity: Option<Vec3>,
        transforms: &mut impl TransformStore,
        delta_time: f64,
    ) -> u32 {
        self.accumulator += delta_time;

        let fixed_timestep = self.config.fixed_timestep;
        let mut substeps = 0u32;
        while self.accumulator >= fixed_timestep && substeps < self.config.max_substeps {
            let time = self.time + fixed_timestep;
            self.fixed_update(
                bodies,
                constraints,
                gravity,
                transforms,
                time,
                fixed_timestep as f32,
            );
            self.accumulator -= fixed_timestep;
            substeps += 1;
        }

        // Clamp accumulator to avoid spiral of death
        if self.accumulator > fixed_timestep * self.config.max_substeps as f64 {
            warn!(
                "Physics fell {:.3}s behind, dropping accumulated time",
                self.accumulator
            );
            self.accumulator = 0.0;
        }

        substeps
    }

    /// Run exactly one fixed step of length `dt` ending at simulation time `time`.
    pub fn fixed_update(
        &mut self,
        bodies: &mut RigidBodySet,
        constraints: &mut ConstraintSet,
        gravity: Option<Vec3>,
        transforms: &mut impl TransformStore,
        time: f64,
        dt: f32,
    ) {
        self.time = time;

        // 1. Broadphase
        let pairs = self.broadphase.update(bodies);

        // 2. Narrowphase
        let manifolds = self.narrowphase.update(bodies, pairs);

        debug!(
            "Physics step t={:.4}: {} bodies, {} pairs, {} manifolds",
            time,
            bodies.len(),
            pairs.len(),
            manifolds.len()
        );

        // 3. User constraints
        constraints.solve_all(bodies, dt);

        // 4. Contact impulses
        solver::resolve_collisions(manifolds, bodies);

        // 5. Position correction
        solver::correct_positions(
            manifolds,
            bodies,
            self.config.penetration_slop,
            self.config.correction_factor,
        );

        // 6. Integration
        rigid_body::integrate_bodies(bodies, gravity, dt);

        // 7. Write back
        transforms.write_poses(bodies);
        trace!("Wrote poses for {} bodies", bodies.len());
    }

    /// Blend factor between the previous and current fixed steps, for rendering.
    #[inline]
    pub fn interpolation_alpha(&self) -> f32 {
        (self.accumulator / self.config.fixed_timestep) as f32
    }

    /// Pairs produced by the most recent broadphase.
    #[inline]
    pub fn pairs(&self) -> &[BroadPhasePair] {
        self.broadphase.pairs()
    }

    /// Manifolds produced by the most recent narrowphase.
    #[inline]
    pub fn manifolds(&self) -> &[ContactManifold] {
        self.narrowphase.manifolds()
    }

    #[inline]
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Simulation time at the end of the last fixed step.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }
}
