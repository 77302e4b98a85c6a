//! Collision materials and the policies used to combine two of them.

use crate::error::{PhysicsError, Result};

/// Policy for deriving one coefficient from two materials' values.
///
/// Variants are ranked in declaration order. When two materials disagree, the higher-ranked
/// mode wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombineMode {
    /// Mean of the two coefficients.
    #[default]
    Average,
    /// Smaller of the two coefficients.
    Minimum,
    /// Product of the two coefficients.
    Multiply,
    /// Larger of the two coefficients.
    Maximum,
}

impl CombineMode {
    /// Combine two coefficients.
    #[inline]
    pub fn combine(self, a: f32, b: f32) -> f32 {
        match self {
            CombineMode::Average => (a + b) * 0.5,
            CombineMode::Minimum => a.min(b),
            CombineMode::Multiply => a * b,
            CombineMode::Maximum => a.max(b),
        }
    }
}

/// Surface response coefficients attached to a collider.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    /// Coefficient of restitution, in `[0, 1]`.
    pub restitution: f32,
    /// Friction coefficient bounding the impulse that keeps a contact from sliding.
    pub static_friction: f32,
    /// Friction coefficient applied once the contact slides.
    pub dynamic_friction: f32,
    pub restitution_combine: CombineMode,
    pub friction_combine: CombineMode,
}

impl Material {
    /// Create a material with `Average` combine modes, validating the coefficients.
    pub fn new(restitution: f32, static_friction: f32, dynamic_friction: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&restitution) {
            return Err(PhysicsError::InvalidMaterial(format!(
                "restitution {restitution} outside [0, 1]"
            )));
        }
        for (name, value) in [
            ("static friction", static_friction),
            ("dynamic friction", dynamic_friction),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PhysicsError::InvalidMaterial(format!(
                    "{name} {value} must be finite and non-negative"
                )));
            }
        }

        Ok(Self {
            restitution,
            static_friction,
            dynamic_friction,
            ..Self::default()
        })
    }

    pub fn with_restitution_combine(mut self, mode: CombineMode) -> Self {
        self.restitution_combine = mode;
        self
    }

    pub fn with_friction_combine(mut self, mode: CombineMode) -> Self {
        self.friction_combine = mode;
        self
    }
}

/// Coefficients for one contacting pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombinedMaterial {
    pub restitution: f32,
    pub static_friction: f32,
    pub dynamic_friction: f32,
}

impl CombinedMaterial {
    /// Combine two materials using the higher-ranked of their modes.
    pub fn from_pair(a: &Material, b: &Material) -> Self {
        let restitution_mode = a.restitution_combine.max(b.restitution_combine);
        let friction_mode = a.friction_combine.max(b.friction_combine);

        Self {
            restitution: restitution_mode.combine(a.restitution, b.restitution),
            static_friction: friction_mode.combine(a.static_friction, b.static_friction),
            dynamic_friction: friction_mode.combine(a.dynamic_friction, b.dynamic_friction),
        }
    }
}
