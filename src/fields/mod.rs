//! Procedural particle-field generators.
//!
//! Every generator is a pure function of its parameters and an injected
//! RNG stream: same seed, same field. Generators run once at startup;
//! the buffers they return are never mutated afterwards (all animation
//! happens in the shading stage, see [`crate::shading`]).

mod galaxy;
mod nebula;
mod stars;

pub use galaxy::{
    elliptical_galaxy, galaxy_field, irregular_galaxy, lenticular_galaxy, spiral_galaxy,
    GalaxyParams, ELLIPTICAL_BASE_RADIUS, IRREGULAR_BASE_RADIUS, LENTICULAR_BASE_RADIUS,
    SPIRAL_ARM_RANDOMNESS, SPIRAL_BASE_RADIUS,
};
pub use nebula::{nebula_cloud, NebulaCloud, NebulaParams};
pub use stars::{star_field, StarFieldParams, StarVolume, STAR_SIZE_MAX, STAR_SIZE_MIN};

use crate::math3d::Vec3;
use crate::util::Rgb;
use thiserror::Error;

/// Validation failures raised by the generators.
/// Raised at construction time only; a field that exists is well-formed.
#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("invalid parameter {name}: {why}")]
    InvalidParameter { name: &'static str, why: String },
}

impl FieldError {
    pub(crate) fn invalid(name: &'static str, why: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            why: why.into(),
        }
    }
}

/// An immutable point-sprite buffer set: one position and one color per
/// point, plus optional per-point sizes.
#[derive(Debug, Clone)]
pub struct ParticleField {
    positions: Vec<Vec3>,
    colors: Vec<Rgb>,
    sizes: Option<Vec<f32>>,
}

impl ParticleField {
    pub(crate) fn new(positions: Vec<Vec3>, colors: Vec<Rgb>, sizes: Option<Vec<f32>>) -> Self {
        debug_assert_eq!(positions.len(), colors.len());
        if let Some(sizes) = &sizes {
            debug_assert_eq!(positions.len(), sizes.len());
        }
        Self {
            positions,
            colors,
            sizes,
        }
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    #[inline]
    pub fn sizes(&self) -> Option<&[f32]> {
        self.sizes.as_deref()
    }
}

pub(crate) fn check_count(count: usize) -> Result<(), FieldError> {
    if count == 0 {
        Err(FieldError::invalid("count", "point count must be positive"))
    } else {
        Ok(())
    }
}

pub(crate) fn check_positive(name: &'static str, value: f32) -> Result<(), FieldError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(FieldError::invalid(name, format!("must be > 0, got {value}")))
    }
}
