//! The four galaxy morphology generators.
//!
//! All four produce galaxy-local coordinates centered on the origin;
//! world placement and orientation are applied at draw time.

use super::{check_count, check_positive, FieldError, ParticleField};
use crate::catalog::Morphology;
use crate::math3d::Vec3;
use crate::util::{Rgb, Rng};
use std::f32::consts::TAU;

/// Disk radius per unit of catalog scale
pub const SPIRAL_BASE_RADIUS: f32 = 800.0;
pub const ELLIPTICAL_BASE_RADIUS: f32 = 600.0;
pub const IRREGULAR_BASE_RADIUS: f32 = 500.0;
pub const LENTICULAR_BASE_RADIUS: f32 = 650.0;

/// How far spiral points may scatter from the ideal arm curve,
/// as a fraction of their orbital radius
pub const SPIRAL_ARM_RANDOMNESS: f32 = 0.3;

const SPIRAL_SPIN_TURNS: f32 = 1.5;
const SPIRAL_SCATTER_BIAS: i32 = 3;
const IRREGULAR_CLUMPS: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct GalaxyParams {
    pub count: usize,
    pub scale: f32,
    pub color_primary: Rgb,
    pub color_secondary: Rgb,
    /// Spiral arm count; ignored by the other morphologies
    pub arms: u32,
}

impl GalaxyParams {
    fn validate(&self) -> Result<(), FieldError> {
        check_count(self.count)?;
        check_positive("scale", self.scale)
    }
}

/// Dispatch on morphology
pub fn galaxy_field(
    morphology: Morphology,
    params: GalaxyParams,
    rng: &mut Rng,
) -> Result<ParticleField, FieldError> {
    match morphology {
        Morphology::Spiral => spiral_galaxy(params, rng),
        Morphology::Elliptical => elliptical_galaxy(params, rng),
        Morphology::Irregular => irregular_galaxy(params, rng),
        Morphology::Lenticular => lenticular_galaxy(params, rng),
    }
}

/// Spiral: points assigned round-robin to arms, wound by radius, and
/// scattered off the arm curve by a cube-biased offset so most points
/// hug the arm and a minority drift outward into a diffuse edge.
pub fn spiral_galaxy(params: GalaxyParams, rng: &mut Rng) -> Result<ParticleField, FieldError> {
    params.validate()?;
    if params.arms < 1 {
        return Err(FieldError::invalid(
            "arms",
            format!("spiral needs at least one arm, got {}", params.arms),
        ));
    }

    let radius = SPIRAL_BASE_RADIUS * params.scale;
    let mut positions = Vec::with_capacity(params.count);
    let mut colors = Vec::with_capacity(params.count);

    for i in 0..params.count {
        let r = rng.next_f32() * radius;
        let arm_base = (i % params.arms as usize) as f32 / params.arms as f32 * TAU;
        let spin = r / radius * SPIRAL_SPIN_TURNS * TAU;
        let angle = arm_base + spin;

        // Scatter: magnitude cubed toward zero, direction mostly in-plane.
        // Normalizing the direction keeps |offset| <= randomness * r, which
        // bounds every point inside radius * (1 + randomness).
        let magnitude = rng.next_f32().powi(SPIRAL_SCATTER_BIAS) * SPIRAL_ARM_RANDOMNESS * r;
        let azimuth = rng.range_f32(0.0, TAU);
        let tilt = rng.next_f32().powi(SPIRAL_SCATTER_BIAS) * rng.sign() * 0.15;
        let scatter = Vec3::new(azimuth.cos(), tilt, azimuth.sin()).normalize() * magnitude;

        positions.push(Vec3::new(angle.cos() * r, 0.0, angle.sin() * r) + scatter);

        let mix = r / radius;
        let brightness = 1.0 - mix * 0.5;
        colors.push(
            params
                .color_primary
                .lerp(params.color_secondary, mix)
                .scale(brightness),
        );
    }

    Ok(ParticleField::new(positions, colors, None))
}

/// Elliptical: center-weighted spheroid, flattened on y
pub fn elliptical_galaxy(params: GalaxyParams, rng: &mut Rng) -> Result<ParticleField, FieldError> {
    params.validate()?;

    let radius = ELLIPTICAL_BASE_RADIUS * params.scale;
    let mut positions = Vec::with_capacity(params.count);
    let mut colors = Vec::with_capacity(params.count);

    for _ in 0..params.count {
        let r = rng.next_f32().powf(1.5) * radius;
        let theta = rng.range_f32(0.0, TAU);
        let phi = (2.0 * rng.next_f32() - 1.0).clamp(-1.0, 1.0).acos();
        positions.push(Vec3::new(
            r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin() * 0.5,
            r * phi.cos(),
        ));

        // Core brightness boost, clamped back into channel range
        let mix = r / radius;
        let brightness = 1.2 - mix * 0.6;
        colors.push(
            params
                .color_primary
                .lerp(params.color_secondary, mix)
                .scale(brightness)
                .clamped(),
        );
    }

    Ok(ParticleField::new(positions, colors, None))
}

/// Irregular: a handful of clump centers rather than radial symmetry;
/// colors mixed by an independent per-point weight
pub fn irregular_galaxy(params: GalaxyParams, rng: &mut Rng) -> Result<ParticleField, FieldError> {
    params.validate()?;

    let radius = IRREGULAR_BASE_RADIUS * params.scale;
    let mut positions = Vec::with_capacity(params.count);
    let mut colors = Vec::with_capacity(params.count);

    for _ in 0..params.count {
        let clump = rng.index(IRREGULAR_CLUMPS);
        let off_x = (clump % 2) as f32 - 0.5;
        let off_z = (clump / 2) as f32 - 0.5;
        let r = rng.next_f32() * radius * 0.6;
        let theta = rng.range_f32(0.0, TAU);
        let phi = rng.range_f32(0.0, std::f32::consts::PI);
        positions.push(Vec3::new(
            off_x * radius * 0.6 + r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin() * 0.3,
            off_z * radius * 0.6 + r * phi.cos(),
        ));

        let mix = rng.next_f32();
        colors.push(params.color_secondary.lerp(params.color_primary, mix));
    }

    Ok(ParticleField::new(positions, colors, None))
}

/// Lenticular: center-weighted disk whose thickness tapers toward the rim
pub fn lenticular_galaxy(params: GalaxyParams, rng: &mut Rng) -> Result<ParticleField, FieldError> {
    params.validate()?;

    let radius = LENTICULAR_BASE_RADIUS * params.scale;
    let mut positions = Vec::with_capacity(params.count);
    let mut colors = Vec::with_capacity(params.count);

    for _ in 0..params.count {
        let r = rng.next_f32().powf(1.3) * radius;
        let theta = rng.range_f32(0.0, TAU);
        let thickness = (1.0 - r / radius) * 0.12 + 0.02;
        positions.push(Vec3::new(
            theta.cos() * r,
            (rng.next_f32() - 0.5) * r * thickness,
            theta.sin() * r,
        ));

        let mix = r / radius;
        colors.push(params.color_primary.lerp(params.color_secondary, mix));
    }

    Ok(ParticleField::new(positions, colors, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(count: usize, scale: f32, arms: u32) -> GalaxyParams {
        GalaxyParams {
            count,
            scale,
            color_primary: Rgb::from_hex("#00d4ff").unwrap(),
            color_secondary: Rgb::from_hex("#7b2fff").unwrap(),
            arms,
        }
    }

    fn median_radius(field: &ParticleField) -> f32 {
        let mut radii: Vec<f32> = field.positions().iter().map(|p| p.length()).collect();
        radii.sort_by(|a, b| a.partial_cmp(b).unwrap());
        radii[radii.len() / 2]
    }

    #[test]
    fn all_morphologies_fill_their_buffers() {
        for morphology in [
            Morphology::Spiral,
            Morphology::Elliptical,
            Morphology::Irregular,
            Morphology::Lenticular,
        ] {
            let mut rng = Rng::new(99);
            let field = galaxy_field(morphology, params(3000, 0.8, 4), &mut rng).unwrap();
            assert_eq!(field.point_count(), 3000);
            assert_eq!(field.colors().len(), 3000);
            for c in field.colors() {
                for ch in [c.r, c.g, c.b] {
                    assert!((0.0..=1.0).contains(&ch), "channel out of range: {ch}");
                }
            }
        }
    }

    #[test]
    fn spiral_points_respect_the_scatter_bound() {
        let mut rng = Rng::new(42);
        let scale = 1.2;
        let field = spiral_galaxy(params(20_000, scale, 6), &mut rng).unwrap();
        let limit = SPIRAL_BASE_RADIUS * scale * (1.0 + SPIRAL_ARM_RANDOMNESS);
        for p in field.positions() {
            assert!(p.length() <= limit + 1e-2);
        }
    }

    #[test]
    fn spiral_arms_share_points_evenly() {
        // Recover each point's arm by unwinding the spin term, then check
        // the per-arm occupancy. Scatter blurs the recovered angle but
        // does so symmetrically, so the marginal fractions stay 1/arms.
        let arms = 4u32;
        let mut rng = Rng::new(21);
        let field = spiral_galaxy(params(20_000, 1.0, arms), &mut rng).unwrap();

        let mut per_arm = vec![0usize; arms as usize];
        for p in field.positions() {
            let r = (p.x * p.x + p.z * p.z).sqrt();
            let unwound = p.z.atan2(p.x) - r / SPIRAL_BASE_RADIUS * SPIRAL_SPIN_TURNS * TAU;
            let frac = (unwound / TAU).rem_euclid(1.0);
            let arm = ((frac * arms as f32).round() as usize) % arms as usize;
            per_arm[arm] += 1;
        }
        let n = field.point_count() as f32;
        for &count in &per_arm {
            assert!((count as f32 / n - 1.0 / arms as f32).abs() < 0.05);
        }
    }

    #[test]
    fn elliptical_mass_concentrates_centrally() {
        let mut rng = Rng::new(7);
        let field = elliptical_galaxy(params(20_000, 1.0, 1), &mut rng).unwrap();
        assert!(median_radius(&field) < ELLIPTICAL_BASE_RADIUS * 0.5);
    }

    #[test]
    fn lenticular_mass_concentrates_centrally() {
        let mut rng = Rng::new(7);
        let field = lenticular_galaxy(params(20_000, 1.0, 1), &mut rng).unwrap();
        assert!(median_radius(&field) < LENTICULAR_BASE_RADIUS * 0.5);
    }

    #[test]
    fn lenticular_rim_is_flatter_than_core() {
        let mut rng = Rng::new(11);
        let field = lenticular_galaxy(params(20_000, 1.0, 1), &mut rng).unwrap();
        let mut inner_max_ratio = 0.0f32;
        let mut outer_max_ratio = 0.0f32;
        for p in field.positions() {
            let r = (p.x * p.x + p.z * p.z).sqrt();
            if r < 1.0 {
                continue;
            }
            let ratio = p.y.abs() / r;
            if r < LENTICULAR_BASE_RADIUS * 0.3 {
                inner_max_ratio = inner_max_ratio.max(ratio);
            } else if r > LENTICULAR_BASE_RADIUS * 0.9 {
                outer_max_ratio = outer_max_ratio.max(ratio);
            }
        }
        assert!(outer_max_ratio < inner_max_ratio);
    }

    #[test]
    fn irregular_points_cluster_around_clump_centers() {
        let mut rng = Rng::new(3);
        let scale = 1.0;
        let field = irregular_galaxy(params(10_000, scale, 1), &mut rng).unwrap();
        let radius = IRREGULAR_BASE_RADIUS * scale;
        let centers = [
            (-0.3 * radius, -0.3 * radius),
            (0.3 * radius, -0.3 * radius),
            (-0.3 * radius, 0.3 * radius),
            (0.3 * radius, 0.3 * radius),
        ];
        for p in field.positions() {
            let near_some_clump = centers.iter().any(|&(cx, cz)| {
                let dx = p.x - cx;
                let dz = p.z - cz;
                (dx * dx + dz * dz).sqrt() <= radius * 0.6 + 1e-2
            });
            assert!(near_some_clump);
        }
    }

    fn irregular_galaxy_color_mix_is_radius_free() -> (f32, f32) {
        // helper kept separate so the test below reads as the claim
        let mut rng = Rng::new(5);
        let field = irregular_galaxy(params(20_000, 1.0, 1), &mut rng).unwrap();
        let mut near = Vec::new();
        let mut far = Vec::new();
        let median = median_radius(&field);
        for (p, c) in field.positions().iter().zip(field.colors()) {
            if p.length() < median {
                near.push(c.r);
            } else {
                far.push(c.r);
            }
        }
        let mean = |v: &[f32]| v.iter().sum::<f32>() / v.len() as f32;
        (mean(&near), mean(&far))
    }

    #[test]
    fn irregular_color_has_no_radial_correlation() {
        let (near, far) = irregular_galaxy_color_mix_is_radius_free();
        assert!((near - far).abs() < 0.02);
    }

    #[test]
    fn invalid_parameters_fail_fast() {
        let mut rng = Rng::new(1);
        assert!(spiral_galaxy(params(0, 1.0, 3), &mut rng).is_err());
        assert!(spiral_galaxy(params(100, 0.0, 3), &mut rng).is_err());
        assert!(spiral_galaxy(params(100, -2.0, 3), &mut rng).is_err());
        let err = spiral_galaxy(params(100, 1.0, 0), &mut rng).unwrap_err();
        assert!(matches!(err, FieldError::InvalidParameter { name: "arms", .. }));
        // Non-spiral morphologies ignore the arm count
        assert!(elliptical_galaxy(params(100, 1.0, 0), &mut rng).is_ok());
    }
}
