//! Nebula cloud generator: a flattened spheroid of large soft sprites
//! whose colors blend between two input colors.

use super::{check_count, check_positive, FieldError, ParticleField};
use crate::math3d::Vec3;
use crate::util::{Rgb, Rng};
use std::f32::consts::{PI, TAU};

#[derive(Debug, Clone, Copy)]
pub struct NebulaParams {
    pub count: usize,
    pub center: Vec3,
    pub scale: f32,
    pub color_a: Rgb,
    pub color_b: Rgb,
}

/// A generated cloud plus the phase offset its drift animation uses, so
/// several clouds sharing one clock never move in lockstep.
#[derive(Debug, Clone)]
pub struct NebulaCloud {
    pub field: ParticleField,
    pub phase: f32,
}

/// Generate one nebula cloud.
///
/// Points sample a spheroid (uniform radius, two uniform angles),
/// flattened on y and stretched laterally on x by an independent jitter
/// factor. Each point's color is a linear blend of the two input colors
/// with a blend weight drawn uniformly in [0, 1].
pub fn nebula_cloud(params: NebulaParams, rng: &mut Rng) -> Result<NebulaCloud, FieldError> {
    check_count(params.count)?;
    check_positive("scale", params.scale)?;

    let mut positions = Vec::with_capacity(params.count);
    let mut colors = Vec::with_capacity(params.count);

    for _ in 0..params.count {
        let r = rng.next_f32() * params.scale;
        let theta = rng.range_f32(0.0, TAU);
        let phi = rng.range_f32(0.0, PI);
        let stretch = 1.0 + rng.next_f32() * 0.5;
        positions.push(Vec3::new(
            params.center.x + r * phi.sin() * theta.cos() * stretch,
            params.center.y + r * phi.sin() * theta.sin() * 0.4,
            params.center.z + r * phi.cos(),
        ));

        let mix = rng.next_f32();
        colors.push(params.color_a.lerp(params.color_b, mix));
    }

    Ok(NebulaCloud {
        field: ParticleField::new(positions, colors, None),
        phase: rng.next_f32() * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud(seed: u64) -> NebulaCloud {
        let mut rng = Rng::new(seed);
        nebula_cloud(
            NebulaParams {
                count: 4000,
                center: Vec3::new(-200.0, 80.0, -400.0),
                scale: 150.0,
                color_a: Rgb::from_hex("#7b2fff").unwrap(),
                color_b: Rgb::from_hex("#00d4ff").unwrap(),
            },
            &mut rng,
        )
        .unwrap()
    }

    #[test]
    fn buffer_lengths_match_count() {
        let c = cloud(5);
        assert_eq!(c.field.point_count(), 4000);
        assert_eq!(c.field.colors().len(), 4000);
        assert!(c.field.sizes().is_none());
    }

    #[test]
    fn points_stay_within_stretched_extent() {
        let c = cloud(5);
        for p in c.field.positions() {
            // Lateral stretch caps at 1.5x the nominal radius
            assert!((p.x - -200.0).abs() <= 150.0 * 1.5 + 1e-3);
            assert!((p.y - 80.0).abs() <= 150.0 * 0.4 + 1e-3);
            assert!((p.z - -400.0).abs() <= 150.0 + 1e-3);
        }
    }

    #[test]
    fn colors_interpolate_between_inputs() {
        let a = Rgb::from_hex("#7b2fff").unwrap();
        let b = Rgb::from_hex("#00d4ff").unwrap();
        let (lo_r, hi_r) = (a.r.min(b.r), a.r.max(b.r));
        let c = cloud(5);
        for col in c.field.colors() {
            assert!(col.r >= lo_r - 1e-4 && col.r <= hi_r + 1e-4);
            for ch in [col.r, col.g, col.b] {
                assert!((0.0..=1.0).contains(&ch));
            }
        }
    }

    #[test]
    fn phase_offsets_decorrelate_instances() {
        let a = cloud(5);
        let b = cloud(6);
        assert!((0.0..100.0).contains(&a.phase));
        assert_ne!(a.phase, b.phase);
    }

    #[test]
    fn invalid_scale_is_rejected() {
        let mut rng = Rng::new(1);
        let err = nebula_cloud(
            NebulaParams {
                count: 10,
                center: Vec3::zero(),
                scale: -1.0,
                color_a: Rgb::WHITE,
                color_b: Rgb::WHITE,
            },
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, FieldError::InvalidParameter { name: "scale", .. }));
    }
}
