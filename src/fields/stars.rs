//! Star-field generators: a uniform cube for close-up backdrops and a
//! distant spherical shell for the solar and universe views.

use super::{check_count, check_positive, FieldError, ParticleField};
use crate::math3d::Vec3;
use crate::util::{Rgb, Rng};
use std::f32::consts::TAU;

pub const STAR_SIZE_MIN: f32 = 0.5;
pub const STAR_SIZE_MAX: f32 = 3.0;

/// Sampling volume for a star field
#[derive(Debug, Clone, Copy)]
pub enum StarVolume {
    /// Uniform inside a cube centered on the origin
    Cube { half_extent: f32 },
    /// Area-uniform on a thick spherical shell
    Shell { r_min: f32, r_max: f32 },
}

#[derive(Debug, Clone, Copy)]
pub struct StarFieldParams {
    pub count: usize,
    pub volume: StarVolume,
}

/// Generate a star field.
///
/// Cube fields carry per-point sizes in [`STAR_SIZE_MIN`, `STAR_SIZE_MAX`)
/// and draw each color from a weighted palette: white-blue 60%, gold 20%,
/// purple-blue 20%, with per-channel jitter. Shell fields are the dim
/// blue-white distant backdrop and carry no per-point sizes.
pub fn star_field(params: StarFieldParams, rng: &mut Rng) -> Result<ParticleField, FieldError> {
    check_count(params.count)?;
    match params.volume {
        StarVolume::Cube { half_extent } => {
            check_positive("half_extent", half_extent)?;
            cube_field(params.count, half_extent, rng)
        },
        StarVolume::Shell { r_min, r_max } => {
            check_positive("r_min", r_min)?;
            if r_max <= r_min {
                return Err(FieldError::invalid(
                    "r_max",
                    format!("shell must have r_max > r_min, got {r_min}..{r_max}"),
                ));
            }
            shell_field(params.count, r_min, r_max, rng)
        },
    }
}

fn cube_field(count: usize, half_extent: f32, rng: &mut Rng) -> Result<ParticleField, FieldError> {
    let mut positions = Vec::with_capacity(count);
    let mut colors = Vec::with_capacity(count);
    let mut sizes = Vec::with_capacity(count);

    for _ in 0..count {
        positions.push(Vec3::new(
            (rng.next_f32() - 0.5) * 2.0 * half_extent,
            (rng.next_f32() - 0.5) * 2.0 * half_extent,
            (rng.next_f32() - 0.5) * 2.0 * half_extent,
        ));
        colors.push(star_color(rng));
        sizes.push(rng.range_f32(STAR_SIZE_MIN, STAR_SIZE_MAX));
    }

    Ok(ParticleField::new(positions, colors, Some(sizes)))
}

/// Weighted three-class star palette
fn star_color(rng: &mut Rng) -> Rgb {
    let class = rng.next_f32();
    if class < 0.6 {
        // white-blue
        Rgb::new(
            0.8 + rng.next_f32() * 0.2,
            0.8 + rng.next_f32() * 0.2,
            1.0,
        )
    } else if class < 0.8 {
        // gold
        Rgb::new(
            1.0,
            0.85 + rng.next_f32() * 0.15,
            0.3 + rng.next_f32() * 0.3,
        )
    } else {
        // purple-blue
        Rgb::new(
            0.4 + rng.next_f32() * 0.3,
            0.4 + rng.next_f32() * 0.4,
            1.0,
        )
    }
}

fn shell_field(
    count: usize,
    r_min: f32,
    r_max: f32,
    rng: &mut Rng,
) -> Result<ParticleField, FieldError> {
    let mut positions = Vec::with_capacity(count);
    let mut colors = Vec::with_capacity(count);

    for _ in 0..count {
        let r = rng.range_f32(r_min, r_max);
        let theta = rng.range_f32(0.0, TAU);
        // acos(2u-1) keeps the sphere area-uniform, no pole clustering
        let phi = (2.0 * rng.next_f32() - 1.0).clamp(-1.0, 1.0).acos();
        positions.push(Vec3::new(
            r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin(),
            r * phi.cos(),
        ));
        colors.push(Rgb::new(
            0.6 + rng.next_f32() * 0.4,
            0.6 + rng.next_f32() * 0.4,
            0.8 + rng.next_f32() * 0.2,
        ));
    }

    Ok(ParticleField::new(positions, colors, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(count: usize, half: f32) -> ParticleField {
        let mut rng = Rng::new(1234);
        star_field(
            StarFieldParams {
                count,
                volume: StarVolume::Cube { half_extent: half },
            },
            &mut rng,
        )
        .unwrap()
    }

    #[test]
    fn cube_buffer_lengths_match_count() {
        let field = cube(5000, 1000.0);
        assert_eq!(field.point_count(), 5000);
        assert_eq!(field.positions().len(), 5000);
        assert_eq!(field.colors().len(), 5000);
        assert_eq!(field.sizes().unwrap().len(), 5000);
    }

    #[test]
    fn cube_positions_and_sizes_stay_in_bounds() {
        let field = cube(5000, 1000.0);
        for p in field.positions() {
            assert!(p.x.abs() <= 1000.0 && p.y.abs() <= 1000.0 && p.z.abs() <= 1000.0);
        }
        for &s in field.sizes().unwrap() {
            assert!((STAR_SIZE_MIN..STAR_SIZE_MAX).contains(&s));
        }
    }

    #[test]
    fn colors_stay_in_unit_range() {
        let field = cube(5000, 1000.0);
        for c in field.colors() {
            for ch in [c.r, c.g, c.b] {
                assert!((0.0..=1.0).contains(&ch));
            }
        }
    }

    #[test]
    fn color_classes_follow_palette_weights() {
        // Classes are separable by the red channel: gold pins r to 1.0,
        // white-blue draws r in [0.8, 1.0), purple-blue stays below 0.7.
        let field = cube(20_000, 1000.0);
        let mut white_blue = 0usize;
        let mut gold = 0usize;
        let mut purple = 0usize;
        for c in field.colors() {
            if c.r == 1.0 {
                gold += 1;
            } else if c.r >= 0.8 {
                white_blue += 1;
            } else {
                purple += 1;
            }
        }
        let n = field.point_count() as f32;
        assert!((white_blue as f32 / n - 0.6).abs() < 0.02);
        assert!((gold as f32 / n - 0.2).abs() < 0.02);
        assert!((purple as f32 / n - 0.2).abs() < 0.02);
    }

    #[test]
    fn shell_radii_stay_in_band() {
        let mut rng = Rng::new(77);
        let field = star_field(
            StarFieldParams {
                count: 4000,
                volume: StarVolume::Shell {
                    r_min: 8000.0,
                    r_max: 10000.0,
                },
            },
            &mut rng,
        )
        .unwrap();
        assert!(field.sizes().is_none());
        for p in field.positions() {
            let r = p.length();
            assert!((8000.0..=10000.0 + 1.0).contains(&r));
        }
    }

    #[test]
    fn zero_count_is_rejected() {
        let mut rng = Rng::new(1);
        let err = star_field(
            StarFieldParams {
                count: 0,
                volume: StarVolume::Cube { half_extent: 10.0 },
            },
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, FieldError::InvalidParameter { .. }));
    }

    #[test]
    fn degenerate_volumes_are_rejected() {
        let mut rng = Rng::new(1);
        assert!(star_field(
            StarFieldParams {
                count: 10,
                volume: StarVolume::Cube { half_extent: 0.0 },
            },
            &mut rng,
        )
        .is_err());
        assert!(star_field(
            StarFieldParams {
                count: 10,
                volume: StarVolume::Shell {
                    r_min: 100.0,
                    r_max: 100.0,
                },
            },
            &mut rng,
        )
        .is_err());
    }

    #[test]
    fn same_seed_reproduces_the_field() {
        let a = cube(100, 500.0);
        let b = cube(100, 500.0);
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.colors(), b.colors());
    }
}
