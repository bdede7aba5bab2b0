//! Per-field animation state and the point shading contract.
//!
//! Each generated field owns one `FieldShader`: the uniforms its
//! original GLSL material owned (elapsed time, per-instance rotation
//! speed or drift phase). The frame loop advances `time` once per tick;
//! everything position- or size-dependent is evaluated here per point
//! at draw time, so the stored buffers stay immutable and the per-tick
//! mutation cost is one scalar per field.

use crate::catalog::Morphology;
use crate::math3d::Vec3;
use crate::util::Rng;

/// Galaxy rotation speed ranges in radians per second.
/// Spirals churn visibly; ellipticals barely drift.
const SPIRAL_ROT: (f32, f32) = (0.0048, 0.0078);
const ELLIPTICAL_ROT: (f32, f32) = (0.0018, 0.0030);
const IRREGULAR_ROT: (f32, f32) = (0.0030, 0.0054);
const LENTICULAR_ROT: (f32, f32) = (0.0024, 0.0042);

/// Animation state for one field, dispatched by pattern match
#[derive(Debug, Clone)]
pub enum FieldShader {
    Star {
        time: f32,
    },
    Nebula {
        time: f32,
        phase: f32,
    },
    SpiralGalaxy {
        time: f32,
        rot_speed: f32,
        radius: f32,
    },
    EllipticalGalaxy {
        time: f32,
        rot_speed: f32,
    },
    IrregularGalaxy {
        time: f32,
        rot_speed: f32,
    },
    LenticularGalaxy {
        time: f32,
        rot_speed: f32,
    },
}

impl FieldShader {
    pub fn star() -> Self {
        Self::Star { time: 0.0 }
    }

    /// Nebula shading with the cloud's decorrelation phase
    pub fn nebula(phase: f32) -> Self {
        Self::Nebula { time: 0.0, phase }
    }

    /// Build the galaxy shader for a morphology, drawing the instance's
    /// rotation speed once from the morphology's bounded range.
    pub fn galaxy(morphology: Morphology, radius: f32, rng: &mut Rng) -> Self {
        match morphology {
            Morphology::Spiral => Self::SpiralGalaxy {
                time: 0.0,
                rot_speed: rng.range_f32(SPIRAL_ROT.0, SPIRAL_ROT.1),
                radius,
            },
            Morphology::Elliptical => Self::EllipticalGalaxy {
                time: 0.0,
                rot_speed: rng.range_f32(ELLIPTICAL_ROT.0, ELLIPTICAL_ROT.1),
            },
            Morphology::Irregular => Self::IrregularGalaxy {
                time: 0.0,
                rot_speed: rng.range_f32(IRREGULAR_ROT.0, IRREGULAR_ROT.1),
            },
            Morphology::Lenticular => Self::LenticularGalaxy {
                time: 0.0,
                rot_speed: rng.range_f32(LENTICULAR_ROT.0, LENTICULAR_ROT.1),
            },
        }
    }

    /// Advance the time uniform; the only mutation a tick performs
    pub fn advance_time(&mut self, dt: f32) {
        match self {
            Self::Star { time }
            | Self::Nebula { time, .. }
            | Self::SpiralGalaxy { time, .. }
            | Self::EllipticalGalaxy { time, .. }
            | Self::IrregularGalaxy { time, .. }
            | Self::LenticularGalaxy { time, .. } => *time += dt,
        }
    }

    pub fn time(&self) -> f32 {
        match self {
            Self::Star { time }
            | Self::Nebula { time, .. }
            | Self::SpiralGalaxy { time, .. }
            | Self::EllipticalGalaxy { time, .. }
            | Self::IrregularGalaxy { time, .. }
            | Self::LenticularGalaxy { time, .. } => *time,
        }
    }

    /// Time-dependent displacement of a stored point, field-local
    pub fn displace(&self, p: Vec3) -> Vec3 {
        match *self {
            Self::Star { .. } => p,
            Self::Nebula { time, phase } => Vec3::new(
                p.x + (time * 0.1 + phase + p.y * 0.05).sin() * 8.0,
                p.y + (time * 0.08 + phase + p.x * 0.03).cos() * 5.0,
                p.z,
            ),
            Self::SpiralGalaxy {
                time,
                rot_speed,
                radius,
            } => {
                // Differential rotation: inner radii sweep faster, which
                // slowly winds the arms tighter
                let r = (p.x * p.x + p.z * p.z).sqrt();
                let angle = p.z.atan2(p.x) + time * rot_speed * (radius / (r + radius * 0.0625));
                Vec3::new(angle.cos() * r, p.y, angle.sin() * r)
            },
            Self::EllipticalGalaxy { time, rot_speed }
            | Self::IrregularGalaxy { time, rot_speed }
            | Self::LenticularGalaxy { time, rot_speed } => p.rotate_y(time * rot_speed),
        }
    }

    /// Screen point size (pixel diameter before resolution scaling) for a
    /// stored point with per-point size attribute `size` at view depth
    /// `depth`. Star twinkle lives here: a size pulse from time and the
    /// point's own coordinates, never from mutated data.
    pub fn point_px(&self, p: Vec3, size: f32, depth: f32) -> f32 {
        let depth = depth.max(1.0);
        match *self {
            Self::Star { time } => {
                let twinkle = 1.0 + 0.3 * (time * 3.0 + p.x * 10.0 + p.y * 7.0).sin();
                size * twinkle * (300.0 / depth)
            },
            Self::Nebula { .. } => 80.0 / depth,
            Self::SpiralGalaxy { radius, .. } => {
                let r = (p.x * p.x + p.z * p.z).sqrt();
                let base = (1.5 * (1.0 - r / radius) + 0.5).max(0.5);
                base * (400.0 / depth)
            },
            Self::EllipticalGalaxy { .. } => 1.2 * (300.0 / depth),
            Self::IrregularGalaxy { .. } => 350.0 / depth,
            Self::LenticularGalaxy { .. } => 1.2 * (350.0 / depth),
        }
    }

    /// Sprite alpha at the disc center, before LOD scaling
    pub fn base_alpha(&self) -> f32 {
        match self {
            Self::Star { .. } => 1.0,
            Self::Nebula { .. } => 0.18,
            Self::SpiralGalaxy { .. } => 0.9,
            Self::EllipticalGalaxy { .. } => 0.85,
            Self::IrregularGalaxy { .. } => 0.8,
            Self::LenticularGalaxy { .. } => 0.85,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_advances_monotonically() {
        let mut shader = FieldShader::star();
        let mut last = shader.time();
        for _ in 0..100 {
            shader.advance_time(1.0 / 60.0);
            assert!(shader.time() > last);
            last = shader.time();
        }
    }

    #[test]
    fn rotation_speeds_stay_in_their_bounds() {
        let mut rng = Rng::new(17);
        for _ in 0..200 {
            match FieldShader::galaxy(Morphology::Spiral, 800.0, &mut rng) {
                FieldShader::SpiralGalaxy { rot_speed, .. } => {
                    assert!((SPIRAL_ROT.0..SPIRAL_ROT.1).contains(&rot_speed));
                },
                _ => unreachable!(),
            }
            match FieldShader::galaxy(Morphology::Elliptical, 600.0, &mut rng) {
                FieldShader::EllipticalGalaxy { rot_speed, .. } => {
                    assert!((ELLIPTICAL_ROT.0..ELLIPTICAL_ROT.1).contains(&rot_speed));
                },
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn distinct_instances_rotate_at_distinct_rates() {
        let mut rng = Rng::new(17);
        let a = FieldShader::galaxy(Morphology::Spiral, 800.0, &mut rng);
        let b = FieldShader::galaxy(Morphology::Spiral, 800.0, &mut rng);
        let speed = |s: &FieldShader| match s {
            FieldShader::SpiralGalaxy { rot_speed, .. } => *rot_speed,
            _ => unreachable!(),
        };
        assert_ne!(speed(&a), speed(&b));
    }

    #[test]
    fn displacement_never_touches_the_buffer() {
        let mut shader = FieldShader::nebula(12.0);
        let p = Vec3::new(10.0, -4.0, 30.0);
        shader.advance_time(5.0);
        let moved = shader.displace(p);
        assert_ne!(moved, p);
        // The input point is Copy; re-evaluating with the same uniforms
        // gives the same answer (pure function of time and coordinates)
        assert_eq!(shader.displace(p), moved);
    }

    #[test]
    fn rigid_rotation_preserves_radius() {
        let mut rng = Rng::new(3);
        let mut shader = FieldShader::galaxy(Morphology::Elliptical, 600.0, &mut rng);
        shader.advance_time(100.0);
        let p = Vec3::new(300.0, 20.0, -100.0);
        let q = shader.displace(p);
        assert!((p.length() - q.length()).abs() < 1e-2);
        assert_eq!(p.y, q.y);
    }

    #[test]
    fn spiral_rotation_preserves_radius_per_point() {
        let mut rng = Rng::new(3);
        let mut shader = FieldShader::galaxy(Morphology::Spiral, 800.0, &mut rng);
        shader.advance_time(50.0);
        let p = Vec3::new(200.0, 5.0, 200.0);
        let q = shader.displace(p);
        let r_before = (p.x * p.x + p.z * p.z).sqrt();
        let r_after = (q.x * q.x + q.z * q.z).sqrt();
        assert!((r_before - r_after).abs() < 1e-2);
    }

    #[test]
    fn star_twinkle_is_bounded() {
        let mut shader = FieldShader::star();
        for tick in 0..600 {
            shader.advance_time(1.0 / 60.0);
            let px = shader.point_px(Vec3::new(5.0, 7.0, -3.0), 2.0, 300.0);
            let base = 2.0 * 300.0 / 300.0;
            assert!(px >= base * 0.7 - 1e-3 && px <= base * 1.3 + 1e-3, "tick {tick}");
        }
    }
}
