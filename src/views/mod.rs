//! The three scenes and the machinery they share.
//!
//! A view owns its generated fields, camera, and per-frame state. The
//! frame loop drives exactly one view per tick: events first, then one
//! `update`, then one `render` into the pixel buffer.

mod home;
mod solar;
mod universe;

pub use home::HomeView;
pub use solar::SolarView;
pub use universe::UniverseView;

use crate::display::{InputEvent, PixelBuffer};
use crate::fields::ParticleField;
use crate::math3d::{Camera, Vec3};
use crate::shading::FieldShader;

/// One interactive scene
pub trait View {
    /// Advance animation state by one tick
    fn update(&mut self, dt: f32);

    /// Rasterize the current state
    fn render(&self, buffer: &mut PixelBuffer);

    /// Pointer/key input. Handlers only write small state; buffers are
    /// touched exclusively by update/render.
    fn handle_event(&mut self, event: &InputEvent, width: u32, height: u32);

    fn name(&self) -> &'static str;
}

/// World placement of a generated field: position plus a fixed or
/// slowly-driven orientation. Applied at draw time so the stored
/// buffer stays in field-local coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub position: Vec3,
    pub rotation: (f32, f32, f32),
}

impl Placement {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: (0.0, 0.0, 0.0),
        }
    }

    pub fn with_rotation(mut self, rx: f32, ry: f32, rz: f32) -> Self {
        self.rotation = (rx, ry, rz);
        self
    }

    #[inline]
    pub fn apply(&self, p: Vec3) -> Vec3 {
        let (rx, ry, rz) = self.rotation;
        p.rotate_xyz(rx, ry, rz) + self.position
    }
}

/// Rasterize a shaded particle field as additive point sprites.
/// `opacity` scales every sprite's alpha; 0 skips the field entirely.
pub fn draw_field(
    buffer: &mut PixelBuffer,
    camera: &Camera,
    field: &ParticleField,
    shader: &FieldShader,
    placement: &Placement,
    opacity: f32,
) {
    if opacity <= 0.0 {
        return;
    }
    let (w, h) = (buffer.width(), buffer.height());
    let px_scale = h as f32 / 720.0;
    let alpha = shader.base_alpha() * opacity;
    let sizes = field.sizes();

    for (i, &local) in field.positions().iter().enumerate() {
        let world = placement.apply(shader.displace(local));
        let Some((sx, sy, depth)) = camera.project(world, w, h) else {
            continue;
        };
        let size_attr = sizes.map_or(1.0, |s| s[i]);
        let radius = 0.5 * shader.point_px(local, size_attr, depth) * px_scale;
        if radius <= 0.0 || sx + radius < 0.0 || sy + radius < 0.0 {
            continue;
        }
        if sx - radius >= w as f32 || sy - radius >= h as f32 {
            continue;
        }
        let (r, g, b) = field.colors()[i].to_bytes();
        buffer.splat_additive(sx, sy, radius.max(0.5), r, g, b, alpha);
    }
}

/// Rasterize a distant star backdrop: fixed pixel size, no attenuation,
/// no per-point animation. Matches the plain point material the close-up
/// fields do not use.
pub fn draw_point_backdrop(
    buffer: &mut PixelBuffer,
    camera: &Camera,
    field: &ParticleField,
    px_size: f32,
    opacity: f32,
) {
    if opacity <= 0.0 {
        return;
    }
    let (w, h) = (buffer.width(), buffer.height());
    let radius = (px_size * 0.5 * h as f32 / 720.0).max(0.5);
    for (i, &p) in field.positions().iter().enumerate() {
        let Some((sx, sy, _)) = camera.project(p, w, h) else {
            continue;
        };
        let (r, g, b) = field.colors()[i].to_bytes();
        buffer.splat_additive(sx, sy, radius, r, g, b, opacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{star_field, StarFieldParams, StarVolume};
    use crate::util::Rng;

    #[test]
    fn placement_translates_after_rotating() {
        let placement =
            Placement::at(Vec3::new(10.0, 0.0, 0.0)).with_rotation(0.0, std::f32::consts::PI, 0.0);
        let p = placement.apply(Vec3::new(1.0, 0.0, 0.0));
        assert!(p.approx_eq(&Vec3::new(9.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn zero_opacity_skips_rasterization() {
        let mut rng = Rng::new(1);
        let field = star_field(
            StarFieldParams {
                count: 100,
                volume: StarVolume::Cube { half_extent: 100.0 },
            },
            &mut rng,
        )
        .unwrap();
        let shader = FieldShader::star();
        let camera = Camera::new(Vec3::new(0.0, 0.0, 300.0), Vec3::zero(), 60.0);
        let mut buffer = PixelBuffer::with_size(64, 64);
        draw_field(
            &mut buffer,
            &camera,
            &field,
            &shader,
            &Placement::at(Vec3::zero()),
            0.0,
        );
        assert!(buffer.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn visible_field_lights_pixels() {
        let mut rng = Rng::new(1);
        let field = star_field(
            StarFieldParams {
                count: 500,
                volume: StarVolume::Cube { half_extent: 100.0 },
            },
            &mut rng,
        )
        .unwrap();
        let shader = FieldShader::star();
        let camera = Camera::new(Vec3::new(0.0, 0.0, 300.0), Vec3::zero(), 60.0);
        let mut buffer = PixelBuffer::with_size(64, 64);
        draw_field(
            &mut buffer,
            &camera,
            &field,
            &shader,
            &Placement::at(Vec3::zero()),
            1.0,
        );
        assert!(buffer.as_bytes().iter().any(|&b| b > 0));
    }
}
