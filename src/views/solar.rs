//! The solar system view: a noise-shaded sun with a pulsing glow halo,
//! eight textured planets on circular orbits, Saturn's ring, Earth's
//! moon, and hover tooltips.

use super::{draw_point_backdrop, View};
use crate::display::{InputEvent, MouseButtonKind, PixelBuffer};
use crate::fields::{star_field, ParticleField, StarFieldParams, StarVolume};
use crate::math3d::{pixel_to_ndc, Camera, OrbitRig, Vec3};
use crate::noise::value_noise;
use crate::picking::Picker;
use crate::texture::Texture;
use crate::ui::Tooltip;
use crate::util::{Rgb, Rng};

const BG_STAR_COUNT: usize = 8000;
const SUN_RADIUS: f32 = 25.0;
const GLOW_RADIUS: f32 = 32.0;
/// Earth's orbital angular speed; the table's per-planet speeds are
/// relative to this
const EARTH_ORBIT_RATE: f32 = 0.25;
const SUN_NOISE_SEED: u32 = 0x50_1A_12;

enum SurfaceKind {
    Continental,
    Banded(&'static str, &'static str),
    Rocky(&'static str),
}

struct PlanetDef {
    name: &'static str,
    radius: f32,
    orbit: f32,
    speed: f32,
    tilt_deg: f32,
    rings: bool,
    moons: u32,
    surface: SurfaceKind,
}

const PLANETS: [PlanetDef; 8] = [
    PlanetDef { name: "Mercury", radius: 2.4, orbit: 55.0, speed: 4.15, tilt_deg: 0.03, rings: false, moons: 0, surface: SurfaceKind::Rocky("#8a7a6a") },
    PlanetDef { name: "Venus", radius: 4.0, orbit: 85.0, speed: 1.62, tilt_deg: 177.4, rings: false, moons: 0, surface: SurfaceKind::Rocky("#e8c08a") },
    PlanetDef { name: "Earth", radius: 4.2, orbit: 120.0, speed: 1.0, tilt_deg: 23.4, rings: false, moons: 1, surface: SurfaceKind::Continental },
    PlanetDef { name: "Mars", radius: 3.0, orbit: 165.0, speed: 0.53, tilt_deg: 25.2, rings: false, moons: 0, surface: SurfaceKind::Rocky("#c1440e") },
    PlanetDef { name: "Jupiter", radius: 14.0, orbit: 250.0, speed: 0.084, tilt_deg: 3.1, rings: false, moons: 0, surface: SurfaceKind::Banded("#c88b3a", "#a0622a") },
    PlanetDef { name: "Saturn", radius: 12.0, orbit: 360.0, speed: 0.034, tilt_deg: 26.7, rings: true, moons: 0, surface: SurfaceKind::Banded("#e4d191", "#c8a840") },
    PlanetDef { name: "Uranus", radius: 7.5, orbit: 465.0, speed: 0.012, tilt_deg: 97.8, rings: false, moons: 0, surface: SurfaceKind::Banded("#7de8e8", "#5cc8c8") },
    PlanetDef { name: "Neptune", radius: 7.0, orbit: 570.0, speed: 0.006, tilt_deg: 28.3, rings: false, moons: 0, surface: SurfaceKind::Banded("#3f54ba", "#2a3a9a") },
];

struct Planet {
    def: &'static PlanetDef,
    texture: Texture,
    ring: Option<Texture>,
    angle: f32,
    spin: f32,
    spin_rate: f32,
}

impl Planet {
    fn position(&self) -> Vec3 {
        Vec3::new(
            self.angle.cos() * self.def.orbit,
            0.0,
            self.angle.sin() * self.def.orbit,
        )
    }
}

pub struct SolarView {
    backdrop: ParticleField,
    planets: Vec<Planet>,
    moon_texture: Texture,
    rig: OrbitRig,
    camera: Camera,
    time: f32,
    show_orbits: bool,
    pointer: (i32, i32),
    dragging: bool,
    last_pointer: (i32, i32),
    tooltip: Tooltip,
    viewport: (u32, u32),
}

impl SolarView {
    pub fn new(rng: &mut Rng, viewport: (u32, u32)) -> Self {
        let backdrop = star_field(
            StarFieldParams {
                count: BG_STAR_COUNT,
                volume: StarVolume::Shell {
                    r_min: 8000.0,
                    r_max: 10_000.0,
                },
            },
            rng,
        )
        .expect("solar backdrop parameters are static");

        let planets = PLANETS
            .iter()
            .map(|def| {
                let texture = match def.surface {
                    SurfaceKind::Continental => Texture::continental(256, rng),
                    SurfaceKind::Banded(a, b) => Texture::banded(
                        256,
                        Rgb::from_hex(a).expect("planet palette"),
                        Rgb::from_hex(b).expect("planet palette"),
                        rng,
                    ),
                    SurfaceKind::Rocky(base) => {
                        Texture::rocky(256, Rgb::from_hex(base).expect("planet palette"), rng)
                    },
                };
                Planet {
                    def,
                    texture,
                    ring: def.rings.then(|| Texture::ring_gradient(256)),
                    angle: rng.next_f32() * std::f32::consts::TAU,
                    spin: 0.0,
                    spin_rate: 0.2 + rng.next_f32() * 0.3,
                }
            })
            .collect();

        let moon_texture = Texture::rocky(128, Rgb::new(0.66, 0.66, 0.68), rng);

        let mut rig = OrbitRig::new(Vec3::zero(), 0.0, 0.0, 400.0).with_distance_limits(20.0, 3000.0);
        rig.sync_to(Vec3::new(0.0, 120.0, 380.0), Vec3::zero());
        let mut camera = Camera::new(Vec3::new(0.0, 120.0, 380.0), Vec3::zero(), 60.0);
        rig.apply_to(&mut camera);

        Self {
            backdrop,
            planets,
            moon_texture,
            rig,
            camera,
            time: 0.0,
            show_orbits: true,
            pointer: (0, 0),
            dragging: false,
            last_pointer: (0, 0),
            tooltip: Tooltip::new(),
            viewport,
        }
    }

    fn moon_position(&self, earth: &Planet) -> Vec3 {
        let a = self.time * 2.0;
        earth.position() + Vec3::new(a.cos() * 8.0, 0.0, a.sin() * 8.0)
    }

    fn build_picker(&self) -> Picker {
        let mut picker = Picker::new();
        picker.add("Sun", Vec3::zero(), SUN_RADIUS * 1.5);
        for planet in &self.planets {
            picker.add(planet.def.name, planet.position(), planet.def.radius * 2.5);
        }
        picker
    }

    /// Sun surface color for a unit sphere normal, in the original
    /// shader's three-octave style
    fn sun_color(&self, p: Vec3) -> Rgb {
        let t = self.time;
        let sample = |scale: f32, offset: f32| {
            value_noise(
                p.x * scale + offset,
                p.y * scale + offset,
                p.z * scale + offset,
                SUN_NOISE_SEED,
            )
        };
        let n = sample(3.0, t * 0.3) * 0.5 + sample(7.0, -t * 0.5) * 0.3 + sample(15.0, t * 0.2) * 0.2;

        let col1 = Rgb::new(1.0, 0.6, 0.1);
        let col2 = Rgb::new(1.0, 0.9, 0.3);
        let col3 = Rgb::new(1.0, 0.3, 0.05);

        let color = col1.lerp(col2, n.clamp(0.0, 1.0));
        color.lerp(col3, (sample(20.0, t * 0.8) * 0.4).clamp(0.0, 1.0))
    }

    fn render_sun(&self, buffer: &mut PixelBuffer) {
        let (w, h) = (buffer.width(), buffer.height());
        let Some((cx, cy, depth)) = self.camera.project(Vec3::zero(), w, h) else {
            return;
        };
        let scale = self.camera.screen_scale(h, depth);
        let radius = SUN_RADIUS * scale;
        let glow_radius = GLOW_RADIUS * scale;
        if radius < 0.5 {
            buffer.splat_additive(cx, cy, 1.0, 255, 200, 80, 1.0);
            return;
        }

        let pulse = 1.0 + 0.1 * (self.time * 2.0).sin();
        let x0 = (cx - glow_radius).floor() as i32;
        let x1 = (cx + glow_radius).ceil() as i32;
        let y0 = (cy - glow_radius).floor() as i32;
        let y1 = (cy + glow_radius).ceil() as i32;

        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = (px as f32 + 0.5 - cx) / radius;
                let dy = (py as f32 + 0.5 - cy) / radius;
                let d2 = dx * dx + dy * dy;
                if d2 <= 1.0 {
                    // On the disc: shade from the sphere normal
                    let nz = (1.0 - d2).sqrt();
                    let normal = Vec3::new(dx, -dy, nz);
                    let color = self.sun_color(normal);
                    // Limb darkening
                    let (r, g, b) = color.scale(0.6 + 0.4 * nz).to_bytes();
                    buffer.set_pixel(px, py, r, g, b);
                } else {
                    // Glow halo outside the disc
                    let d = d2.sqrt();
                    let reach = glow_radius / radius;
                    if d < reach {
                        let t = (d - 1.0) / (reach - 1.0);
                        let falloff = (1.0 - t).powi(3);
                        let color = Rgb::new(1.0, 0.5, 0.1).lerp(Rgb::new(1.0, 0.85, 0.2), falloff);
                        let (r, g, b) = color.to_bytes();
                        buffer.add_pixel(px, py, r, g, b, falloff * 0.6 * pulse);
                    }
                }
            }
        }
    }

    fn render_sphere(
        &self,
        buffer: &mut PixelBuffer,
        center: Vec3,
        world_radius: f32,
        texture: &Texture,
        tilt: f32,
        spin: f32,
    ) {
        let (w, h) = (buffer.width(), buffer.height());
        let Some((cx, cy, depth)) = self.camera.project(center, w, h) else {
            return;
        };
        let radius = world_radius * self.camera.screen_scale(h, depth);
        if radius < 0.6 {
            let (r, g, b) = texture.sample(0.5, 0.5);
            buffer.splat_additive(cx, cy, 0.8, r, g, b, 1.0);
            return;
        }

        let (right, up, forward) = self.camera.basis();
        let light_dir = (Vec3::zero() - center).normalize(); // sunlight

        let x0 = (cx - radius).floor() as i32;
        let x1 = (cx + radius).ceil() as i32;
        let y0 = (cy - radius).floor() as i32;
        let y1 = (cy + radius).ceil() as i32;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = (px as f32 + 0.5 - cx) / radius;
                let dy = (py as f32 + 0.5 - cy) / radius;
                let d2 = dx * dx + dy * dy;
                if d2 > 1.0 {
                    continue;
                }
                let nz = (1.0 - d2).sqrt();
                // Camera-facing hemisphere normal back in world space
                let normal = right * dx + up * -dy - forward * nz;
                // Undo the body's model rotation to get texture space
                let local = normal.rotate_z(-tilt).rotate_y(-spin);
                let u = 0.5 + local.z.atan2(local.x) / std::f32::consts::TAU;
                let v = 0.5 - local.y.clamp(-1.0, 1.0).asin() / std::f32::consts::PI;
                let (tr, tg, tb) = texture.sample(u, v);

                let lambert = normal.dot(&light_dir).max(0.0);
                let lit = 0.12 + 0.88 * lambert;
                buffer.set_pixel(
                    px,
                    py,
                    (tr as f32 * lit) as u8,
                    (tg as f32 * lit) as u8,
                    (tb as f32 * lit) as u8,
                );
            }
        }
    }

    fn render_ring(&self, buffer: &mut PixelBuffer, planet: &Planet, ring: &Texture) {
        let (w, h) = (buffer.width(), buffer.height());
        let inner = planet.def.radius * 1.3;
        let outer = planet.def.radius * 2.4;
        let tilt = planet.def.tilt_deg.to_radians();
        let center = planet.position();

        let radial_steps = 28;
        let angle_steps = 420;
        for ai in 0..angle_steps {
            let a = ai as f32 / angle_steps as f32 * std::f32::consts::TAU;
            for ri in 0..radial_steps {
                let t = ri as f32 / (radial_steps - 1) as f32;
                let rad = inner + (outer - inner) * t;
                let local = Vec3::new(a.cos() * rad, 0.0, a.sin() * rad).rotate_z(tilt);
                let Some((sx, sy, _)) = self.camera.project(center + local, w, h) else {
                    continue;
                };
                let (r, g, b, alpha) = ring.sample_rgba(t, 0.0);
                buffer.blend_pixel(
                    sx as i32,
                    sy as i32,
                    r,
                    g,
                    b,
                    alpha as f32 / 255.0 * 0.85,
                );
            }
        }
    }

    fn render_orbit_lines(&self, buffer: &mut PixelBuffer) {
        let (w, h) = (buffer.width(), buffer.height());
        for planet in &self.planets {
            let segments = 128;
            let mut prev: Option<(f32, f32)> = None;
            for i in 0..=segments {
                let a = i as f32 / segments as f32 * std::f32::consts::TAU;
                let p = Vec3::new(a.cos() * planet.def.orbit, 0.0, a.sin() * planet.def.orbit);
                let projected = self.camera.project(p, w, h).map(|(x, y, _)| (x, y));
                if let (Some((x0, y0)), Some((x1, y1))) = (prev, projected) {
                    buffer.line_fade_additive(x0, y0, x1, y1, 60, 70, 110, 0.5, 0.5);
                }
                prev = projected;
            }
        }
    }
}

impl View for SolarView {
    fn update(&mut self, dt: f32) {
        self.time += dt;
        for planet in &mut self.planets {
            planet.angle += planet.def.speed * EARTH_ORBIT_RATE * dt;
            planet.spin += planet.spin_rate * dt;
        }

        self.rig.update(dt);
        self.rig.apply_to(&mut self.camera);

        // Hover feedback: pure function of pointer and current positions
        let (w, h) = self.viewport;
        let (nx, ny) = pixel_to_ndc(self.pointer.0, self.pointer.1, w, h);
        let picker = self.build_picker();
        match picker.pick(nx, ny, &self.camera, w as f32 / h as f32) {
            Some(name) => {
                let name = name.to_string();
                self.tooltip.show(&name, self.pointer.0, self.pointer.1);
            },
            None => self.tooltip.clear(),
        }
    }

    fn render(&self, buffer: &mut PixelBuffer) {
        buffer.clear(0, 0, 5);
        draw_point_backdrop(buffer, &self.camera, &self.backdrop, 2.0, 0.85);

        if self.show_orbits {
            self.render_orbit_lines(buffer);
        }

        self.render_sun(buffer);

        // Far-to-near keeps the painter's algorithm honest
        let mut order: Vec<&Planet> = self.planets.iter().collect();
        order.sort_by(|a, b| {
            let da = self.camera.to_view(a.position()).z;
            let db = self.camera.to_view(b.position()).z;
            db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
        });

        for planet in order {
            self.render_sphere(
                buffer,
                planet.position(),
                planet.def.radius,
                &planet.texture,
                planet.def.tilt_deg.to_radians(),
                planet.spin,
            );
            if let Some(ring) = &planet.ring {
                self.render_ring(buffer, planet, ring);
            }
            if planet.def.moons > 0 {
                self.render_sphere(
                    buffer,
                    self.moon_position(planet),
                    1.2,
                    &self.moon_texture,
                    0.0,
                    self.time * 0.5,
                );
            }
        }

        self.tooltip.render(buffer);
    }

    fn handle_event(&mut self, event: &InputEvent, _width: u32, _height: u32) {
        match *event {
            InputEvent::MouseDown {
                x,
                y,
                button: MouseButtonKind::Left,
            } => {
                self.dragging = true;
                self.last_pointer = (x, y);
            },
            InputEvent::MouseUp {
                button: MouseButtonKind::Left,
                ..
            } => {
                self.dragging = false;
            },
            InputEvent::MouseMove { x, y } => {
                if self.dragging {
                    let dx = (x - self.last_pointer.0) as f32;
                    let dy = (y - self.last_pointer.1) as f32;
                    self.rig.rotate(dx, dy);
                    self.last_pointer = (x, y);
                }
                self.pointer = (x, y);
            },
            InputEvent::MouseWheel { dy } => {
                self.rig.zoom_by(0.9f32.powf(dy));
            },
            InputEvent::KeyDown(key) => {
                if key == sdl2::keyboard::Keycode::O {
                    self.show_orbits = !self.show_orbits;
                }
            },
            _ => {},
        }
    }

    fn name(&self) -> &'static str {
        "Solar System"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planet_table_matches_the_system() {
        assert_eq!(PLANETS.len(), 8);
        assert_eq!(PLANETS[2].name, "Earth");
        assert_eq!(PLANETS[2].moons, 1);
        assert!(PLANETS[5].rings);
        // Orbits are strictly nested
        for pair in PLANETS.windows(2) {
            assert!(pair[0].orbit < pair[1].orbit);
        }
    }

    #[test]
    fn planets_stay_on_their_orbits() {
        let mut rng = Rng::new(6);
        let mut view = SolarView::new(&mut rng, (1280, 720));
        for _ in 0..300 {
            view.update(1.0 / 60.0);
        }
        for planet in &view.planets {
            let r = planet.position().length();
            assert!((r - planet.def.orbit).abs() < 1e-2);
        }
    }

    #[test]
    fn hovering_a_planet_shows_its_tooltip() {
        let mut rng = Rng::new(6);
        let mut view = SolarView::new(&mut rng, (1280, 720));
        view.update(1.0 / 60.0);
        // Aim straight at the sun (screen center: the rig orbits the origin)
        let (w, h) = (1280, 720);
        let (sx, sy, _) = view.camera.project(Vec3::zero(), w, h).unwrap();
        view.handle_event(
            &InputEvent::MouseMove {
                x: sx as i32,
                y: sy as i32,
            },
            w,
            h,
        );
        view.update(1.0 / 60.0);
        assert!(view.tooltip.visible());
    }
}
