//! The universe view: every catalog galaxy as a point-sprite field,
//! cosmic-web filaments fading in at cosmic zoom, the zoom system, and
//! click-to-fly galaxy selection.

use super::{draw_field, draw_point_backdrop, Placement, View};
use crate::catalog::GalaxyCatalog;
use crate::display::{InputEvent, MouseButtonKind, PixelBuffer};
use crate::fields::{galaxy_field, star_field, GalaxyParams, ParticleField, StarFieldParams, StarVolume};
use crate::math3d::{pixel_to_ndc, Camera, OrbitRig, Vec3};
use crate::picking::{Picker, ARRIVAL_ZOOM_LEVEL};
use crate::shading::FieldShader;
use crate::tween::CameraFlight;
use crate::ui::{draw_zoom_hud, Tooltip, ZoomSlider};
use crate::util::Rng;
use crate::zoom::{level_for_distance, ZoomController, FAR_DISTANCE, NEAR_DISTANCE};
use crate::catalog::Morphology;
use tracing::{debug, info};

const BG_STAR_COUNT: usize = 15_000;
const FILAMENT_COUNT: usize = 30;
const FILAMENT_SEGMENTS: usize = 6;
/// Picking proxy radius per unit of catalog scale
const PROXY_RADIUS: f32 = 600.0;
/// Pointer travel below this is a click, not an orbit drag
const CLICK_SLOP: f32 = 5.0;

/// Point counts per morphology, sized for the software rasterizer
fn points_for(morphology: Morphology) -> usize {
    match morphology {
        Morphology::Spiral => 12_000,
        Morphology::Elliptical => 9_000,
        Morphology::Irregular => 8_000,
        Morphology::Lenticular => 8_500,
    }
}

struct GalaxyInstance {
    name: String,
    field: ParticleField,
    shader: FieldShader,
    placement: Placement,
}

pub struct UniverseView {
    backdrop: ParticleField,
    galaxies: Vec<GalaxyInstance>,
    filaments: Vec<Vec<Vec3>>,
    picker: Picker,
    rig: OrbitRig,
    camera: Camera,
    zoom: ZoomController,
    slider: ZoomSlider,
    tooltip: Tooltip,
    flight: Option<CameraFlight>,
    hovered: Option<String>,
    pointer: (i32, i32),
    drag: Option<DragState>,
    pending_level: Option<f32>,
    wheel_accum: f32,
    pending_select: Option<String>,
    viewport: (u32, u32),
}

struct DragState {
    last: (i32, i32),
    travel: f32,
}

impl UniverseView {
    pub fn new(catalog: &GalaxyCatalog, rng: &mut Rng, viewport: (u32, u32)) -> Self {
        let backdrop = star_field(
            StarFieldParams {
                count: BG_STAR_COUNT,
                volume: StarVolume::Shell {
                    r_min: 80_000.0,
                    r_max: 100_000.0,
                },
            },
            rng,
        )
        .expect("universe backdrop parameters are static");

        let mut picker = Picker::new();
        let mut galaxies = Vec::with_capacity(catalog.len());
        for def in &catalog.galaxies {
            let field = galaxy_field(
                def.morphology,
                GalaxyParams {
                    count: points_for(def.morphology),
                    scale: def.scale,
                    color_primary: def.color_primary,
                    color_secondary: def.color_secondary,
                    arms: def.arms,
                },
                rng,
            )
            .expect("catalog validated before generation");

            let radius = crate::fields::SPIRAL_BASE_RADIUS * def.scale;
            galaxies.push(GalaxyInstance {
                name: def.name.clone(),
                field,
                shader: FieldShader::galaxy(def.morphology, radius, rng),
                placement: Placement::at(def.position()).with_rotation(
                    (rng.next_f32() - 0.5) * 0.5,
                    rng.next_f32() * std::f32::consts::TAU,
                    (rng.next_f32() - 0.5) * 0.3,
                ),
            });
            picker.add(def.name.clone(), def.position(), PROXY_RADIUS * def.scale);
        }
        debug!(galaxies = galaxies.len(), "universe fields generated");

        // Jittered polylines between random galaxy stations
        let mut filaments = Vec::with_capacity(FILAMENT_COUNT);
        for _ in 0..FILAMENT_COUNT {
            let start = catalog.galaxies[rng.index(catalog.len())].position();
            let end = catalog.galaxies[rng.index(catalog.len())].position();
            let mut points = Vec::with_capacity(FILAMENT_SEGMENTS + 1);
            for j in 0..=FILAMENT_SEGMENTS {
                let t = j as f32 / FILAMENT_SEGMENTS as f32;
                points.push(crate::math3d::lerp(start, end, t) + Vec3::new(
                    (rng.next_f32() - 0.5) * 500.0,
                    (rng.next_f32() - 0.5) * 200.0,
                    (rng.next_f32() - 0.5) * 500.0,
                ));
            }
            filaments.push(points);
        }

        let start_position = Vec3::new(0.0, 500.0, 2000.0);
        let mut rig = OrbitRig::new(Vec3::zero(), 0.0, 0.0, 2000.0)
            .with_distance_limits(NEAR_DISTANCE, FAR_DISTANCE);
        rig.sync_to(start_position, Vec3::zero());
        let mut camera = Camera::new(start_position, Vec3::zero(), 60.0);
        rig.apply_to(&mut camera);

        let zoom = ZoomController::new(level_for_distance(rig.distance()));
        let slider = ZoomSlider::new(20, viewport.1 as i32 - 30, 260, zoom.level());

        Self {
            backdrop,
            galaxies,
            filaments,
            picker,
            rig,
            camera,
            zoom,
            slider,
            tooltip: Tooltip::new(),
            flight: None,
            hovered: None,
            pointer: (0, 0),
            drag: None,
            pending_level: None,
            wheel_accum: 0.0,
            pending_select: None,
            viewport,
        }
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }
}

impl View for UniverseView {
    fn update(&mut self, dt: f32) {
        for galaxy in &mut self.galaxies {
            galaxy.shader.advance_time(dt);
        }

        // Zoom edges, gathered by the handlers, applied here in one place
        if let Some(level) = self.pending_level.take() {
            self.zoom.set_level(level);
        }
        if self.wheel_accum != 0.0 {
            // Scroll up dollies in
            self.zoom.wheel(0.9f32.powf(self.wheel_accum));
            self.wheel_accum = 0.0;
        }

        // A confirmed selection replaces any flight already in the slot
        if let Some(name) = self.pending_select.take() {
            if let Some(flight) = self.picker.confirm(&name, &self.camera) {
                info!(galaxy = %name, "flying to selection");
                self.flight = Some(flight);
            }
        }

        if let Some(flight) = &mut self.flight {
            let (position, target) = flight.update(dt);
            self.camera.position = position;
            self.camera.target = target;
            if flight.done() {
                // Land: hand the pose back to the rig and make the
                // slider truthful again
                self.rig.sync_to(position, target);
                self.zoom
                    .arrive(ARRIVAL_ZOOM_LEVEL, (position - target).length());
                self.flight = None;
            }
        } else {
            let distance = self.zoom.update(dt);
            self.rig.force_distance(distance);
            self.rig.update(dt);
            self.rig.apply_to(&mut self.camera);
        }
        self.slider.set_value(self.zoom.level());

        // Hover runs every tick from the latest pointer state
        let (w, h) = self.viewport;
        let (nx, ny) = pixel_to_ndc(self.pointer.0, self.pointer.1, w, h);
        let hit = self
            .picker
            .pick(nx, ny, &self.camera, w as f32 / h as f32)
            .map(String::from);
        match &hit {
            Some(name) => self.tooltip.show(name, self.pointer.0, self.pointer.1),
            None => self.tooltip.clear(),
        }
        self.hovered = hit;
    }

    fn render(&self, buffer: &mut PixelBuffer) {
        buffer.clear(0, 0, 4);
        draw_point_backdrop(buffer, &self.camera, &self.backdrop, 3.0, 0.7);

        for galaxy in &self.galaxies {
            draw_field(
                buffer,
                &self.camera,
                &galaxy.field,
                &galaxy.shader,
                &galaxy.placement,
                1.0,
            );
        }

        let filament_opacity = self.zoom.filament_opacity();
        if filament_opacity > 0.0 {
            let (w, h) = (buffer.width(), buffer.height());
            for filament in &self.filaments {
                for pair in filament.windows(2) {
                    let (Some((x0, y0, _)), Some((x1, y1, _))) = (
                        self.camera.project(pair[0], w, h),
                        self.camera.project(pair[1], w, h),
                    ) else {
                        continue;
                    };
                    buffer.line_fade_additive(
                        x0, y0, x1, y1, 0x33, 0x44, 0x66, filament_opacity, filament_opacity,
                    );
                }
            }
        }

        self.slider.render(buffer);
        self.tooltip.render(buffer);
        draw_zoom_hud(buffer, self.zoom.level());
    }

    fn handle_event(&mut self, event: &InputEvent, _width: u32, _height: u32) {
        // The slider owns the pointer while it is being dragged
        if let Some(level) = self.slider.handle_event(event) {
            self.pending_level = Some(level);
            return;
        }
        if self.slider.dragging() {
            return;
        }

        match *event {
            InputEvent::MouseDown {
                x,
                y,
                button: MouseButtonKind::Left,
            } => {
                self.drag = Some(DragState {
                    last: (x, y),
                    travel: 0.0,
                });
            },
            InputEvent::MouseUp {
                button: MouseButtonKind::Left,
                ..
            } => {
                if let Some(drag) = self.drag.take() {
                    if drag.travel < CLICK_SLOP {
                        // A click, not an orbit: select whatever is hovered
                        self.pending_select = self.hovered.clone();
                    }
                }
            },
            InputEvent::MouseMove { x, y } => {
                if let Some(drag) = &mut self.drag {
                    let dx = (x - drag.last.0) as f32;
                    let dy = (y - drag.last.1) as f32;
                    drag.travel += dx.abs() + dy.abs();
                    drag.last = (x, y);
                    self.rig.rotate(dx, dy);
                }
                self.pointer = (x, y);
            },
            InputEvent::MouseWheel { dy } => {
                self.wheel_accum += dy;
            },
            _ => {},
        }
    }

    fn name(&self) -> &'static str {
        "Universe"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picking::APPROACH_OFFSET;
    use crate::zoom::distance_for_level;

    fn view() -> UniverseView {
        let mut rng = Rng::new(9);
        let catalog = GalaxyCatalog::builtin();
        UniverseView::new(&catalog, &mut rng, (1280, 720))
    }

    /// Park the rig (and therefore the camera) at a pose and let one
    /// tick settle everything: update() re-derives the camera from the
    /// rig, so tests must not write the camera directly.
    fn park_at(view: &mut UniverseView, position: Vec3, target: Vec3) {
        view.rig.sync_to(position, target);
        let distance = (position - target).length();
        view.zoom.arrive(level_for_distance(distance), distance);
        view.update(1.0 / 60.0);
    }

    fn aim_at(view: &mut UniverseView, world: Vec3) {
        let (w, h) = view.viewport;
        let (sx, sy, _) = view.camera.project(world, w, h).unwrap();
        view.handle_event(
            &InputEvent::MouseMove {
                x: sx as i32,
                y: sy as i32,
            },
            w,
            h,
        );
    }

    fn click(view: &mut UniverseView) {
        let (x, y) = view.pointer;
        let (w, h) = view.viewport;
        view.handle_event(
            &InputEvent::MouseDown {
                x,
                y,
                button: MouseButtonKind::Left,
            },
            w,
            h,
        );
        view.handle_event(
            &InputEvent::MouseUp {
                x,
                y,
                button: MouseButtonKind::Left,
            },
            w,
            h,
        );
    }

    #[test]
    fn builds_one_instance_and_proxy_per_galaxy() {
        let v = view();
        assert_eq!(v.galaxies.len(), 18);
        assert!(v.picker.find("Celestia Omega").is_some());
        assert_eq!(v.filaments.len(), FILAMENT_COUNT);
    }

    #[test]
    fn hovering_a_galaxy_sets_the_tooltip() {
        let mut v = view();
        // Fly the camera near Celestia Omega so it fills the pointer ray
        let celestia = Vec3::new(6000.0, -300.0, -400.0);
        park_at(&mut v, celestia + Vec3::new(0.0, 400.0, 3000.0), celestia);
        aim_at(&mut v, celestia);
        v.update(1.0 / 60.0);
        assert_eq!(v.hovered(), Some("Celestia Omega"));
        assert!(v.tooltip.visible());
    }

    #[test]
    fn click_flies_to_the_hovered_galaxy_and_lands_at_level_10() {
        let mut v = view();
        let celestia = Vec3::new(6000.0, -300.0, -400.0);
        park_at(&mut v, celestia + Vec3::new(0.0, 400.0, 3000.0), celestia);
        aim_at(&mut v, celestia);
        v.update(1.0 / 60.0);
        assert_eq!(v.hovered(), Some("Celestia Omega"));

        click(&mut v);
        v.update(1.0 / 60.0);
        let flight = v.flight.as_ref().expect("flight started");
        assert!(flight.look_at().approx_eq(&celestia, 1e-3));
        assert!(flight
            .destination()
            .approx_eq(&(celestia + APPROACH_OFFSET), 1e-3));

        // Ride the flight out
        for _ in 0..240 {
            v.update(1.0 / 60.0);
        }
        assert!(v.flight.is_none());
        assert!(v.camera.target.approx_eq(&celestia, 1.0));
        assert_eq!(v.zoom.level(), ARRIVAL_ZOOM_LEVEL);
        assert_eq!(v.slider.value(), ARRIVAL_ZOOM_LEVEL);
    }

    #[test]
    fn second_selection_replaces_the_flight() {
        let mut v = view();
        v.pending_select = Some("Celestia Omega".to_string());
        v.update(1.0 / 60.0);
        let first_dest = v.flight.as_ref().unwrap().destination();

        v.pending_select = Some("Crimson Spiral".to_string());
        v.update(1.0 / 60.0);
        let second_dest = v.flight.as_ref().unwrap().destination();
        assert!(!first_dest.approx_eq(&second_dest, 1.0));
        assert!(second_dest
            .approx_eq(&(Vec3::new(-2500.0, -300.0, 500.0) + APPROACH_OFFSET), 1e-3));
    }

    #[test]
    fn slider_and_wheel_agree_on_the_level() {
        let mut v = view();
        v.pending_level = Some(60.0);
        v.update(1.0 / 60.0);
        assert_eq!(v.zoom.level(), 60.0);
        assert_eq!(v.slider.value(), 60.0);

        // Wheel input re-derives the level from the destination distance
        v.handle_event(&InputEvent::MouseWheel { dy: -1.0 }, 1280, 720);
        v.update(1.0 / 60.0);
        let expected = level_for_distance(distance_for_level(60.0) / 0.9);
        assert!((v.zoom.level() - expected).abs() < 0.01);
        assert!((v.slider.value() - v.zoom.level()).abs() < 1e-5);
    }

    #[test]
    fn orbit_drag_does_not_select() {
        let mut v = view();
        let celestia = Vec3::new(6000.0, -300.0, -400.0);
        park_at(&mut v, celestia + Vec3::new(0.0, 400.0, 3000.0), celestia);
        aim_at(&mut v, celestia);
        v.update(1.0 / 60.0);

        let (x, y) = v.pointer;
        v.handle_event(
            &InputEvent::MouseDown {
                x,
                y,
                button: MouseButtonKind::Left,
            },
            1280,
            720,
        );
        v.handle_event(&InputEvent::MouseMove { x: x + 60, y }, 1280, 720);
        v.handle_event(
            &InputEvent::MouseUp {
                x: x + 60,
                y,
                button: MouseButtonKind::Left,
            },
            1280,
            720,
        );
        v.update(1.0 / 60.0);
        assert!(v.flight.is_none());
    }
}
