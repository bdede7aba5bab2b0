//! The home view: a twinkling star cube, four drifting nebula clouds,
//! and intermittent shooting stars, under a pointer-following camera.

use super::{draw_field, Placement, View};
use crate::display::{InputEvent, PixelBuffer};
use crate::fields::{nebula_cloud, star_field, NebulaParams, ParticleField, StarFieldParams, StarVolume};
use crate::math3d::{Camera, Vec3};
use crate::shading::FieldShader;
use crate::util::{Rgb, Rng};

const STAR_COUNT: usize = 12_000;
const STAR_HALF_EXTENT: f32 = 1000.0;
const NEBULA_POINTS: usize = 4000;

/// Pointer drift scaling (full-screen pointer travel → camera offset)
const DRIFT_X: f32 = 0.8;
const DRIFT_Y: f32 = 0.4;
const DRIFT_SMOOTHING: f32 = 0.02;

// ============================================================================
// Shooting stars
// ============================================================================

/// One transient streak. Ages in whole ticks and is removed by the pool
/// the same tick its age reaches its lifespan.
#[derive(Debug, Clone)]
pub struct ShootingStar {
    pub pos: Vec3,
    /// Unit travel direction
    pub dir: Vec3,
    /// World units per tick
    pub speed: f32,
    pub length: f32,
    pub age: u32,
    pub lifespan: u32,
}

impl ShootingStar {
    /// Streak opacity: ramp in over the first half of life, out over the rest
    pub fn opacity(&self) -> f32 {
        let fade = self.age as f32 / self.lifespan as f32;
        if fade < 0.5 {
            fade * 2.0 * 0.8
        } else {
            (1.0 - fade) * 2.0 * 0.8
        }
    }
}

/// Bounded transient pool with a stochastic spawn countdown. All
/// creation and destruction happens inside `advance`, one call per tick.
pub struct ShootingStarPool {
    stars: Vec<ShootingStar>,
    countdown: u32,
}

impl ShootingStarPool {
    pub fn new(rng: &mut Rng) -> Self {
        Self {
            stars: Vec::new(),
            countdown: Self::next_countdown(rng),
        }
    }

    fn next_countdown(rng: &mut Rng) -> u32 {
        90 + (rng.next_f32() * 120.0) as u32
    }

    fn spawn(rng: &mut Rng) -> ShootingStar {
        let dir = Vec3::new(
            (rng.next_f32() - 0.5) * 2.0,
            (rng.next_f32() - 0.5) * 0.8,
            0.0,
        )
        .normalize();
        ShootingStar {
            pos: Vec3::new(
                (rng.next_f32() - 0.5) * 1200.0,
                (rng.next_f32() - 0.5) * 600.0,
                -50.0 - rng.next_f32() * 100.0,
            ),
            dir,
            speed: 8.0 + rng.next_f32() * 10.0,
            length: 60.0 + rng.next_f32() * 80.0,
            age: 0,
            lifespan: 60 + (rng.next_f32() * 40.0) as u32,
        }
    }

    /// One tick: countdown, spawn, move, age, cull
    pub fn advance(&mut self, rng: &mut Rng) {
        if self.countdown == 0 {
            self.stars.push(Self::spawn(rng));
            self.countdown = Self::next_countdown(rng);
        } else {
            self.countdown -= 1;
        }

        for star in &mut self.stars {
            star.pos = star.pos + star.dir * star.speed;
            star.age += 1;
        }

        // Expired entries leave the pool the same tick
        let mut i = 0;
        while i < self.stars.len() {
            if self.stars[i].age >= self.stars[i].lifespan {
                self.stars.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShootingStar> {
        self.stars.iter()
    }
}

// ============================================================================
// View
// ============================================================================

pub struct HomeView {
    stars: ParticleField,
    star_shader: FieldShader,
    nebulas: Vec<(ParticleField, FieldShader)>,
    pool: ShootingStarPool,
    rng: Rng,
    camera: Camera,
    time: f32,
    drift: (f32, f32),
    target_drift: (f32, f32),
}

impl HomeView {
    pub fn new(rng: &mut Rng) -> Self {
        let stars = star_field(
            StarFieldParams {
                count: STAR_COUNT,
                volume: StarVolume::Cube {
                    half_extent: STAR_HALF_EXTENT,
                },
            },
            rng,
        )
        .expect("home star field parameters are static");

        let palettes = [
            ("#7b2fff", "#00d4ff", Vec3::new(-200.0, 80.0, -400.0), 150.0),
            ("#ff4466", "#7b2fff", Vec3::new(300.0, -50.0, -600.0), 180.0),
            ("#00d4ff", "#4488ff", Vec3::new(100.0, 200.0, -500.0), 120.0),
            ("#ffd700", "#ff6622", Vec3::new(-300.0, -150.0, -700.0), 200.0),
        ];
        let nebulas = palettes
            .iter()
            .map(|&(a, b, center, scale)| {
                let cloud = nebula_cloud(
                    NebulaParams {
                        count: NEBULA_POINTS,
                        center,
                        scale,
                        color_a: Rgb::from_hex(a).expect("nebula palette"),
                        color_b: Rgb::from_hex(b).expect("nebula palette"),
                    },
                    rng,
                )
                .expect("nebula parameters are static");
                (cloud.field, FieldShader::nebula(cloud.phase))
            })
            .collect();

        let pool = ShootingStarPool::new(rng);

        Self {
            stars,
            star_shader: FieldShader::star(),
            nebulas,
            pool,
            rng: rng.fork(),
            camera: Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::zero(), 75.0),
            time: 0.0,
            drift: (0.0, 0.0),
            target_drift: (0.0, 0.0),
        }
    }
}

impl View for HomeView {
    fn update(&mut self, dt: f32) {
        self.time += dt;
        self.star_shader.advance_time(dt);
        for (_, shader) in &mut self.nebulas {
            shader.advance_time(dt);
        }

        // Pointer drift eases toward its goal a little per tick
        self.drift.0 += (self.target_drift.0 - self.drift.0) * DRIFT_SMOOTHING;
        self.drift.1 += (self.target_drift.1 - self.drift.1) * DRIFT_SMOOTHING;
        self.camera.position = Vec3::new(self.drift.0 * 2.0, -self.drift.1 * 1.5, 5.0);
        self.camera.target = Vec3::zero();

        self.pool.advance(&mut self.rng);
    }

    fn render(&self, buffer: &mut PixelBuffer) {
        buffer.clear(0, 0, 0);

        // The whole star cube rotates slowly; the buffer never changes
        let star_placement = Placement::at(Vec3::zero()).with_rotation(
            self.time * 0.0012,
            self.time * 0.003,
            0.0,
        );
        draw_field(
            buffer,
            &self.camera,
            &self.stars,
            &self.star_shader,
            &star_placement,
            1.0,
        );

        let origin = Placement::at(Vec3::zero());
        for (field, shader) in &self.nebulas {
            draw_field(buffer, &self.camera, field, shader, &origin, 1.0);
        }

        let (w, h) = (buffer.width(), buffer.height());
        for star in self.pool.iter() {
            let head = star.pos;
            let tail = star.pos - star.dir * star.length;
            let (Some((hx, hy, _)), Some((tx, ty, _))) = (
                self.camera.project(head, w, h),
                self.camera.project(tail, w, h),
            ) else {
                continue;
            };
            let alpha = star.opacity();
            buffer.line_fade_additive(hx, hy, tx, ty, 255, 255, 255, alpha, 0.0);
        }
    }

    fn handle_event(&mut self, event: &InputEvent, width: u32, height: u32) {
        if let InputEvent::MouseMove { x, y } = *event {
            self.target_drift = (
                (x as f32 / width as f32 - 0.5) * DRIFT_X,
                (y as f32 / height as f32 - 0.5) * DRIFT_Y,
            );
        }
    }

    fn name(&self) -> &'static str {
        "Home"
    }
}
