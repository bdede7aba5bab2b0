//! 3D math: vectors, the look-at camera, pointer rays, orbit rig.

use std::f32::consts::FRAC_PI_2;
use std::ops::{Add, Mul, Neg, Sub};

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    #[inline]
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
            }
        } else {
            *self
        }
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Approximate equality check for floating point comparison
    #[inline]
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
    }

    /// Rotate around X axis
    #[inline]
    pub fn rotate_x(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x,
            y: self.y * cos - self.z * sin,
            z: self.y * sin + self.z * cos,
        }
    }

    /// Rotate around Y axis
    #[inline]
    pub fn rotate_y(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos + self.z * sin,
            y: self.y,
            z: -self.x * sin + self.z * cos,
        }
    }

    /// Rotate around Z axis
    #[inline]
    pub fn rotate_z(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
            z: self.z,
        }
    }

    /// Apply all three rotations (X, then Y, then Z)
    #[inline]
    pub fn rotate_xyz(&self, rx: f32, ry: f32, rz: f32) -> Self {
        self.rotate_x(rx).rotate_y(ry).rotate_z(rz)
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;
    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}

/// Linear interpolation between two points.
/// `t` is not clamped; values outside [0, 1] extrapolate.
#[inline]
pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    Vec3 {
        x: a.x + (b.x - a.x) * t,
        y: a.y + (b.y - a.y) * t,
        z: a.z + (b.z - a.z) * t,
    }
}

// ============================================================================
// Camera
// ============================================================================

/// A world-space ray (for pointer picking)
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Perspective look-at camera.
///
/// Screen convention: +x right, +y down (pixel space). NDC convention
/// matches the pointer math of the views: x right, y up, both in [-1, 1].
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3, fov_y_degrees: f32) -> Self {
        Self {
            position,
            target,
            fov_y: fov_y_degrees.to_radians(),
            near: 0.1,
        }
    }

    /// Orthonormal basis: (right, up, forward), forward pointing at the target
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.position).normalize();
        let world_up = if forward.x.abs() < 1e-6 && forward.z.abs() < 1e-6 {
            // Looking straight up/down: pick a stable up
            Vec3::new(0.0, 0.0, 1.0)
        } else {
            Vec3::new(0.0, 1.0, 0.0)
        };
        let right = forward.cross(&world_up).normalize();
        let up = right.cross(&forward);
        (right, up, forward)
    }

    /// Transform a world point into camera space (z grows into the screen)
    #[inline]
    pub fn to_view(&self, world: Vec3) -> Vec3 {
        let (right, up, forward) = self.basis();
        let d = world - self.position;
        Vec3::new(d.dot(&right), d.dot(&up), d.dot(&forward))
    }

    /// Project a world point to pixel coordinates.
    /// Returns (screen_x, screen_y, view_depth); None when behind the near plane.
    pub fn project(&self, world: Vec3, width: u32, height: u32) -> Option<(f32, f32, f32)> {
        let v = self.to_view(world);
        if v.z <= self.near {
            return None;
        }
        let focal = (height as f32 / 2.0) / (self.fov_y / 2.0).tan();
        let cx = width as f32 / 2.0;
        let cy = height as f32 / 2.0;
        Some((cx + v.x * focal / v.z, cy - v.y * focal / v.z, v.z))
    }

    /// Screen-space radius of a world-space size at the given view depth
    #[inline]
    pub fn screen_scale(&self, height: u32, depth: f32) -> f32 {
        let focal = (height as f32 / 2.0) / (self.fov_y / 2.0).tan();
        focal / depth.max(self.near)
    }

    /// Build a world-space ray through normalized device coordinates
    /// (x right, y up, both in [-1, 1]).
    pub fn ray_through(&self, ndc_x: f32, ndc_y: f32, aspect: f32) -> Ray {
        let (right, up, forward) = self.basis();
        let half_v = (self.fov_y / 2.0).tan();
        let dir = (right * (ndc_x * half_v * aspect) + up * (ndc_y * half_v) + forward).normalize();
        Ray {
            origin: self.position,
            dir,
        }
    }

    pub fn distance_to_target(&self) -> f32 {
        (self.position - self.target).length()
    }
}

/// Convert pixel coordinates to NDC (x right, y up, [-1, 1])
#[inline]
pub fn pixel_to_ndc(x: i32, y: i32, width: u32, height: u32) -> (f32, f32) {
    (
        (x as f32 / width as f32) * 2.0 - 1.0,
        -((y as f32 / height as f32) * 2.0 - 1.0),
    )
}

// ============================================================================
// Orbit rig
// ============================================================================

/// Damped orbit-camera rig: drag to orbit, wheel to dolly.
/// Angles and distance approach their goals exponentially each update,
/// so motion keeps gliding briefly after the pointer stops.
#[derive(Debug, Clone)]
pub struct OrbitRig {
    pub target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    goal_yaw: f32,
    goal_pitch: f32,
    goal_distance: f32,
    min_distance: f32,
    max_distance: f32,
    damping: f32,
}

impl OrbitRig {
    pub fn new(target: Vec3, yaw: f32, pitch: f32, distance: f32) -> Self {
        Self {
            target,
            yaw,
            pitch,
            distance,
            goal_yaw: yaw,
            goal_pitch: pitch,
            goal_distance: distance,
            min_distance: 5.0,
            max_distance: 200_000.0,
            damping: 6.0,
        }
    }

    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self.goal_distance = self.goal_distance.clamp(min, max);
        self
    }

    /// Orbit from a pointer drag, in pixels
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.goal_yaw -= dx * 0.005;
        self.goal_pitch = (self.goal_pitch + dy * 0.005).clamp(-FRAC_PI_2 + 0.05, FRAC_PI_2 - 0.05);
    }

    /// Multiplicative dolly (wheel input); factor > 1 moves away
    pub fn zoom_by(&mut self, factor: f32) {
        self.set_distance_goal(self.goal_distance * factor);
    }

    pub fn set_distance_goal(&mut self, distance: f32) {
        self.goal_distance = distance.clamp(self.min_distance, self.max_distance);
    }

    /// Where the dolly is headed (the authoritative distance while a
    /// smoothing transition is still catching up)
    pub fn distance_goal(&self) -> f32 {
        self.goal_distance
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Impose a distance directly, bypassing the rig's own damping.
    /// Used when an external transition (the zoom glide) owns distance.
    pub fn force_distance(&mut self, distance: f32) {
        self.distance = distance;
        self.goal_distance = distance;
    }

    /// Adopt an externally-imposed pose (end of a camera flight)
    pub fn sync_to(&mut self, position: Vec3, target: Vec3) {
        self.target = target;
        let offset = position - target;
        let d = offset.length().max(1e-3);
        self.yaw = offset.x.atan2(offset.z);
        self.pitch = (offset.y / d).clamp(-1.0, 1.0).asin();
        self.distance = d;
        self.goal_yaw = self.yaw;
        self.goal_pitch = self.pitch;
        self.goal_distance = d.clamp(self.min_distance, self.max_distance);
    }

    /// Apply damping; call once per tick
    pub fn update(&mut self, dt: f32) {
        let k = 1.0 - (-self.damping * dt).exp();
        self.yaw += (self.goal_yaw - self.yaw) * k;
        self.pitch += (self.goal_pitch - self.pitch) * k;
        self.distance += (self.goal_distance - self.distance) * k;
    }

    pub fn camera_position(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(sy * cp, sp, cy * cp) * self.distance
    }

    pub fn apply_to(&self, camera: &mut Camera) {
        camera.target = self.target;
        camera.position = self.camera_position();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_is_orthonormal() {
        let cam = Camera::new(Vec3::new(100.0, 50.0, 200.0), Vec3::zero(), 60.0);
        let (right, up, forward) = cam.basis();
        assert!((right.length() - 1.0).abs() < 1e-5);
        assert!((up.length() - 1.0).abs() < 1e-5);
        assert!((forward.length() - 1.0).abs() < 1e-5);
        assert!(right.dot(&up).abs() < 1e-5);
        assert!(right.dot(&forward).abs() < 1e-5);
        assert!(up.dot(&forward).abs() < 1e-5);
    }

    #[test]
    fn project_puts_target_at_screen_center() {
        let cam = Camera::new(Vec3::new(0.0, 500.0, 2000.0), Vec3::zero(), 60.0);
        let (sx, sy, depth) = cam.project(Vec3::zero(), 800, 600).unwrap();
        assert!((sx - 400.0).abs() < 1e-2);
        assert!((sy - 300.0).abs() < 1e-2);
        assert!(depth > 0.0);
    }

    #[test]
    fn project_rejects_points_behind_camera() {
        let cam = Camera::new(Vec3::zero(), Vec3::new(0.0, 0.0, -100.0), 60.0);
        assert!(cam.project(Vec3::new(0.0, 0.0, 100.0), 800, 600).is_none());
    }

    #[test]
    fn pointer_ray_inverts_projection() {
        let cam = Camera::new(Vec3::new(300.0, 200.0, 900.0), Vec3::new(10.0, -20.0, 5.0), 60.0);
        let (w, h) = (800u32, 600u32);
        let world = Vec3::new(-150.0, 80.0, -400.0);

        let (sx, sy, _) = cam.project(world, w, h).unwrap();
        let (nx, ny) = pixel_to_ndc(sx.round() as i32, sy.round() as i32, w, h);
        let ray = cam.ray_through(nx, ny, w as f32 / h as f32);

        let to_point = (world - cam.position).normalize();
        // Half-pixel rounding keeps this from being exact
        assert!(ray.dir.dot(&to_point) > 0.9999);
    }

    #[test]
    fn orbit_rig_converges_to_goals() {
        let mut rig = OrbitRig::new(Vec3::zero(), 0.0, 0.3, 1000.0);
        rig.set_distance_goal(5000.0);
        rig.rotate(100.0, 0.0);
        for _ in 0..600 {
            rig.update(1.0 / 60.0);
        }
        assert!((rig.distance() - 5000.0).abs() < 1.0);
        let pos = rig.camera_position();
        assert!(((pos - Vec3::zero()).length() - 5000.0).abs() < 2.0);
    }

    #[test]
    fn orbit_sync_round_trips_pose() {
        let mut rig = OrbitRig::new(Vec3::zero(), 0.0, 0.0, 100.0);
        let position = Vec3::new(6800.0, 100.0, 400.0);
        let target = Vec3::new(6000.0, -300.0, -400.0);
        rig.sync_to(position, target);
        assert!(rig.camera_position().approx_eq(&position, 0.5));
    }
}
