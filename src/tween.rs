//! Easing curves and time-bounded transitions.
//!
//! Replaces the tween library the viewer leans on for every smoothed
//! motion: the zoom distance glide and the camera flight to a selected
//! galaxy. A transition is a plain clock over [0, duration]; callers
//! advance it once per tick and read interpolated values.

use crate::math3d::{lerp, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Fast start, soft landing
    QuadOut,
    /// Soft start and landing
    CubicInOut,
}

impl Easing {
    /// Map linear progress t in [0, 1] onto the eased curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            },
        }
    }
}

/// A scalar transition with a fixed duration
#[derive(Debug, Clone)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(1e-6),
            elapsed: 0.0,
            easing,
        }
    }

    /// Advance the clock and return the current value
    pub fn update(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.value()
    }

    pub fn value(&self) -> f32 {
        if self.done() {
            // Land exactly on the target, immune to float drift
            return self.to;
        }
        let t = self.easing.apply(self.elapsed / self.duration);
        self.from + (self.to - self.from) * t
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// A bounded camera transition: position and orbit target interpolate
/// together under one clock. At most one exists at a time; starting a
/// new flight replaces the old slot entirely.
#[derive(Debug, Clone)]
pub struct CameraFlight {
    cam_from: Vec3,
    cam_to: Vec3,
    target_from: Vec3,
    target_to: Vec3,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl CameraFlight {
    pub fn new(
        cam_from: Vec3,
        cam_to: Vec3,
        target_from: Vec3,
        target_to: Vec3,
        duration: f32,
        easing: Easing,
    ) -> Self {
        Self {
            cam_from,
            cam_to,
            target_from,
            target_to,
            duration: duration.max(1e-6),
            elapsed: 0.0,
            easing,
        }
    }

    /// Advance and return (camera position, orbit target)
    pub fn update(&mut self, dt: f32) -> (Vec3, Vec3) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        let t = self.easing.apply(self.elapsed / self.duration);
        (
            lerp(self.cam_from, self.cam_to, t),
            lerp(self.target_from, self.target_to, t),
        )
    }

    pub fn done(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn destination(&self) -> Vec3 {
        self.cam_to
    }

    pub fn look_at(&self) -> Vec3 {
        self.target_to
    }
}
