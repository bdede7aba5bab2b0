//! The zoom system: one scalar level in [1, 100] drives camera distance
//! and every distance-gated opacity.
//!
//! Two input edges exist — the slider sets a level, the wheel dollies
//! the camera — and both funnel through the same level/distance pair so
//! they can never disagree. While the half-second distance glide is in
//! flight, the *destination* distance is the authoritative value the
//! wheel edge reads; deriving from the live camera would oscillate.

use crate::tween::{Easing, Tween};

pub const ZOOM_MIN: f32 = 1.0;
pub const ZOOM_MAX: f32 = 100.0;

/// Camera distance at level 1 (inside a galaxy)
pub const NEAR_DISTANCE: f32 = 2000.0;
/// Camera distance at level 100 (cosmic scale)
pub const FAR_DISTANCE: f32 = 80_000.0;

const SMOOTH_DURATION: f32 = 0.5;

/// Linear level → distance mapping
pub fn distance_for_level(level: f32) -> f32 {
    let level = level.clamp(ZOOM_MIN, ZOOM_MAX);
    NEAR_DISTANCE + (FAR_DISTANCE - NEAR_DISTANCE) * (level - 1.0) / 99.0
}

/// Inverse mapping, clamped to the legal level range
pub fn level_for_distance(distance: f32) -> f32 {
    let t = (distance - NEAR_DISTANCE) / (FAR_DISTANCE - NEAR_DISTANCE);
    (1.0 + t * 99.0).clamp(ZOOM_MIN, ZOOM_MAX)
}

/// A distance-gated opacity ramp: fully transparent up to
/// `fade_in_level`, then linear up to `max_opacity` over `fade_range`.
#[derive(Debug, Clone, Copy)]
pub struct LodFade {
    pub fade_in_level: f32,
    pub fade_range: f32,
    pub max_opacity: f32,
}

impl LodFade {
    pub fn opacity(&self, level: f32) -> f32 {
        ((level - self.fade_in_level) / self.fade_range).clamp(0.0, 1.0) * self.max_opacity
    }
}

/// Cosmic-web filaments surface only when zoomed well out
pub const FILAMENT_FADE: LodFade = LodFade {
    fade_in_level: 40.0,
    fade_range: 60.0,
    max_opacity: 0.18,
};

/// Owns the authoritative zoom level and the camera-distance glide
#[derive(Debug, Clone)]
pub struct ZoomController {
    level: f32,
    smoothing: Option<Tween>,
    distance: f32,
}

impl ZoomController {
    pub fn new(level: f32) -> Self {
        let level = level.clamp(ZOOM_MIN, ZOOM_MAX);
        Self {
            level,
            smoothing: None,
            distance: distance_for_level(level),
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    /// The camera distance as of the last update
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Where the distance glide is headed; equals `distance()` when idle.
    /// This is the single source of truth the wheel edge derives from.
    pub fn destination_distance(&self) -> f32 {
        self.smoothing
            .as_ref()
            .map_or(self.distance, |t| t.target())
    }

    /// Slider edge: explicit level
    pub fn set_level(&mut self, level: f32) {
        self.apply_level(level.clamp(ZOOM_MIN, ZOOM_MAX));
    }

    /// Wheel edge: multiplicative dolly of the destination distance,
    /// re-derived into a level through the inverse mapping
    pub fn wheel(&mut self, factor: f32) {
        let goal = (self.destination_distance() * factor).clamp(NEAR_DISTANCE, FAR_DISTANCE);
        self.apply_level(level_for_distance(goal));
    }

    /// Flight arrival: adopt the fixed "arrived" level and the distance
    /// the flight actually landed at, with no glide. The next slider or
    /// wheel edge re-enters the linear mapping smoothly from here.
    pub fn arrive(&mut self, level: f32, distance: f32) {
        self.level = level.clamp(ZOOM_MIN, ZOOM_MAX);
        self.distance = distance;
        self.smoothing = None;
    }

    /// Both edges land here: update the level and retarget the glide.
    /// Replacing the tween keeps at most one distance transition alive.
    fn apply_level(&mut self, level: f32) {
        self.level = level;
        let goal = distance_for_level(level);
        if (goal - self.distance).abs() < 1e-3 {
            self.smoothing = None;
        } else {
            self.smoothing = Some(Tween::new(self.distance, goal, SMOOTH_DURATION, Easing::QuadOut));
        }
    }

    /// Advance the glide; returns the camera distance for this tick
    pub fn update(&mut self, dt: f32) -> f32 {
        if let Some(tween) = &mut self.smoothing {
            self.distance = tween.update(dt);
            if tween.done() {
                self.smoothing = None;
            }
        }
        self.distance
    }

    pub fn filament_opacity(&self) -> f32 {
        FILAMENT_FADE.opacity(self.level)
    }
}
