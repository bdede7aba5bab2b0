//! Pointer picking and click-to-fly navigation.
//!
//! Every galaxy gets an invisible proxy sphere; hover resolution casts a
//! ray through the pointer's NDC and keeps the nearest hit. Confirming a
//! selection produces a bounded camera flight that parks the camera a
//! fixed offset away from the target so the galaxy stays in frame.

use crate::math3d::{Camera, Ray, Vec3};
use crate::tween::{CameraFlight, Easing};

/// Camera parking offset relative to the selected object. Flying to the
/// object's own position would put it behind the near plane.
pub const APPROACH_OFFSET: Vec3 = Vec3::new(800.0, 400.0, 800.0);

/// Flight time for a confirmed selection
pub const FLIGHT_DURATION: f32 = 1.8;

/// Zoom level the slider reports after a flight lands
pub const ARRIVAL_ZOOM_LEVEL: f32 = 10.0;

/// An invisible sphere standing in for a named object during picking
#[derive(Debug, Clone)]
pub struct PickingProxy {
    pub owner: String,
    pub center: Vec3,
    pub radius: f32,
}

/// Nearest positive ray parameter hitting the sphere, if any
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(&ray.dir);
    let c = oc.dot(&oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t = -b - sqrt_disc;
    if t >= 0.0 {
        Some(t)
    } else {
        let t = -b + sqrt_disc;
        // Ray origin inside the sphere still counts as a hit
        (t >= 0.0).then_some(t)
    }
}

/// The set of pickable proxies for one scene
#[derive(Debug, Default)]
pub struct Picker {
    proxies: Vec<PickingProxy>,
}

impl Picker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, owner: impl Into<String>, center: Vec3, radius: f32) {
        self.proxies.push(PickingProxy {
            owner: owner.into(),
            center,
            radius,
        });
    }

    pub fn find(&self, owner: &str) -> Option<&PickingProxy> {
        self.proxies.iter().find(|p| p.owner == owner)
    }

    /// Resolve the pointer to the nearest intersected proxy's owner.
    /// Pure function of its inputs; a miss is a normal `None`.
    pub fn pick(&self, ndc_x: f32, ndc_y: f32, camera: &Camera, aspect: f32) -> Option<&str> {
        let ray = camera.ray_through(ndc_x, ndc_y, aspect);
        let mut best: Option<(f32, &str)> = None;
        for proxy in &self.proxies {
            if let Some(t) = ray_sphere(&ray, proxy.center, proxy.radius) {
                if best.map_or(true, |(bt, _)| t < bt) {
                    best = Some((t, &proxy.owner));
                }
            }
        }
        best.map(|(_, owner)| owner)
    }

    /// Build the fly-to transition for a confirmed selection. Returns
    /// `None` for names no proxy owns. The caller replaces any flight
    /// already in progress with the returned one.
    pub fn confirm(&self, owner: &str, camera: &Camera) -> Option<CameraFlight> {
        let proxy = self.find(owner)?;
        Some(CameraFlight::new(
            camera.position,
            proxy.center + APPROACH_OFFSET,
            camera.target,
            proxy.center,
            FLIGHT_DURATION,
            Easing::CubicInOut,
        ))
    }
}
