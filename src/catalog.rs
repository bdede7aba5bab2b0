//! The galaxy catalog: static definitions loaded once at startup.
//!
//! A catalog is a plain JSON document so alternate universes can be
//! dropped in with `--catalog`; the built-in set is used when no file
//! is present.

use crate::math3d::Vec3;
use crate::util::Rgb;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// Procedural galaxy shape class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Morphology {
    Spiral,
    Elliptical,
    Irregular,
    Lenticular,
}

/// One galaxy: display name, shape class, placement, palette
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalaxyDefinition {
    pub name: String,
    pub morphology: Morphology,
    pub position: [f32; 3],
    pub scale: f32,
    pub color_primary: Rgb,
    pub color_secondary: Rgb,
    /// Arm count, meaningful for spirals only
    #[serde(default = "default_arms")]
    pub arms: u32,
}

fn default_arms() -> u32 {
    3
}

impl GalaxyDefinition {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.position[0], self.position[1], self.position[2])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalaxyCatalog {
    pub galaxies: Vec<GalaxyDefinition>,
}

impl GalaxyCatalog {
    /// Load a catalog from a JSON file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = fs::read_to_string(path)?;
        let catalog: Self = serde_json::from_str(&json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Save a catalog as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CatalogError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for def in &self.galaxies {
            if !seen.insert(def.name.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate galaxy name {:?}",
                    def.name
                )));
            }
            if def.scale <= 0.0 {
                return Err(CatalogError::Invalid(format!(
                    "galaxy {:?} has non-positive scale {}",
                    def.name, def.scale
                )));
            }
            if def.morphology == Morphology::Spiral && def.arms < 1 {
                return Err(CatalogError::Invalid(format!(
                    "spiral galaxy {:?} needs at least one arm",
                    def.name
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.galaxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.galaxies.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&GalaxyDefinition> {
        self.galaxies.iter().find(|g| g.name == name)
    }

    /// The built-in universe
    pub fn builtin() -> Self {
        fn def(
            name: &str,
            morphology: Morphology,
            position: [f32; 3],
            scale: f32,
            primary: &str,
            secondary: &str,
            arms: u32,
        ) -> GalaxyDefinition {
            GalaxyDefinition {
                name: name.to_string(),
                morphology,
                position,
                scale,
                color_primary: Rgb::from_hex(primary).expect("builtin color"),
                color_secondary: Rgb::from_hex(secondary).expect("builtin color"),
                arms,
            }
        }

        use Morphology::*;
        Self {
            galaxies: vec![
                def("Vortex Nebulae Cluster", Spiral, [0.0, 0.0, 0.0], 1.0, "#00d4ff", "#7b2fff", 4),
                def("NGC-Enormous 77", Elliptical, [3000.0, 200.0, -1000.0], 0.7, "#ffd700", "#ff9422", 3),
                def("Crimson Spiral", Spiral, [-2500.0, -300.0, 500.0], 0.85, "#ff4466", "#ff8844", 2),
                def("The Azure Web", Spiral, [1500.0, 800.0, -2000.0], 0.6, "#44aaff", "#00d4ff", 3),
                def("Golden Ellipse Majora", Elliptical, [-1800.0, 600.0, -3000.0], 0.9, "#ffe066", "#c8a840", 3),
                def("Phantom Irregular IX", Irregular, [4000.0, -500.0, 1500.0], 0.5, "#cc44ff", "#7b2fff", 3),
                def("Lenticular Crown", Lenticular, [-3500.0, 400.0, -500.0], 0.75, "#aaddff", "#6699cc", 3),
                def("Nebula Strix Prime", Spiral, [2000.0, -1000.0, 3000.0], 0.65, "#ff66aa", "#7b2fff", 5),
                def("The Obsidian Filament", Irregular, [-500.0, 1500.0, -4000.0], 1.1, "#334499", "#00d4ff", 3),
                def("Aurelius Drift", Elliptical, [5000.0, 300.0, -2500.0], 0.55, "#ffcc44", "#ff8822", 3),
                def("Cyan Meridian", Spiral, [-4000.0, -800.0, -1500.0], 0.8, "#00ffcc", "#0088ff", 3),
                def("Deep Scarlet Cluster", Irregular, [1200.0, 2000.0, 2500.0], 0.6, "#ff2244", "#ff6644", 3),
                def("Pale Lenticular III", Lenticular, [-2000.0, -1500.0, 2000.0], 0.7, "#ddccff", "#aa88ff", 3),
                def("Spectra Vortex", Spiral, [3500.0, 1200.0, 800.0], 0.9, "#ff44ff", "#8844ff", 4),
                def("The Verdant Arm", Spiral, [-600.0, -2000.0, -2500.0], 0.7, "#44ff88", "#00aaff", 2),
                def("Amber Shore", Elliptical, [800.0, 3000.0, -800.0], 0.5, "#ffaa44", "#ff6622", 3),
                def("Indigo Filament-7", Irregular, [-4500.0, 500.0, 3500.0], 0.85, "#4466ff", "#2233cc", 3),
                def("Celestia Omega", Spiral, [6000.0, -300.0, -400.0], 1.2, "#ffffff", "#88ccff", 6),
            ],
        }
    }
}
