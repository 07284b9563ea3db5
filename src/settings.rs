//! Viewer settings and preferences
//!
//! Persisted in LocalStorage, separately from any solver state (the solver
//! itself persists nothing).

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_STEPS_PER_FRAME;
use crate::sim::Geometry;

/// Which exported field the viewer paints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DisplayField {
    #[default]
    Speed,
    Vorticity,
    Pressure,
}

impl DisplayField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayField::Speed => "speed",
            DisplayField::Vorticity => "vorticity",
            DisplayField::Pressure => "pressure",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "speed" | "velocity" => Some(DisplayField::Speed),
            "vorticity" | "curl" => Some(DisplayField::Vorticity),
            "pressure" => Some(DisplayField::Pressure),
            _ => None,
        }
    }

    /// Whether the field is signed and wants the diverging colormap
    pub fn is_signed(&self) -> bool {
        matches!(self, DisplayField::Vorticity)
    }
}

/// Viewer preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerSettings {
    /// Field painted on the canvas
    pub field: DisplayField,
    /// Solver steps per rendered frame
    pub steps_per_frame: u32,
    /// Last chosen obstacle
    pub geometry: Geometry,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            field: DisplayField::Speed,
            steps_per_frame: DEFAULT_STEPS_PER_FRAME,
            geometry: Geometry::Circle,
        }
    }
}

impl ViewerSettings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "wind_tunnel_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_field_round_trip() {
        for field in [
            DisplayField::Speed,
            DisplayField::Vorticity,
            DisplayField::Pressure,
        ] {
            assert_eq!(DisplayField::from_str(field.as_str()), Some(field));
        }
        assert_eq!(DisplayField::from_str("temperature"), None);
    }

    #[test]
    fn test_settings_serde_round_trip() {
        let settings = ViewerSettings {
            field: DisplayField::Vorticity,
            steps_per_frame: 12,
            geometry: Geometry::Airfoil,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: ViewerSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.field, DisplayField::Vorticity);
        assert_eq!(back.steps_per_frame, 12);
        assert_eq!(back.geometry, Geometry::Airfoil);
    }

    #[test]
    fn test_defaults() {
        let settings = ViewerSettings::default();
        assert_eq!(settings.field, DisplayField::Speed);
        assert_eq!(settings.geometry, Geometry::Circle);
        assert!(settings.steps_per_frame >= 1);
    }
}
