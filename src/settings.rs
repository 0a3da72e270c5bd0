//! Simulator settings and preferences
//!
//! Persisted in LocalStorage, separately from shared scenarios.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::consts::{MAX_SPEED, MIN_SPEED};

/// Color scheme of the coordinate plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlaneTheme {
    #[default]
    Dark,
    Light,
}

impl PlaneTheme {
    pub fn background(&self) -> Color {
        match self {
            PlaneTheme::Dark => Color::rgb(15, 23, 42),
            PlaneTheme::Light => Color::rgb(248, 250, 252),
        }
    }

    pub fn grid(&self) -> Color {
        match self {
            PlaneTheme::Dark => Color::rgb(30, 41, 59),
            PlaneTheme::Light => Color::rgb(226, 232, 240),
        }
    }

    pub fn axis(&self) -> Color {
        match self {
            PlaneTheme::Dark => Color::rgb(148, 163, 184),
            PlaneTheme::Light => Color::rgb(71, 85, 105),
        }
    }

    pub fn velocity_arrow(&self) -> Color {
        Color::rgb(34, 197, 94)
    }

    pub fn acceleration_arrow(&self) -> Color {
        match self {
            PlaneTheme::Dark => Color::rgb(250, 204, 21),
            PlaneTheme::Light => Color::rgb(202, 138, 4),
        }
    }
}

/// Simulator settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: PlaneTheme,

    // === Plane ===
    pub show_grid: bool,
    /// Unit labels along the axes
    pub show_labels: bool,

    // === Bodies ===
    /// Draw velocity and acceleration arrows
    pub show_vectors: bool,
    /// Seconds of motion an arrow represents (arrow = vector · this)
    pub vector_scale: f64,
    /// Body marker radius in CSS pixels
    pub marker_radius: f64,

    // === Playback ===
    pub default_speed: f64,
    /// Time jumps move bodies immediately
    pub movement_prediction: bool,

    // === HUD ===
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: PlaneTheme::Dark,

            show_grid: true,
            show_labels: true,

            show_vectors: false,
            vector_scale: 1.0,
            marker_radius: 6.0,

            default_speed: 1.0,
            movement_prediction: true,

            show_fps: false,
        }
    }
}

impl Settings {
    /// Replace out-of-range values (hand-edited storage) with defaults
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if !(self.default_speed.is_finite()
            && (MIN_SPEED..=MAX_SPEED).contains(&self.default_speed))
        {
            log::warn!("Ignoring stored speed {}", self.default_speed);
            self.default_speed = defaults.default_speed;
        }
        if !(self.vector_scale.is_finite() && self.vector_scale > 0.0) {
            self.vector_scale = defaults.vector_scale;
        }
        if !(self.marker_radius.is_finite() && (1.0..=40.0).contains(&self.marker_radius)) {
            self.marker_radius = defaults.marker_radius;
        }
        self
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "cinematica_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Stored settings unreadable: {}", e),
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

    /// Native: read a JSON settings file named by `CINEMATICA_SETTINGS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var("CINEMATICA_SETTINGS") else {
            return Self::default();
        };
        match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Self::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path, e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::validated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"show_vectors":true}"#).unwrap();
        assert!(settings.show_vectors);
        assert_eq!(settings.default_speed, 1.0);
        assert_eq!(settings.theme, PlaneTheme::Dark);
    }

    #[test]
    fn test_out_of_range_values_are_replaced() {
        let settings =
            Settings::from_json(r#"{"default_speed":1000.0,"vector_scale":-2,"marker_radius":0}"#)
                .unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{show_vectors").is_err());
    }
}
