//! Wheel settings and preferences
//!
//! Persisted in LocalStorage on the web. Only preferences live here; the name
//! list itself is never saved.

use serde::{Deserialize, Serialize};

use crate::wheel::{Palette, SpinConfig, SpinEasing, SpinError};

/// Wheel settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Spin ===
    /// Rotation count, landing jitter and duration
    pub spin: SpinConfig,
    /// Deceleration curve handed to the renderer
    pub easing: SpinEasing,

    // === Look ===
    /// Segment colors
    pub palette: Palette,
    /// Canvas radius in layout units (the canvas is drawn at 2x density)
    pub wheel_radius: f64,

    // === Audio ===
    /// Spin ticks and win fanfare
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            spin: SpinConfig::default(),
            easing: SpinEasing::default(),

            palette: Palette::default(),
            wheel_radius: 708.0,

            sound_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
        }
    }
}

impl Settings {
    /// Effective volume for feedback sounds
    pub fn effective_volume(&self) -> f32 {
        if !self.sound_enabled {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Reject values the engine would refuse later
    pub fn validate(&self) -> Result<(), SpinError> {
        self.spin.validate()?;
        if !self.wheel_radius.is_finite() || self.wheel_radius <= 0.0 {
            return Err(SpinError::invalid(format!(
                "wheel radius must be positive, got {}",
                self.wheel_radius
            )));
        }
        for (name, volume) in [("master", self.master_volume), ("sfx", self.sfx_volume)] {
            if !(0.0..=1.0).contains(&volume) {
                return Err(SpinError::invalid(format!(
                    "{} volume must be in 0.0 - 1.0, got {}",
                    name, volume
                )));
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "name_wheel_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) if settings.validate().is_ok() => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Ok(_) => log::warn!("Stored settings out of range, using defaults"),
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
            if let Ok(json) = self.to_json() {
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
