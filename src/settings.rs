//! Game settings and preferences
//!
//! Playfield geometry plus audio preferences. Persisted in LocalStorage on
//! the web; native builds always start from defaults.

use serde::{Deserialize, Serialize};

/// LocalStorage key
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "skyfall_dodge_settings";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield (pixels) ===
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub player_width: f32,
    pub player_height: f32,

    /// Fixed RNG seed (replays the same run); random when unset
    pub seed: Option<u64>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playfield_width: 800.0,
            playfield_height: 600.0,
            player_width: 80.0,
            player_height: 80.0,

            seed: None,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }
}

impl Settings {
    /// Smallest playfield we will simulate
    const MIN_PLAYFIELD: f32 = 100.0;

    /// Parse settings JSON, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(err) => {
                log::warn!("Ignoring malformed settings ({}), using defaults", err);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Clamp every field into a range the simulation can work with
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let dim = |value: f32, min: f32, fallback: f32| {
            if value.is_finite() { value.max(min) } else { fallback }
        };
        let unit = |value: f32, fallback: f32| {
            if value.is_finite() { value.clamp(0.0, 1.0) } else { fallback }
        };

        self.playfield_width = dim(self.playfield_width, Self::MIN_PLAYFIELD, defaults.playfield_width);
        self.playfield_height = dim(self.playfield_height, Self::MIN_PLAYFIELD, defaults.playfield_height);
        self.player_width = dim(self.player_width, 1.0, defaults.player_width).min(self.playfield_width);
        self.player_height = dim(self.player_height, 1.0, defaults.player_height).min(self.playfield_height);
        self.master_volume = unit(self.master_volume, defaults.master_volume);
        self.sfx_volume = unit(self.sfx_volume, defaults.sfx_volume);
        self.music_volume = unit(self.music_volume, defaults.music_volume);
        self
    }

    /// Effective sound effect gain (respects mute)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective music gain (respects mute)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Flip the mute flag; returns the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
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
            let _ = storage.set_item(STORAGE_KEY, &self.to_json());
            log::info!("Settings saved");
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
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"playfield_height": 900, "seed": 5}"#);
        assert_eq!(settings.playfield_height, 900.0);
        assert_eq!(settings.playfield_width, 800.0);
        assert_eq!(settings.seed, Some(5));
    }

    #[test]
    fn test_malformed_json_falls_back() {
        assert_eq!(Settings::from_json("{not json"), Settings::default());
    }

    #[test]
    fn test_sanitize_clamps_values() {
        let settings = Settings {
            playfield_width: -5.0,
            playfield_height: f32::NAN,
            player_width: 5_000.0,
            master_volume: 3.0,
            sfx_volume: -1.0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(settings.playfield_width, 100.0);
        assert_eq!(settings.playfield_height, 600.0);
        assert_eq!(settings.player_width, 100.0);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
    }

    #[test]
    fn test_mute_silences_everything() {
        let settings = Settings {
            muted: true,
            ..Settings::default()
        };
        assert_eq!(settings.effective_sfx_volume(), 0.0);
        assert_eq!(settings.effective_music_volume(), 0.0);
    }

    #[test]
    fn test_toggle_mute() {
        let mut settings = Settings::default();
        assert!(settings.toggle_mute());
        assert_eq!(settings.effective_music_volume(), 0.0);
        assert!(!settings.toggle_mute());
        assert!(settings.effective_sfx_volume() > 0.0);
        // Survives the trip through storage
        settings.toggle_mute();
        assert!(Settings::from_json(&settings.to_json()).muted);
    }

    #[test]
    fn test_json_roundtrip_preserves_seed() {
        let settings = Settings {
            seed: Some(42),
            ..Settings::default()
        };
        assert_eq!(Settings::from_json(&settings.to_json()), settings);
    }
}
