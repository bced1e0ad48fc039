//! Race settings and preferences
//!
//! Persisted separately from race history in the key-value store.

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;
use crate::platform::storage::{load_json, save_json};

/// Target race durations offered to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RaceDuration {
    Short,
    #[default]
    Medium,
    Long,
    Marathon,
}

impl RaceDuration {
    pub const ALL: [RaceDuration; 4] = [
        RaceDuration::Short,
        RaceDuration::Medium,
        RaceDuration::Long,
        RaceDuration::Marathon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RaceDuration::Short => "3s",
            RaceDuration::Medium => "5s",
            RaceDuration::Long => "10s",
            RaceDuration::Marathon => "15s",
        }
    }

    /// Accepts labels (`"5s"`), bare seconds (`"5"`) and names (`"medium"`).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "3s" | "3" | "short" => Some(RaceDuration::Short),
            "5s" | "5" | "medium" | "med" => Some(RaceDuration::Medium),
            "10s" | "10" | "long" => Some(RaceDuration::Long),
            "15s" | "15" | "marathon" => Some(RaceDuration::Marathon),
            _ => None,
        }
    }

    /// Target race length in milliseconds
    pub fn as_millis(&self) -> u64 {
        match self {
            RaceDuration::Short => 3_000,
            RaceDuration::Medium => 5_000,
            RaceDuration::Long => 10_000,
            RaceDuration::Marathon => 15_000,
        }
    }

    pub fn from_millis(ms: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_millis() == ms)
    }
}

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Play cues and the ambient tone
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Cue volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Ambient tone volume (0.0 - 1.0)
    pub ambient_volume: f32,
    /// Last chosen race duration
    pub race_duration: RaceDuration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            ambient_volume: 1.0,
            race_duration: RaceDuration::Medium,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "duck_race_settings";

    /// Effective cue volume (0 when sound is off)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sound_enabled {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Effective ambient volume (0 when sound is off)
    pub fn effective_ambient_volume(&self) -> f32 {
        if self.sound_enabled {
            (self.master_volume * self.ambient_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Load settings, falling back to defaults on missing or corrupt data
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Settings>(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {e}");
                Self::default()
            }
        }
    }

    /// Save settings; failures are logged and otherwise ignored
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Settings not saved: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_duration_parsing() {
        assert_eq!(RaceDuration::from_str("3s"), Some(RaceDuration::Short));
        assert_eq!(RaceDuration::from_str(" 10 "), Some(RaceDuration::Long));
        assert_eq!(RaceDuration::from_str("MED"), Some(RaceDuration::Medium));
        assert_eq!(RaceDuration::from_str("7s"), None);
        for d in RaceDuration::ALL {
            assert_eq!(RaceDuration::from_str(d.as_str()), Some(d));
            assert_eq!(RaceDuration::from_millis(d.as_millis()), Some(d));
        }
        assert_eq!(RaceDuration::from_millis(4_000), None);
    }

    #[test]
    fn test_muted_volumes() {
        let mut settings = Settings::default();
        assert!((settings.effective_sfx_volume() - 0.8).abs() < 1e-6);
        settings.sound_enabled = false;
        assert_eq!(settings.effective_sfx_volume(), 0.0);
        assert_eq!(settings.effective_ambient_volume(), 0.0);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            sound_enabled: false,
            race_duration: RaceDuration::Marathon,
            ..Settings::default()
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set_item(Settings::STORAGE_KEY, "not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());

        // Missing fields take their defaults
        store
            .set_item(Settings::STORAGE_KEY, r#"{"sound_enabled":false}"#)
            .unwrap();
        let loaded = Settings::load(&store);
        assert!(!loaded.sound_enabled);
        assert_eq!(loaded.race_duration, RaceDuration::Medium);
    }
}
