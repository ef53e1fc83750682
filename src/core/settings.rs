//! Persisted player settings.
//!
//! The options screen stores whole minutes and a round count. This module
//! owns that on-disk shape and converts it into a `SessionConfig` when a
//! match starts.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::config::SessionConfig;

const MAX_MINUTES: u32 = 60;
const MAX_ROUNDS: u32 = 50;

/// Options as the settings screen stores them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSettings {
    #[serde(default = "default_minutes")]
    pub time_to_think: u32,
    #[serde(default = "default_minutes")]
    pub time_to_judge: u32,
    #[serde(default = "default_minutes")]
    pub round_duration: u32,
    #[serde(default = "default_rounds")]
    pub rounds_count: u32,
    #[serde(default = "default_sound")]
    pub sound: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            time_to_think: default_minutes(),
            time_to_judge: default_minutes(),
            round_duration: default_minutes(),
            rounds_count: default_rounds(),
            sound: default_sound(),
        }
    }
}

impl GameSettings {
    pub fn sanitized(mut self) -> Self {
        self.time_to_think = self.time_to_think.clamp(1, MAX_MINUTES);
        self.time_to_judge = self.time_to_judge.clamp(1, MAX_MINUTES);
        self.round_duration = self.round_duration.clamp(1, MAX_MINUTES);
        self.rounds_count = self.rounds_count.clamp(1, MAX_ROUNDS);
        self
    }

    /// Session configuration for a regular match with these options.
    pub fn into_config(self) -> SessionConfig {
        let s = self.sanitized();
        SessionConfig {
            think: minutes(s.time_to_think),
            judge: minutes(s.time_to_judge),
            round: minutes(s.round_duration),
            max_rounds: s.rounds_count as usize,
            sound: s.sound,
            ..SessionConfig::standard()
        }
    }
}

fn minutes(count: u32) -> Duration {
    Duration::from_secs(u64::from(count) * 60)
}

fn default_minutes() -> u32 {
    2
}

fn default_rounds() -> u32 {
    9
}

fn default_sound() -> bool {
    true
}

/// JSON file holding `GameSettings`.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("INTERVIEW_BATTLE_SETTINGS") {
            return Self::new(explicit);
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("interview-battle");
        path.push("settings.json");
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load settings; a missing or corrupt file yields the defaults.
    pub fn load(&self) -> GameSettings {
        let Ok(bytes) = fs::read(&self.path) else {
            return GameSettings::default();
        };
        match serde_json::from_slice::<GameSettings>(&bytes) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "ignoring unreadable settings: {}", e);
                GameSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &GameSettings) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_standard_match() {
        let config = GameSettings::default().into_config();
        assert_eq!(config, SessionConfig::standard());
    }

    #[test]
    fn test_minutes_are_converted_and_clamped() {
        let settings = GameSettings {
            time_to_think: 0,
            time_to_judge: 3,
            round_duration: 500,
            rounds_count: 4,
            sound: false,
        };
        let config = settings.into_config();
        assert_eq!(config.think, Duration::from_secs(60));
        assert_eq!(config.judge, Duration::from_secs(180));
        assert_eq!(config.round, Duration::from_secs(60 * 60));
        assert_eq!(config.max_rounds, 4);
        assert!(!config.sound);
    }

    #[test]
    fn test_serde_defaults_fill_missing_fields() {
        let parsed: GameSettings = serde_json::from_str(r#"{"time_to_think":5}"#)
            .expect("settings JSON should parse");
        assert_eq!(parsed.time_to_think, 5);
        assert_eq!(parsed.rounds_count, 9);
        assert!(parsed.sound);
    }

    #[test]
    fn test_store_round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("interview-battle-settings-{}", std::process::id()));
        let store = SettingsStore::new(dir.join("nested").join("settings.json"));

        let settings = GameSettings { rounds_count: 3, ..GameSettings::default() };
        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);

        fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load(), GameSettings::default());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let store = SettingsStore::new("/definitely/not/here/settings.json");
        assert_eq!(store.load(), GameSettings::default());
    }
}
