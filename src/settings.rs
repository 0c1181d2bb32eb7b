//! Player preferences
//!
//! Persisted in LocalStorage, separate from anything round-related (rounds
//! are never saved).

use serde::{Deserialize, Serialize};

use crate::tuning::ScoringPolicy;

/// Default leaderboard endpoint, relative to the page origin
pub const DEFAULT_LEADERBOARD_ENDPOINT: &str = "/api/leaderboard";

/// Longest name we keep for the leaderboard form
pub const MAX_NAME_LEN: usize = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name pre-filled in the leaderboard form
    pub player_name: String,
    pub leaderboard_endpoint: String,
    /// Show the "← → move / Space jump" hint during play
    pub show_controls_hint: bool,
    pub policy: ScoringPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            leaderboard_endpoint: DEFAULT_LEADERBOARD_ENDPOINT.to_string(),
            show_controls_hint: true,
            policy: ScoringPolicy::Canonical,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "nutrition_hunter_settings";

    /// Remember the last submitted name (trimmed, length-capped)
    pub fn remember_name(&mut self, name: &str) {
        self.player_name = name.trim().chars().take(MAX_NAME_LEN).collect();
    }

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
