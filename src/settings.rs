//! Player settings and preferences
//!
//! Persisted per variant in LocalStorage, separate from the leaderboard.

use serde::{Deserialize, Serialize};

use crate::audio::AudioState;
use crate::platform::storage;
use crate::tuning::{Character, Variant};

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    pub audio: AudioState,

    // === Player ===
    /// Last selected character (character-gated variants)
    pub character: Option<Character>,
    /// Last username typed on the start screen (not necessarily verified)
    pub username: String,

    // === Debug ===
    /// Outline hitboxes on the play field
    pub show_hitboxes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            audio: AudioState::default(),
            character: None,
            username: String::new(),
            show_hitboxes: false,
        }
    }
}

impl Settings {
    /// LocalStorage key for a variant
    pub fn storage_key(variant: Variant) -> String {
        format!("arcade_runner_{}_settings", variant.slug().replace('-', "_"))
    }

    /// Load settings from LocalStorage, falling back to defaults
    pub fn load(variant: Variant) -> Self {
        match storage::load_json(&Self::storage_key(variant)) {
            Some(settings) => {
                log::info!("Loaded {} settings", variant.slug());
                settings
            }
            None => {
                log::info!("Using default {} settings", variant.slug());
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage (no-op natively)
    pub fn save(&self, variant: Variant) {
        storage::save_json(&Self::storage_key(variant), self);
        log::debug!("Settings saved");
    }
}
