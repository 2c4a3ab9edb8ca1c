//! # Audio Module
//!
//! Best-effort sound effects. Every play call is allowed to fail quietly:
//! a missing sound logs a debug line and the game carries on.

use macroquad::audio::{load_sound, play_sound_once, Sound};
use std::collections::HashMap;

/// Sound effect key for dice rolls, played once per roll notification.
pub const SFX_DICE_ROLL: &str = "dice_roll";

/// Loaded sound effects keyed by name.
#[derive(Default)]
pub struct AudioBank {
    sounds: HashMap<String, Sound>,
}

impl AudioBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a sound from `assets/sounds/<key>.wav`. Missing files are
    /// logged and skipped.
    pub async fn load(&mut self, key: &str) {
        if self.sounds.contains_key(key) {
            return;
        }
        let path = format!("assets/sounds/{}.wav", key);
        match load_sound(&path).await {
            Ok(sound) => {
                self.sounds.insert(key.to_string(), sound);
            }
            Err(e) => {
                log::debug!("sound '{}' not available: {}", path, e);
            }
        }
    }

    /// Plays a sound effect if it is loaded. Best-effort; a miss is logged
    /// at debug level and swallowed.
    pub fn play_sfx(&self, key: &str) {
        match self.sounds.get(key) {
            Some(sound) => play_sound_once(sound),
            None => log::debug!("sfx '{}' not loaded, skipping", key),
        }
    }
}
