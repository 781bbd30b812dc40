//! User preferences persisted between sessions

use serde::{Deserialize, Serialize};

/// Volume step used by the settings screen.
pub const VOLUME_STEP: f32 = 0.1;

/// Preferences blob. Stored as JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sound_enabled: bool,
    pub music_enabled: bool,
    pub haptics_enabled: bool,
    /// Always within [0, 1]
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            music_enabled: true,
            haptics_enabled: true,
            volume: 0.7,
        }
    }
}

impl Settings {
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            Self::default().volume
        };
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        // Snap to the step grid so repeated presses don't drift
        let stepped = ((self.volume + delta) / VOLUME_STEP).round() * VOLUME_STEP;
        self.set_volume(stepped);
    }

    /// Volume as a whole percentage for display.
    pub fn volume_percent(&self) -> u8 {
        (self.volume * 100.0).round() as u8
    }

    /// Normalize values read from storage.
    pub fn sanitized(mut self) -> Self {
        let volume = self.volume;
        self.set_volume(volume);
        self
    }
}
