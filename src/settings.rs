//! Configuration of the dialogue window.

use serde::{Deserialize, Serialize};

use crate::{errors::DialogueError, typewriter::reveal_interval};

/// Characters revealed per second when nothing else is configured.
pub const DEFAULT_CHARACTERS_PER_SECOND: f32 = 5.0;

/// Settings of the dialogue window.
///
/// Can be written by hand or parsed from RON:
///
/// ```
/// use bevy_dialogue_window::prelude::DialogueSettings;
///
/// let settings = DialogueSettings::from_ron("(characters_per_second: 30.0)").unwrap();
/// assert_eq!(settings.characters_per_second, 30.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueSettings {
    /// How fast characters appear while the typewriter is running.
    pub characters_per_second: f32,
}

impl Default for DialogueSettings {
    fn default() -> Self {
        Self {
            characters_per_second: DEFAULT_CHARACTERS_PER_SECOND,
        }
    }
}

impl DialogueSettings {
    /// Creates settings with the given reveal rate.
    pub fn with_rate(characters_per_second: f32) -> Self {
        Self {
            characters_per_second,
        }
    }

    /// Parses settings from a RON string. Missing fields take their default.
    pub fn from_ron(ron: &str) -> Result<Self, serde_ron::error::SpannedError> {
        serde_ron::from_str(ron)
    }

    /// Returns the reveal rate if it can drive a typewriter.
    pub fn validate(&self) -> Result<f32, DialogueError> {
        let rate = self.characters_per_second;
        reveal_interval(rate)?;
        Ok(rate)
    }
}
