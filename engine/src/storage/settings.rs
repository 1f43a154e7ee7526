use serde::{Deserialize, Serialize};

use crate::config::Validate;
use crate::games::memory::{Difficulty, MatchMode};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::System];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub sound_enabled: bool,
    pub animations_enabled: bool,
    pub theme: Theme,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            animations_enabled: true,
            theme: Theme::System,
        }
    }
}

impl Validate for GameSettings {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Mode and difficulty of the most recently started game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastConfiguration {
    pub mode: MatchMode,
    pub difficulty: Difficulty,
}

impl Default for LastConfiguration {
    fn default() -> Self {
        Self {
            mode: MatchMode::ColorOnly,
            difficulty: Difficulty::Easy,
        }
    }
}

impl Validate for LastConfiguration {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    pub games_played: u32,
    pub total_score: u64,
}

impl Validate for Statistics {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}
