use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::session::Mode;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_max_misses")]
    pub max_misses: u32,
    #[serde(default = "default_falling_speed_start")]
    pub falling_speed_start: f64,
    #[serde(default = "default_falling_speed_ceiling")]
    pub falling_speed_ceiling: f64,
    #[serde(default = "default_falling_speed_increment")]
    pub falling_speed_increment: f64,
    #[serde(default = "default_new_symbol_fraction")]
    pub new_symbol_fraction: f64,
    #[serde(default = "default_falling_letter_count")]
    pub falling_letter_count: usize,
    #[serde(default = "default_baseline_distance")]
    pub baseline_distance: f64,
    #[serde(default = "default_fall_rate")]
    pub fall_rate: f64,
    #[serde(default = "default_curriculum")]
    pub curriculum: String,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub show_hands: bool,
    #[serde(default = "default_true")]
    pub show_baseline: bool,
}

fn default_max_misses() -> u32 {
    5
}
fn default_falling_speed_start() -> f64 {
    1.0
}
fn default_falling_speed_ceiling() -> f64 {
    2.0
}
fn default_falling_speed_increment() -> f64 {
    0.1
}
fn default_new_symbol_fraction() -> f64 {
    0.4
}
fn default_falling_letter_count() -> usize {
    100
}
fn default_baseline_distance() -> f64 {
    400.0
}
fn default_fall_rate() -> f64 {
    60.0
}
fn default_curriculum() -> String {
    "es".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_misses: default_max_misses(),
            falling_speed_start: default_falling_speed_start(),
            falling_speed_ceiling: default_falling_speed_ceiling(),
            falling_speed_increment: default_falling_speed_increment(),
            new_symbol_fraction: default_new_symbol_fraction(),
            falling_letter_count: default_falling_letter_count(),
            baseline_distance: default_baseline_distance(),
            fall_rate: default_fall_rate(),
            curriculum: default_curriculum(),
            sound_enabled: default_true(),
            show_hands: default_true(),
            show_baseline: default_true(),
        }
    }
}

/// Toggles owned by the presentation layer. Read once when the app is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresentationFlags {
    pub sound_enabled: bool,
    pub show_hands: bool,
    pub show_baseline: bool,
}

impl Config {
    /// Load from the user config dir, falling back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keyfall")
            .join("config.toml")
    }

    pub fn presentation_flags(&self) -> PresentationFlags {
        PresentationFlags {
            sound_enabled: self.sound_enabled,
            show_hands: self.show_hands,
            show_baseline: self.show_baseline,
        }
    }

    pub fn session_config(&self, mode: Mode) -> SessionConfig {
        SessionConfig {
            mode,
            max_misses: self.max_misses,
            speed_start: self.falling_speed_start,
            speed_ceiling: self.falling_speed_ceiling,
            speed_increment: self.falling_speed_increment,
            new_symbol_fraction: self.new_symbol_fraction,
            baseline_distance: self.baseline_distance,
            fall_rate: self.fall_rate,
            error_cue: self.sound_enabled,
        }
    }
}

/// Options fixed for the lifetime of one session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    pub mode: Mode,
    pub max_misses: u32,
    pub speed_start: f64,
    pub speed_ceiling: f64,
    pub speed_increment: f64,
    pub new_symbol_fraction: f64,
    /// Distance a falling symbol travels before it crosses the baseline.
    pub baseline_distance: f64,
    /// Distance units per second at speed 1.0.
    pub fall_rate: f64,
    pub error_cue: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Config::default().session_config(Mode::Falling)
    }
}

impl SessionConfig {
    pub fn text() -> Self {
        Self {
            mode: Mode::Text,
            ..Self::default()
        }
    }

    pub fn falling() -> Self {
        Self::default()
    }

    pub fn with_max_misses(mut self, max_misses: u32) -> Self {
        self.max_misses = max_misses;
        self
    }

    pub fn with_speed(mut self, start: f64, ceiling: f64, increment: f64) -> Self {
        self.speed_start = start;
        self.speed_ceiling = ceiling;
        self.speed_increment = increment;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_misses == 0 {
            return Err(ConfigError::ZeroMaxMisses);
        }
        if !(0.0..=1.0).contains(&self.new_symbol_fraction) {
            return Err(ConfigError::FractionOutOfRange(self.new_symbol_fraction));
        }
        if self.mode == Mode::Falling {
            self.validate_falling()?;
        }
        Ok(())
    }

    fn validate_falling(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("speed_start", self.speed_start),
            ("speed_ceiling", self.speed_ceiling),
            ("speed_increment", self.speed_increment),
            ("baseline_distance", self.baseline_distance),
            ("fall_rate", self.fall_rate),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }
        if self.speed_start <= 0.0 {
            return Err(ConfigError::NonPositiveStartSpeed(self.speed_start));
        }
        if self.speed_increment <= 0.0 {
            return Err(ConfigError::NonPositiveIncrement(self.speed_increment));
        }
        // A ramp that starts at its ceiling would be won before the first key.
        if self.speed_ceiling <= self.speed_start {
            return Err(ConfigError::CeilingNotAboveStart {
                start: self.speed_start,
                ceiling: self.speed_ceiling,
            });
        }
        if self.baseline_distance <= 0.0 {
            return Err(ConfigError::NonPositiveBaseline(self.baseline_distance));
        }
        if self.fall_rate <= 0.0 {
            return Err(ConfigError::NonPositiveFallRate(self.fall_rate));
        }
        Ok(())
    }
}
