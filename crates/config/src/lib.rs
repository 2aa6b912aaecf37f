//! Reads settings
//!
//! One TOML file with a `[player]` and a `[display]` table. Missing keys
//! take their defaults, so a file written by an older build still loads.
//!
//! ```rust,no_run
//! use reads_config::{FontSize, SettingsFile};
//!
//! let file = SettingsFile::in_user_config_dir()?;
//! let settings = file.load_or_default();
//! println!("resume ratio: {}", settings.player.finished_ratio);
//!
//! file.set_font_size(FontSize::Large)?;
//! # Ok::<(), reads_config::ConfigError>(())
//! ```

mod display_config;
mod error;
mod player_config;
mod settings_file;

pub use display_config::{DisplayConfig, FontScale, FontSize};
pub use error::{ConfigError, ConfigResult, FieldError};
pub use player_config::PlayerConfig;
pub use settings_file::SettingsFile;

use serde::{Deserialize, Serialize};

/// Environment variable overriding `player.default_volume`
pub const ENV_DEFAULT_VOLUME: &str = "READS_PLAYER_DEFAULT_VOLUME";
/// Environment variable overriding `display.font_size`
pub const ENV_FONT_SIZE: &str = "READS_DISPLAY_FONT_SIZE";

/// All user settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub player: PlayerConfig,
    pub display: DisplayConfig,
}

impl Config {
    pub fn validate(&self) -> ConfigResult<()> {
        let problems = self.player.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }

    /// Applies `READS_*` overrides read through `lookup`
    ///
    /// Values that do not parse are logged and skipped.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_DEFAULT_VOLUME) {
            match raw.trim().parse::<u8>() {
                Ok(volume) => self.player.default_volume = volume,
                Err(_) => log::warn!("Ignoring {}={:?}", ENV_DEFAULT_VOLUME, raw),
            }
        }

        if let Some(raw) = lookup(ENV_FONT_SIZE) {
            match raw.parse::<FontSize>() {
                Ok(size) => self.display.font_size = size,
                Err(e) => log::warn!("Ignoring {}: {}", ENV_FONT_SIZE, e),
            }
        }
    }

    /// Applies overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }
}
