//! Loading and saving the settings file
//!
//! Saves go through a temporary file in the same directory that is then
//! renamed over the old one, so readers see either the old or the new
//! settings and never a partial write.

use crate::{Config, ConfigError, ConfigResult, FontSize};
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const FILE_NAME: &str = "settings.toml";

/// The settings file at one path
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `settings.toml` in the platform config directory
    /// (`~/.config/reads` on Linux)
    pub fn in_user_config_dir() -> ConfigResult<Self> {
        let dirs = ProjectDirs::from("", "", "reads").ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::new(dirs.config_dir().join(FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file; a missing file means default settings
    ///
    /// Out-of-range values are logged and kept so a hand edit is never
    /// silently thrown away. `save` refuses them.
    pub fn load(&self) -> ConfigResult<Config> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", self.path.display());
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;

        if let Err(e) = config.validate() {
            log::warn!("{}: {}", self.path.display(), e);
        }
        Ok(config)
    }

    /// Like `load`, but an unreadable file yields the defaults
    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_else(|e| {
            log::warn!("{}; using default settings", e);
            Config::default()
        })
    }

    /// `load_or_default` followed by the `READS_*` environment overrides
    pub fn load_with_env(&self) -> Config {
        let mut config = self.load_or_default();
        config.apply_env();
        config
    }

    /// Validates and writes `config`, creating the directory if needed
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        config.validate()?;
        let text = toml::to_string_pretty(config)?;

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        fs::create_dir_all(dir).map_err(write_err)?;
        let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
        temp.write_all(text.as_bytes()).map_err(write_err)?;
        temp.persist(&self.path).map_err(|e| write_err(e.error))?;

        log::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }

    /// Loads, changes and saves in one step; returns what was saved
    pub fn update<F>(&self, change: F) -> ConfigResult<Config>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.load()?;
        change(&mut config);
        self.save(&config)?;
        Ok(config)
    }

    pub fn set_font_size(&self, size: FontSize) -> ConfigResult<()> {
        self.update(|config| config.display.font_size = size)?;
        Ok(())
    }
}
