//! Command-line settings.
//!
//! Read from `<config dir>/glint/config.toml`. Every field has a default,
//! so a missing file or a partial one is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for the `glint` binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    /// Syntax file to load instead of the bundled one
    pub syntax_file: Option<PathBuf>,

    /// Language used when the file extension is not recognized
    pub default_language: Option<String>,

    /// Print whitespace and unrecognized spans too
    pub show_plain: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            syntax_file: None,
            default_language: None,
            show_plain: false,
        }
    }
}

impl Settings {
    /// Loads settings from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!("Ignoring settings: {}", err);
                Self::default()
            }
        }
    }

    /// Loads settings from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let settings: Self = toml::from_str(&content)?;
        Ok(settings)
    }

    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default settings file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("glint").join("config.toml"))
    }
}

/// Settings errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.syntax_file.is_none());
        assert!(!settings.show_plain);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "show-plain = true").unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert!(settings.show_plain);
        assert!(settings.default_language.is_none());
    }

    #[test]
    fn test_load_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "syntax-file = \"/etc/glint/syntax.toml\"").unwrap();
        writeln!(file, "default-language = \"c\"").unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(
            settings.syntax_file,
            Some(PathBuf::from("/etc/glint/syntax.toml"))
        );
        assert_eq!(settings.default_language.as_deref(), Some("c"));
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "show-plain = \"yes\"").unwrap();

        let err = Settings::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
