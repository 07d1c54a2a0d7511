//! Renamer configuration and its JSON file form.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::sanitize::SanitizePolicy;
use crate::script::cache::DEFAULT_CACHE_CAPACITY;

/// Script kind handled by this interpreter.
pub const DEFAULT_INTERPRETER_ID: &str = "RenameScript";

/// Configuration for a [`Renamer`](super::Renamer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenamerConfig {
    /// Scripts whose kind differs from this id are rejected
    pub interpreter_id: String,

    /// Drop illegal path characters instead of substituting look-alikes
    pub remove_illegal_chars: bool,

    /// Apply the Windows illegal-character set (default: on Windows only)
    pub windows_compatible: bool,

    /// Parsed scripts kept in memory; 0 disables the cache
    pub cache_capacity: usize,
}

impl Default for RenamerConfig {
    fn default() -> Self {
        Self {
            interpreter_id: DEFAULT_INTERPRETER_ID.to_string(),
            remove_illegal_chars: false,
            windows_compatible: cfg!(windows),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl RenamerConfig {
    /// Sanitization settings derived from this configuration.
    pub fn policy(&self) -> SanitizePolicy {
        SanitizePolicy {
            remove_illegal_chars: self.remove_illegal_chars,
            windows_compatible: self.windows_compatible,
        }
    }

    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path).with_context(|| format!("Failed to read config: {:?}", path))?;
        let config = serde_json::from_slice(&data).context("Failed to deserialize config")?;
        Ok(config)
    }

    /// Write configuration as pretty JSON, replacing the file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self).context("Failed to serialize config")?;
        let temp_path = path.with_extension("tmp");

        let mut file = File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {:?}", temp_path))?;
        file.write_all(&json).context("Failed to write config")?;
        file.sync_all().context("Failed to sync config")?;
        drop(file);

        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename {:?} to {:?}", temp_path, path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn round_trips_through_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("renamer.json");

        let config = RenamerConfig {
            remove_illegal_chars: true,
            windows_compatible: true,
            cache_capacity: 3,
            ..RenamerConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(RenamerConfig::load(&path).unwrap(), config);
        assert!(!temp.path().join("renamer.tmp").exists());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("renamer.json");
        fs::write(&path, br#"{ "remove_illegal_chars": true }"#).unwrap();

        let config = RenamerConfig::load(&path).unwrap();
        assert!(config.remove_illegal_chars);
        assert_eq!(config.interpreter_id, DEFAULT_INTERPRETER_ID);
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = RenamerConfig::load(&temp.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
