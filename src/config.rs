use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::store::DEFAULT_STORAGE_KEY;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub storage_key: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: PathBuf::from("catalog.db"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Where the loaded config came from, so the caller can report it once
/// logging is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    Defaults,
}

impl AppConfig {
    /// Reads a JSON config file. A missing file means defaults.
    pub fn load(path: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok((AppConfig::default(), ConfigSource::Defaults));
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok((config, ConfigSource::File))
    }

    pub fn with_overrides(mut self, db_path: Option<PathBuf>, log_level: Option<String>) -> Self {
        if let Some(p) = db_path {
            self.db_path = p;
        }
        if let Some(level) = log_level {
            self.log_level = level;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (cfg, source) = AppConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.storage_key, "ecommerce-calculator");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"db_path": "/tmp/shop.db"}}"#).unwrap();
        let (cfg, source) = AppConfig::load(file.path()).unwrap();
        assert_eq!(source, ConfigSource::File);
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/shop.db"));
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "db_path = 3").unwrap();
        assert!(matches!(
            AppConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn overrides_win() {
        let cfg = AppConfig::default().with_overrides(Some("x.db".into()), Some("debug".into()));
        assert_eq!(cfg.db_path, PathBuf::from("x.db"));
        assert_eq!(cfg.log_level, "debug");
    }
}
