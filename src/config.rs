//! Settings file loading.
//!
//! `<config_dir>/sliitscope/config.toml`, every field optional:
//!
//! ```toml
//! catalog = "/path/to/modules.json"
//! store_path = "/path/to/storage.json"
//! log_filter = "debug"
//! window_width = 420.0
//! window_height = 640.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

const APP_DIR: &str = "sliitscope";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Catalog file the page agent scans; none until the user opens one.
    pub catalog: Option<PathBuf>,
    /// JSON file backing the durable store.
    pub store_path: PathBuf,
    /// Fallback `env_logger` filter when `RUST_LOG` is unset.
    pub log_filter: String,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog: None,
            store_path: default_store_path(),
            log_filter: "info".to_string(),
            window_width: 420.0,
            window_height: 640.0,
        }
    }
}

impl Settings {
    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&default_config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self> {
        let settings: Settings = toml::from_str(text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        if settings.window_width <= 0.0 || settings.window_height <= 0.0 {
            return Err(Error::Config {
                path: path.to_path_buf(),
                reason: "window size must be positive".to_string(),
            });
        }
        Ok(settings)
    }

    /// Apply command-line overrides: the first argument is a catalog path.
    pub fn with_args<I: IntoIterator<Item = String>>(mut self, args: I) -> Self {
        if let Some(catalog) = args.into_iter().next() {
            self.catalog = Some(PathBuf::from(catalog));
        }
        self
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("storage.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.store_path.ends_with("sliitscope/storage.json"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let settings = Settings::parse(
            "catalog = \"modules.csv\"\nlog_filter = \"debug\"\n",
            Path::new("config.toml"),
        )
        .unwrap();
        assert_eq!(settings.catalog, Some(PathBuf::from("modules.csv")));
        assert_eq!(settings.log_filter, "debug");
        assert_eq!(settings.window_width, 420.0);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let err = Settings::parse("window_width = \"wide\"", Path::new("c.toml")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let err = Settings::parse("window_height = -1.0", Path::new("c.toml")).unwrap_err();
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_first_arg_overrides_catalog() {
        let settings = Settings::default().with_args(vec!["page.json".to_string()]);
        assert_eq!(settings.catalog, Some(PathBuf::from("page.json")));

        let untouched = Settings::default().with_args(Vec::new());
        assert_eq!(untouched.catalog, None);
    }
}
