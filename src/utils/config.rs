use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::storage::record_storage::DEFAULT_STORAGE_KEY;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variables checked for the text generation key, in order.
pub const API_KEY_VARIABLES: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Settings read from `config.toml` in the application directory. Every field is optional in
/// the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Key the record mapping is stored under.
    pub storage_key: String,
    /// Text generation model.
    pub model: String,
    pub api_base: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn path(app_dir: &Path) -> PathBuf {
        app_dir.join(CONFIG_FILE_NAME)
    }

    /// A missing file means defaults. A file that exists but doesn't parse is an error.
    pub fn load(app_dir: &Path) -> Result<Self> {
        let path = Self::path(app_dir);
        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!("Loading config from {path:?}");
                Ok(toml::from_str(&content)?)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn api_key() -> Option<String> {
        API_KEY_VARIABLES
            .iter()
            .filter_map(|name| env::var(name).ok())
            .find(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use tempfile::tempdir;

    use super::Config;

    #[test]
    fn missing_file_is_default() -> Result<()> {
        let dir = tempdir()?;
        assert_eq!(Config::load(dir.path())?, Config::default());
        Ok(())
    }

    #[test]
    fn partial_file_keeps_defaults() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            Config::path(dir.path()),
            "model = \"gemini-2.5-flash\"\nrequest_timeout_secs = 5\n",
        )?;

        let config = Config::load(dir.path())?;
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.storage_key, Config::default().storage_key);
        Ok(())
    }

    #[test]
    fn broken_file_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        fs::write(Config::path(dir.path()), "model = [")?;
        assert!(Config::load(dir.path()).is_err());
        Ok(())
    }
}
