use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides the API base URL at load time.
pub const API_URL_ENV: &str = "TASKDECK_API_URL";

const DEFAULT_API_URL: &str = "http://localhost:8000/api";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("taskdeck")
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_url(),
            data_dir: default_data_dir(),
        }
    }
}

impl AppConfig {
    /// Build the config from defaults, honoring the `TASKDECK_API_URL`
    /// override if set and non-empty.
    pub fn load() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_base_url = url.trim().to_string();
            }
        }
        config
    }

    pub fn token_path(&self) -> PathBuf {
        self.data_dir.join("token")
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.data_dir.join("prefs.json")
    }

    /// Ensure the data directory exists.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)
    }
}
