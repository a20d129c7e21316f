use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Display preferences, persisted independently of the session. Read once at
/// startup, written on every change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct PrefData {
    #[serde(default)]
    dark_mode: bool,
}

#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
    data: PrefData,
}

impl Preferences {
    /// Load preferences from disk; a missing or unreadable file yields the
    /// defaults.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = read_prefs(&path).unwrap_or_default();
        Self { path, data }
    }

    pub fn dark_mode(&self) -> bool {
        self.data.dark_mode
    }

    pub fn set_dark_mode(&mut self, enabled: bool) -> std::io::Result<()> {
        self.data.dark_mode = enabled;
        self.persist()
    }

    fn persist(&self) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, json)
    }
}

fn read_prefs(path: &Path) -> Option<PrefData> {
    let raw = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(data) => Some(data),
        Err(e) => {
            log::warn!("ignoring malformed prefs file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_light_mode() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load(dir.path().join("prefs.json"));
        assert!(!prefs.dark_mode());
    }

    #[test]
    fn dark_mode_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut prefs = Preferences::load(&path);
        prefs.set_dark_mode(true).unwrap();

        let reloaded = Preferences::load(&path);
        assert!(reloaded.dark_mode());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();

        let prefs = Preferences::load(&path);
        assert!(!prefs.dark_mode());
    }
}
