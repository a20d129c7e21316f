use std::path::{Path, PathBuf};

/// The client's view of the authenticated user: one bearer token, persisted
/// as a plain file so it survives restarts. No shape or expiry validation
/// happens here; a stale token is only discovered when the API answers with
/// an auth error.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    token: Option<String>,
}

impl SessionStore {
    /// Read the stored token, if any. A missing or empty file means no
    /// session.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let token = read_token(&path);
        Self { path, token }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Store a fresh token, persisting it immediately.
    pub fn set_token(&mut self, token: impl Into<String>) -> std::io::Result<()> {
        let token = token.into();
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, &token)?;
        self.token = Some(token);
        Ok(())
    }

    /// Log out: drop the in-memory token and remove the file.
    pub fn clear(&mut self) -> std::io::Result<()> {
        self.token = None;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

fn read_token(path: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let token = raw.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cold_start_has_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::load(dir.path().join("token"));
        assert!(store.token().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn token_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");

        let mut store = SessionStore::load(&path);
        store.set_token("tok-1").unwrap();

        let reloaded = SessionStore::load(&path);
        assert_eq!(reloaded.token(), Some("tok-1"));
    }

    #[test]
    fn clear_removes_token_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");

        let mut store = SessionStore::load(&path);
        store.set_token("tok-1").unwrap();
        store.clear().unwrap();

        assert!(store.token().is_none());
        assert!(!path.exists());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn whitespace_only_file_counts_as_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "  \n").unwrap();

        let store = SessionStore::load(&path);
        assert!(!store.is_authenticated());
    }
}
