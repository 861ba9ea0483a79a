use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the stored server url.
pub const URL_ENV: &str = "SQS_CONSOLE_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppState {
    /// Origin of the queue backend, e.g. `http://localhost:8080`.
    pub base_url: String,
    /// Client-side request timeout. Unset means the transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    fn toml_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        Some(base.config_dir().join("sqs-console.toml"))
    }

    pub fn load() -> Self {
        let mut state = Self::toml_path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_default();
        if let Ok(url) = std::env::var(URL_ENV) {
            if !url.trim().is_empty() {
                state.base_url = crate::utils::normalize_url(&url);
            }
        }
        state
    }

    /// Read settings from `path`; `None` if the file is missing or unreadable.
    pub fn load_from(path: &Path) -> Option<Self> {
        let text = fs::read_to_string(path).ok()?;
        match toml::from_str::<AppState>(&text) {
            Ok(state) => Some(state),
            Err(e) => {
                log::warn!("ignoring malformed settings at {}: {e}", path.display());
                None
            }
        }
    }

    pub fn save(&self) -> std::io::Result<()> {
        match Self::toml_path() {
            Some(path) => self.save_to(&path),
            None => Err(std::io::Error::new(std::io::ErrorKind::NotFound, "No config dir")),
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        fs::write(path, toml)
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty()
    }
}

#[cfg(feature = "gui")]
pub fn build_ui(app: &adw::Application) {
    let state = AppState::load();
    if state.is_configured() {
        crate::ui::main_window::show_main_window(app, state);
    } else {
        crate::ui::connect::show_connect_window(app);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sqs-console.toml");
        let state = AppState {
            base_url: "http://localhost:8080".into(),
            request_timeout_secs: Some(30),
        };
        state.save_to(&path).unwrap();
        assert_eq!(AppState::load_from(&path), Some(state));
    }

    #[test]
    fn timeout_is_optional() {
        let state: AppState = toml::from_str("base_url = \"http://q.local\"\n").unwrap();
        assert_eq!(state.request_timeout_secs, None);
        assert!(state.is_configured());
        assert!(!AppState::new().is_configured());
    }

    #[test]
    fn malformed_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "base_url = [").unwrap();
        assert_eq!(AppState::load_from(&path), None);
        assert_eq!(AppState::load_from(&dir.path().join("missing.toml")), None);
    }
}
