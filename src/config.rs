// Persistent configuration: endpoint, HTTP settings, remembered view prefs.
// Stored as JSON in <config_dir>/tracklist/config.json

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::query::SortKey;

/// Where the track list comes from unless configured otherwise.
pub const DEFAULT_ENDPOINT: &str = "http://omsktec-playgrounds.ru/algos/lab13";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid endpoint URL '{url}': {source}")]
    Endpoint {
        url: String,
        source: url::ParseError,
    },
    #[error("Cannot determine config directory")]
    NoConfigDir,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL returning the JSON track list.
    pub endpoint_url: String,
    /// Per-request timeout in seconds. 0 = no timeout.
    pub request_timeout_secs: u64,
    /// Edge length of the square cover thumbnail, in pixels.
    pub cover_size: u32,
    pub user_agent: String,
    /// Last state of the "hide explicit" toggle.
    pub hide_explicit: bool,
    /// Last chosen sort order. `None` keeps the payload order.
    pub sort_key: Option<SortKey>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 30,
            cover_size: 200,
            user_agent: format!("Tracklist/{}", env!("CARGO_PKG_VERSION")),
            hide_explicit: false,
            sort_key: None,
        }
    }
}

/// Subset of the config the fetch layer needs. Cheap to clone into tasks.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Option<Duration>,
    pub user_agent: String,
    /// Honour HTTP(S)_PROXY from the environment.
    pub use_system_proxy: bool,
}

impl Config {
    /// Path to the config file.
    pub fn config_path() -> Option<PathBuf> {
        config_dir().map(|d| d.join("config.json"))
    }

    /// Load config from disk, or return defaults if not found / invalid.
    pub fn load() -> Self {
        let path = match Self::config_path() {
            Some(p) => p,
            None => return Self::default(),
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Cannot read config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to disk. Failures are logged, never fatal.
    pub fn save(&self) {
        let result = Self::config_path()
            .ok_or(ConfigError::NoConfigDir)
            .and_then(|path| self.save_to(&path).map(|()| path));

        match result {
            Ok(path) => log::debug!("Config saved to {}", path.display()),
            Err(e) => log::warn!("Cannot save config: {e}"),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json + "\n")?;
        Ok(())
    }

    /// The endpoint as a parsed URL.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        Url::parse(self.endpoint_url.trim()).map_err(|source| ConfigError::Endpoint {
            url: self.endpoint_url.clone(),
            source,
        })
    }

    pub fn http(&self) -> HttpSettings {
        HttpSettings {
            timeout: (self.request_timeout_secs > 0)
                .then(|| Duration::from_secs(self.request_timeout_secs)),
            user_agent: self.user_agent.clone(),
            use_system_proxy: true,
        }
    }

    /// Remember the view toggles; saves only when something changed.
    pub fn remember_view(&mut self, hide_explicit: bool, sort_key: Option<SortKey>) {
        if self.hide_explicit == hide_explicit && self.sort_key == sort_key {
            return;
        }
        self.hide_explicit = hide_explicit;
        self.sort_key = sort_key;
        self.save();
    }

    /// Apply `--endpoint <url>` from the command line, if given.
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        if let Some(url) = args
            .windows(2)
            .find(|w| w[0] == "--endpoint")
            .map(|w| w[1].clone())
        {
            log::info!("Endpoint overridden from command line: {url}");
            self.endpoint_url = url;
        }
    }
}

/// Get the application config directory.
fn config_dir() -> Option<PathBuf> {
    // macOS:   ~/Library/Application Support/tracklist/
    // Linux:   ~/.config/tracklist/
    // Windows: %APPDATA%/tracklist/

    #[cfg(target_os = "macos")]
    {
        let home = std::env::var("HOME").ok()?;
        Some(
            PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("tracklist"),
        )
    }

    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var("APPDATA").ok()?;
        Some(PathBuf::from(appdata).join("tracklist"))
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let home = std::env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".config").join("tracklist"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = Config::default();
        assert_eq!(c.endpoint_url, DEFAULT_ENDPOINT);
        assert_eq!(c.cover_size, 200);
        assert!(!c.hide_explicit);
        assert_eq!(c.sort_key, None);
        assert!(c.endpoint().is_ok());
        assert_eq!(c.http().timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "endpoint_url": "http://localhost:8080/tracks", "sort_key": "popularity", "extra": 1 }"#,
        )
        .unwrap();

        let c = Config::load_from(&path).unwrap();
        assert_eq!(c.endpoint_url, "http://localhost:8080/tracks");
        assert_eq!(c.sort_key, Some(SortKey::Popularity));
        assert_eq!(c.request_timeout_secs, 30);
        assert_eq!(c.cover_size, 200);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let c = Config {
            hide_explicit: true,
            sort_key: Some(SortKey::ReleaseDate),
            request_timeout_secs: 0,
            ..Config::default()
        };
        c.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, c);
        assert_eq!(loaded.http().timeout, None);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Json(_))));
        assert!(matches!(
            Config::load_from(&dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_invalid_endpoint() {
        let c = Config {
            endpoint_url: "not a url".into(),
            ..Config::default()
        };
        let err = c.endpoint().unwrap_err();
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_endpoint_override_from_args() {
        let mut c = Config::default();
        c.apply_args(["tracklist", "--verbose"].map(String::from));
        assert_eq!(c.endpoint_url, DEFAULT_ENDPOINT);

        c.apply_args(["tracklist", "--endpoint", "http://127.0.0.1:9000/x"].map(String::from));
        assert_eq!(c.endpoint_url, "http://127.0.0.1:9000/x");
    }
}
