// Local configuration for reqbook.
//
// Global config: `~/.reqbook/config.toml`
// Global request state: `~/.reqbook/state.json`
// Project store: `<project>/.reqbook/requests.json`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_PROJECT_STORE: &str = ".reqbook/requests.json";
const DEFAULT_LOG_FILTER: &str = "info";

/// Root directory for reqbook global state: `~/.reqbook/`.
pub fn global_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".reqbook"))
}

/// Path to the global config file: `~/.reqbook/config.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    global_dir().map(|d| d.join("config.toml"))
}

/// Path to the default global state file: `~/.reqbook/state.json`.
pub fn default_state_path() -> Option<PathBuf> {
    global_dir().map(|d| d.join("state.json"))
}

/// Configuration at `~/.reqbook/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Override for the global state file.
    pub state_path: Option<PathBuf>,
    /// Project store location, relative to the project root.
    pub project_store: PathBuf,
    /// Entries that mark a directory as a project root.
    pub project_markers: Vec<String>,
    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_path: None,
            project_store: PathBuf::from(DEFAULT_PROJECT_STORE),
            project_markers: vec![".reqbook".into(), ".git".into()],
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

impl Config {
    /// Load from `~/.reqbook/config.toml`. Returns defaults if the file
    /// doesn't exist or can't be parsed.
    pub fn load() -> Self {
        global_config_path().and_then(|p| Self::load_from(&p).ok()).unwrap_or_default()
    }

    /// Load from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Global state file, honoring the `state_path` override.
    pub fn state_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.state_path {
            Some(path) => Ok(path.clone()),
            None => default_state_path().ok_or(ConfigError::NoHomeDir),
        }
    }

    /// Walk up from `start` to the first directory containing a project marker.
    pub fn discover_project_root(&self, start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| self.project_markers.iter().any(|marker| dir.join(marker).exists()))
            .map(Path::to_path_buf)
    }
}

// ── Errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not determine home directory")]
    NoHomeDir,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_defaults() {
        let cfg = Config::default();
        assert!(cfg.state_path.is_none());
        assert_eq!(cfg.project_store, PathBuf::from(".reqbook/requests.json"));
        assert_eq!(cfg.project_markers, vec![".reqbook".to_string(), ".git".to_string()]);
        assert_eq!(cfg.log_filter, "info");
    }

    #[test]
    fn config_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config {
            state_path: Some(dir.path().join("state.json")),
            project_store: PathBuf::from(".vscode/requests.json"),
            project_markers: vec!["Cargo.toml".into()],
            log_filter: "reqbook_core=debug".into(),
        };
        std::fs::write(&path, toml::to_string_pretty(&cfg).unwrap()).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn config_parse_from_toml() {
        let toml_str = r#"
state_path = "/tmp/reqbook-state.json"
project_store = "requests/saved.json"
log_filter = "warn"
"#;
        let cfg: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.state_path, Some(PathBuf::from("/tmp/reqbook-state.json")));
        assert_eq!(cfg.project_store, PathBuf::from("requests/saved.json"));
        assert_eq!(cfg.log_filter, "warn");
        assert_eq!(cfg.project_markers, Config::default().project_markers); // default
    }

    #[test]
    fn config_missing_fields_use_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn config_load_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = Config::load_from(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn state_path_override_wins() {
        let cfg = Config { state_path: Some(PathBuf::from("/x/state.json")), ..Config::default() };
        assert_eq!(cfg.state_path().unwrap(), PathBuf::from("/x/state.json"));
    }

    #[test]
    fn discover_project_root_finds_nearest_marker() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("app");
        let nested = root.join("src").join("handlers");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::create_dir_all(root.join(".reqbook")).unwrap();

        let cfg = Config { project_markers: vec![".reqbook".into()], ..Config::default() };
        assert_eq!(cfg.discover_project_root(&nested), Some(root));
    }

    #[test]
    fn discover_project_root_without_marker_is_none() {
        let dir = TempDir::new().unwrap();
        let cfg = Config {
            project_markers: vec!["definitely-not-a-marker-7f3a".into()],
            ..Config::default()
        };
        assert_eq!(cfg.discover_project_root(dir.path()), None);
    }

    #[test]
    fn global_dir_is_under_home() {
        let dir = global_dir().expect("home dir should resolve");
        assert!(dir.ends_with(".reqbook"));
    }
}
