use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_MODELS: [&str; 5] = ["auto", "gpt-4", "gpt-3.5-turbo", "claude-3-opus", "gemini-pro"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed for simulated outcomes; random when absent
    pub seed: Option<u64>,

    /// Seconds between background activity ticks
    pub activity_interval_secs: u64,

    /// UI redraw / scheduler pump interval
    pub tick_ms: u64,

    /// Routing targets offered in chat, "auto" included
    pub models: Vec<String>,

    pub default_model: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            activity_interval_secs: 10,
            tick_ms: 200,
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            default_model: None,
        }
    }
}

impl Config {
    pub fn activity_interval(&self) -> Duration {
        Duration::from_secs(self.activity_interval_secs.max(1))
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms.clamp(16, 1000))
    }

    /// Models offered in the chat selector, always starting with "auto".
    pub fn routing_targets(&self) -> Vec<String> {
        let mut out = vec!["auto".to_string()];
        for model in &self.models {
            let model = model.trim();
            if model.is_empty() || out.iter().any(|m| m.eq_ignore_ascii_case(model)) {
                continue;
            }
            out.push(model.to_string());
        }
        out
    }
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    load_from(&path)
}

/// Missing or malformed files fall back to defaults.
pub fn load_from(path: &Path) -> Config {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    parse(&content)
}

pub fn parse(content: &str) -> Config {
    toml::from_str::<Config>(content).unwrap_or_default()
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("ROUTERBOARD_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("routerboard").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("routerboard").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "routerboard", "routerboard")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("routerboard"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("routerboard"));
    }
    directories::ProjectDirs::from("io", "routerboard", "routerboard")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn prefs_db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("prefs.sqlite3"))
}

pub fn log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("routerboard.log"))
}

/// Create (truncate) the log file, making its directory first.
pub fn create_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    File::create(path).with_context(|| format!("creating {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = parse("seed = 42\nactivity_interval_secs = 3\n");
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.activity_interval(), Duration::from_secs(3));
        assert_eq!(config.tick_ms, 200);
        assert_eq!(config.models.len(), 5);
    }

    #[test]
    fn test_malformed_config_falls_back() {
        let config = parse("seed = \"not a number\"");
        assert_eq!(config.seed, None);
        assert_eq!(config.activity_interval_secs, 10);
    }

    #[test]
    fn test_routing_targets_dedup_and_lead_with_auto() {
        let config = parse("models = [\"gpt-4\", \"AUTO\", \" \", \"gpt-4\", \"mistral\"]");
        assert_eq!(config.routing_targets(), vec!["auto", "gpt-4", "mistral"]);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("nope.toml"));
        assert_eq!(config.tick_rate(), Duration::from_millis(200));
    }

    #[test]
    fn test_create_log_file_makes_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("routerboard.log");
        create_log_file(&path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_create_log_file_reports_blocked_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = create_log_file(&blocker.join("routerboard.log")).unwrap_err();
        assert!(format!("{err:#}").contains("blocker"));
    }
}
