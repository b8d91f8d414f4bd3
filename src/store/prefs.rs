use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{RouterSettings, Theme};

const THEME_KEY: &str = "theme";
const SETTINGS_KEY: &str = "settings";

/// Key/value preferences that survive restarts (theme, router settings)
#[derive(Debug)]
pub struct PreferenceStore {
    conn: Connection,
}

impl PreferenceStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("open db {}", path.display()))?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory().context("open in-memory db")?,
        };
        store.init()?;
        Ok(store)
    }

    // === Theme ===

    /// Stored theme, `light` when nothing (or something unrecognized) is stored.
    pub fn load_theme(&self) -> Result<Theme> {
        let stored = self.get(THEME_KEY)?;
        Ok(stored
            .as_deref()
            .and_then(Theme::parse)
            .unwrap_or_default())
    }

    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        self.set(THEME_KEY, theme.as_str())
    }

    // === Router settings ===

    pub fn load_settings(&self) -> Result<Option<RouterSettings>> {
        let Some(raw) = self.get(SETTINGS_KEY)? else {
            return Ok(None);
        };
        let settings = serde_json::from_str(&raw).context("decode stored settings")?;
        Ok(Some(settings))
    }

    pub fn save_settings(&self, settings: &RouterSettings) -> Result<()> {
        let raw = serde_json::to_string(settings).context("encode settings")?;
        self.set(SETTINGS_KEY, &raw)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO preferences(key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS preferences (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RoutingStrategy;

    #[test]
    fn test_theme_defaults_to_light() {
        let store = PreferenceStore::open_in_memory().unwrap();
        assert_eq!(store.load_theme().unwrap(), Theme::Light);
    }

    #[test]
    fn test_theme_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.sqlite3");
        {
            let store = PreferenceStore::open(&path).unwrap();
            store.save_theme(Theme::Dark).unwrap();
        }
        let store = PreferenceStore::open(&path).unwrap();
        assert_eq!(store.load_theme().unwrap(), Theme::Dark);
    }

    #[test]
    fn test_settings_round_trip() {
        let store = PreferenceStore::open_in_memory().unwrap();
        assert!(store.load_settings().unwrap().is_none());

        let settings = RouterSettings {
            routing_strategy: RoutingStrategy::Cost,
            retry_attempts: 5,
            ..RouterSettings::default()
        };
        store.save_settings(&settings).unwrap();
        assert_eq!(store.load_settings().unwrap(), Some(settings));
    }
}
