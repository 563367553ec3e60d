//! Persisted dark/light preference

use crate::AppError;
use app_db::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const THEME_KEY: &str = "gallery.theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeFlag {
    #[default]
    Dark,
    Light,
}

impl ThemeFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeFlag::Dark => "dark",
            ThemeFlag::Light => "light",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "dark" => Some(ThemeFlag::Dark),
            "light" => Some(ThemeFlag::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeFlag::Dark => ThemeFlag::Light,
            ThemeFlag::Light => ThemeFlag::Dark,
        }
    }
}

/// Theme store
pub struct ThemeStore {
    flag: ThemeFlag,
    store: Arc<dyn KeyValueStore>,
}

impl ThemeStore {
    /// Read once at startup; `default` applies when nothing valid is stored
    pub fn load(store: Arc<dyn KeyValueStore>, default: ThemeFlag) -> Self {
        let flag = match store.get(THEME_KEY) {
            Ok(Some(raw)) => ThemeFlag::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Unknown stored theme {:?}", raw);
                default
            }),
            Ok(None) => default,
            Err(e) => {
                tracing::warn!("Failed to read theme: {}", e);
                default
            }
        };
        Self { flag, store }
    }

    pub fn flag(&self) -> ThemeFlag {
        self.flag
    }

    /// Flip and persist immediately
    pub fn toggle(&mut self) -> (ThemeFlag, Result<(), AppError>) {
        self.flag = self.flag.toggled();
        let saved = self
            .store
            .set(THEME_KEY, self.flag.as_str())
            .map_err(AppError::from);
        (self.flag, saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_db::MemoryStore;

    #[test]
    fn test_default_when_absent() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        assert_eq!(ThemeStore::load(store, ThemeFlag::Light).flag(), ThemeFlag::Light);
    }

    #[test]
    fn test_toggle_persists() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut theme = ThemeStore::load(store.clone(), ThemeFlag::Dark);

        let (flag, saved) = theme.toggle();
        assert_eq!(flag, ThemeFlag::Light);
        assert!(saved.is_ok());
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));

        let reloaded = ThemeStore::load(store, ThemeFlag::Dark);
        assert_eq!(reloaded.flag(), ThemeFlag::Light);
    }

    #[test]
    fn test_garbage_falls_back() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(ThemeStore::load(store, ThemeFlag::Dark).flag(), ThemeFlag::Dark);
    }
}
