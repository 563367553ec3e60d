//! Favorites: an insertion-ordered id set mirrored to durable storage

use crate::AppError;
use app_db::KeyValueStore;
use std::sync::Arc;

pub const FAVORITES_KEY: &str = "gallery.favorites";

/// Favorites store
pub struct Favorites {
    ids: Vec<String>,
    store: Arc<dyn KeyValueStore>,
}

impl Favorites {
    /// Hydrate from storage. Missing or unreadable data yields an empty set.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let ids = match store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => parse_ids(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read favorites from {}: {}", store.backend(), e);
                Vec::new()
            }
        };

        tracing::debug!("Loaded {} favorites", ids.len());
        Self { ids, store }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|f| f == id)
    }

    /// Ids in the order they were favorited
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Flip membership and persist. Returns the new membership; the
    /// in-memory change stands even if the write fails.
    pub fn toggle(&mut self, id: &str) -> (bool, Result<(), AppError>) {
        let favorite = match self.ids.iter().position(|f| f == id) {
            Some(pos) => {
                self.ids.remove(pos);
                false
            }
            None => {
                self.ids.push(id.to_string());
                true
            }
        };
        (favorite, self.persist())
    }

    /// Write the current set to storage
    pub fn persist(&self) -> Result<(), AppError> {
        let raw = serde_json::to_string(&self.ids)
            .map_err(|e| AppError::Storage(e.to_string()))?;
        self.store.set(FAVORITES_KEY, &raw)?;
        Ok(())
    }
}

/// Accepts a JSON array of strings; numbers are tolerated and stringified
fn parse_ids(raw: &str) -> Vec<String> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(e) => {
            tracing::warn!("Ignoring corrupt favorites data: {}", e);
            return Vec::new();
        }
    };

    let mut ids: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let id = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            other => {
                tracing::warn!("Skipping favorite entry {}", other);
                continue;
            }
        };
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}
