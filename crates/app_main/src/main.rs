//! Galleria - Desktop Image Gallery
//!
//! Main entry point.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;

use anyhow::Result;
use app_core::{AppConfig, Catalog};
use app_db::{KeyValueStore, MemoryStore};
use std::sync::Arc;

fn main() -> Result<()> {
    // Initialize logging and panic hook first
    let _log_guard = app_log::init()?;

    // Clean up old logs (7 days)
    if let Err(e) = app_log::cleanup_old_logs(7) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("Galleria {} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Invalid configuration, using defaults: {}", e);
        AppConfig::default()
    });

    // First run: write the defaults out so they can be edited
    if !AppConfig::config_path().exists() {
        if let Err(e) = config.save() {
            tracing::warn!("Failed to write default configuration: {}", e);
        }
    }

    let catalog = match &config.gallery.catalog_path {
        Some(path) => Catalog::from_file(path)?,
        None => Catalog::builtin()?,
    };

    // Durable storage, or a session-only store if the database is unusable
    let (store, storage_warning): (Arc<dyn KeyValueStore>, Option<&str>) = match app_db::init() {
        Ok(store) => (Arc::new(store), None),
        Err(e) => {
            tracing::warn!("Failed to initialize database: {}. Running without persistence.", e);
            (
                Arc::new(MemoryStore::new()),
                Some("Favorites and theme will not be saved this session"),
            )
        }
    };

    // Run the application
    app::run(config, catalog, store, storage_warning)
}
