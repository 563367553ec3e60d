//! Application configuration

use crate::command::CommandId;
use crate::query::SortMode;
use crate::theme::ThemeFlag;
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub gallery: GalleryConfig,
    pub viewer: ViewerConfig,
    pub download: DownloadConfig,
    pub keybindings: HashMap<String, Vec<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            gallery: GalleryConfig::default(),
            viewer: ViewerConfig::default(),
            download: DownloadConfig::default(),
            keybindings: default_keybindings(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Theme used until the user toggles one
    pub default_theme: ThemeFlag,
    /// Show the favorites sidebar at startup
    pub show_favorites: bool,
    pub toast_duration_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_theme: ThemeFlag::Dark,
            show_favorites: false,
            toast_duration_ms: 2500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Items appended per "load more"
    pub page_size: usize,
    pub search_debounce_ms: u64,
    pub default_sort: SortMode,
    /// Replace the built-in catalog with a JSON file
    pub catalog_path: Option<PathBuf>,
    pub thumbnail_size: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            page_size: 8,
            search_debounce_ms: 220,
            default_sort: SortMode::Newest,
            catalog_path: None,
            thumbnail_size: 256,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub slideshow_interval_ms: u64,
    pub background_color: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            slideshow_interval_ms: 3000,
            background_color: "#000000D8".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Target directory; the user's Downloads folder when unset
    pub directory: Option<PathBuf>,
}

impl DownloadConfig {
    pub fn resolved_directory(&self) -> PathBuf {
        self.directory
            .clone()
            .or_else(|| UserDirs::new().and_then(|d| d.download_dir().map(Path::to_path_buf)))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl AppConfig {
    /// Load configuration from the default location
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults when absent
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::info!("Configuration loaded from {:?}", path);
            Ok(config.sanitized())
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "Galleria", "Galleria")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }

    /// Clamp values that would make the gallery unusable
    fn sanitized(mut self) -> Self {
        if self.gallery.page_size == 0 {
            tracing::warn!("gallery.page_size must be positive, using 8");
            self.gallery.page_size = 8;
        }
        self.viewer.slideshow_interval_ms = self.viewer.slideshow_interval_ms.max(250);
        self
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.gallery.search_debounce_ms)
    }

    pub fn slideshow_interval(&self) -> Duration {
        Duration::from_millis(self.viewer.slideshow_interval_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.general.toast_duration_ms)
    }
}

fn default_keybindings() -> HashMap<String, Vec<String>> {
    let mut kb = HashMap::new();

    // Lightbox (only while open)
    kb.insert(CommandId::LIGHTBOX_NEXT.into(), vec!["Right".into()]);
    kb.insert(CommandId::LIGHTBOX_PREV.into(), vec!["Left".into()]);
    kb.insert(CommandId::LIGHTBOX_CLOSE.into(), vec!["Escape".into()]);
    kb.insert(CommandId::LIGHTBOX_SLIDESHOW.into(), vec!["Space".into()]);

    // App
    kb.insert(CommandId::APP_EXIT.into(), vec!["Ctrl+q".into()]);

    kb
}
