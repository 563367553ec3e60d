//! Command system for user actions

use serde::{Deserialize, Serialize};

/// Command identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandId(pub String);

impl CommandId {
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Commands that only apply while the lightbox is showing
    pub fn is_lightbox(&self) -> bool {
        self.0.starts_with("lightbox.")
    }

    // Lightbox commands
    pub const LIGHTBOX_NEXT: &'static str = "lightbox.next";
    pub const LIGHTBOX_PREV: &'static str = "lightbox.prev";
    pub const LIGHTBOX_CLOSE: &'static str = "lightbox.close";
    pub const LIGHTBOX_SLIDESHOW: &'static str = "lightbox.slideshow";
    pub const LIGHTBOX_FAVORITE: &'static str = "lightbox.favorite";
    pub const LIGHTBOX_DOWNLOAD: &'static str = "lightbox.download";
    pub const LIGHTBOX_FULLSCREEN: &'static str = "lightbox.fullscreen";

    // Gallery commands
    pub const GALLERY_LOAD_MORE: &'static str = "gallery.load_more";

    // App commands
    pub const APP_TOGGLE_THEME: &'static str = "app.toggle_theme";
    pub const APP_TOGGLE_FAVORITES: &'static str = "app.toggle_favorites";
    pub const APP_EXIT: &'static str = "app.exit";
}

/// A user action resolved from input
#[derive(Debug, Clone)]
pub struct Command {
    pub id: CommandId,
}

impl Command {
    pub fn new(id: &str) -> Self {
        Self {
            id: CommandId::new(id),
        }
    }
}
