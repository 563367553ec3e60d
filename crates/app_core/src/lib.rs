//! Galleria Core Domain Logic
//!
//! This crate contains:
//! - Catalog and filter/sort engine
//! - Pagination, lightbox and slideshow state
//! - Favorites and theme persistence
//! - Application state controller and event bus
//! - Configuration, commands and error types
//! - Image loading and downloads

pub mod catalog;
pub mod command;
pub mod config;
pub mod download;
pub mod error;
pub mod events;
pub mod favorites;
pub mod image_loader;
pub mod lightbox;
pub mod pagination;
pub mod query;
pub mod state;
pub mod theme;
pub mod timer;
pub mod toast;

pub use catalog::{Catalog, Category, ImageRecord};
pub use command::{Command, CommandId};
pub use config::{AppConfig, DownloadConfig, GalleryConfig, GeneralConfig, ViewerConfig};
pub use download::{
    download, file_name_for, DownloadOutcome, DownloadRequest, ExternalOpener, Fetcher,
    HttpFetcher, SystemOpener,
};
pub use error::AppError;
pub use events::{EventBus, GalleryEvent};
pub use favorites::Favorites;
pub use image_loader::{ImageKind, ImageLoader, LoadResult, LoadedImage};
pub use lightbox::{FullscreenSurface, Lightbox, LightboxState};
pub use pagination::Pagination;
pub use query::{CategoryFilter, FilteredList, Query, SortMode};
pub use state::{Action, GalleryState};
pub use theme::{ThemeFlag, ThemeStore};
pub use timer::{Debouncer, RepeatingTimer};
pub use toast::{Toast, ToastKind, Toasts};
