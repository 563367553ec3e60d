//! Application state controller
//!
//! `GalleryState` owns every piece of mutable gallery state. Views read from
//! it and request changes through its methods; each change is announced on
//! the event bus so views only refresh what they cache.

use crate::catalog::{Catalog, ImageRecord};
use crate::command::{Command, CommandId};
use crate::config::AppConfig;
use crate::download::{DownloadOutcome, DownloadRequest};
use crate::events::{EventBus, GalleryEvent};
use crate::favorites::Favorites;
use crate::lightbox::{self, FullscreenSurface, Lightbox};
use crate::pagination::Pagination;
use crate::query::{self, CategoryFilter, FilteredList, Query, SortMode};
use crate::theme::{ThemeFlag, ThemeStore};
use crate::timer::Debouncer;
use crate::toast::{ToastKind, Toasts};
use app_db::KeyValueStore;
use crossbeam_channel::Receiver;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Work a command needs from outside the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Download(DownloadRequest),
    ToggleFullscreen,
    Exit,
}

/// Main application state
pub struct GalleryState {
    catalog: Catalog,
    query: Query,
    filtered: FilteredList,
    pagination: Pagination,
    lightbox: Lightbox,
    favorites: Favorites,
    theme: ThemeStore,
    toasts: Toasts,
    bus: EventBus,
    /// Text currently in the search box; `query.search` lags behind it
    search_text: String,
    search_debounce: Debouncer<String>,
    sidebar_visible: bool,
    download_dir: PathBuf,
}

impl GalleryState {
    pub fn new(catalog: Catalog, config: &AppConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let query = Query {
            sort: config.gallery.default_sort,
            ..Query::default()
        };

        let mut state = Self {
            catalog,
            query,
            filtered: FilteredList::default(),
            pagination: Pagination::new(config.gallery.page_size),
            lightbox: Lightbox::new(config.slideshow_interval()),
            favorites: Favorites::load(store.clone()),
            theme: ThemeStore::load(store, config.general.default_theme),
            toasts: Toasts::new(config.toast_duration()),
            bus: EventBus::new(),
            search_text: String::new(),
            search_debounce: Debouncer::new(config.search_debounce()),
            sidebar_visible: config.general.show_favorites,
            download_dir: config.download.resolved_directory(),
        };
        state.refilter();

        tracing::info!(
            "Gallery ready: {} images, {} favorites, {} theme",
            state.catalog.len(),
            state.favorites.len(),
            state.theme.flag().as_str()
        );
        state
    }

    pub fn subscribe(&mut self) -> Receiver<GalleryEvent> {
        self.bus.subscribe()
    }

    // ===== Read access =====

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn filtered(&self) -> &FilteredList {
        &self.filtered
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Number of filtered items currently shown in the grid
    pub fn rendered(&self) -> usize {
        self.pagination.rendered(self.filtered.len())
    }

    /// Whether the "load more" control is visible
    pub fn has_more(&self) -> bool {
        self.pagination.has_more(self.filtered.len())
    }

    /// Rendered grid items with their filtered index
    pub fn visible_records(&self) -> impl Iterator<Item = (usize, &ImageRecord)> + '_ {
        self.filtered.records(&self.catalog).take(self.rendered()).enumerate()
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    /// Record shown in the lightbox
    pub fn current_record(&self) -> Option<&ImageRecord> {
        self.lightbox
            .index()
            .and_then(|i| self.filtered.record(&self.catalog, i))
    }

    pub fn counter_text(&self) -> Option<String> {
        self.lightbox
            .index()
            .map(|i| lightbox::counter_text(i, self.filtered.len()))
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    /// Favorited records in insertion order; ids missing from the catalog are skipped
    pub fn favorite_records(&self) -> Vec<&ImageRecord> {
        self.favorites
            .ids()
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .collect()
    }

    pub fn theme(&self) -> ThemeFlag {
        self.theme.flag()
    }

    pub fn sidebar_visible(&self) -> bool {
        self.sidebar_visible
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    // ===== Filter / search / sort =====

    pub fn set_category(&mut self, category: CategoryFilter) {
        if let Some(search) = self.search_debounce.flush() {
            self.query.search = search;
        }
        self.query.category = category;
        self.refilter();
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        if let Some(search) = self.search_debounce.flush() {
            self.query.search = search;
        }
        self.query.sort = sort;
        self.refilter();
    }

    /// Record a keystroke; the filter runs once typing pauses
    pub fn search_input(&mut self, text: &str, now: Instant) {
        if text == self.search_text {
            return;
        }
        self.search_text = text.to_string();
        self.search_debounce.schedule(self.search_text.clone(), now);
    }

    /// Recompute the filtered list and restart the grid at page 0
    fn refilter(&mut self) {
        self.filtered = query::apply(&self.catalog, &self.query);
        self.pagination.reset();
        let total = self.filtered.len();
        tracing::debug!(query = ?self.query, total, "refilter");

        // Keep an open lightbox pointing inside the new list. The index may
        // now name a different record, so views are told either way.
        if let Some(index) = self.lightbox.index() {
            if total == 0 {
                self.close_lightbox();
            } else {
                self.open_lightbox(index.min(total - 1));
            }
        }

        self.bus.publish(GalleryEvent::FilterChanged { total });
        self.load_more();
    }

    // ===== Pagination =====

    /// Append the next page; returns the newly rendered range
    pub fn load_more(&mut self) -> Range<usize> {
        let range = self.pagination.append_page(self.filtered.len());
        if !range.is_empty() {
            self.bus.publish(GalleryEvent::PageAppended { range: range.clone() });
        }
        range
    }

    /// The near-bottom sentinel scrolled into view
    pub fn sentinel_visible(&mut self) -> bool {
        if self.has_more() {
            !self.load_more().is_empty()
        } else {
            false
        }
    }

    // ===== Lightbox =====

    pub fn open_lightbox(&mut self, index: usize) -> bool {
        let opened = self.lightbox.open(index, self.filtered.len());
        if opened {
            self.announce_position(index);
        }
        opened
    }

    pub fn next(&mut self) -> Option<usize> {
        let index = self.lightbox.next(self.filtered.len())?;
        self.announce_position(index);
        Some(index)
    }

    pub fn prev(&mut self) -> Option<usize> {
        let index = self.lightbox.prev(self.filtered.len())?;
        self.announce_position(index);
        Some(index)
    }

    /// Tell views which record the lightbox now shows
    fn announce_position(&mut self, index: usize) {
        if let Some(record) = self.filtered.record(&self.catalog, index) {
            let id = record.id.clone();
            self.bus.publish(GalleryEvent::LightboxOpened { index, id });
        }
    }

    /// Close from any path (button, Escape, overlay click). Stops the slideshow.
    pub fn close_lightbox(&mut self) -> bool {
        let was_playing = self.lightbox.is_playing();
        if !self.lightbox.close() {
            return false;
        }
        if was_playing {
            self.bus.publish(GalleryEvent::SlideshowChanged { playing: false });
        }
        self.bus.publish(GalleryEvent::LightboxClosed);
        true
    }

    pub fn toggle_slideshow(&mut self, now: Instant) -> Option<bool> {
        let playing = self.lightbox.toggle_slideshow(now)?;
        self.bus.publish(GalleryEvent::SlideshowChanged { playing });
        Some(playing)
    }

    pub fn toggle_fullscreen(&mut self, surface: &dyn FullscreenSurface, now: Instant) {
        if let Err(e) = self.lightbox.toggle_fullscreen(surface) {
            tracing::warn!("Fullscreen toggle failed: {}", e);
            self.toasts.push(e.user_message(), ToastKind::Warning, now);
        }
    }

    /// Download request for the image in the lightbox
    pub fn download_request(&self) -> Option<DownloadRequest> {
        self.current_record()
            .map(|r| DownloadRequest::new(&r.title, &r.url))
    }

    pub fn finish_download(&mut self, outcome: DownloadOutcome, now: Instant) {
        match outcome {
            DownloadOutcome::Saved(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                self.toasts.push(format!("Saved {}", name), ToastKind::Success, now);
            }
            DownloadOutcome::FallbackOpened(_) => {
                self.toasts.push(
                    "Opened the image externally; you may need to save it manually",
                    ToastKind::Info,
                    now,
                );
            }
            DownloadOutcome::Failed(message) => {
                self.toasts.push(format!("Download failed: {}", message), ToastKind::Error, now);
            }
        }
    }

    // ===== Favorites =====

    /// The one place favorites change; every surface calls this
    pub fn toggle_favorite(&mut self, id: &str, now: Instant) -> bool {
        let (favorite, saved) = self.favorites.toggle(id);
        if let Err(e) = saved {
            tracing::warn!("Failed to persist favorites: {}", e);
            self.toasts.push(e.user_message(), ToastKind::Warning, now);
        }
        self.bus.publish(GalleryEvent::FavoriteChanged {
            id: id.to_string(),
            favorite,
        });
        favorite
    }

    pub fn toggle_current_favorite(&mut self, now: Instant) -> Option<bool> {
        let id = self.current_record()?.id.clone();
        Some(self.toggle_favorite(&id, now))
    }

    /// Open a sidebar favorite in the lightbox. An item outside the current
    /// filtered list opens position 0 instead (known limitation).
    pub fn open_from_favorites(&mut self, id: &str) -> Option<usize> {
        let index = self.filtered.index_of(&self.catalog, id).unwrap_or(0);
        self.open_lightbox(index).then_some(index)
    }

    // ===== Theme / chrome =====

    pub fn toggle_theme(&mut self, now: Instant) -> ThemeFlag {
        let (flag, saved) = self.theme.toggle();
        if let Err(e) = saved {
            tracing::warn!("Failed to persist theme: {}", e);
            self.toasts.push(e.user_message(), ToastKind::Warning, now);
        }
        self.bus.publish(GalleryEvent::ThemeChanged(flag));
        flag
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_visible = !self.sidebar_visible;
        self.sidebar_visible
    }

    pub fn notify(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        self.toasts.push(message, kind, now);
    }

    // ===== Scheduling =====

    /// Run every scheduled task that is due
    pub fn tick(&mut self, now: Instant) {
        if let Some(search) = self.search_debounce.poll(now) {
            self.query.search = search;
            self.refilter();
        }

        if let Some(index) = self.lightbox.poll_slideshow(now, self.filtered.len()) {
            self.announce_position(index);
        }

        self.toasts.prune(now);
    }

    /// Earliest instant at which `tick` has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.search_debounce.due_at(),
            self.lightbox.next_slideshow_tick(),
            self.toasts.next_expiry(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    // ===== Commands =====

    /// Apply a bound command. Lightbox commands are ignored while closed.
    pub fn execute(&mut self, command: &Command, now: Instant) -> Option<Action> {
        if command.id.is_lightbox() && !self.lightbox.is_open() {
            return None;
        }

        match command.id.as_str() {
            CommandId::LIGHTBOX_NEXT => {
                self.next();
            }
            CommandId::LIGHTBOX_PREV => {
                self.prev();
            }
            CommandId::LIGHTBOX_CLOSE => {
                self.close_lightbox();
            }
            CommandId::LIGHTBOX_SLIDESHOW => {
                self.toggle_slideshow(now);
            }
            CommandId::LIGHTBOX_FAVORITE => {
                self.toggle_current_favorite(now);
            }
            CommandId::LIGHTBOX_DOWNLOAD => return self.download_request().map(Action::Download),
            CommandId::LIGHTBOX_FULLSCREEN => return Some(Action::ToggleFullscreen),
            CommandId::GALLERY_LOAD_MORE => {
                self.load_more();
            }
            CommandId::APP_TOGGLE_THEME => {
                self.toggle_theme(now);
            }
            CommandId::APP_TOGGLE_FAVORITES => {
                self.toggle_sidebar();
            }
            CommandId::APP_EXIT => return Some(Action::Exit),
            other => tracing::warn!("Unknown command: {}", other),
        }
        None
    }

    /// Final write of durable state
    pub fn shutdown(&mut self) {
        if let Err(e) = self.favorites.persist() {
            tracing::error!("Failed to persist favorites on shutdown: {}", e);
        }
        self.close_lightbox();
    }
}
