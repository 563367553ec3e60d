//! Background image fetching and decoding
//!
//! Requests run on the tokio runtime; decoded RGBA buffers come back to the
//! UI thread over a crossbeam channel and are drained once per frame.

use crate::catalog::ImageRecord;
use crate::download::Fetcher;
use crate::AppError;
use crossbeam_channel::{unbounded, Receiver, Sender};
use image::{GenericImageView, ImageReader};
use std::collections::HashSet;
use std::io::Cursor;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Longest edge of a full-size lightbox texture
const FULL_MAX_EDGE: u32 = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Thumbnail,
    Full,
}

/// Decoded RGBA8 image
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

#[derive(Debug)]
pub struct LoadResult {
    pub id: String,
    pub kind: ImageKind,
    pub image: Result<LoadedImage, AppError>,
}

type Notify = Arc<dyn Fn() + Send + Sync>;

/// Image loader service
pub struct ImageLoader {
    runtime: Handle,
    fetcher: Arc<dyn Fetcher>,
    thumbnail_size: u32,
    tx: Sender<LoadResult>,
    rx: Receiver<LoadResult>,
    requested: HashSet<(String, ImageKind)>,
    notify: Option<Notify>,
}

impl ImageLoader {
    pub fn new(runtime: Handle, fetcher: Arc<dyn Fetcher>, thumbnail_size: u32) -> Self {
        let (tx, rx) = unbounded();
        Self {
            runtime,
            fetcher,
            thumbnail_size: thumbnail_size.max(16),
            tx,
            rx,
            requested: HashSet::new(),
            notify: None,
        }
    }

    /// Called from the worker after each result is queued
    pub fn with_notify(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notify = Some(Arc::new(notify));
        self
    }

    /// Queue a load unless one for the same image and kind is already known.
    /// Returns whether a new request was started.
    pub fn request(&mut self, record: &ImageRecord, kind: ImageKind) -> bool {
        if !self.requested.insert((record.id.clone(), kind)) {
            return false;
        }

        let id = record.id.clone();
        let url = record.url.clone();
        let max_edge = match kind {
            ImageKind::Thumbnail => self.thumbnail_size,
            ImageKind::Full => FULL_MAX_EDGE,
        };
        let fetcher = self.fetcher.clone();
        let tx = self.tx.clone();
        let notify = self.notify.clone();

        self.runtime.spawn(async move {
            let image = match fetcher.fetch(&url).await {
                Ok(bytes) => tokio::task::spawn_blocking(move || decode(&bytes, max_edge))
                    .await
                    .unwrap_or_else(|e| Err(AppError::ImageDecode(e.to_string()))),
                Err(e) => Err(e),
            };
            if let Err(e) = &image {
                tracing::warn!("Failed to load {} ({:?}): {}", url, kind, e);
            }

            if tx.send(LoadResult { id, kind, image }).is_ok() {
                if let Some(notify) = notify {
                    notify();
                }
            }
        });
        true
    }

    /// Allow a failed image to be requested again
    pub fn forget(&mut self, id: &str, kind: ImageKind) {
        self.requested.remove(&(id.to_string(), kind));
    }

    /// Results that arrived since the last call
    pub fn drain(&self) -> Vec<LoadResult> {
        self.rx.try_iter().collect()
    }
}

/// Decode and shrink so neither edge exceeds `max_edge`
pub fn decode(bytes: &[u8], max_edge: u32) -> Result<LoadedImage, AppError> {
    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AppError::ImageDecode(e.to_string()))?
        .decode()?;

    let (w, h) = img.dimensions();
    let img = if w > max_edge || h > max_edge {
        img.thumbnail(max_edge, max_edge)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(LoadedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}
