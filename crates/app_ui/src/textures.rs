//! egui texture cache fed by the background image loader

use app_core::{ImageKind, ImageLoader, ImageRecord, LoadResult};
use egui::{ColorImage, TextureHandle, TextureId, TextureOptions, Vec2};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextureSlot {
    Loading,
    Ready { id: TextureId, size: Vec2 },
    Failed,
}

enum Entry {
    Loading,
    Ready(TextureHandle),
    Failed,
}

/// Textures keyed by image id and kind; misses start a background load
pub struct TextureCache {
    loader: ImageLoader,
    entries: HashMap<(String, ImageKind), Entry>,
}

impl TextureCache {
    pub fn new(loader: ImageLoader) -> Self {
        Self {
            loader,
            entries: HashMap::new(),
        }
    }

    /// Upload everything the loader finished since the last frame
    pub fn pump(&mut self, ctx: &egui::Context) {
        for LoadResult { id, kind, image } in self.loader.drain() {
            let entry = match image {
                Ok(image) => {
                    let color = ColorImage::from_rgba_unmultiplied(
                        [image.width as usize, image.height as usize],
                        &image.pixels,
                    );
                    let name = format!("{}-{:?}", id, kind);
                    Entry::Ready(ctx.load_texture(name, color, TextureOptions::LINEAR))
                }
                Err(_) => Entry::Failed,
            };
            self.entries.insert((id, kind), entry);
        }
    }

    pub fn get(&mut self, record: &ImageRecord, kind: ImageKind) -> TextureSlot {
        let key = (record.id.clone(), kind);
        if !self.entries.contains_key(&key) {
            self.loader.request(record, kind);
            self.entries.insert(key.clone(), Entry::Loading);
        }

        match self.entries.get(&key) {
            Some(Entry::Ready(texture)) => TextureSlot::Ready {
                id: texture.id(),
                size: texture.size_vec2(),
            },
            Some(Entry::Failed) => TextureSlot::Failed,
            _ => TextureSlot::Loading,
        }
    }

    /// Drop failed loads for `record` so the next `get` fetches again
    pub fn retry_failed(&mut self, record: &ImageRecord) {
        for kind in [ImageKind::Thumbnail, ImageKind::Full] {
            let key = (record.id.clone(), kind);
            if matches!(self.entries.get(&key), Some(Entry::Failed)) {
                tracing::debug!("Retrying {} ({:?})", record.id, kind);
                self.entries.remove(&key);
                self.loader.forget(&record.id, kind);
            }
        }
    }

    /// Full image if loaded, otherwise the thumbnail while it loads
    pub fn best(&mut self, record: &ImageRecord) -> TextureSlot {
        let full_ready = matches!(self.get(record, ImageKind::Full), TextureSlot::Ready { .. });
        let kind = if full_ready {
            ImageKind::Full
        } else {
            ImageKind::Thumbnail
        };
        self.get(record, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_core::{Catalog, HttpFetcher};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn wait_for_failure(cache: &mut TextureCache, ctx: &egui::Context, record: &ImageRecord) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            cache.pump(ctx);
            if cache.get(record, ImageKind::Full) == TextureSlot::Failed {
                return true;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn test_failed_image_can_be_retried() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let loader = ImageLoader::new(
            runtime.handle().clone(),
            Arc::new(HttpFetcher::new().unwrap()),
            64,
        );
        let mut cache = TextureCache::new(loader);
        let ctx = egui::Context::default();

        let catalog = Catalog::builtin().unwrap();
        let mut record = catalog.at(0).unwrap().clone();
        record.url = "file:///nonexistent/galleria/missing.png".into();

        assert_eq!(cache.get(&record, ImageKind::Full), TextureSlot::Loading);
        assert!(wait_for_failure(&mut cache, &ctx, &record));

        // Failures stick until retried
        cache.pump(&ctx);
        assert_eq!(cache.get(&record, ImageKind::Full), TextureSlot::Failed);

        cache.retry_failed(&record);
        assert_eq!(cache.get(&record, ImageKind::Full), TextureSlot::Loading);
        assert!(wait_for_failure(&mut cache, &ctx, &record));
    }
}
