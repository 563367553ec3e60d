//! UI Components
//!
//! The grid, lightbox and sidebar each subscribe to the gallery event bus
//! and keep only the view state they need.

pub mod grid;
pub mod lightbox;
pub mod sidebar;
pub mod toast;
pub mod toolbar;

pub use grid::{GalleryGrid, GridAction};
pub use lightbox::{LightboxAction, LightboxView};
pub use sidebar::{FavoritesSidebar, SidebarAction};
pub use toast::ToastView;
pub use toolbar::{Toolbar, ToolbarAction};

use crate::textures::TextureSlot;
use crate::Theme;
use egui::{pos2, Align2, FontId, Rect, Ui, Vec2};

pub(crate) const FAVORITE_ON: &str = "★";
pub(crate) const FAVORITE_OFF: &str = "☆";

/// Paint a texture slot into `rect`. `cover` crops to fill the rect,
/// otherwise the image is letterboxed. Returns the painted image rect.
pub(crate) fn paint_slot(ui: &Ui, rect: Rect, slot: TextureSlot, theme: &Theme, cover: bool) -> Rect {
    let painter = ui.painter_at(rect);

    match slot {
        TextureSlot::Ready { id, size } if size.x > 0.0 && size.y > 0.0 => {
            if cover {
                let uv = cover_uv(size, rect.size());
                painter.image(id, rect, uv, egui::Color32::WHITE);
                rect
            } else {
                let scale = (rect.width() / size.x).min(rect.height() / size.y);
                let image_rect = Rect::from_center_size(rect.center(), size * scale);
                painter.image(
                    id,
                    image_rect,
                    Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
                image_rect
            }
        }
        TextureSlot::Failed => {
            painter.rect_filled(rect, 4.0, theme.primary);
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "⚠ Image unavailable",
                FontId::proportional(13.0),
                theme.text_secondary,
            );
            rect
        }
        _ => {
            painter.rect_filled(rect, 4.0, theme.primary);
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "🖼",
                FontId::proportional(28.0),
                theme.text_secondary,
            );
            rect
        }
    }
}

/// UV rect that crops a texture of `texture` size to the aspect of `target`
fn cover_uv(texture: Vec2, target: Vec2) -> Rect {
    let texture_aspect = texture.x / texture.y;
    let target_aspect = target.x / target.y.max(1.0);

    if texture_aspect > target_aspect {
        let span = target_aspect / texture_aspect;
        let start = (1.0 - span) / 2.0;
        Rect::from_min_max(pos2(start, 0.0), pos2(start + span, 1.0))
    } else {
        let span = texture_aspect / target_aspect;
        let start = (1.0 - span) / 2.0;
        Rect::from_min_max(pos2(0.0, start), pos2(1.0, start + span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_core::{AppConfig, Catalog, GalleryState};
    use app_db::MemoryStore;
    use app_core::{Category, CategoryFilter, SortMode};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn gallery() -> GalleryState {
        GalleryState::new(
            Catalog::builtin().unwrap(),
            &AppConfig::default(),
            Arc::new(MemoryStore::new()),
        )
    }

    fn shown_id(state: &GalleryState) -> String {
        state.current_record().map(|r| r.id.clone()).unwrap()
    }

    #[test]
    fn test_cover_uv_crops_long_edge() {
        let uv = cover_uv(Vec2::new(200.0, 100.0), Vec2::new(100.0, 100.0));
        assert!((uv.min.x - 0.25).abs() < 1e-6);
        assert!((uv.max.x - 0.75).abs() < 1e-6);
        assert_eq!(uv.min.y, 0.0);

        let uv = cover_uv(Vec2::new(100.0, 200.0), Vec2::new(100.0, 100.0));
        assert!((uv.min.y - 0.25).abs() < 1e-6);
        assert_eq!(uv.min.x, 0.0);
    }

    #[test]
    fn test_views_agree_after_each_toggle() {
        let mut state = GalleryState::new(
            Catalog::builtin().unwrap(),
            &AppConfig::default(),
            Arc::new(MemoryStore::new()),
        );
        let mut grid = GalleryGrid::new(&mut state, 200.0);
        let mut lightbox = LightboxView::new(&mut state, egui::Color32::BLACK);
        let mut sidebar = FavoritesSidebar::new(&mut state);

        let index = state.filtered().index_of(state.catalog(), "3").unwrap();
        state.open_lightbox(index);
        lightbox.sync(&state);

        let now = Instant::now();
        for expected in [true, false, true, true, false] {
            if expected == state.is_favorite("3") {
                // Toggle some other id from the sidebar surface
                state.toggle_favorite("7", now);
            } else if expected {
                state.toggle_current_favorite(now);
            } else {
                state.toggle_favorite("3", now);
            }

            grid.sync();
            lightbox.sync(&state);
            sidebar.sync();

            assert_eq!(state.is_favorite("3"), expected);
            assert_eq!(grid.is_favorite("3"), expected);
            assert_eq!(lightbox.is_favorite(), expected);
            assert_eq!(sidebar.contains("3"), expected);
            assert_eq!(grid.is_favorite("7"), state.is_favorite("7"));
            assert_eq!(sidebar.contains("7"), state.is_favorite("7"));
        }
    }

    #[test]
    fn test_lightbox_follows_record_when_search_lands_while_open() {
        let t0 = Instant::now();
        let mut state = gallery();
        let mut grid = GalleryGrid::new(&mut state, 200.0);
        let mut lightbox = LightboxView::new(&mut state, egui::Color32::BLACK);
        let mut sidebar = FavoritesSidebar::new(&mut state);

        // Card clicked before the debounced search applies
        state.search_input("bridge", t0);
        state.open_lightbox(0);
        lightbox.sync(&state);

        state.tick(t0 + Duration::from_millis(300));
        grid.sync();
        lightbox.sync(&state);
        sidebar.sync();
        assert_eq!(state.lightbox().index(), Some(0));
        assert_eq!(shown_id(&state), "12");

        for _ in 0..2 {
            state.toggle_current_favorite(t0);
            grid.sync();
            lightbox.sync(&state);
            sidebar.sync();

            let favorite = state.is_favorite("12");
            assert_eq!(grid.is_favorite("12"), favorite);
            assert_eq!(lightbox.is_favorite(), favorite);
            assert_eq!(sidebar.contains("12"), favorite);
        }
    }

    #[test]
    fn test_lightbox_icon_after_clamping_refilter() {
        let now = Instant::now();
        let mut state = gallery();
        let mut lightbox = LightboxView::new(&mut state, egui::Color32::BLACK);
        let mut sidebar = FavoritesSidebar::new(&mut state);

        state.toggle_favorite("19", now);
        state.open_lightbox(15);
        lightbox.sync(&state);
        assert_eq!(lightbox.is_favorite(), state.is_favorite(&shown_id(&state)));

        // Five nature images; the open index is clamped to the last one
        state.set_category(CategoryFilter::Only(Category::Nature));
        lightbox.sync(&state);
        assert_eq!(state.lightbox().index(), Some(4));
        assert_eq!(shown_id(&state), "19");
        assert!(lightbox.is_favorite());

        state.toggle_current_favorite(now);
        lightbox.sync(&state);
        sidebar.sync();
        assert!(!state.is_favorite("19"));
        assert!(!lightbox.is_favorite());
        assert!(!sidebar.contains("19"));
    }

    #[test]
    fn test_queued_open_resolves_to_record_shown_at_the_time() {
        let now = Instant::now();
        let mut state = gallery();
        let mut lightbox = LightboxView::new(&mut state, egui::Color32::BLACK);

        let index = state.filtered().index_of(state.catalog(), "3").unwrap();
        state.open_lightbox(index);
        state.toggle_current_favorite(now);

        // Resort before the view drains its queue; the same index now shows another record
        state.set_sort(SortMode::Popular);
        let shown = shown_id(&state);
        lightbox.sync(&state);

        assert_eq!(lightbox.is_favorite(), state.is_favorite(&shown));
        state.toggle_current_favorite(now);
        lightbox.sync(&state);
        assert_eq!(lightbox.is_favorite(), state.is_favorite(&shown));
    }

    #[test]
    fn test_views_seed_from_stored_favorites() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut state =
                GalleryState::new(Catalog::builtin().unwrap(), &AppConfig::default(), store.clone());
            state.toggle_favorite("3", Instant::now());
        }

        let mut state = GalleryState::new(Catalog::builtin().unwrap(), &AppConfig::default(), store);
        let grid = GalleryGrid::new(&mut state, 200.0);
        let sidebar = FavoritesSidebar::new(&mut state);
        assert!(grid.is_favorite("3"));
        assert_eq!(sidebar.rows(), &["3".to_string()]);
    }
}
