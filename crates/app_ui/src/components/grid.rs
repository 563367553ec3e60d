//! Paginated thumbnail grid with a "load more" control and an
//! auto-loading sentinel below the last row

use super::{paint_slot, FAVORITE_OFF, FAVORITE_ON};
use crate::textures::TextureCache;
use crate::Theme;
use app_core::{GalleryEvent, GalleryState, ImageKind, ImageRecord};
use crossbeam_channel::Receiver;
use egui::{pos2, vec2, Align2, FontId, Rect, Sense, Ui, Vec2};
use std::collections::HashSet;

/// Distance below the viewport at which the sentinel starts loading
const SENTINEL_MARGIN: f32 = 200.0;
const CAPTION_HEIGHT: f32 = 44.0;

/// Action returned from grid interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridAction {
    /// Open the lightbox at a filtered index
    Open(usize),
    ToggleFavorite(String),
    LoadMore,
    SentinelVisible,
}

/// Gallery grid component
pub struct GalleryGrid {
    events: Receiver<GalleryEvent>,
    /// Favorite icons currently drawn
    favorites: HashSet<String>,
    scroll_to_top: bool,
    /// Card width in points
    pub card_width: f32,
    columns: usize,
}

impl GalleryGrid {
    pub fn new(state: &mut GalleryState, card_width: f32) -> Self {
        let favorites = state
            .catalog()
            .records()
            .iter()
            .filter(|r| state.is_favorite(&r.id))
            .map(|r| r.id.clone())
            .collect();

        Self {
            events: state.subscribe(),
            favorites,
            scroll_to_top: false,
            card_width: card_width.clamp(120.0, 480.0),
            columns: 1,
        }
    }

    /// Apply queued state changes
    pub fn sync(&mut self) {
        for event in self.events.try_iter() {
            match event {
                GalleryEvent::FavoriteChanged { id, favorite } => {
                    if favorite {
                        self.favorites.insert(id);
                    } else {
                        self.favorites.remove(&id);
                    }
                }
                GalleryEvent::FilterChanged { total } => {
                    tracing::trace!("grid reset, {} matches", total);
                    self.scroll_to_top = true;
                }
                _ => {}
            }
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    /// Render the grid
    pub fn ui(
        &mut self,
        ui: &mut Ui,
        state: &GalleryState,
        textures: &mut TextureCache,
        theme: &Theme,
    ) -> Option<GridAction> {
        let mut action = None;

        if state.filtered().is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new("No images match").size(18.0).color(theme.text_secondary));
            });
            return None;
        }

        let spacing = 12.0;
        self.columns = ((ui.available_width() + spacing) / (self.card_width + spacing)).max(1.0) as usize;

        let mut scroll = egui::ScrollArea::vertical().auto_shrink([false, false]);
        if std::mem::take(&mut self.scroll_to_top) {
            scroll = scroll.vertical_scroll_offset(0.0);
        }

        scroll.show(ui, |ui| {
            egui::Grid::new("gallery_grid")
                .num_columns(self.columns)
                .spacing(Vec2::splat(spacing))
                .show(ui, |ui| {
                    for (idx, record) in state.visible_records() {
                        if let Some(a) = self.card(ui, idx, record, textures, theme) {
                            action = Some(a);
                        }
                        if (idx + 1) % self.columns == 0 {
                            ui.end_row();
                        }
                    }
                });

            ui.add_space(spacing);

            if state.has_more() {
                ui.vertical_centered(|ui| {
                    let remaining = state.filtered().len() - state.rendered();
                    if ui.button(format!("Load more ({} left)", remaining)).clicked() {
                        action = Some(GridAction::LoadMore);
                    }
                });

                let (sentinel, _) = ui.allocate_exact_size(vec2(ui.available_width(), 1.0), Sense::hover());
                let near = ui.clip_rect().expand2(vec2(0.0, SENTINEL_MARGIN));
                if near.intersects(sentinel) && action.is_none() {
                    action = Some(GridAction::SentinelVisible);
                }
            }
        });

        action
    }

    /// Render a single card
    fn card(
        &self,
        ui: &mut Ui,
        idx: usize,
        record: &ImageRecord,
        textures: &mut TextureCache,
        theme: &Theme,
    ) -> Option<GridAction> {
        let image_height = (self.card_width * 0.66).round();
        let size = vec2(self.card_width, image_height + CAPTION_HEIGHT);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());
        let response = response.on_hover_text(&record.description);

        // Favorite toggle in the corner, registered after the card so it wins the click
        let fav_rect = Rect::from_min_size(pos2(rect.max.x - 34.0, rect.min.y + 6.0), vec2(28.0, 28.0));
        let fav = ui.interact(fav_rect, ui.id().with(("favorite", &record.id)), Sense::click());
        let favorite = self.is_favorite(&record.id);

        if ui.is_rect_visible(rect) {
            let bg = if response.hovered() || response.has_focus() {
                theme.primary
            } else {
                theme.surface
            };
            ui.painter().rect_filled(rect, 6.0, bg);
            if response.has_focus() {
                ui.painter().rect_stroke(rect, 6.0, egui::Stroke::new(2.0, theme.accent));
            }

            let image_rect = Rect::from_min_size(rect.min, vec2(size.x, image_height));
            let slot = textures.get(record, ImageKind::Thumbnail);
            paint_slot(ui, image_rect, slot, theme, true);

            let painter = ui.painter_at(rect.shrink(6.0));
            painter.text(
                pos2(rect.min.x + 8.0, image_rect.max.y + 6.0),
                Align2::LEFT_TOP,
                &record.title,
                FontId::proportional(14.0),
                theme.text,
            );
            painter.text(
                pos2(rect.min.x + 8.0, image_rect.max.y + 25.0),
                Align2::LEFT_TOP,
                record.category.label(),
                FontId::proportional(11.0),
                theme.text_secondary,
            );

            ui.painter().circle_filled(fav_rect.center(), 13.0, egui::Color32::from_black_alpha(120));
            ui.painter().text(
                fav_rect.center(),
                Align2::CENTER_CENTER,
                if favorite { FAVORITE_ON } else { FAVORITE_OFF },
                FontId::proportional(18.0),
                if favorite { theme.favorite } else { egui::Color32::WHITE },
            );
        }

        if fav.clicked() {
            Some(GridAction::ToggleFavorite(record.id.clone()))
        } else if response.clicked() {
            Some(GridAction::Open(idx))
        } else {
            None
        }
    }
}
