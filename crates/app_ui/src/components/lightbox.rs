//! Lightbox overlay: full image, caption, counter and controls

use super::{paint_slot, FAVORITE_OFF, FAVORITE_ON};
use crate::textures::TextureCache;
use crate::Theme;
use app_core::{GalleryEvent, GalleryState};
use crossbeam_channel::Receiver;
use egui::{pos2, vec2, Align2, Color32, FontId, Rect, RichText, Sense};
use std::time::Instant;

const CONTROLS_HEIGHT: f32 = 96.0;

/// Action returned from lightbox interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxAction {
    Next,
    Prev,
    Close,
    ToggleFavorite,
    ToggleSlideshow,
    Download,
    ToggleFullscreen,
}

/// Lightbox view
pub struct LightboxView {
    events: Receiver<GalleryEvent>,
    current: Option<String>,
    favorite: bool,
    playing: bool,
    focus_close: bool,
    background: Color32,
}

impl LightboxView {
    pub fn new(state: &mut GalleryState, background: Color32) -> Self {
        Self {
            events: state.subscribe(),
            current: None,
            favorite: false,
            playing: false,
            focus_close: false,
            background,
        }
    }

    /// Apply queued state changes
    pub fn sync(&mut self, state: &GalleryState) {
        for event in self.events.try_iter() {
            match event {
                GalleryEvent::LightboxOpened { id, .. } => {
                    if self.current.is_none() {
                        self.focus_close = true;
                    }
                    self.favorite = state.is_favorite(&id);
                    self.current = Some(id);
                }
                GalleryEvent::FavoriteChanged { id, favorite } => {
                    if self.current.as_deref() == Some(id.as_str()) {
                        self.favorite = favorite;
                    }
                }
                GalleryEvent::SlideshowChanged { playing } => self.playing = playing,
                GalleryEvent::LightboxClosed => {
                    self.current = None;
                    self.playing = false;
                }
                _ => {}
            }
        }
    }

    /// Favorite icon state for the open image
    pub fn is_favorite(&self) -> bool {
        self.favorite
    }

    /// Render the overlay if the lightbox is open
    pub fn ui(
        &mut self,
        ctx: &egui::Context,
        state: &GalleryState,
        textures: &mut TextureCache,
        theme: &Theme,
        now: Instant,
    ) -> Option<LightboxAction> {
        let record = state.current_record()?;
        let mut action = None;
        let screen = ctx.screen_rect();

        egui::Area::new(egui::Id::new("lightbox_overlay"))
            .order(egui::Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                // Backdrop first so every control drawn later takes precedence
                let backdrop = ui.allocate_rect(screen, Sense::click());
                ui.painter().rect_filled(screen, 0.0, self.background);

                let stage = Rect::from_min_max(
                    pos2(screen.min.x + 72.0, screen.min.y + 48.0),
                    pos2(screen.max.x - 72.0, screen.max.y - CONTROLS_HEIGHT),
                );
                let slot = textures.best(record);
                let image_rect = paint_slot(ui, stage, slot, theme, false);
                ui.interact(image_rect, ui.id().with("lightbox_image"), Sense::click());
                let caption_rect = Rect::from_min_max(
                    pos2(stage.min.x, screen.max.y - CONTROLS_HEIGHT),
                    pos2(stage.max.x, screen.max.y),
                );
                ui.interact(caption_rect, ui.id().with("lightbox_caption"), Sense::click());

                if let Some(progress) = state.lightbox().slideshow_progress(now) {
                    let bar = Rect::from_min_size(
                        pos2(image_rect.min.x, image_rect.max.y + 4.0),
                        vec2(image_rect.width() * progress, 3.0),
                    );
                    ui.painter().rect_filled(bar, 1.5, theme.accent);
                }

                // Caption and counter
                let caption_top = screen.max.y - CONTROLS_HEIGHT + 12.0;
                ui.painter().text(
                    pos2(screen.center().x, caption_top),
                    Align2::CENTER_TOP,
                    &record.title,
                    FontId::proportional(18.0),
                    Color32::WHITE,
                );
                ui.painter().text(
                    pos2(screen.center().x, caption_top + 24.0),
                    Align2::CENTER_TOP,
                    &record.description,
                    FontId::proportional(13.0),
                    Color32::LIGHT_GRAY,
                );
                if let Some(counter) = state.counter_text() {
                    ui.painter().text(
                        pos2(screen.min.x + 20.0, screen.min.y + 16.0),
                        Align2::LEFT_TOP,
                        counter,
                        FontId::monospace(14.0),
                        Color32::LIGHT_GRAY,
                    );
                }

                // Close
                let close_rect = Rect::from_min_size(pos2(screen.max.x - 52.0, screen.min.y + 8.0), vec2(40.0, 32.0));
                let close = ui.put(close_rect, egui::Button::new(RichText::new("✕").size(18.0)))
                    .on_hover_text("Close (Esc)");
                if std::mem::take(&mut self.focus_close) {
                    close.request_focus();
                }
                if close.clicked() {
                    action = Some(LightboxAction::Close);
                }

                // Side arrows
                let arrow = vec2(48.0, 64.0);
                let prev_rect = Rect::from_center_size(pos2(screen.min.x + 36.0, stage.center().y), arrow);
                let next_rect = Rect::from_center_size(pos2(screen.max.x - 36.0, stage.center().y), arrow);
                if ui.put(prev_rect, egui::Button::new(RichText::new("◀").size(24.0)).frame(false))
                    .on_hover_text("Previous (←)")
                    .clicked()
                {
                    action = Some(LightboxAction::Prev);
                }
                if ui.put(next_rect, egui::Button::new(RichText::new("▶").size(24.0)).frame(false))
                    .on_hover_text("Next (→)")
                    .clicked()
                {
                    action = Some(LightboxAction::Next);
                }

                // Control row
                let row = Rect::from_center_size(pos2(screen.center().x, screen.max.y - 22.0), vec2(320.0, 32.0));
                ui.allocate_new_ui(egui::UiBuilder::new().max_rect(row), |ui| {
                    ui.horizontal_centered(|ui| {
                        let (icon, color) = if self.favorite {
                            (FAVORITE_ON, theme.favorite)
                        } else {
                            (FAVORITE_OFF, Color32::WHITE)
                        };
                        if ui.button(RichText::new(icon).color(color)).on_hover_text("Favorite").clicked() {
                            action = Some(LightboxAction::ToggleFavorite);
                        }

                        let play = if self.playing { "⏸" } else { "▶" };
                        if ui.button(play).on_hover_text("Slideshow (Space)").clicked() {
                            action = Some(LightboxAction::ToggleSlideshow);
                        }
                        if ui.button("⬇").on_hover_text("Download").clicked() {
                            action = Some(LightboxAction::Download);
                        }
                        if ui.button("⛶").on_hover_text("Fullscreen").clicked() {
                            action = Some(LightboxAction::ToggleFullscreen);
                        }
                    });
                });

                if backdrop.clicked() && action.is_none() {
                    action = Some(LightboxAction::Close);
                }
            });

        action
    }
}
