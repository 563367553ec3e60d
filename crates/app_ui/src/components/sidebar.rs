//! Favorites sidebar

use super::paint_slot;
use crate::textures::TextureCache;
use crate::Theme;
use app_core::{GalleryEvent, GalleryState, ImageKind};
use crossbeam_channel::Receiver;
use egui::{vec2, RichText, Sense};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarAction {
    Open(String),
    Remove(String),
}

/// Favorites sidebar component
pub struct FavoritesSidebar {
    events: Receiver<GalleryEvent>,
    /// Favorite ids in insertion order
    rows: Vec<String>,
}

impl FavoritesSidebar {
    pub fn new(state: &mut GalleryState) -> Self {
        let rows = state
            .favorite_records()
            .into_iter()
            .map(|r| r.id.clone())
            .collect();

        Self {
            events: state.subscribe(),
            rows,
        }
    }

    /// Apply queued state changes
    pub fn sync(&mut self) {
        for event in self.events.try_iter() {
            if let GalleryEvent::FavoriteChanged { id, favorite } = event {
                self.rows.retain(|row| *row != id);
                if favorite {
                    self.rows.push(id);
                }
            }
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rows.iter().any(|row| row == id)
    }

    pub fn ui(
        &self,
        ctx: &egui::Context,
        state: &GalleryState,
        textures: &mut TextureCache,
        theme: &Theme,
    ) -> Option<SidebarAction> {
        let mut action = None;

        egui::SidePanel::right("favorites_sidebar")
            .resizable(true)
            .default_width(260.0)
            .min_width(180.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.heading(format!("Favorites ({})", self.rows.len()));
                ui.separator();

                let records: Vec<_> = self
                    .rows
                    .iter()
                    .filter_map(|id| state.catalog().get(id))
                    .collect();

                if records.is_empty() {
                    ui.add_space(12.0);
                    ui.label(RichText::new("No favorites yet").color(theme.text_secondary));
                    return;
                }

                egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                    for record in records {
                        ui.horizontal(|ui| {
                            let (rect, thumb) = ui.allocate_exact_size(vec2(72.0, 48.0), Sense::click());
                            paint_slot(ui, rect, textures.get(record, ImageKind::Thumbnail), theme, true);

                            let title = ui.add(egui::Label::new(&record.title).sense(Sense::click()));
                            if thumb.on_hover_text("Open").clicked() || title.clicked() {
                                action = Some(SidebarAction::Open(record.id.clone()));
                            }

                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.small_button("✕").on_hover_text("Remove").clicked() {
                                    action = Some(SidebarAction::Remove(record.id.clone()));
                                }
                            });
                        });
                        ui.add_space(4.0);
                    }
                });
            });

        action
    }
}
