//! Toolbar with category filters, search, sort and view toggles

use crate::Theme;
use app_core::{Category, CategoryFilter, GalleryState, SortMode};
use egui::{ComboBox, RichText, Ui};

/// Toolbar actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarAction {
    Category(CategoryFilter),
    /// Raw search box contents after an edit
    Search(String),
    Sort(SortMode),
    ToggleTheme,
    ToggleFavorites,
}

/// Toolbar component
pub struct Toolbar {
    /// Search box contents
    search_text: String,
}

impl Toolbar {
    pub fn new(search_text: &str) -> Self {
        Self {
            search_text: search_text.to_string(),
        }
    }

    /// Render the toolbar
    pub fn ui(&mut self, ui: &mut Ui, state: &GalleryState, theme: &Theme) -> Option<ToolbarAction> {
        let mut action = None;
        let current = state.query().category;

        ui.horizontal(|ui| {
            ui.label(RichText::new("Galleria").strong().size(16.0));
            ui.separator();

            // === Category filters ===
            let filters = std::iter::once(CategoryFilter::All)
                .chain(Category::ALL.iter().copied().map(CategoryFilter::Only));
            for filter in filters {
                if ui.selectable_label(current == filter, filter.label()).clicked() && current != filter {
                    action = Some(ToolbarAction::Category(filter));
                }
            }

            ui.separator();

            // === Search ===
            let search = ui.add(
                egui::TextEdit::singleline(&mut self.search_text)
                    .hint_text("Search images...")
                    .desired_width(200.0),
            );
            if search.changed() {
                action = Some(ToolbarAction::Search(self.search_text.clone()));
            }

            // === Sort dropdown ===
            let mut sort = state.query().sort;
            ComboBox::from_id_salt("sort_combo")
                .selected_text(sort.label())
                .width(110.0)
                .show_ui(ui, |ui| {
                    for mode in SortMode::ALL {
                        if ui.selectable_value(&mut sort, mode, mode.label()).clicked() {
                            action = Some(ToolbarAction::Sort(mode));
                        }
                    }
                });

            // === Right-aligned toggles ===
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .button(theme.toggle_icon())
                    .on_hover_text("Toggle theme")
                    .clicked()
                {
                    action = Some(ToolbarAction::ToggleTheme);
                }

                let favorites = format!("★ {}", state.favorite_records().len());
                if ui
                    .selectable_label(state.sidebar_visible(), favorites)
                    .on_hover_text("Favorites")
                    .clicked()
                {
                    action = Some(ToolbarAction::ToggleFavorites);
                }

                ui.label(
                    RichText::new(format!("{} of {}", state.rendered(), state.filtered().len()))
                        .color(theme.text_secondary),
                );
            });
        });

        action
    }
}
