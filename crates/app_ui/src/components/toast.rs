//! Toast stack in the bottom-right corner

use crate::Theme;
use app_core::Toasts;
use egui::{Align2, Frame, RichText, Stroke};

pub struct ToastView;

impl ToastView {
    pub fn ui(ctx: &egui::Context, toasts: &Toasts, theme: &Theme) {
        if toasts.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .order(egui::Order::Tooltip)
            .anchor(Align2::RIGHT_BOTTOM, [-16.0, -16.0])
            .interactable(false)
            .show(ctx, |ui| {
                for toast in toasts.visible() {
                    let color = theme.toast_color(toast.kind);
                    Frame::none()
                        .fill(theme.surface)
                        .stroke(Stroke::new(1.5, color))
                        .rounding(6.0)
                        .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                        .show(ui, |ui| {
                            ui.set_max_width(320.0);
                            ui.label(RichText::new(&toast.message).color(theme.text));
                        });
                    ui.add_space(6.0);
                }
            });
    }
}
