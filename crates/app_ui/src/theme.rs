//! Application theming

use app_core::{ThemeFlag, ToastKind};
use egui::{Color32, Visuals};

/// Application theme
#[derive(Debug, Clone)]
pub struct Theme {
    pub flag: ThemeFlag,
    pub background: Color32,
    pub surface: Color32,
    pub primary: Color32,
    pub text: Color32,
    pub text_secondary: Color32,
    pub accent: Color32,
    pub favorite: Color32,
    pub error: Color32,
    pub warning: Color32,
    pub success: Color32,
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            flag: ThemeFlag::Dark,
            background: Color32::from_rgb(24, 24, 27),
            surface: Color32::from_rgb(39, 39, 42),
            primary: Color32::from_rgb(63, 63, 70),
            text: Color32::from_rgb(240, 240, 240),
            text_secondary: Color32::from_rgb(161, 161, 170),
            accent: Color32::from_rgb(100, 149, 237), // Cornflower blue
            favorite: Color32::from_rgb(250, 204, 21),
            error: Color32::from_rgb(220, 80, 80),
            warning: Color32::from_rgb(220, 180, 80),
            success: Color32::from_rgb(80, 200, 120),
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            flag: ThemeFlag::Light,
            background: Color32::from_rgb(244, 244, 245),
            surface: Color32::from_rgb(255, 255, 255),
            primary: Color32::from_rgb(228, 228, 231),
            text: Color32::from_rgb(24, 24, 27),
            text_secondary: Color32::from_rgb(82, 82, 91),
            accent: Color32::from_rgb(59, 130, 246), // Blue
            favorite: Color32::from_rgb(217, 119, 6),
            error: Color32::from_rgb(220, 38, 38),
            warning: Color32::from_rgb(234, 179, 8),
            success: Color32::from_rgb(34, 197, 94),
        }
    }

    pub fn for_flag(flag: ThemeFlag) -> Self {
        match flag {
            ThemeFlag::Dark => Self::dark(),
            ThemeFlag::Light => Self::light(),
        }
    }

    /// Apply theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        let mut visuals = match self.flag {
            ThemeFlag::Dark => Visuals::dark(),
            ThemeFlag::Light => Visuals::light(),
        };

        visuals.panel_fill = self.surface;
        visuals.window_fill = self.surface;
        visuals.extreme_bg_color = self.background;
        visuals.faint_bg_color = self.primary;

        visuals.widgets.noninteractive.bg_fill = self.surface;
        visuals.widgets.noninteractive.fg_stroke.color = self.text;

        visuals.widgets.inactive.bg_fill = self.primary;
        visuals.widgets.inactive.weak_bg_fill = self.primary;
        visuals.widgets.inactive.fg_stroke.color = self.text;

        visuals.widgets.hovered.bg_fill = self.accent.linear_multiply(0.3);
        visuals.widgets.hovered.fg_stroke.color = self.text;

        visuals.widgets.active.bg_fill = self.accent.linear_multiply(0.5);
        visuals.widgets.active.fg_stroke.color = self.text;

        visuals.selection.bg_fill = self.accent.linear_multiply(0.3);
        visuals.selection.stroke.color = self.accent;

        style.visuals = visuals;
        ctx.set_style(style);
        tracing::debug!("Applied {} theme", self.flag.as_str());
    }

    /// Icon for the theme toggle: what clicking it switches to
    pub fn toggle_icon(&self) -> &'static str {
        match self.flag {
            ThemeFlag::Dark => "☀",
            ThemeFlag::Light => "🌙",
        }
    }

    pub fn toast_color(&self, kind: ToastKind) -> Color32 {
        match kind {
            ToastKind::Info => self.accent,
            ToastKind::Success => self.success,
            ToastKind::Warning => self.warning,
            ToastKind::Error => self.error,
        }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`
    pub fn parse_color(hex: &str) -> Option<Color32> {
        let hex = hex.trim().trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

        match hex.len() {
            6 => Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Color32::from_rgba_unmultiplied(
                channel(0)?,
                channel(2)?,
                channel(4)?,
                channel(6)?,
            )),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(Theme::parse_color("#ff8000"), Some(Color32::from_rgb(255, 128, 0)));
        assert_eq!(
            Theme::parse_color("000000D8"),
            Some(Color32::from_rgba_unmultiplied(0, 0, 0, 0xD8))
        );
        assert_eq!(Theme::parse_color("#12345"), None);
        assert_eq!(Theme::parse_color("#gg0000"), None);
    }

    #[test]
    fn test_for_flag() {
        assert_eq!(Theme::for_flag(ThemeFlag::Light).flag, ThemeFlag::Light);
        assert_ne!(Theme::dark().toggle_icon(), Theme::light().toggle_icon());
    }
}
