//! Input handling and keybinding resolution

use app_core::{Command, CommandId};
use std::collections::HashMap;
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{Key, ModifiersState, NamedKey};

/// Input handler that maps keys/mouse to commands
pub struct InputHandler {
    /// Key bindings: key string -> command ID
    bindings: HashMap<String, String>,

    /// Current modifier state
    modifiers: ModifiersState,
}

impl InputHandler {
    /// Create a new input handler with bindings
    pub fn new(bindings: HashMap<String, Vec<String>>) -> Self {
        // Invert the bindings map: command -> keys becomes key -> command
        let mut key_to_command = HashMap::new();

        for (command, keys) in bindings {
            for key in keys {
                key_to_command.insert(key.to_lowercase(), command.clone());
            }
        }

        Self {
            bindings: key_to_command,
            modifiers: ModifiersState::empty(),
        }
    }

    /// Update modifier state
    pub fn update_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    /// Handle a key event and return the corresponding command
    pub fn handle_key(&self, event: &KeyEvent) -> Option<Command> {
        if event.state != ElementState::Pressed {
            return None;
        }

        let key_str = key_to_string(&event.logical_key)?;
        let full_key = self.build_key_string(&key_str);

        tracing::debug!("Key pressed: {}", full_key);
        self.resolve(&full_key)
    }

    /// Look up a key string such as `Ctrl+q`
    pub fn resolve(&self, key: &str) -> Option<Command> {
        self.bindings
            .get(&key.to_lowercase())
            .map(|cmd_id| Command::new(cmd_id))
    }

    /// Build a key string with modifiers
    fn build_key_string(&self, key: &str) -> String {
        let mut parts = Vec::new();

        if self.modifiers.control_key() {
            parts.push("Ctrl");
        }
        if self.modifiers.alt_key() {
            parts.push("Alt");
        }
        if self.modifiers.shift_key() {
            parts.push("Shift");
        }
        if self.modifiers.super_key() {
            parts.push("Super");
        }

        parts.push(key);
        parts.join("+")
    }

    /// Mouse back/forward step through the lightbox
    pub fn handle_mouse_button(&self, button: MouseButton, state: ElementState) -> Option<Command> {
        if state != ElementState::Pressed {
            return None;
        }
        match button {
            MouseButton::Back => Some(Command::new(CommandId::LIGHTBOX_PREV)),
            MouseButton::Forward => Some(Command::new(CommandId::LIGHTBOX_NEXT)),
            _ => None,
        }
    }
}

/// Convert a logical key to a string
fn key_to_string(key: &Key) -> Option<String> {
    let s = match key {
        Key::Named(named) => match named {
            NamedKey::Space => "Space".to_string(),
            NamedKey::Enter => "Return".to_string(),
            NamedKey::Tab => "Tab".to_string(),
            NamedKey::Escape => "Escape".to_string(),
            NamedKey::Home => "Home".to_string(),
            NamedKey::End => "End".to_string(),
            NamedKey::ArrowUp => "Up".to_string(),
            NamedKey::ArrowDown => "Down".to_string(),
            NamedKey::ArrowLeft => "Left".to_string(),
            NamedKey::ArrowRight => "Right".to_string(),
            NamedKey::F11 => "F11".to_string(),
            _ => format!("{:?}", named),
        },
        Key::Character(c) => c.to_string(),
        _ => return None,
    };
    Some(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_core::AppConfig;

    #[test]
    fn test_default_bindings() {
        let handler = InputHandler::new(AppConfig::default().keybindings);
        let id = |key: &str| handler.resolve(key).map(|c| c.id.0);

        assert_eq!(id("Right").as_deref(), Some(CommandId::LIGHTBOX_NEXT));
        assert_eq!(id("Left").as_deref(), Some(CommandId::LIGHTBOX_PREV));
        assert_eq!(id("Escape").as_deref(), Some(CommandId::LIGHTBOX_CLOSE));
        assert_eq!(id("space").as_deref(), Some(CommandId::LIGHTBOX_SLIDESHOW));
        assert_eq!(id("Ctrl+Q").as_deref(), Some(CommandId::APP_EXIT));
        assert_eq!(id("x"), None);
    }

    #[test]
    fn test_modifier_prefix() {
        let mut handler = InputHandler::new(AppConfig::default().keybindings);
        handler.update_modifiers(ModifiersState::CONTROL | ModifiersState::SHIFT);
        assert_eq!(handler.build_key_string("Right"), "Ctrl+Shift+Right");
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(key_to_string(&Key::Named(NamedKey::ArrowRight)).as_deref(), Some("Right"));
        assert_eq!(key_to_string(&Key::Named(NamedKey::Space)).as_deref(), Some("Space"));
        assert_eq!(key_to_string(&Key::Character("q".into())).as_deref(), Some("q"));
    }

    #[test]
    fn test_mouse_buttons() {
        let handler = InputHandler::new(HashMap::new());
        let cmd = handler.handle_mouse_button(MouseButton::Forward, ElementState::Pressed).unwrap();
        assert_eq!(cmd.id.as_str(), CommandId::LIGHTBOX_NEXT);
        assert!(handler.handle_mouse_button(MouseButton::Back, ElementState::Released).is_none());
    }
}
