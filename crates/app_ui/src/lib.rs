//! Galleria UI Layer
//!
//! Provides:
//! - egui-based gallery views
//! - wgpu rendering pipeline
//! - Input handling and texture caching

pub mod components;
pub mod input;
pub mod renderer;
pub mod textures;
pub mod theme;

pub use input::InputHandler;
pub use renderer::Renderer;
pub use textures::{TextureCache, TextureSlot};
pub use theme::Theme;
