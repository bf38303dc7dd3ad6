//! UIモジュール
//!
//! ratatuiベースのターミナルUI機能

pub mod layout;
pub mod renderer;
pub mod text_area;
pub mod theme;
pub mod viewport;

// 公開API
pub use layout::ScreenLayout;
pub use renderer::Renderer;
pub use text_area::TextAreaRenderer;
pub use theme::{ComponentType, Theme};
pub use viewport::ViewportManager;
