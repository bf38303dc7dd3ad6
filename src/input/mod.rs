//! 入力処理モジュール

pub mod keybinding;
pub mod line_input;

pub use keybinding::{EditAction, Key, KeyAction, KeyCode, KeyMap, KeyModifiers};
pub use line_input::LineInput;
