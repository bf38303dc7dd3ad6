//! フロントエンド
//!
//! 端末（crossterm + ratatui）上でイベントループを回す

pub mod tui;

pub use tui::{restore_terminal, TuiApplication};
