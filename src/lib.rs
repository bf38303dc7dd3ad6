//! quill - a small terminal text editor
//!
//! メニューバー・ツールバー・行番号ガター付きの単一文書エディタ

// コアモジュール
pub mod app;
pub mod config;
pub mod error;
pub mod frontend;
pub mod logging;

// データ層
pub mod buffer;
pub mod clipboard;
pub mod file;

// 編集層
pub mod editor;

// ロジック層
pub mod commands;
pub mod deferred;
pub mod gutter;
pub mod input;
pub mod search;

// 表示層
pub mod ui;

// 公開API
pub use app::Controller;
pub use config::EditorConfig;
pub use error::{QuillError, Result};
pub use frontend::TuiApplication;
