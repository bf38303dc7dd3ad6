//! エラーハンドリングシステム
//!
//! quill 全体で使用される統一されたエラー型とユーティリティを定義
//! ファイル操作の失敗はログに残すだけでなく、必ずダイアログとして利用者に提示する

use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

/// アプリケーション全体のエラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuillError {
    /// ファイル操作エラー
    #[error("File operation failed: {0}")]
    File(#[from] FileError),

    /// UI操作エラー
    #[error("UI operation failed: {0}")]
    Ui(#[from] UiError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 編集操作エラー
    #[error("Edit error: {0}")]
    Edit(#[from] EditError),
}

/// ファイル操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FileError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    #[error("{path} is not valid UTF-8 text")]
    Encoding { path: String },

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl FileError {
    /// `std::io::Error` を対象パス付きのエラーへ変換
    pub fn from_io(path: &Path, error: &std::io::Error) -> Self {
        let path = path.display().to_string();
        match error.kind() {
            ErrorKind::NotFound => FileError::NotFound { path },
            ErrorKind::PermissionDenied => FileError::PermissionDenied { path },
            ErrorKind::InvalidData => FileError::Encoding { path },
            _ => FileError::Io {
                path,
                message: error.to_string(),
            },
        }
    }
}

/// UI操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UiError {
    #[error("Terminal initialization failed: {message}")]
    TerminalInit { message: String },

    #[error("Rendering failed: {component}")]
    RenderingFailed { component: String },
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration file {path}: {message}")]
    InvalidFile { path: String, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// 編集操作エラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Position {0} is out of bounds")]
    OutOfBounds(usize),

    #[error("Invalid range {start}..{end}")]
    InvalidRange { start: usize, end: usize },
}

/// エラーレベル分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    Info,
    Warning,
    Error,
    Fatal,
}

/// 利用者向けのエラー表示情報
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDisplay {
    /// ダイアログのタイトル
    pub title: String,
    /// エラーメッセージ
    pub message: String,
    /// エラーレベル
    pub level: ErrorLevel,
}

impl ErrorDisplay {
    pub fn new(error: &QuillError) -> Self {
        let (title, message, level) = Self::format_error(error);
        Self {
            title: title.to_string(),
            message,
            level,
        }
    }

    fn format_error(error: &QuillError) -> (&'static str, String, ErrorLevel) {
        match error {
            QuillError::File(FileError::NotFound { path }) => {
                ("Error", format!("File not found: {}", path), ErrorLevel::Error)
            }
            QuillError::File(FileError::PermissionDenied { path }) => {
                ("Error", format!("Permission denied: {}", path), ErrorLevel::Error)
            }
            QuillError::File(FileError::InvalidPath { path }) => {
                ("Error", format!("Not a regular file: {}", path), ErrorLevel::Error)
            }
            QuillError::File(FileError::Encoding { path }) => {
                ("Error", format!("Cannot decode {} as UTF-8 text", path), ErrorLevel::Error)
            }
            QuillError::File(FileError::Io { path, message }) => {
                ("Error", format!("Could not access {}: {}", path, message), ErrorLevel::Error)
            }
            QuillError::Ui(_) => ("Fatal", error.to_string(), ErrorLevel::Fatal),
            QuillError::Config(_) => ("Warning", error.to_string(), ErrorLevel::Warning),
            QuillError::Edit(_) => ("Error", error.to_string(), ErrorLevel::Error),
        }
    }
}

/// パニックハンドラの設定
///
/// 端末を通常モードへ戻してからログを残し、即座に終了する
pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        crate::frontend::restore_terminal();

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s
        } else {
            "Unknown panic payload"
        };

        log::error!("PANIC at {}: {}", location, message);
        log::error!("Stack trace: {}", std::backtrace::Backtrace::capture());
        eprintln!("PANIC at {}: {}", location, message);

        std::process::exit(1);
    }));
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, QuillError>;
