//! ロギングシステム
//!
//! `log` ファサードのバックエンド。端末は raw モードで描画に占有されるため、
//! 既定ではファイルへ追記し、標準エラー出力は明示的に有効化した場合のみ使う

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};

/// ロガー
#[derive(Debug)]
pub struct Logger {
    level: LevelFilter,
    output_stderr: AtomicBool,
    output_file: Option<Mutex<PathBuf>>,
}

impl Logger {
    /// デフォルト構築
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            output_stderr: AtomicBool::new(false),
            output_file: None,
        }
    }

    /// ログレベルを取得
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// ファイル出力を設定
    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_file = Some(Mutex::new(path.into()));
        self
    }

    /// 標準エラー出力を有効化
    pub fn with_stderr(self) -> Self {
        self.output_stderr.store(true, Ordering::Relaxed);
        self
    }

    /// 出力先ファイルのパス
    pub fn file_path(&self) -> Option<PathBuf> {
        self.output_file
            .as_ref()
            .and_then(|path| path.lock().ok().map(|p| p.clone()))
    }

    fn write_line(&self, line: &str) {
        if self.output_stderr.load(Ordering::Relaxed) {
            eprintln!("{}", line);
        }

        if let Some(path) = &self.output_file {
            // 書き込みが交錯しないようパスのロックを保持したまま追記する
            if let Ok(path) = path.lock() {
                if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&*path) {
                    let _ = writeln!(file, "{}", line);
                }
            }
        }
    }
}

/// 1行分のログ文字列を整形
pub fn format_record(record: &Record<'_>) -> String {
    format!("{} [{}] {}", record.level(), record.target(), record.args())
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.write_line(&format_record(record));
        }
    }

    fn flush(&self) {}
}

/// 設定ファイルで使うレベル名を解釈する
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// 既定のログファイルパス（`<data dir>/quill/quill.log`）
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("quill").join("quill.log"))
}

/// グローバルロガーを登録する
///
/// 二度目以降の呼び出しは何もしない
pub fn init(level: LevelFilter, file: Option<&Path>) {
    let mut logger = Logger::new(level);
    if let Some(path) = file {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        logger = logger.with_file_output(path);
    }

    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;
    use tempfile::tempdir;

    #[test]
    fn logger_respects_log_level() {
        let logger = Logger::new(LevelFilter::Info);
        let debug = Metadata::builder().level(Level::Debug).build();
        let warn = Metadata::builder().level(Level::Warn).build();

        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&warn));
    }

    #[test]
    fn logger_appends_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quill.log");
        let logger = Logger::new(LevelFilter::Debug).with_file_output(&path);

        logger.log(
            &Record::builder()
                .level(Level::Error)
                .target("quill::file")
                .args(format_args!("open failed"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Trace)
                .target("quill::file")
                .args(format_args!("filtered"))
                .build(),
        );

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "ERROR [quill::file] open failed\n");
    }

    #[test]
    fn parses_level_names() {
        assert_eq!(parse_level("WARNING"), Some(LevelFilter::Warn));
        assert_eq!(parse_level(" debug "), Some(LevelFilter::Debug));
        assert_eq!(parse_level("loud"), None);
    }
}
