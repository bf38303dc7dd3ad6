//! エディタ設定
//!
//! `<config dir>/quill/config.json` から読み込む。ファイルが無ければ既定値、
//! 壊れていれば既定値を使いつつエラーを呼び出し側へ返す

use crate::error::{ConfigError, QuillError, Result};
use crate::logging;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TAB_WIDTH: usize = 4;
const MAX_TAB_WIDTH: usize = 16;

/// エディタ設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// タブ文字の表示幅
    pub tab_width: usize,
    /// 行番号ガターを表示するか
    pub show_line_numbers: bool,
    /// 取り消し履歴の上限（未指定なら無制限）
    pub undo_limit: Option<usize>,
    /// ログレベル名
    pub log_level: String,
    /// ログ出力先（未指定なら既定パス）
    pub log_file: Option<String>,
    /// ファイルダイアログの初期ディレクトリ
    pub default_directory: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            show_line_numbers: true,
            undo_limit: None,
            log_level: "info".to_string(),
            log_file: None,
            default_directory: None,
        }
    }
}

impl EditorConfig {
    /// 既定の設定ファイルパス
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("quill").join("config.json"))
    }

    /// JSON文字列から読み込み、値を検証する
    pub fn from_json(source: &str, origin: &Path) -> Result<Self> {
        let config: EditorConfig =
            serde_json::from_str(source).map_err(|e| ConfigError::InvalidFile {
                path: origin.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 指定パスから読み込む（存在しなければ既定値）
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&source, path)
    }

    /// 既定の場所から読み込む。失敗時は既定値とエラーを返す
    pub fn load() -> (Self, Option<QuillError>) {
        let Some(path) = Self::default_path() else {
            return (Self::default(), None);
        };
        match Self::load_from(&path) {
            Ok(config) => (config, None),
            Err(err) => (Self::default(), Some(err)),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.tab_width == 0 || self.tab_width > MAX_TAB_WIDTH {
            return Err(ConfigError::InvalidValue {
                key: "tab_width".to_string(),
                value: self.tab_width.to_string(),
            }
            .into());
        }
        if logging::parse_level(&self.log_level).is_none() {
            return Err(ConfigError::InvalidValue {
                key: "log_level".to_string(),
                value: self.log_level.clone(),
            }
            .into());
        }
        Ok(())
    }

    pub fn log_level_filter(&self) -> LevelFilter {
        logging::parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    /// ログファイルのパス（`~` や環境変数を展開）
    pub fn log_path(&self) -> Option<PathBuf> {
        match &self.log_file {
            Some(raw) => Some(crate::file::expand_path(raw)),
            None => logging::default_log_path(),
        }
    }

    /// ファイルダイアログの初期ディレクトリ
    pub fn dialog_directory(&self) -> Option<PathBuf> {
        self.default_directory
            .as_deref()
            .map(crate::file::expand_path)
            .or_else(|| std::env::current_dir().ok())
    }
}
