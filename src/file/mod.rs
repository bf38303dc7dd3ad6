//! ファイル操作モジュール
//!
//! テキストファイルの読み書き、パス展開、ファイル選択ダイアログ

pub mod dialog;
pub mod io;

pub use dialog::{DialogMode, DialogOutcome, DirEntry, FileDialog};
pub use io::{read_text, write_text};

use std::path::PathBuf;

/// `~` と環境変数を展開したパス。展開に失敗した場合は入力をそのまま使う
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(err) => {
            log::debug!("path expansion failed for {}: {}", raw, err);
            PathBuf::from(shellexpand::tilde(raw).as_ref())
        }
    }
}

/// ステータス行などに表示するファイル名
pub fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_home_directory() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/notes.txt"), home.join("notes.txt"));
        }
    }

    #[test]
    fn leaves_plain_paths_alone() {
        assert_eq!(expand_path("/tmp/a.txt"), PathBuf::from("/tmp/a.txt"));
    }

    #[test]
    fn unknown_variable_falls_back_to_literal() {
        assert_eq!(
            expand_path("$QUILL_SURELY_UNSET_VAR/x"),
            PathBuf::from("$QUILL_SURELY_UNSET_VAR/x")
        );
    }

    #[test]
    fn display_name_uses_file_name() {
        assert_eq!(display_name(std::path::Path::new("/a/b/c.txt")), "c.txt");
    }
}
