//! ファイルI/O操作
//!
//! UTF-8テキストファイルをそのまま読み書きする（改行コードの変換はしない）

use crate::error::{FileError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// ファイル全体を文字列として読み込む
pub fn read_text(path: &Path) -> Result<String> {
    if path.is_dir() {
        return Err(FileError::InvalidPath {
            path: path.display().to_string(),
        }
        .into());
    }

    let bytes = fs::read(path).map_err(|e| FileError::from_io(path, &e))?;
    let text = String::from_utf8(bytes).map_err(|_| FileError::Encoding {
        path: path.display().to_string(),
    })?;

    log::debug!("read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

/// 文字列をファイルへ書き込む（既存ファイルは確認なしで上書き）
///
/// 一時ファイルへ書いてから置き換えるため、途中で失敗しても元のファイルは残る。
/// シンボリックリンクはリンク先を更新し、既存ファイルのパーミッションは引き継ぐ
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    if path.is_dir() {
        return Err(FileError::InvalidPath {
            path: path.display().to_string(),
        }
        .into());
    }

    let target = resolve_target(path);
    let temp_path = temp_path_for(&target)?;
    fs::write(&temp_path, content.as_bytes()).map_err(|e| FileError::from_io(path, &e))?;

    if let Ok(metadata) = fs::metadata(&target) {
        if let Err(e) = fs::set_permissions(&temp_path, metadata.permissions()) {
            let _ = fs::remove_file(&temp_path);
            return Err(FileError::from_io(path, &e).into());
        }
    }

    if let Err(e) = fs::rename(&temp_path, &target) {
        let _ = fs::remove_file(&temp_path);
        return Err(FileError::from_io(path, &e).into());
    }

    log::debug!("wrote {} bytes to {}", content.len(), target.display());
    Ok(())
}

/// 書き込み先の実体パス（存在しなければそのまま）
fn resolve_target(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn temp_path_for(original: &Path) -> Result<PathBuf> {
    let filename = original.file_name().ok_or_else(|| FileError::InvalidPath {
        path: original.display().to_string(),
    })?;
    let parent = match original.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let temp_name = format!(".{}.{}.tmp", filename.to_string_lossy(), std::process::id());
    Ok(parent.join(temp_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuillError;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_read_file() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("test.txt");
        let content = "Hello, World!\r\nこんにちは！\n";

        write_text(&file_path, content).unwrap();
        assert_eq!(read_text(&file_path).unwrap(), content);
    }

    #[test]
    fn test_overwrite_existing_file() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("existing.txt");
        std::fs::write(&file_path, "old content that is longer").unwrap();

        write_text(&file_path, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&file_path).unwrap(), "new");
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_through_symlink_updates_target() {
        let temp_dir = tempdir().unwrap();
        let real = temp_dir.path().join("real.txt");
        let link = temp_dir.path().join("link.txt");
        std::fs::write(&real, "old").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        write_text(&link, "new").unwrap();

        let link_meta = std::fs::symlink_metadata(&link).unwrap();
        assert!(link_meta.file_type().is_symlink());
        assert_eq!(std::fs::read_to_string(&real).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let script = temp_dir.path().join("run.sh");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        write_text(&script, "#!/bin/sh\necho hi\n").unwrap();

        let mode = std::fs::metadata(&script).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = tempdir().unwrap();
        let err = read_text(&temp_dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, QuillError::File(FileError::NotFound { .. })));
    }

    #[test]
    fn test_directory_is_invalid_path() {
        let temp_dir = tempdir().unwrap();
        let err = read_text(temp_dir.path()).unwrap_err();
        assert!(matches!(err, QuillError::File(FileError::InvalidPath { .. })));
        let err = write_text(temp_dir.path(), "x").unwrap_err();
        assert!(matches!(err, QuillError::File(FileError::InvalidPath { .. })));
    }

    #[test]
    fn test_non_utf8_is_encoding_error() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("binary.bin");
        std::fs::write(&file_path, [0xff, 0xfe, 0x00]).unwrap();

        let err = read_text(&file_path).unwrap_err();
        assert!(matches!(err, QuillError::File(FileError::Encoding { .. })));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("no").join("such").join("dir.txt");
        let err = write_text(&file_path, "x").unwrap_err();
        assert!(matches!(err, QuillError::File(FileError::NotFound { .. })));
    }
}
