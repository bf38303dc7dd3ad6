//! ファイル選択ダイアログ
//!
//! パス入力欄と、入力中のディレクトリの一覧を持つ。
//! 一覧は入力したファイル名の先頭一致で絞り込む

use super::expand_path;
use crate::input::LineInput;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// ダイアログの用途
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Open,
    Save,
}

impl DialogMode {
    pub fn title(self) -> &'static str {
        match self {
            DialogMode::Open => "Open",
            DialogMode::Save => "Save",
        }
    }
}

/// ディレクトリ一覧の要素
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// 確定操作の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    /// ダイアログは開いたまま（ディレクトリ移動など）
    Pending,
    /// パスが確定した
    Confirmed(PathBuf),
}

/// ファイル選択ダイアログの状態
#[derive(Debug, Clone)]
pub struct FileDialog {
    mode: DialogMode,
    input: LineInput,
    entries: Vec<DirEntry>,
    selected: Option<usize>,
}

impl FileDialog {
    /// ディレクトリとファイル名の初期値から作成
    pub fn new(mode: DialogMode, directory: Option<&Path>, file_name: Option<&str>) -> Self {
        let mut initial = String::new();
        if let Some(dir) = directory {
            initial.push_str(&dir.display().to_string());
            if !initial.ends_with(MAIN_SEPARATOR) {
                initial.push(MAIN_SEPARATOR);
            }
        }
        if let Some(name) = file_name {
            initial.push_str(name);
        }

        let mut dialog = Self {
            mode,
            input: LineInput::with_text(&initial),
            entries: Vec::new(),
            selected: None,
        };
        dialog.refresh();
        dialog
    }

    pub fn mode(&self) -> DialogMode {
        self.mode
    }

    pub fn input(&self) -> &LineInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut LineInput {
        &mut self.input
    }

    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// 入力を（ディレクトリ, ファイル名の前方一致部分）に分割
    fn split_input(&self) -> (PathBuf, String) {
        let raw = self.input.text();
        if raw.is_empty() {
            return (PathBuf::from("."), String::new());
        }
        if raw.ends_with(MAIN_SEPARATOR) || raw.ends_with('/') {
            return (expand_path(raw), String::new());
        }
        let expanded = expand_path(raw);
        let prefix = expanded
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let dir = match expanded.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        (dir, prefix)
    }

    /// 入力内容に合わせて一覧を作り直す
    pub fn refresh(&mut self) {
        let (dir, prefix) = self.split_input();
        self.entries = list_directory(&dir, &prefix);
        self.selected = None;
    }

    pub fn select_next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < self.entries.len() => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    pub fn select_previous(&mut self) {
        self.selected = match self.selected {
            Some(0) | None => None,
            Some(i) => Some(i - 1),
        };
    }

    fn entry_path(&self, entry: &DirEntry) -> String {
        let (dir, _) = self.split_input();
        let mut path = dir.join(&entry.name).display().to_string();
        if entry.is_dir {
            path.push(MAIN_SEPARATOR);
        }
        path
    }

    /// 選択中の候補、または候補の共通接頭辞で入力を補完
    pub fn complete(&mut self) {
        if let Some(entry) = self.selected.and_then(|i| self.entries.get(i)).cloned() {
            let path = self.entry_path(&entry);
            self.input.set_text(&path);
            self.refresh();
            return;
        }

        let (dir, prefix) = self.split_input();
        let names: Vec<&str> = self.entries.iter().map(|e| e.name.as_str()).collect();
        let common = common_prefix(&names);
        if common.chars().count() > prefix.chars().count() {
            let completed = match self.entries.as_slice() {
                [only] => self.entry_path(only),
                _ => dir.join(common).display().to_string(),
            };
            self.input.set_text(&completed);
            self.refresh();
        }
    }

    /// Enter の処理。ディレクトリなら移動し、ファイルなら確定する
    pub fn accept(&mut self) -> DialogOutcome {
        if let Some(entry) = self.selected.and_then(|i| self.entries.get(i)).cloned() {
            let path = self.entry_path(&entry);
            if entry.is_dir {
                self.input.set_text(&path);
                self.refresh();
                return DialogOutcome::Pending;
            }
            return DialogOutcome::Confirmed(expand_path(&path));
        }

        let raw = self.input.text().trim();
        if raw.is_empty() {
            return DialogOutcome::Pending;
        }
        let path = expand_path(raw);
        if path.is_dir() {
            let mut text = raw.to_string();
            if !text.ends_with(MAIN_SEPARATOR) {
                text.push(MAIN_SEPARATOR);
            }
            self.input.set_text(&text);
            self.refresh();
            return DialogOutcome::Pending;
        }
        DialogOutcome::Confirmed(path)
    }
}

/// ディレクトリの内容を名前の前方一致で列挙（ディレクトリが先、名前順）
pub fn list_directory(dir: &Path, prefix: &str) -> Vec<DirEntry> {
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let show_hidden = prefix.starts_with('.');
    let mut entries: Vec<DirEntry> = read_dir
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            if !name.starts_with(prefix) || (!show_hidden && name.starts_with('.')) {
                return None;
            }
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            Some(DirEntry { name, is_dir })
        })
        .collect();

    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
    entries
}

fn common_prefix<'a>(names: &[&'a str]) -> &'a str {
    let Some(first) = names.first() else {
        return "";
    };
    let mut end = first.len();
    for name in &names[1..] {
        end = first[..end]
            .char_indices()
            .zip(name.chars())
            .find(|((_, a), b)| a != b)
            .map(|((idx, _), _)| idx)
            .unwrap_or_else(|| end.min(name.len()));
    }
    // 途中で文字境界を跨がないよう丸める
    while !first.is_char_boundary(end) {
        end -= 1;
    }
    &first[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn fixture() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "n").unwrap();
        fs::write(dir.path().join("notebook.md"), "b").unwrap();
        fs::write(dir.path().join(".hidden"), "h").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        dir
    }

    #[test]
    fn lists_directories_first_without_hidden_files() {
        let dir = fixture();
        let names: Vec<_> = list_directory(dir.path(), "")
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["nested", "notebook.md", "notes.txt"]);
    }

    #[test]
    fn filters_by_typed_prefix() {
        let dir = fixture();
        let dialog = FileDialog::new(DialogMode::Open, Some(dir.path()), Some("note"));
        let names: Vec<_> = dialog.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["notebook.md", "notes.txt"]);
    }

    #[test]
    fn tab_completes_common_prefix_then_unique_entry() {
        let dir = fixture();
        let mut dialog = FileDialog::new(DialogMode::Open, Some(dir.path()), Some("no"));
        dialog.complete();
        assert!(dialog.input().text().ends_with("note"));

        dialog.input_mut().insert('s');
        dialog.refresh();
        dialog.complete();
        assert!(dialog.input().text().ends_with("notes.txt"));
    }

    #[test]
    fn accept_descends_into_directories() {
        let dir = fixture();
        let mut dialog = FileDialog::new(DialogMode::Open, Some(dir.path()), Some("nes"));
        dialog.select_next();
        assert_eq!(dialog.accept(), DialogOutcome::Pending);
        assert!(dialog.input().text().ends_with(&format!("nested{}", MAIN_SEPARATOR)));
    }

    #[test]
    fn accept_confirms_typed_path() {
        let dir = fixture();
        let mut dialog = FileDialog::new(DialogMode::Save, Some(dir.path()), Some("new.txt"));
        assert_eq!(
            dialog.accept(),
            DialogOutcome::Confirmed(dir.path().join("new.txt"))
        );
    }

    #[test]
    fn accept_with_empty_input_stays_open() {
        let mut dialog = FileDialog::new(DialogMode::Open, None, None);
        assert_eq!(dialog.accept(), DialogOutcome::Pending);
    }

    #[test]
    fn common_prefix_of_names() {
        assert_eq!(common_prefix(&["notes", "notebook"]), "note");
        assert_eq!(common_prefix(&["a"]), "a");
        assert_eq!(common_prefix(&[]), "");
        assert_eq!(common_prefix(&["日本語", "日本"]), "日本");
    }
}
