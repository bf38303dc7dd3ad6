//! 編集履歴
//!
//! 可逆な編集コマンドの列とカーソル位置で取り消し・やり直しを管理する。
//! `entries[..cursor]` が適用済み、`entries[cursor..]` がやり直し可能な範囲

use crate::buffer::{ChangeEvent, Selection, TextBuffer};
use crate::error::EditError;

/// 履歴操作の最小単位
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Insert { position: usize, text: String },
    Delete { position: usize, text: String },
}

impl EditCommand {
    /// バッファへ適用し、発生した変更イベントを返す
    pub fn apply(&self, buffer: &mut TextBuffer) -> Result<ChangeEvent, EditError> {
        match self {
            EditCommand::Insert { position, text } => {
                buffer.insert(*position, text)?;
                Ok(ChangeEvent::Insert {
                    position: *position,
                    content: text.clone(),
                })
            }
            EditCommand::Delete { position, text } => {
                let end = position + text.chars().count();
                let removed = buffer.delete(*position, end)?;
                Ok(ChangeEvent::Delete {
                    position: *position,
                    content: removed,
                })
            }
        }
    }

    /// 逆操作
    pub fn inverse(&self) -> EditCommand {
        match self {
            EditCommand::Insert { position, text } => EditCommand::Delete {
                position: *position,
                text: text.clone(),
            },
            EditCommand::Delete { position, text } => EditCommand::Insert {
                position: *position,
                text: text.clone(),
            },
        }
    }
}

/// コマンド種別（連続入力の結合判定用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    Typing,
    DeleteBackward,
    Other,
}

/// 履歴エントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub kind: HistoryKind,
    pub commands: Vec<EditCommand>,
    pub selection_before: Selection,
    pub selection_after: Selection,
}

impl HistoryEntry {
    /// 取り消し時に適用するコマンド列（逆操作を逆順に）
    pub fn undo_commands(&self) -> Vec<EditCommand> {
        self.commands.iter().rev().map(EditCommand::inverse).collect()
    }

    fn can_merge(&self, next: &HistoryEntry) -> bool {
        match (self.kind, next.kind) {
            (HistoryKind::Typing, HistoryKind::Typing) => {
                match (self.commands.as_slice(), next.commands.as_slice()) {
                    (
                        [EditCommand::Insert { position: p, text: t }],
                        [EditCommand::Insert { position: np, text: nt }],
                    ) => is_word_text(t) && is_word_text(nt) && *np == p + t.chars().count(),
                    _ => false,
                }
            }
            (HistoryKind::DeleteBackward, HistoryKind::DeleteBackward) => {
                match (self.commands.as_slice(), next.commands.as_slice()) {
                    (
                        [EditCommand::Delete { position: p, text: t }],
                        [EditCommand::Delete { position: np, text: nt }],
                    ) => is_word_text(t) && is_word_text(nt) && np + nt.chars().count() == *p,
                    _ => false,
                }
            }
            _ => false,
        }
    }

    fn merge(&mut self, next: HistoryEntry) {
        match (self.commands.first_mut(), next.commands.into_iter().next()) {
            (
                Some(EditCommand::Insert { text, .. }),
                Some(EditCommand::Insert { text: more, .. }),
            ) => text.push_str(&more),
            (
                Some(EditCommand::Delete { position, text }),
                Some(EditCommand::Delete { position: np, text: more }),
            ) => {
                *position = np;
                text.insert_str(0, &more);
            }
            _ => return,
        }
        self.selection_after = next.selection_after;
    }
}

fn is_word_text(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// 取り消し・やり直しの1ステップ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStep {
    /// 適用するコマンド列
    pub commands: Vec<EditCommand>,
    /// 適用後に復元する選択範囲
    pub selection: Selection,
}

/// 編集履歴
#[derive(Debug, Clone)]
pub struct UndoHistory {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    limit: Option<usize>,
    /// 直前のエントリへの結合を禁止する
    sealed: bool,
    /// `entries[0]` を適用する前のテキスト（溢れたエントリはここへ畳み込む）
    base: TextBuffer,
    /// 保存済み内容に一致する位置
    saved: Option<usize>,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            limit: None,
            sealed: false,
            base: TextBuffer::default(),
            saved: Some(0),
        }
    }
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 上限付きの履歴（上限を超えると古いものから捨てる）
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// 現在位置
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// 以降の記録を直前のエントリへ結合しない
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// 全履歴を破棄し、`base` を新しい基準（保存済み）にする
    pub fn reset(&mut self, base: &str) {
        self.entries.clear();
        self.cursor = 0;
        self.sealed = false;
        self.base = TextBuffer::from_text(base);
        self.saved = Some(0);
    }

    /// 基準テキスト
    pub fn base(&self) -> &str {
        self.base.as_str()
    }

    /// 現在位置を保存済みとして記録する
    pub fn mark_saved(&mut self) {
        self.saved = Some(self.cursor);
        self.sealed = true;
    }

    /// 現在位置が保存済みの内容と一致するか
    pub fn is_at_saved(&self) -> bool {
        self.saved == Some(self.cursor)
    }

    /// 新しいエントリを記録する。やり直し範囲は破棄される
    pub fn record(&mut self, entry: HistoryEntry) -> Result<(), EditError> {
        if entry.commands.is_empty() {
            return Ok(());
        }

        self.entries.truncate(self.cursor);
        if self.saved.is_some_and(|saved| saved > self.cursor) {
            self.saved = None;
        }

        let sealed = std::mem::replace(&mut self.sealed, false);
        if !sealed {
            if let Some(last) = self.entries.last_mut() {
                if last.can_merge(&entry) {
                    last.merge(entry);
                    if self.saved == Some(self.cursor) {
                        self.saved = None;
                    }
                    return Ok(());
                }
            }
        }

        self.entries.push(entry);
        if let Some(limit) = self.limit {
            while self.entries.len() > limit.max(1) {
                self.evict_oldest()?;
            }
        }
        self.cursor = self.entries.len();
        Ok(())
    }

    /// 最古のエントリを基準テキストへ畳み込んで捨てる
    fn evict_oldest(&mut self) -> Result<(), EditError> {
        let oldest = self.entries.remove(0);
        for command in &oldest.commands {
            command.apply(&mut self.base)?;
        }
        self.saved = match self.saved {
            Some(saved) if saved > 0 => Some(saved - 1),
            _ => None,
        };
        Ok(())
    }

    /// 取り消しで適用するステップ（位置はまだ動かさない）
    pub fn undo_step(&self) -> Option<HistoryStep> {
        let entry = self.entries.get(self.cursor.checked_sub(1)?)?;
        Some(HistoryStep {
            commands: entry.undo_commands(),
            selection: entry.selection_before,
        })
    }

    /// やり直しで適用するステップ（位置はまだ動かさない）
    pub fn redo_step(&self) -> Option<HistoryStep> {
        let entry = self.entries.get(self.cursor)?;
        Some(HistoryStep {
            commands: entry.commands.clone(),
            selection: entry.selection_after,
        })
    }

    /// 取り消しの適用完了を記録
    pub fn commit_undo(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.sealed = true;
    }

    /// やり直しの適用完了を記録
    pub fn commit_redo(&mut self) {
        self.cursor = (self.cursor + 1).min(self.entries.len());
        self.sealed = true;
    }

    /// 基準テキストから現在位置までを再生したバッファ
    pub fn replay(&self) -> Result<TextBuffer, EditError> {
        let mut buffer = self.base.clone();
        for entry in &self.entries[..self.cursor] {
            for command in &entry.commands {
                command.apply(&mut buffer)?;
            }
        }
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typing(position: usize, text: &str) -> HistoryEntry {
        HistoryEntry {
            kind: HistoryKind::Typing,
            commands: vec![EditCommand::Insert {
                position,
                text: text.to_string(),
            }],
            selection_before: Selection::caret(position),
            selection_after: Selection::caret(position + text.chars().count()),
        }
    }

    #[test]
    fn empty_history_has_no_steps() {
        let history = UndoHistory::new();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.undo_step(), None);
        assert_eq!(history.redo_step(), None);
    }

    #[test]
    fn contiguous_word_typing_merges() {
        let mut history = UndoHistory::new();
        history.record(typing(0, "a")).unwrap();
        history.record(typing(1, "b")).unwrap();
        history.record(typing(2, " ")).unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(
            history.entries()[0].commands,
            vec![EditCommand::Insert { position: 0, text: "ab".to_string() }]
        );
        assert_eq!(history.entries()[0].selection_after, Selection::caret(2));
    }

    #[test]
    fn seal_prevents_merge() {
        let mut history = UndoHistory::new();
        history.record(typing(0, "a")).unwrap();
        history.seal();
        history.record(typing(1, "b")).unwrap();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn backspace_runs_merge_backwards() {
        let mut history = UndoHistory::new();
        for (pos, ch) in [(2, "c"), (1, "b")] {
            history.record(HistoryEntry {
                kind: HistoryKind::DeleteBackward,
                commands: vec![EditCommand::Delete { position: pos, text: ch.to_string() }],
                selection_before: Selection::caret(pos + 1),
                selection_after: Selection::caret(pos),
            })
            .unwrap();
        }
        assert_eq!(history.len(), 1);
        assert_eq!(
            history.entries()[0].commands,
            vec![EditCommand::Delete { position: 1, text: "bc".to_string() }]
        );
    }

    #[test]
    fn record_after_undo_discards_redo() {
        let mut history = UndoHistory::new();
        history.record(typing(0, "a")).unwrap();
        history.seal();
        history.record(typing(1, "b")).unwrap();
        history.commit_undo();
        assert!(history.can_redo());

        history.record(typing(1, "c")).unwrap();
        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn limit_evicts_oldest_entries() {
        let mut history = UndoHistory::with_limit(Some(2));
        for i in 0..4 {
            history.seal();
            history.record(typing(i, "x")).unwrap();
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.position(), 2);
    }

    #[test]
    fn evicted_entries_fold_into_base() {
        let mut history = UndoHistory::with_limit(Some(2));
        history.reset("> ");
        for (position, word) in [(2, "aa"), (4, " "), (5, "bb"), (7, " "), (8, "cc")] {
            history.seal();
            history.record(typing(position, word)).unwrap();
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.base(), "> aa bb");
        assert_eq!(history.replay().unwrap().as_str(), "> aa bb cc");
    }

    #[test]
    fn saved_position_follows_undo_and_redo() {
        let mut history = UndoHistory::new();
        assert!(history.is_at_saved());

        history.record(typing(0, "a")).unwrap();
        assert!(!history.is_at_saved());
        history.mark_saved();
        assert!(history.is_at_saved());

        history.record(typing(1, "b")).unwrap();
        assert_eq!(history.len(), 2);
        history.commit_undo();
        assert!(history.is_at_saved());
        history.commit_undo();
        assert!(!history.is_at_saved());
    }

    #[test]
    fn saved_position_is_lost_when_redo_is_discarded() {
        let mut history = UndoHistory::new();
        history.record(typing(0, "a")).unwrap();
        history.mark_saved();
        history.commit_undo();
        history.record(typing(0, "z")).unwrap();
        assert!(!history.is_at_saved());
        history.commit_undo();
        assert!(!history.is_at_saved());
        history.commit_redo();
        assert!(!history.is_at_saved());
    }

    #[test]
    fn undo_commands_are_inverted_in_reverse_order() {
        let entry = HistoryEntry {
            kind: HistoryKind::Other,
            commands: vec![
                EditCommand::Delete { position: 0, text: "ab".to_string() },
                EditCommand::Insert { position: 0, text: "xyz".to_string() },
            ],
            selection_before: Selection::range(0, 2),
            selection_after: Selection::caret(3),
        };
        assert_eq!(
            entry.undo_commands(),
            vec![
                EditCommand::Delete { position: 0, text: "xyz".to_string() },
                EditCommand::Insert { position: 0, text: "ab".to_string() },
            ]
        );
    }
}
