//! 編集層
//!
//! 文書テキスト・選択範囲・編集履歴をまとめたテキスト面。
//! 全ての変更は `EditCommand` として適用され、履歴と変更通知を通る

pub mod history;

pub use history::{EditCommand, HistoryEntry, HistoryKind, HistoryStep, UndoHistory};

use crate::buffer::{ChangeEvent, ChangeListener, ChangeNotifier, Selection, TextBuffer};
use crate::clipboard::Clipboard;
use crate::error::Result;
use crate::search::{self, FindOutcome};

/// カーソル移動の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
}

/// テキスト面
#[derive(Debug, Default)]
pub struct TextEditor {
    buffer: TextBuffer,
    selection: Selection,
    history: UndoHistory,
    notifier: ChangeNotifier,
    /// 上下移動で維持する桁
    preferred_column: Option<usize>,
}

impl TextEditor {
    /// 新しい空のエディタを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 履歴上限付きで作成
    pub fn with_history_limit(limit: Option<usize>) -> Self {
        Self {
            history: UndoHistory::with_limit(limit),
            ..Self::default()
        }
    }

    /// 文字列からエディタを作成（履歴は空）
    pub fn from_text(text: &str) -> Self {
        let mut history = UndoHistory::new();
        history.reset(text);
        Self {
            buffer: TextBuffer::from_text(text),
            history,
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn cursor(&self) -> usize {
        self.selection.cursor
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    /// 保存済みの内容から変わっているか（取り消しで戻れば未変更に戻る）
    pub fn is_modified(&self) -> bool {
        !self.history.is_at_saved()
    }

    /// 現在の内容を保存済みとして記録する
    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }

    /// 変更通知リスナーを追加
    pub fn add_change_listener(&mut self, listener: Box<dyn ChangeListener>) {
        self.notifier.add_listener(listener);
    }

    /// 選択範囲を設定（文書長に丸める）
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamped(self.buffer.len_chars());
        self.preferred_column = None;
        self.history.seal();
    }

    /// 文書全体を置き換える（ファイル読み込み）
    ///
    /// 履歴は破棄され、読み込んだ内容が新しい基準になる
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        let len = self.buffer.len_chars();
        let removed = self.buffer.delete(0, len)?;
        if !removed.is_empty() {
            self.notifier.notify(&ChangeEvent::Delete {
                position: 0,
                content: removed,
            });
        }
        self.buffer.insert(0, text)?;
        if !text.is_empty() {
            self.notifier.notify(&ChangeEvent::Insert {
                position: 0,
                content: text.to_string(),
            });
        }

        self.selection = Selection::caret(0);
        self.preferred_column = None;
        self.history.reset(text);
        Ok(())
    }

    /// 選択中のテキスト
    pub fn selected_text(&self) -> Option<&str> {
        if self.selection.is_empty() {
            return None;
        }
        self.buffer
            .slice(self.selection.start(), self.selection.end())
            .ok()
    }

    fn execute(
        &mut self,
        kind: HistoryKind,
        commands: Vec<EditCommand>,
        selection_after: Selection,
    ) -> Result<()> {
        if commands.is_empty() {
            return Ok(());
        }
        let selection_before = self.selection;
        for command in &commands {
            let event = command.apply(&mut self.buffer)?;
            self.notifier.notify(&event);
        }
        self.selection = selection_after;
        self.preferred_column = None;
        self.history.record(HistoryEntry {
            kind,
            commands,
            selection_before,
            selection_after,
        })?;
        Ok(())
    }

    /// 選択範囲の削除コマンド（選択なしなら空）
    fn delete_selection_commands(&self) -> Vec<EditCommand> {
        match self.selected_text() {
            Some(text) => vec![EditCommand::Delete {
                position: self.selection.start(),
                text: text.to_string(),
            }],
            None => Vec::new(),
        }
    }

    /// 選択範囲をテキストで置き換える
    pub fn insert_text(&mut self, text: &str) -> Result<()> {
        let start = self.selection.start();
        let mut commands = self.delete_selection_commands();
        let kind = if commands.is_empty() && text.chars().count() == 1 {
            HistoryKind::Typing
        } else {
            HistoryKind::Other
        };
        if !text.is_empty() {
            commands.push(EditCommand::Insert {
                position: start,
                text: text.to_string(),
            });
        }
        let after = Selection::caret(start + text.chars().count());
        self.execute(kind, commands, after)
    }

    /// 文字を挿入
    pub fn insert_char(&mut self, ch: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.insert_text(ch.encode_utf8(&mut buf))
    }

    /// 改行を挿入
    pub fn insert_newline(&mut self) -> Result<()> {
        self.insert_char('\n')
    }

    /// Backspace（選択があれば選択を削除）
    pub fn delete_backward(&mut self) -> Result<bool> {
        if !self.selection.is_empty() {
            return self.delete_selection();
        }
        let cursor = self.selection.cursor;
        if cursor == 0 {
            return Ok(false);
        }
        let text = self.buffer.slice(cursor - 1, cursor)?.to_string();
        self.execute(
            HistoryKind::DeleteBackward,
            vec![EditCommand::Delete { position: cursor - 1, text }],
            Selection::caret(cursor - 1),
        )?;
        Ok(true)
    }

    /// Delete（選択があれば選択を削除）
    pub fn delete_forward(&mut self) -> Result<bool> {
        if !self.selection.is_empty() {
            return self.delete_selection();
        }
        let cursor = self.selection.cursor;
        if cursor >= self.buffer.len_chars() {
            return Ok(false);
        }
        let text = self.buffer.slice(cursor, cursor + 1)?.to_string();
        self.execute(
            HistoryKind::Other,
            vec![EditCommand::Delete { position: cursor, text }],
            Selection::caret(cursor),
        )?;
        Ok(true)
    }

    fn delete_selection(&mut self) -> Result<bool> {
        let commands = self.delete_selection_commands();
        if commands.is_empty() {
            return Ok(false);
        }
        let after = Selection::caret(self.selection.start());
        self.execute(HistoryKind::Other, commands, after)?;
        Ok(true)
    }

    /// カーソル移動（`extend` が真なら選択を伸ばす）
    pub fn move_cursor(&mut self, movement: Movement, extend: bool) {
        let len = self.buffer.len_chars();
        let cursor = self.selection.cursor;
        let (line, col) = self.buffer.line_col(cursor);

        // 選択がある状態での左右移動は選択の端へ寄せる
        if !extend && !self.selection.is_empty() {
            match movement {
                Movement::Left => return self.collapse_to(self.selection.start()),
                Movement::Right => return self.collapse_to(self.selection.end()),
                _ => {}
            }
        }

        let mut keep_column = false;
        let target = match movement {
            Movement::Left => cursor.saturating_sub(1),
            Movement::Right => (cursor + 1).min(len),
            Movement::Up | Movement::Down => {
                keep_column = true;
                let column = *self.preferred_column.get_or_insert(col);
                if movement == Movement::Up {
                    if line == 0 {
                        0
                    } else {
                        self.buffer.position_of(line - 1, column)
                    }
                } else if line + 1 >= self.buffer.line_count() {
                    len
                } else {
                    self.buffer.position_of(line + 1, column)
                }
            }
            Movement::LineStart => self.buffer.line_start(line),
            Movement::LineEnd => self.buffer.line_start(line) + self.buffer.line_len(line),
            Movement::DocumentStart => 0,
            Movement::DocumentEnd => len,
        };

        self.selection = if extend {
            Selection {
                anchor: self.selection.anchor,
                cursor: target,
            }
        } else {
            Selection::caret(target)
        };
        if !keep_column {
            self.preferred_column = None;
        }
        self.history.seal();
    }

    fn collapse_to(&mut self, pos: usize) {
        self.selection = Selection::caret(pos);
        self.preferred_column = None;
        self.history.seal();
    }

    /// 全選択
    pub fn select_all(&mut self) {
        self.set_selection(Selection::range(0, self.buffer.len_chars()));
    }

    /// 選択範囲をクリップボードへコピー。選択なしなら何もしない
    pub fn copy(&self, clipboard: &mut dyn Clipboard) -> bool {
        match self.selected_text() {
            Some(text) => {
                clipboard.set_text(text);
                true
            }
            None => false,
        }
    }

    /// 選択範囲を切り取る。選択なしなら何もしない
    pub fn cut(&mut self, clipboard: &mut dyn Clipboard) -> Result<bool> {
        if !self.copy(clipboard) {
            return Ok(false);
        }
        self.history.seal();
        self.delete_selection()
    }

    /// クリップボードの内容で選択範囲を置き換える
    pub fn paste(&mut self, clipboard: &mut dyn Clipboard) -> Result<bool> {
        let Some(text) = clipboard.get_text().filter(|t| !t.is_empty()) else {
            return Ok(false);
        };
        self.history.seal();
        self.insert_text(&text)?;
        self.history.seal();
        Ok(true)
    }

    fn apply_step(&mut self, step: &HistoryStep) -> Result<()> {
        for command in &step.commands {
            let event = command.apply(&mut self.buffer)?;
            self.notifier.notify(&event);
        }
        self.selection = step.selection.clamped(self.buffer.len_chars());
        self.preferred_column = None;
        Ok(())
    }

    /// 取り消し。履歴がなければ何もしない
    pub fn undo(&mut self) -> Result<bool> {
        let Some(step) = self.history.undo_step() else {
            return Ok(false);
        };
        self.apply_step(&step)?;
        self.history.commit_undo();
        Ok(true)
    }

    /// やり直し。やり直す履歴がなければ何もしない
    pub fn redo(&mut self) -> Result<bool> {
        let Some(step) = self.history.redo_step() else {
            return Ok(false);
        };
        self.apply_step(&step)?;
        self.history.commit_redo();
        Ok(true)
    }

    /// 文書先頭から検索し、見つかれば選択する
    pub fn find(&mut self, pattern: &str) -> FindOutcome {
        let outcome = search::find_first(self.buffer.as_str(), pattern);
        if let FindOutcome::Found(found) = &outcome {
            self.set_selection(Selection::range(found.start, found.end));
        }
        outcome
    }

    /// 全ての一致を置換し、置換数を返す（1回の取り消しで戻る）
    pub fn replace_all(&mut self, pattern: &str, replacement: &str) -> Result<usize> {
        let matches = search::find_all(self.buffer.as_str(), pattern);
        let Some(first) = matches.first() else {
            return Ok(0);
        };
        let caret = first.start;

        // 後ろから処理すれば前方の位置はずれない
        let mut commands = Vec::with_capacity(matches.len() * 2);
        for found in matches.iter().rev() {
            commands.push(EditCommand::Delete {
                position: found.start,
                text: pattern.to_string(),
            });
            if !replacement.is_empty() {
                commands.push(EditCommand::Insert {
                    position: found.start,
                    text: replacement.to_string(),
                });
            }
        }

        self.history.seal();
        self.execute(HistoryKind::Other, commands, Selection::caret(caret))?;
        self.history.seal();
        Ok(matches.len())
    }
}
