//! 文書テキスト
//!
//! 全ての位置は文字（`char`）単位のインデックス

use crate::error::EditError;

/// 編集対象のテキスト本体
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    /// 文字数キャッシュ
    char_len: usize,
}

impl TextBuffer {
    /// 新しい空のバッファを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 文字列からバッファを作成
    pub fn from_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            char_len: text.chars().count(),
        }
    }

    /// 全テキスト
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// 文字数
    pub fn len_chars(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// 行数（改行文字の数 + 1）
    pub fn line_count(&self) -> usize {
        line_count(&self.text)
    }

    /// 文字位置をバイト位置に変換
    pub fn char_to_byte(&self, pos: usize) -> Result<usize, EditError> {
        if pos > self.char_len {
            return Err(EditError::OutOfBounds(pos));
        }
        if pos == self.char_len {
            return Ok(self.text.len());
        }
        self.text
            .char_indices()
            .nth(pos)
            .map(|(idx, _)| idx)
            .ok_or(EditError::OutOfBounds(pos))
    }

    fn byte_range(&self, start: usize, end: usize) -> Result<(usize, usize), EditError> {
        if start > end || end > self.char_len {
            return Err(EditError::InvalidRange { start, end });
        }
        Ok((self.char_to_byte(start)?, self.char_to_byte(end)?))
    }

    /// 指定範囲のテキストを取得
    pub fn slice(&self, start: usize, end: usize) -> Result<&str, EditError> {
        let (byte_start, byte_end) = self.byte_range(start, end)?;
        Ok(&self.text[byte_start..byte_end])
    }

    /// 指定位置に文字列を挿入
    pub fn insert(&mut self, pos: usize, s: &str) -> Result<(), EditError> {
        let byte_pos = self.char_to_byte(pos)?;
        self.text.insert_str(byte_pos, s);
        self.char_len += s.chars().count();
        Ok(())
    }

    /// 指定範囲を削除し、削除したテキストを返す
    pub fn delete(&mut self, start: usize, end: usize) -> Result<String, EditError> {
        let (byte_start, byte_end) = self.byte_range(start, end)?;
        let removed: String = self.text.drain(byte_start..byte_end).collect();
        self.char_len -= end - start;
        Ok(removed)
    }

    /// 文字位置を（行, 桁）に変換（どちらも0始まり、文字単位）
    pub fn line_col(&self, pos: usize) -> (usize, usize) {
        let mut line = 0;
        let mut col = 0;
        for ch in self.text.chars().take(pos) {
            if ch == '\n' {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (line, col)
    }

    /// 行の先頭位置
    pub fn line_start(&self, line: usize) -> usize {
        if line == 0 {
            return 0;
        }
        let mut seen = 0;
        for (idx, ch) in self.text.chars().enumerate() {
            if ch == '\n' {
                seen += 1;
                if seen == line {
                    return idx + 1;
                }
            }
        }
        self.char_len
    }

    /// 行の長さ（改行を含まない文字数）
    pub fn line_len(&self, line: usize) -> usize {
        self.text
            .split('\n')
            .nth(line)
            .map(|l| l.chars().count())
            .unwrap_or(0)
    }

    /// （行, 桁）を文字位置に変換。範囲外は行末・文末に丸める
    pub fn position_of(&self, line: usize, col: usize) -> usize {
        let last_line = self.line_count() - 1;
        let line = line.min(last_line);
        self.line_start(line) + col.min(self.line_len(line))
    }

    /// 行ごとのテキスト（最後の改行の後の空行も含む）
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}

/// 改行文字の数 + 1
pub fn line_count(text: &str) -> usize {
    1 + text.bytes().filter(|&b| b == b'\n').count()
}
