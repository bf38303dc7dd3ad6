//! 1行入力フィールド
//!
//! ダイアログの入力欄で使う。カーソルは文字単位

/// 1行入力の状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInput {
    text: String,
    cursor: usize,
}

impl LineInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// 初期値付きで作成（カーソルは末尾）
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// 内容を置き換える（カーソルは末尾）
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = text.chars().count();
    }

    fn byte_index(&self, pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(pos)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len())
    }

    pub fn insert(&mut self, ch: char) {
        let idx = self.byte_index(self.cursor);
        self.text.insert(idx, ch);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        for ch in s.chars().filter(|c| *c != '\n' && *c != '\r') {
            self.insert(ch);
        }
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let idx = self.byte_index(self.cursor);
        self.text.remove(idx);
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.text.chars().count() {
            return false;
        }
        let idx = self.byte_index(self.cursor);
        self.text.remove(idx);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_at_cursor() {
        let mut input = LineInput::with_text("helo");
        input.move_left();
        input.insert('l');
        assert_eq!(input.text(), "hello");
        assert_eq!(input.cursor(), 4);

        input.move_home();
        assert!(!input.backspace());
        assert!(input.delete());
        assert_eq!(input.text(), "ello");
    }

    #[test]
    fn insert_str_drops_line_breaks() {
        let mut input = LineInput::new();
        input.insert_str("a\r\nb");
        assert_eq!(input.text(), "ab");
    }

    #[test]
    fn multibyte_cursor() {
        let mut input = LineInput::with_text("日本");
        input.backspace();
        assert_eq!(input.text(), "日");
        input.move_end();
        input.insert('語');
        assert_eq!(input.text(), "日語");
    }
}
