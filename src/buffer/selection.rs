//! 選択範囲

/// カーソルとアンカーで表す選択範囲
///
/// `anchor == cursor` のときは選択なし。範囲は `[start, end)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub cursor: usize,
}

impl Selection {
    /// カーソルのみ（空の選択）
    pub fn caret(pos: usize) -> Self {
        Self {
            anchor: pos,
            cursor: pos,
        }
    }

    /// 範囲選択（カーソルは `end` 側）
    pub fn range(start: usize, end: usize) -> Self {
        Self {
            anchor: start,
            cursor: end,
        }
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.cursor)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.cursor)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.cursor
    }

    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start() && pos < self.end()
    }

    /// 文字数上限に丸める
    pub fn clamped(self, len: usize) -> Self {
        Self {
            anchor: self.anchor.min(len),
            cursor: self.cursor.min(len),
        }
    }
}
