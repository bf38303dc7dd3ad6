//! ビューポート管理
//!
//! 画面に表示するテキスト領域のスクロール位置を管理する。
//! 横方向は表示桁（タブ展開・全角幅込み）で数える

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportManager {
    /// 表示の開始行
    top_line: usize,
    /// 表示の開始桁
    left_column: usize,
    /// 表示可能な行数
    height: usize,
    /// 表示可能な桁数
    width: usize,
}

impl ViewportManager {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            top_line: 0,
            left_column: 0,
            height: height.max(1),
            width: width.max(1),
        }
    }

    /// ビューポートの寸法を更新
    pub fn set_dimensions(&mut self, height: usize, width: usize) {
        self.height = height.max(1);
        self.width = width.max(1);
    }

    /// カーソル位置が画面内に収まるようスクロールする
    ///
    /// 戻り値はスクロールが発生したかどうか
    pub fn ensure_visible(&mut self, cursor_line: usize, cursor_column: usize) -> bool {
        let before = (self.top_line, self.left_column);

        if cursor_line < self.top_line {
            self.top_line = cursor_line;
        } else if cursor_line >= self.top_line + self.height {
            self.top_line = cursor_line + 1 - self.height;
        }

        // カーソルは行末の次の桁にも置けるので1桁分の余裕を見る
        if cursor_column < self.left_column {
            self.left_column = cursor_column;
        } else if cursor_column >= self.left_column + self.width {
            self.left_column = cursor_column + 1 - self.width;
        }

        before != (self.top_line, self.left_column)
    }

    /// 行単位のスクロール（文書末を越えない）
    pub fn scroll_lines(&mut self, delta: isize, total_lines: usize) {
        let max_top = total_lines.saturating_sub(1);
        self.top_line = if delta < 0 {
            self.top_line.saturating_sub(delta.unsigned_abs())
        } else {
            (self.top_line + delta as usize).min(max_top)
        };
    }

    /// 文書が短くなった場合に開始行を詰める
    pub fn clamp(&mut self, total_lines: usize) {
        self.top_line = self.top_line.min(total_lines.saturating_sub(1));
    }

    /// 表示位置を先頭へ戻す
    pub fn reset(&mut self) {
        self.top_line = 0;
        self.left_column = 0;
    }

    /// 現在の表示開始行を取得
    pub fn top_line(&self) -> usize {
        self.top_line
    }

    /// 現在の表示開始桁を取得
    pub fn left_column(&self) -> usize {
        self.left_column
    }

    /// 表示領域の高さを取得
    pub fn height(&self) -> usize {
        self.height
    }

    /// 表示領域の幅を取得
    pub fn width(&self) -> usize {
        self.width
    }
}

impl Default for ViewportManager {
    fn default() -> Self {
        Self::new(1, 1)
    }
}
