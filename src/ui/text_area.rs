//! テキストエリア描画
//!
//! タブ展開と全角幅を考慮して表示桁を計算し、選択範囲を強調表示する

use crate::buffer::{Selection, TextBuffer};
use crate::ui::theme::{ComponentType, Theme};
use crate::ui::viewport::ViewportManager;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthChar;

/// 1文字の表示幅（タブは次のタブ位置まで）
pub fn char_width(ch: char, column: usize, tab_width: usize) -> usize {
    match ch {
        '\t' => {
            let tab = tab_width.max(1);
            tab - column % tab
        }
        c if c.is_control() => 1,
        c => c.width().unwrap_or(0),
    }
}

/// 行内の文字桁を表示桁に変換
pub fn display_column(line: &str, char_column: usize, tab_width: usize) -> usize {
    line.chars()
        .take(char_column)
        .fold(0, |col, ch| col + char_width(ch, col, tab_width))
}

/// 表示桁を行内の文字桁に変換（行末を越える位置は行末）
pub fn char_column_at(line: &str, display: usize, tab_width: usize) -> usize {
    let mut col = 0;
    for (idx, ch) in line.chars().enumerate() {
        let width = char_width(ch, col, tab_width);
        if col + width > display {
            return idx;
        }
        col += width;
    }
    line.chars().count()
}

/// 表示用の文字列（タブは空白、制御文字は `?`）
fn cell_text(ch: char, width: usize) -> String {
    match ch {
        '\t' => " ".repeat(width),
        c if c.is_control() => "?".to_string(),
        c => c.to_string(),
    }
}

/// 表示行の構築に必要な情報
#[derive(Debug, Clone, Copy)]
pub struct LineView {
    /// 行頭の文字位置
    pub line_start: usize,
    pub selection: Selection,
    /// 表示開始桁
    pub left: usize,
    /// 表示可能な桁数
    pub width: usize,
    pub tab_width: usize,
}

/// 1行分の表示を構築
pub fn build_line(text: &str, view: LineView, normal: Style, selected: Style) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut pending = String::new();
    let mut pending_selected = false;
    let right = view.left + view.width;
    let mut col = 0;

    for (idx, ch) in text.chars().enumerate() {
        let width = char_width(ch, col, view.tab_width);
        let start = col;
        col += width;

        if col <= view.left {
            continue;
        }
        if start >= right || col > right {
            break;
        }

        let is_selected = view.selection.contains(view.line_start + idx);
        let cell = if start < view.left {
            // 左端で途切れた幅広文字は空白で埋める
            " ".repeat(col - view.left)
        } else {
            cell_text(ch, width)
        };

        if is_selected != pending_selected && !pending.is_empty() {
            let style = if pending_selected { selected } else { normal };
            spans.push(Span::styled(std::mem::take(&mut pending), style));
        }
        pending_selected = is_selected;
        pending.push_str(&cell);
    }

    if !pending.is_empty() {
        let style = if pending_selected { selected } else { normal };
        spans.push(Span::styled(pending, style));
    }

    Line::from(spans)
}

/// テキストエリアの描画
#[derive(Debug, Clone, Default)]
pub struct TextAreaRenderer;

impl TextAreaRenderer {
    pub fn new() -> Self {
        Self
    }

    /// テキストエリアを描画し、カーソルの画面位置を返す
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        buffer: &TextBuffer,
        selection: Selection,
        viewport: &ViewportManager,
        tab_width: usize,
        theme: &Theme,
    ) -> Option<(u16, u16)> {
        let normal = theme.style(ComponentType::TextArea);
        let selected = theme.style(ComponentType::Selection);
        let top = viewport.top_line();

        let mut line_start = buffer.line_start(top);
        let mut lines = Vec::with_capacity(area.height as usize);
        for text in buffer.lines().skip(top).take(area.height as usize) {
            let view = LineView {
                line_start,
                selection,
                left: viewport.left_column(),
                width: area.width as usize,
                tab_width,
            };
            lines.push(build_line(text, view, normal, selected));
            line_start += text.chars().count() + 1;
        }

        frame.render_widget(Paragraph::new(lines).style(normal), area);

        self.cursor_position(area, buffer, selection.cursor, viewport, tab_width)
    }

    /// カーソルの画面位置（画面外なら `None`）
    pub fn cursor_position(
        &self,
        area: Rect,
        buffer: &TextBuffer,
        cursor: usize,
        viewport: &ViewportManager,
        tab_width: usize,
    ) -> Option<(u16, u16)> {
        let (line, col) = buffer.line_col(cursor);
        let text = buffer.lines().nth(line)?;
        let display = display_column(text, col, tab_width);

        let row = line.checked_sub(viewport.top_line())?;
        let column = display.checked_sub(viewport.left_column())?;
        if row >= area.height as usize || column >= area.width as usize {
            return None;
        }
        Some((area.x + column as u16, area.y + row as u16))
    }
}
