//! 画面描画
//!
//! メニューバー・ツールバー・ガター・テキスト・ステータス行を描き、
//! 開いているメニューやダイアログを最前面に重ねる

use crate::app::{Controller, MessageDialog, Modal, Prompt};
use crate::commands::MenuItem;
use crate::error::ErrorLevel;
use crate::file::FileDialog;
use crate::input::LineInput;
use crate::ui::layout::{self, ScreenLayout};
use crate::ui::text_area::TextAreaRenderer;
use crate::ui::theme::{ComponentType, Theme};
use ratatui::{
    backend::Backend,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::io;
use unicode_width::UnicodeWidthStr;

const FILE_DIALOG_WIDTH: u16 = 64;
const FILE_DIALOG_HEIGHT: u16 = 16;
const PROMPT_WIDTH: u16 = 50;
const FILE_DIALOG_HINT: &str = "Enter: open/confirm  Tab: complete  Esc: cancel";

/// 画面全体の描画
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    theme: Theme,
    text_area: TextAreaRenderer,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            theme: Theme::dark(),
            text_area: TextAreaRenderer::new(),
        }
    }

    /// 1フレーム描画
    pub fn render<B: Backend>(&self, terminal: &mut Terminal<B>, app: &Controller) -> io::Result<()> {
        terminal.draw(|frame| self.draw(frame, app))?;
        Ok(())
    }

    /// フレームへ描画（レイアウトは `Controller::resize` で計算済み）
    pub fn draw(&self, frame: &mut Frame<'_>, app: &Controller) {
        let layout = *app.layout();

        self.draw_menu_bar(frame, app, &layout);
        self.draw_toolbar(frame, app, &layout);
        self.draw_gutter(frame, app, &layout);

        let editor = app.editor();
        let cursor = self.text_area.render(
            frame,
            layout.text,
            editor.buffer(),
            editor.selection(),
            app.viewport(),
            app.config().tab_width,
            &self.theme,
        );

        frame.render_widget(
            Paragraph::new(app.status_text()).style(self.theme.style(ComponentType::StatusLine)),
            layout.status,
        );

        match app.modal() {
            Modal::None => {
                if let Some(position) = cursor {
                    frame.set_cursor_position(position);
                }
            }
            Modal::Menu(state) => self.draw_dropdown(frame, app, &layout, state.menu, state.item),
            Modal::FileDialog(dialog) => self.draw_file_dialog(frame, layout.total, dialog),
            Modal::Prompt(prompt) => self.draw_prompt(frame, layout.total, prompt),
            Modal::Message(message) => self.draw_message(frame, layout.total, message),
        }
    }

    fn draw_menu_bar(&self, frame: &mut Frame<'_>, app: &Controller, layout: &ScreenLayout) {
        let open = match app.modal() {
            Modal::Menu(state) => Some(state.menu),
            _ => None,
        };
        let spans: Vec<Span<'static>> = app
            .menus()
            .iter()
            .enumerate()
            .map(|(idx, menu)| {
                let style = if open == Some(idx) {
                    self.theme.style(ComponentType::MenuTitleActive)
                } else {
                    self.theme.style(ComponentType::MenuBar)
                };
                Span::styled(layout::menu_title_label(menu), style)
            })
            .collect();

        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(self.theme.style(ComponentType::MenuBar)),
            layout.menu_bar,
        );
    }

    fn draw_toolbar(&self, frame: &mut Frame<'_>, app: &Controller, layout: &ScreenLayout) {
        let button = self.theme.style(ComponentType::ToolbarButton);
        let plain = self.theme.style(ComponentType::Toolbar);

        // 並びは layout::toolbar_boxes の当たり判定と一致させる
        let mut spans = vec![Span::styled(" ", plain)];
        for item in app.toolbar_items() {
            match item {
                MenuItem::Command(id) => spans.push(Span::styled(layout::toolbar_label(*id), button)),
                MenuItem::Separator => spans.push(Span::styled(layout::TOOLBAR_SEPARATOR, plain)),
            }
            spans.push(Span::styled(" ", plain));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).style(plain), layout.toolbar);
    }

    fn draw_gutter(&self, frame: &mut Frame<'_>, app: &Controller, layout: &ScreenLayout) {
        if layout.gutter.width == 0 {
            return;
        }
        let gutter = app.gutter();
        let top = app.viewport().top_line();
        let lines: Vec<Line<'static>> = (top..top + layout.gutter.height as usize)
            .map(|line| Line::from(gutter.label(line)))
            .collect();

        frame.render_widget(
            Paragraph::new(lines).style(self.theme.style(ComponentType::LineNumber)),
            layout.gutter,
        );
    }

    fn dialog_block(&self, title: &str, style: Style) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(self.theme.border_type)
            .title(format!(" {} ", title))
            .style(style)
    }

    fn draw_dropdown(&self, frame: &mut Frame<'_>, app: &Controller, layout: &ScreenLayout, index: usize, selected: usize) {
        let Some(area) = layout::dropdown_area(app.menus(), index, layout.menu_bar, layout.total) else {
            return;
        };
        let Some(menu) = app.menus().get(index) else {
            return;
        };

        let label_width = layout::menu_label_width(menu);
        let inner_width = area.width.saturating_sub(2) as usize;
        let lines: Vec<Line<'static>> = menu
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| match item {
                MenuItem::Command(id) => {
                    let style = if idx == selected {
                        self.theme.style(ComponentType::MenuItemSelected)
                    } else {
                        self.theme.style(ComponentType::MenuItem)
                    };
                    let label = layout::menu_item_label(*id, label_width);
                    let padding = inner_width.saturating_sub(label.width());
                    Line::from(Span::styled(format!("{}{}", label, " ".repeat(padding)), style))
                }
                MenuItem::Separator => Line::from("─".repeat(inner_width)),
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(self.theme.border_type)
            .style(self.theme.style(ComponentType::MenuItem));
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_file_dialog(&self, frame: &mut Frame<'_>, screen: Rect, dialog: &FileDialog) {
        let area = layout::centered(screen, FILE_DIALOG_WIDTH, FILE_DIALOG_HEIGHT);
        let block = self.dialog_block(dialog.mode().title(), self.theme.style(ComponentType::Dialog));
        let inner = block.inner(area);

        let prefix = "Path: ";
        let mut lines = vec![Line::from(vec![
            Span::raw(prefix),
            Span::styled(dialog.input().text().to_string(), self.theme.style(ComponentType::Input)),
        ])];

        let list_height = inner.height.saturating_sub(3) as usize;
        let offset = dialog
            .selected()
            .map(|idx| (idx + 1).saturating_sub(list_height))
            .unwrap_or(0);
        for (idx, entry) in dialog.entries().iter().enumerate().skip(offset).take(list_height) {
            let name = if entry.is_dir {
                format!("  {}{}", entry.name, std::path::MAIN_SEPARATOR)
            } else {
                format!("  {}", entry.name)
            };
            let line = if dialog.selected() == Some(idx) {
                Line::from(Span::styled(name, self.theme.style(ComponentType::MenuItemSelected)))
            } else {
                Line::from(name)
            };
            lines.push(line);
        }

        while lines.len() + 1 < inner.height as usize {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(FILE_DIALOG_HINT, self.theme.style(ComponentType::Info))));

        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if dialog.selected().is_none() {
            let x = inner.x + (prefix.width() + input_cursor_width(dialog.input())) as u16;
            if x < inner.x + inner.width {
                frame.set_cursor_position((x, inner.y));
            }
        }
    }

    fn draw_prompt(&self, frame: &mut Frame<'_>, screen: Rect, prompt: &Prompt) {
        let area = layout::centered(screen, PROMPT_WIDTH, 3);
        let block = self.dialog_block(prompt.kind.title(), self.theme.style(ComponentType::Dialog));
        let inner = block.inner(area);

        let label = format!("{} ", prompt.kind.label());
        let line = Line::from(vec![
            Span::raw(label.clone()),
            Span::styled(prompt.input.text().to_string(), self.theme.style(ComponentType::Input)),
        ]);

        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(line).block(block), area);

        let x = inner.x + (label.width() + input_cursor_width(&prompt.input)) as u16;
        if x < inner.x + inner.width {
            frame.set_cursor_position((x, inner.y));
        }
    }

    fn draw_message(&self, frame: &mut Frame<'_>, screen: Rect, message: &MessageDialog) {
        let text_style = match message.level {
            ErrorLevel::Info => self.theme.style(ComponentType::Info),
            ErrorLevel::Warning => self.theme.style(ComponentType::Warning),
            ErrorLevel::Error | ErrorLevel::Fatal => self.theme.style(ComponentType::Error),
        };
        let button = "[ OK ]";
        let width = (message.text.width().max(message.title.width()) + 6).max(30) as u16;
        let area = layout::centered(screen, width, 6);
        let block = self.dialog_block(&message.title, self.theme.style(ComponentType::Dialog));
        let inner_width = block.inner(area).width as usize;

        let center = |text: &str| {
            let pad = inner_width.saturating_sub(text.width()) / 2;
            format!("{}{}", " ".repeat(pad), text)
        };
        let lines = vec![
            Line::from(Span::styled(center(&message.text), text_style)),
            Line::from(""),
            Line::from(Span::styled(center(button), self.theme.style(ComponentType::MenuItemSelected))),
        ];

        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

/// 入力欄のカーソルまでの表示幅
fn input_cursor_width(input: &LineInput) -> usize {
    let before: String = input.text().chars().take(input.cursor()).collect();
    before.width()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::config::EditorConfig;
    use crate::input::{Key, KeyCode};
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    fn app_with_text(text: &str) -> Controller {
        let mut app = Controller::with_clipboard(EditorConfig::default(), Box::new(MemoryClipboard::new()));
        for ch in text.chars() {
            let key = if ch == '\n' {
                Key::plain(KeyCode::Enter)
            } else {
                Key::plain(KeyCode::Char(ch))
            };
            app.handle_key(key);
        }
        app.run_deferred();
        app
    }

    #[test]
    fn draws_bars_gutter_and_text() {
        let mut app = app_with_text("hello\nworld");
        let area = Rect::new(0, 0, 80, 10);
        app.resize(area);

        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        Renderer::new().render(&mut terminal, &app).unwrap();
        let rows = screen_text(&terminal);

        assert!(rows[0].starts_with(" File  Edit "));
        assert!(rows[1].starts_with(" [Open] [Save] │ [Cut]"));
        assert!(rows[2].starts_with("1 hello"));
        assert!(rows[3].starts_with("2 world"));
        assert!(rows[4].starts_with("  "));
        assert!(rows[9].contains("Ln 2, Col 6"));
    }

    #[test]
    fn message_dialog_is_drawn_on_top() {
        let mut app = app_with_text("hello");
        app.submit_find("xyz");
        app.resize(Rect::new(0, 0, 60, 12));

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        Renderer::new().render(&mut terminal, &app).unwrap();
        let screen = screen_text(&terminal).join("\n");

        assert!(screen.contains("Message"));
        assert!(screen.contains("Text not found."));
        assert!(screen.contains("[ OK ]"));
    }

    #[test]
    fn open_menu_lists_items_with_shortcuts() {
        let mut app = app_with_text("");
        app.open_menu(0);
        app.resize(Rect::new(0, 0, 60, 12));

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        Renderer::new().render(&mut terminal, &app).unwrap();
        let screen = screen_text(&terminal).join("\n");

        assert!(screen.contains("Open  Ctrl+O"));
        assert!(screen.contains("Exit  Ctrl+Q"));
    }
}
