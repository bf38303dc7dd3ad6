//! 端末フロントエンド
//!
//! 1回のループで「遅延処理の実行 → レイアウト更新 → 描画 → イベント1件の処理」を行う

use crate::app::Controller;
use crate::config::EditorConfig;
use crate::error::{QuillError, Result, UiError};
use crate::input::keybinding::is_press;
use crate::input::Key;
use crate::ui::Renderer;
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::Rect;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::stdout;
use std::time::Duration;

const WHEEL_STEP: isize = 3;

pub struct TuiApplication {
    controller: Controller,
    renderer: Renderer,
}

impl TuiApplication {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            controller: Controller::new(config),
            renderer: Renderer::new(),
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    pub fn run(&mut self) -> Result<()> {
        enter_terminal()?;

        let backend = CrosstermBackend::new(stdout());
        let mut terminal = match Terminal::new(backend) {
            Ok(terminal) => terminal,
            Err(err) => {
                restore_terminal();
                return Err(QuillError::Ui(UiError::TerminalInit {
                    message: err.to_string(),
                }));
            }
        };

        log::info!("event loop started");
        let loop_result = self.event_loop(&mut terminal);
        let show_cursor_result = terminal.show_cursor().map_err(|err| terminal_error("show cursor", err));
        drop(terminal);
        let cleanup_result = leave_terminal();
        log::info!("event loop finished");

        loop_result.and(show_cursor_result).and(cleanup_result)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while self.controller.is_running() {
            self.controller.run_deferred();

            let size = terminal.size().map_err(|err| terminal_error("terminal size", err))?;
            self.controller.resize(Rect::new(0, 0, size.width, size.height));
            self.renderer
                .render(terminal, &self.controller)
                .map_err(|err| terminal_error("render", err))?;

            if event::poll(Duration::from_millis(16)).map_err(|err| terminal_error("event poll", err))? {
                let event = event::read().map_err(|err| terminal_error("event read", err))?;
                self.handle_event(event);
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key_event) if is_press(&key_event) => self.controller.handle_key(Key::from(key_event)),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Paste(text) => self.controller.handle_paste(&text),
            Event::Key(_) | Event::Resize(_, _) | Event::FocusGained | Event::FocusLost => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.controller.handle_click(mouse.column, mouse.row),
            MouseEventKind::ScrollUp => self.controller.handle_scroll(-WHEEL_STEP),
            MouseEventKind::ScrollDown => self.controller.handle_scroll(WHEEL_STEP),
            _ => {}
        }
    }
}

fn enter_terminal() -> Result<()> {
    enable_raw_mode().map_err(|err| QuillError::Ui(UiError::TerminalInit {
        message: format!("enable raw mode: {}", err),
    }))?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)
        .map_err(|err| terminal_error("enter alternate screen", err))?;
    Ok(())
}

fn leave_terminal() -> Result<()> {
    let mut out = stdout();
    execute!(out, DisableBracketedPaste, DisableMouseCapture, LeaveAlternateScreen)
        .map_err(|err| terminal_error("leave alternate screen", err))?;
    disable_raw_mode().map_err(|err| terminal_error("disable raw mode", err))?;
    Ok(())
}

/// 端末を通常モードへ戻す（パニック時にも呼ばれるのでエラーは無視）
pub fn restore_terminal() {
    if let Err(err) = leave_terminal() {
        log::warn!("failed to restore terminal: {}", err);
    }
}

fn terminal_error(context: &str, err: impl std::fmt::Display) -> QuillError {
    QuillError::Ui(UiError::RenderingFailed {
        component: format!("{}: {}", context, err),
    })
}
