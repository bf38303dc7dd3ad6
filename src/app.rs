//! アプリケーション制御
//!
//! 編集中の文書・行番号ガター・コマンド表・ダイアログの状態をまとめ、
//! キー入力とマウス操作をコマンドや編集操作へ振り分ける

use crate::buffer::Selection;
use crate::clipboard::{Clipboard, SystemClipboard};
use crate::commands::{menu_bar, toolbar, CommandId, CommandResult, DispatchTable, Menu, MenuItem};
use crate::config::EditorConfig;
use crate::deferred::DeferredQueue;
use crate::editor::{Movement, TextEditor};
use crate::error::{ErrorDisplay, ErrorLevel, QuillError, Result};
use crate::file::{self, DialogMode, DialogOutcome, FileDialog};
use crate::gutter::{GutterHost, LineNumberGutter};
use crate::input::{EditAction, Key, KeyAction, KeyCode, KeyMap, LineInput};
use crate::search::{self, FindOutcome};
use crate::ui::layout::{self, ScreenLayout};
use crate::ui::text_area;
use crate::ui::viewport::ViewportManager;
use ratatui::layout::Rect;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// 検索で一致しなかったときの通知
pub const NOT_FOUND_MESSAGE: &str = "Text not found.";

const UNTITLED: &str = "Untitled";

/// 開いているメニュー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuState {
    /// メニューバー上のインデックス
    pub menu: usize,
    /// 選択中の項目（区切りは選ばれない）
    pub item: usize,
}

/// 入力ダイアログの用途
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    Find,
    /// 置換対象の入力
    ReplaceFind,
    /// 置換後の文字列の入力
    ReplaceWith { pattern: String },
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            PromptKind::Find => "Find",
            PromptKind::ReplaceFind | PromptKind::ReplaceWith { .. } => "Replace",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::Find | PromptKind::ReplaceFind => "Find:",
            PromptKind::ReplaceWith { .. } => "Replace with:",
        }
    }
}

/// 1行入力ダイアログ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: LineInput,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: LineInput::new(),
        }
    }
}

/// メッセージダイアログ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDialog {
    pub title: String,
    pub text: String,
    pub level: ErrorLevel,
}

impl MessageDialog {
    /// 情報メッセージ
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            title: "Message".to_string(),
            text: text.into(),
            level: ErrorLevel::Info,
        }
    }
}

impl From<ErrorDisplay> for MessageDialog {
    fn from(display: ErrorDisplay) -> Self {
        Self {
            title: display.title,
            text: display.message,
            level: display.level,
        }
    }
}

/// 前面に出ている操作対象。キー入力はまずここへ渡る
#[derive(Debug, Clone)]
pub enum Modal {
    None,
    Menu(MenuState),
    FileDialog(FileDialog),
    Prompt(Prompt),
    Message(MessageDialog),
}

impl Modal {
    pub fn is_none(&self) -> bool {
        matches!(self, Modal::None)
    }
}

/// エディタ全体の状態とイベント処理
pub struct Controller {
    editor: TextEditor,
    gutter: LineNumberGutter,
    deferred: DeferredQueue<Controller>,
    commands: Rc<DispatchTable<Controller>>,
    clipboard: Box<dyn Clipboard>,
    keymap: KeyMap,
    menus: Vec<Menu>,
    toolbar: Vec<MenuItem>,
    config: EditorConfig,
    modal: Modal,
    file_path: Option<PathBuf>,
    notification: Option<String>,
    viewport: ViewportManager,
    layout: ScreenLayout,
    running: bool,
}

impl Controller {
    /// システムクリップボードを使って作成
    pub fn new(config: EditorConfig) -> Self {
        Self::with_clipboard(config, Box::new(SystemClipboard::new()))
    }

    pub fn with_clipboard(config: EditorConfig, clipboard: Box<dyn Clipboard>) -> Self {
        let deferred = DeferredQueue::new();
        let mut gutter = LineNumberGutter::new();
        let mut editor = TextEditor::with_history_limit(config.undo_limit);
        editor.add_change_listener(Box::new(gutter.listener(deferred.clone())));
        gutter.refresh(editor.text());

        let mut controller = Self {
            editor,
            gutter,
            deferred,
            commands: Rc::new(Self::dispatch_table()),
            clipboard,
            keymap: KeyMap::new(),
            menus: menu_bar(),
            toolbar: toolbar(),
            config,
            modal: Modal::None,
            file_path: None,
            notification: None,
            viewport: ViewportManager::default(),
            layout: ScreenLayout::default(),
            running: true,
        };
        controller.resize(Rect::new(0, 0, 80, 24));
        controller
    }

    fn dispatch_table() -> DispatchTable<Controller> {
        let mut table = DispatchTable::new();
        table.register(CommandId::Open, Controller::open_file);
        table.register(CommandId::Save, Controller::save_file);
        table.register(CommandId::Exit, Controller::exit);
        table.register(CommandId::Cut, Controller::cut);
        table.register(CommandId::Copy, Controller::copy);
        table.register(CommandId::Paste, Controller::paste);
        table.register(CommandId::Undo, Controller::undo);
        table.register(CommandId::Redo, Controller::redo);
        table.register(CommandId::Find, Controller::find);
        table.register(CommandId::Replace, Controller::replace);
        table
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn editor(&self) -> &TextEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut TextEditor {
        &mut self.editor
    }

    pub fn gutter(&self) -> &LineNumberGutter {
        &self.gutter
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn menus(&self) -> &[Menu] {
        &self.menus
    }

    pub fn toolbar_items(&self) -> &[MenuItem] {
        &self.toolbar
    }

    pub fn layout(&self) -> &ScreenLayout {
        &self.layout
    }

    pub fn viewport(&self) -> &ViewportManager {
        &self.viewport
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// 直近の通知
    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    /// ステータス行に出すファイル名
    pub fn file_label(&self) -> String {
        self.file_path
            .as_deref()
            .map(file::display_name)
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    /// ステータス行の内容
    pub fn status_text(&self) -> String {
        let (line, col) = self.editor.buffer().line_col(self.editor.cursor());
        let modified = if self.editor.is_modified() { " [+]" } else { "" };
        let mut status = format!(" {}{}  Ln {}, Col {}", self.file_label(), modified, line + 1, col + 1);
        if let Some(note) = &self.notification {
            status.push_str("  ");
            status.push_str(note);
        }
        status
    }

    // ---- コマンド ----

    /// コマンドを実行し、結果を通知と実行状態へ反映する
    pub fn execute(&mut self, id: CommandId) -> CommandResult {
        log::debug!("command: {}", id);
        let commands = Rc::clone(&self.commands);
        let result = commands.dispatch(id, self);
        self.apply_result(&result);
        self.scroll_to_cursor();
        result
    }

    fn apply_result(&mut self, result: &CommandResult) {
        if let Some(message) = &result.message {
            self.notification = Some(message.clone());
        }
        if result.should_quit {
            log::info!("exit requested");
            self.running = false;
        }
    }

    fn open_file(&mut self) -> CommandResult {
        let directory = self.dialog_directory();
        self.modal = Modal::FileDialog(FileDialog::new(DialogMode::Open, directory.as_deref(), None));
        CommandResult::success()
    }

    fn save_file(&mut self) -> CommandResult {
        let directory = self.dialog_directory();
        let name = self
            .file_path
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .map(str::to_string);
        self.modal = Modal::FileDialog(FileDialog::new(
            DialogMode::Save,
            directory.as_deref(),
            name.as_deref(),
        ));
        CommandResult::success()
    }

    fn exit(&mut self) -> CommandResult {
        CommandResult::quit()
    }

    fn cut(&mut self) -> CommandResult {
        match self.editor.cut(self.clipboard.as_mut()) {
            Ok(_) => CommandResult::success(),
            Err(err) => self.report_error(err),
        }
    }

    fn copy(&mut self) -> CommandResult {
        self.editor.copy(self.clipboard.as_mut());
        CommandResult::success()
    }

    fn paste(&mut self) -> CommandResult {
        match self.editor.paste(self.clipboard.as_mut()) {
            Ok(_) => CommandResult::success(),
            Err(err) => self.report_error(err),
        }
    }

    fn undo(&mut self) -> CommandResult {
        match self.editor.undo() {
            Ok(_) => CommandResult::success(),
            Err(err) => self.report_error(err),
        }
    }

    fn redo(&mut self) -> CommandResult {
        match self.editor.redo() {
            Ok(_) => CommandResult::success(),
            Err(err) => self.report_error(err),
        }
    }

    fn find(&mut self) -> CommandResult {
        self.modal = Modal::Prompt(Prompt::new(PromptKind::Find));
        CommandResult::success()
    }

    fn replace(&mut self) -> CommandResult {
        self.modal = Modal::Prompt(Prompt::new(PromptKind::ReplaceFind));
        CommandResult::success()
    }

    // ---- ダイアログ確定時の処理 ----

    /// ファイルを読み込んで文書を置き換える。失敗時は文書を変えずにエラー表示
    pub fn open_path(&mut self, path: &Path) -> CommandResult {
        let result = match self.load_file(path) {
            Ok(()) => CommandResult::success_with_message(format!("Opened {}", file::display_name(path))),
            Err(err) => self.report_error(err),
        };
        self.apply_result(&result);
        result
    }

    fn load_file(&mut self, path: &Path) -> Result<()> {
        let text = file::read_text(path)?;
        self.editor.set_text(&text)?;
        self.file_path = Some(path.to_path_buf());
        self.viewport.reset();
        log::info!("opened {} ({} chars)", path.display(), self.editor.buffer().len_chars());
        Ok(())
    }

    /// 文書全体をファイルへ書き出す（既存ファイルは確認なしで上書き）
    pub fn save_path(&mut self, path: &Path) -> CommandResult {
        let result = match file::write_text(path, self.editor.text()) {
            Ok(()) => {
                self.editor.mark_saved();
                self.file_path = Some(path.to_path_buf());
                log::info!("saved {}", path.display());
                CommandResult::success_with_message(format!("Saved {}", file::display_name(path)))
            }
            Err(err) => self.report_error(err),
        };
        self.apply_result(&result);
        result
    }

    /// 文書先頭から検索し、一致を選択する。見つからなければメッセージを表示
    pub fn submit_find(&mut self, pattern: &str) -> CommandResult {
        let result = match self.editor.find(pattern) {
            FindOutcome::Found(found) => {
                log::debug!("found {:?} at {}..{}", pattern, found.start, found.end);
                CommandResult::success()
            }
            FindOutcome::NotFound => {
                self.show_message(MessageDialog::info(NOT_FOUND_MESSAGE));
                CommandResult::success()
            }
        };
        self.scroll_to_cursor();
        result
    }

    /// 置換対象が文書にあれば置換後の文字列を尋ねる
    fn begin_replace_with(&mut self, pattern: String) {
        if search::find_all(self.editor.text(), &pattern).is_empty() {
            self.show_message(MessageDialog::info(NOT_FOUND_MESSAGE));
            return;
        }
        self.modal = Modal::Prompt(Prompt::new(PromptKind::ReplaceWith { pattern }));
    }

    /// 全ての一致を置換して件数を表示する
    pub fn submit_replace(&mut self, pattern: &str, replacement: &str) -> CommandResult {
        let result = match self.editor.replace_all(pattern, replacement) {
            Ok(0) => {
                self.show_message(MessageDialog::info(NOT_FOUND_MESSAGE));
                CommandResult::success()
            }
            Ok(count) => {
                let message = format!("Replaced {} occurrence(s).", count);
                log::debug!("{}", message);
                self.show_message(MessageDialog::info(message.clone()));
                CommandResult::success_with_message(message)
            }
            Err(err) => self.report_error(err),
        };
        self.apply_result(&result);
        self.scroll_to_cursor();
        result
    }

    fn show_message(&mut self, message: MessageDialog) {
        self.modal = Modal::Message(message);
    }

    /// エラーをダイアログで表示する
    pub fn show_error(&mut self, error: &QuillError) {
        self.show_message(ErrorDisplay::new(error).into());
    }

    fn report_error(&mut self, error: impl Into<QuillError>) -> CommandResult {
        let error = error.into();
        log::error!("{}", error);
        let display = ErrorDisplay::new(&error);
        let message = display.message.clone();
        self.show_message(display.into());
        CommandResult::error(message)
    }

    fn dialog_directory(&self) -> Option<PathBuf> {
        self.file_path
            .as_deref()
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .or_else(|| self.config.dialog_directory())
    }

    // ---- 入力処理 ----

    /// キー入力を処理する。ダイアログやメニューが開いていればそちらが優先
    pub fn handle_key(&mut self, key: Key) {
        let modal = std::mem::replace(&mut self.modal, Modal::None);
        match modal {
            Modal::None => {
                self.notification = None;
                self.handle_editor_key(&key);
            }
            Modal::Menu(state) => self.handle_menu_key(state, &key),
            Modal::FileDialog(dialog) => self.handle_file_dialog_key(dialog, &key),
            Modal::Prompt(prompt) => self.handle_prompt_key(prompt, &key),
            Modal::Message(message) => {
                let dismissed = matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' '));
                if !dismissed {
                    self.modal = Modal::Message(message);
                }
            }
        }
        self.scroll_to_cursor();
    }

    fn handle_editor_key(&mut self, key: &Key) {
        match self.keymap.resolve(key) {
            Some(KeyAction::Command(id)) => {
                self.execute(id);
            }
            Some(KeyAction::Edit(action)) => self.apply_edit(action),
            Some(KeyAction::OpenMenu(index)) => self.open_menu(index),
            None => log::trace!("unbound key {:?}", key),
        }
    }

    fn apply_edit(&mut self, action: EditAction) {
        let outcome = match action {
            EditAction::InsertChar(ch) => self.editor.insert_char(ch),
            EditAction::Newline => self.editor.insert_newline(),
            EditAction::Tab => self.editor.insert_char('\t'),
            EditAction::Backspace => self.editor.delete_backward().map(|_| ()),
            EditAction::Delete => self.editor.delete_forward().map(|_| ()),
            EditAction::Move { movement, extend } => {
                self.editor.move_cursor(movement, extend);
                Ok(())
            }
            EditAction::PageUp { extend } => {
                self.move_page(Movement::Up, extend);
                Ok(())
            }
            EditAction::PageDown { extend } => {
                self.move_page(Movement::Down, extend);
                Ok(())
            }
            EditAction::SelectAll => {
                self.editor.select_all();
                Ok(())
            }
        };

        if let Err(err) = outcome {
            let result = self.report_error(err);
            self.apply_result(&result);
        }
    }

    fn move_page(&mut self, movement: Movement, extend: bool) {
        let step = self.viewport.height().saturating_sub(1).max(1);
        for _ in 0..step {
            self.editor.move_cursor(movement, extend);
        }
        let delta = if movement == Movement::Up { -(step as isize) } else { step as isize };
        self.viewport.scroll_lines(delta, self.editor.buffer().line_count());
    }

    /// メニューを開く
    pub fn open_menu(&mut self, index: usize) {
        if let Some(menu) = self.menus.get(index) {
            let item = menu.selectable().first().copied().unwrap_or(0);
            self.modal = Modal::Menu(MenuState { menu: index, item });
        }
    }

    fn handle_menu_key(&mut self, state: MenuState, key: &Key) {
        let count = self.menus.len().max(1);
        match key.code {
            KeyCode::Esc | KeyCode::F(10) => {}
            KeyCode::Left => self.open_menu((state.menu + count - 1) % count),
            KeyCode::Right => self.open_menu((state.menu + 1) % count),
            KeyCode::Up => self.modal = Modal::Menu(self.step_menu_item(state, false)),
            KeyCode::Down => self.modal = Modal::Menu(self.step_menu_item(state, true)),
            KeyCode::Enter => self.activate_menu_item(state),
            _ => match self.keymap.resolve(key) {
                Some(KeyAction::OpenMenu(index)) => self.open_menu(index),
                _ => self.modal = Modal::Menu(state),
            },
        }
    }

    fn step_menu_item(&self, state: MenuState, forward: bool) -> MenuState {
        let Some(menu) = self.menus.get(state.menu) else {
            return state;
        };
        let selectable = menu.selectable();
        if selectable.is_empty() {
            return state;
        }
        let len = selectable.len();
        let pos = selectable.iter().position(|&i| i == state.item).unwrap_or(0);
        let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
        MenuState {
            item: selectable[next],
            ..state
        }
    }

    fn activate_menu_item(&mut self, state: MenuState) {
        let item = self
            .menus
            .get(state.menu)
            .and_then(|menu| menu.items.get(state.item))
            .copied();
        if let Some(MenuItem::Command(id)) = item {
            self.execute(id);
        }
    }

    fn handle_prompt_key(&mut self, mut prompt: Prompt, key: &Key) {
        match key.code {
            KeyCode::Esc => log::debug!("{} cancelled", prompt.kind.title()),
            KeyCode::Enter => self.submit_prompt(prompt),
            _ => {
                self.edit_input(&mut prompt.input, key);
                self.modal = Modal::Prompt(prompt);
            }
        }
    }

    fn submit_prompt(&mut self, prompt: Prompt) {
        let text = prompt.input.text().to_string();
        match prompt.kind {
            PromptKind::Find => {
                self.submit_find(&text);
            }
            PromptKind::ReplaceFind => self.begin_replace_with(text),
            PromptKind::ReplaceWith { pattern } => {
                self.submit_replace(&pattern, &text);
            }
        }
    }

    fn handle_file_dialog_key(&mut self, mut dialog: FileDialog, key: &Key) {
        match key.code {
            KeyCode::Esc => log::debug!("{} dialog cancelled", dialog.mode().title()),
            KeyCode::Enter => match dialog.accept() {
                DialogOutcome::Confirmed(path) => match dialog.mode() {
                    DialogMode::Open => {
                        self.open_path(&path);
                    }
                    DialogMode::Save => {
                        self.save_path(&path);
                    }
                },
                DialogOutcome::Pending => self.modal = Modal::FileDialog(dialog),
            },
            KeyCode::Tab => {
                dialog.complete();
                self.modal = Modal::FileDialog(dialog);
            }
            KeyCode::Up => {
                dialog.select_previous();
                self.modal = Modal::FileDialog(dialog);
            }
            KeyCode::Down => {
                dialog.select_next();
                self.modal = Modal::FileDialog(dialog);
            }
            _ => {
                if self.edit_input(dialog.input_mut(), key) {
                    dialog.refresh();
                }
                self.modal = Modal::FileDialog(dialog);
            }
        }
    }

    /// 入力欄の編集。内容が変わったら真
    fn edit_input(&mut self, input: &mut LineInput, key: &Key) -> bool {
        if *key == Key::ctrl('v') {
            return match self.clipboard.get_text() {
                Some(text) => {
                    input.insert_str(&text);
                    true
                }
                None => false,
            };
        }
        if key.modifiers.ctrl || key.modifiers.alt {
            return false;
        }
        match key.code {
            KeyCode::Char(ch) => {
                input.insert(ch);
                true
            }
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => {
                input.move_left();
                false
            }
            KeyCode::Right => {
                input.move_right();
                false
            }
            KeyCode::Home => {
                input.move_home();
                false
            }
            KeyCode::End => {
                input.move_end();
                false
            }
            _ => false,
        }
    }

    /// 端末からの貼り付け（ブラケットペースト）
    pub fn handle_paste(&mut self, text: &str) {
        if self.modal.is_none() {
            if let Err(err) = self.editor.insert_text(text) {
                let result = self.report_error(err);
                self.apply_result(&result);
            }
            self.scroll_to_cursor();
            return;
        }
        match &mut self.modal {
            Modal::Prompt(prompt) => prompt.input.insert_str(text),
            Modal::FileDialog(dialog) => {
                dialog.input_mut().insert_str(text);
                dialog.refresh();
            }
            Modal::None | Modal::Menu(_) | Modal::Message(_) => {}
        }
    }

    /// マウスの左クリック
    pub fn handle_click(&mut self, column: u16, row: u16) {
        let title_boxes = layout::menu_title_boxes(&self.menus, self.layout.menu_bar);
        match &self.modal {
            Modal::None => {}
            Modal::Menu(state) => {
                let state = *state;
                self.modal = Modal::None;
                let item = layout::dropdown_item_at(
                    &self.menus,
                    state.menu,
                    self.layout.menu_bar,
                    self.layout.total,
                    column,
                    row,
                );
                if let Some(item) = item {
                    self.activate_menu_item(MenuState { item, ..state });
                } else if let Some(index) = layout::hit(&title_boxes, column, row) {
                    if index != state.menu {
                        self.open_menu(index);
                    }
                }
                return;
            }
            Modal::FileDialog(_) | Modal::Prompt(_) | Modal::Message(_) => return,
        }

        if let Some(index) = layout::hit(&title_boxes, column, row) {
            self.open_menu(index);
            return;
        }

        let buttons = layout::toolbar_boxes(&self.toolbar, self.layout.toolbar);
        if let Some(id) = layout::hit(&buttons, column, row) {
            self.notification = None;
            self.execute(id);
            return;
        }

        if layout::is_inside(self.layout.text, column, row) {
            self.place_cursor(column - self.layout.text.x, row - self.layout.text.y);
        }
    }

    fn place_cursor(&mut self, column: u16, row: u16) {
        let position = {
            let buffer = self.editor.buffer();
            let line = (self.viewport.top_line() + row as usize).min(buffer.line_count() - 1);
            let display = self.viewport.left_column() + column as usize;
            let text = buffer.lines().nth(line).unwrap_or("");
            let col = text_area::char_column_at(text, display, self.config.tab_width);
            buffer.position_of(line, col)
        };
        self.editor.set_selection(Selection::caret(position));
    }

    /// マウスホイールによるスクロール（カーソルは動かさない）
    pub fn handle_scroll(&mut self, delta: isize) {
        let total = self.editor.buffer().line_count();
        self.viewport.scroll_lines(delta, total);
    }

    // ---- 描画前の処理 ----

    /// 予約済みの遅延処理（ガター再計算など）を実行
    pub fn run_deferred(&mut self) -> usize {
        let queue = self.deferred.clone();
        queue.run_pending(self)
    }

    /// ガター幅（非表示なら0）
    pub fn gutter_width(&self) -> u16 {
        if self.config.show_line_numbers {
            self.gutter.width()
        } else {
            0
        }
    }

    /// 画面サイズに合わせてレイアウトを更新
    pub fn resize(&mut self, area: Rect) {
        let layout = ScreenLayout::compute(area, self.gutter_width());
        let changed = layout.text != self.layout.text;
        self.layout = layout;
        self.viewport
            .set_dimensions(layout.text.height as usize, layout.text.width as usize);
        if changed {
            self.scroll_to_cursor();
        }
    }

    fn scroll_to_cursor(&mut self) {
        let buffer = self.editor.buffer();
        let (line, col) = buffer.line_col(self.editor.cursor());
        let text = buffer.lines().nth(line).unwrap_or("");
        let display = text_area::display_column(text, col, self.config.tab_width);
        self.viewport.clamp(buffer.line_count());
        self.viewport.ensure_visible(line, display);
    }
}

impl GutterHost for Controller {
    fn refresh_gutter(&mut self) {
        self.gutter.refresh(self.editor.text());
        log::trace!("gutter refreshed: {} lines", self.gutter.line_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;

    fn controller() -> Controller {
        Controller::with_clipboard(EditorConfig::default(), Box::new(MemoryClipboard::new()))
    }

    fn menu_state(modal: &Modal) -> Option<MenuState> {
        match modal {
            Modal::Menu(state) => Some(*state),
            _ => None,
        }
    }

    fn type_text(app: &mut Controller, text: &str) {
        for ch in text.chars() {
            let key = match ch {
                '\n' => Key::plain(KeyCode::Enter),
                c => Key::plain(KeyCode::Char(c)),
            };
            app.handle_key(key);
        }
    }

    #[test]
    fn every_command_is_dispatchable() {
        assert!(Controller::dispatch_table().is_complete());
    }

    #[test]
    fn find_prompt_selects_match() {
        let mut app = controller();
        type_text(&mut app, "hello\nworld");

        app.handle_key(Key::ctrl('f'));
        assert!(matches!(app.modal(), Modal::Prompt(p) if p.kind == PromptKind::Find));
        type_text(&mut app, "world");
        app.handle_key(Key::plain(KeyCode::Enter));

        assert!(app.modal().is_none());
        assert_eq!(app.editor().selection(), Selection::range(6, 11));
    }

    #[test]
    fn find_escape_has_no_effect() {
        let mut app = controller();
        type_text(&mut app, "hello");
        let before = app.editor().selection();

        app.handle_key(Key::ctrl('f'));
        type_text(&mut app, "xyz");
        app.handle_key(Key::plain(KeyCode::Esc));

        assert!(app.modal().is_none());
        assert_eq!(app.editor().selection(), before);
    }

    #[test]
    fn missing_text_shows_message_until_dismissed() {
        let mut app = controller();
        type_text(&mut app, "hello");
        app.submit_find("xyz");

        match app.modal() {
            Modal::Message(message) => assert_eq!(message.text, NOT_FOUND_MESSAGE),
            other => panic!("unexpected modal {:?}", other),
        }
        app.handle_key(Key::plain(KeyCode::Char('a')));
        assert!(matches!(app.modal(), Modal::Message(_)));
        app.handle_key(Key::plain(KeyCode::Enter));
        assert!(app.modal().is_none());
        assert_eq!(app.editor().text(), "hello");
    }

    #[test]
    fn replace_flow_reports_count() {
        let mut app = controller();
        type_text(&mut app, "a-a-a");

        app.handle_key(Key::ctrl('r'));
        type_text(&mut app, "a");
        app.handle_key(Key::plain(KeyCode::Enter));
        assert!(matches!(
            app.modal(),
            Modal::Prompt(Prompt { kind: PromptKind::ReplaceWith { .. }, .. })
        ));
        type_text(&mut app, "bb");
        app.handle_key(Key::plain(KeyCode::Enter));

        assert_eq!(app.editor().text(), "bb-bb-bb");
        match app.modal() {
            Modal::Message(message) => assert_eq!(message.text, "Replaced 3 occurrence(s)."),
            other => panic!("unexpected modal {:?}", other),
        }

        app.handle_key(Key::plain(KeyCode::Esc));
        app.handle_key(Key::ctrl('z'));
        assert_eq!(app.editor().text(), "a-a-a");
    }

    #[test]
    fn replace_of_absent_text_stops_after_first_prompt() {
        let mut app = controller();
        type_text(&mut app, "abc");
        app.handle_key(Key::ctrl('r'));
        type_text(&mut app, "zz");
        app.handle_key(Key::plain(KeyCode::Enter));
        match app.modal() {
            Modal::Message(message) => assert_eq!(message.text, NOT_FOUND_MESSAGE),
            other => panic!("unexpected modal {:?}", other),
        }
    }

    #[test]
    fn menu_navigation_activates_command() {
        let mut app = controller();
        app.handle_key(Key::alt('e'));
        assert_eq!(
            menu_state(app.modal()),
            Some(MenuState { menu: 1, item: 0 })
        );

        // Cut, Copy, Paste, ---, Undo ... 区切りは飛ばす
        for _ in 0..6 {
            app.handle_key(Key::plain(KeyCode::Down));
        }
        assert_eq!(menu_state(app.modal()), Some(MenuState { menu: 1, item: 8 }));
        app.handle_key(Key::plain(KeyCode::Enter));
        assert!(matches!(app.modal(), Modal::Prompt(p) if p.kind == PromptKind::ReplaceFind));
    }

    #[test]
    fn menu_left_right_wraps() {
        let mut app = controller();
        app.handle_key(Key::plain(KeyCode::F(10)));
        app.handle_key(Key::plain(KeyCode::Left));
        assert_eq!(menu_state(app.modal()), Some(MenuState { menu: 1, item: 0 }));
        app.handle_key(Key::plain(KeyCode::Right));
        assert_eq!(menu_state(app.modal()), Some(MenuState { menu: 0, item: 0 }));
        app.handle_key(Key::plain(KeyCode::Esc));
        assert!(app.modal().is_none());
    }

    #[test]
    fn exit_stops_running() {
        let mut app = controller();
        app.handle_key(Key::ctrl('q'));
        assert!(!app.is_running());
    }

    #[test]
    fn copy_paste_through_clipboard() {
        let mut app = controller();
        type_text(&mut app, "abc");
        app.handle_key(Key::ctrl('a'));
        app.handle_key(Key::ctrl('c'));
        app.handle_key(Key {
            modifiers: Default::default(),
            code: KeyCode::End,
        });
        app.handle_key(Key::ctrl('v'));
        assert_eq!(app.editor().text(), "abcabc");
    }

    #[test]
    fn gutter_follows_edits_after_deferred_run() {
        let mut app = controller();
        type_text(&mut app, "a\nb\nc");
        assert_eq!(app.gutter().line_count(), 1);
        assert!(app.gutter().is_pending());

        assert_eq!(app.run_deferred(), 1);
        assert_eq!(app.gutter().line_count(), 3);
        assert!(!app.gutter().is_pending());
    }

    #[test]
    fn toolbar_click_dispatches_command() {
        let mut app = controller();
        let boxes = layout::toolbar_boxes(app.toolbar_items(), app.layout().toolbar);
        let find = boxes
            .iter()
            .find(|b| b.target == CommandId::Find)
            .map(|b| b.area)
            .unwrap();
        app.handle_click(find.x, find.y);
        assert!(matches!(app.modal(), Modal::Prompt(p) if p.kind == PromptKind::Find));
    }

    #[test]
    fn click_in_text_moves_cursor() {
        let mut app = controller();
        type_text(&mut app, "hello\nworld");
        app.run_deferred();
        app.resize(Rect::new(0, 0, 80, 24));

        let text = app.layout().text;
        app.handle_click(text.x + 3, text.y + 1);
        assert_eq!(app.editor().cursor(), 9);

        app.handle_click(text.x + 40, text.y + 10);
        assert_eq!(app.editor().cursor(), 11);
    }

    #[test]
    fn status_text_shows_position_and_modified_marker() {
        let mut app = controller();
        assert_eq!(app.status_text(), " Untitled  Ln 1, Col 1");
        type_text(&mut app, "ab\nc");
        assert_eq!(app.status_text(), " Untitled [+]  Ln 2, Col 2");
    }
}
