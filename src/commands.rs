//! コマンドシステム
//!
//! メニュー・ツールバー・ショートカットが共有する固定のコマンド集合と、
//! コマンド識別子からハンドラへの対応表

use std::collections::HashMap;
use std::fmt;

/// コマンド識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    Open,
    Save,
    Exit,
    Cut,
    Copy,
    Paste,
    Undo,
    Redo,
    Find,
    Replace,
}

impl CommandId {
    /// 全コマンド
    pub const ALL: [CommandId; 10] = [
        CommandId::Open,
        CommandId::Save,
        CommandId::Exit,
        CommandId::Cut,
        CommandId::Copy,
        CommandId::Paste,
        CommandId::Undo,
        CommandId::Redo,
        CommandId::Find,
        CommandId::Replace,
    ];

    /// メニュー・ツールバーの表示名
    pub fn label(self) -> &'static str {
        match self {
            CommandId::Open => "Open",
            CommandId::Save => "Save",
            CommandId::Exit => "Exit",
            CommandId::Cut => "Cut",
            CommandId::Copy => "Copy",
            CommandId::Paste => "Paste",
            CommandId::Undo => "Undo",
            CommandId::Redo => "Redo",
            CommandId::Find => "Find",
            CommandId::Replace => "Replace",
        }
    }

    /// ショートカットの表示
    pub fn shortcut(self) -> &'static str {
        match self {
            CommandId::Open => "Ctrl+O",
            CommandId::Save => "Ctrl+S",
            CommandId::Exit => "Ctrl+Q",
            CommandId::Cut => "Ctrl+X",
            CommandId::Copy => "Ctrl+C",
            CommandId::Paste => "Ctrl+V",
            CommandId::Undo => "Ctrl+Z",
            CommandId::Redo => "Ctrl+Y",
            CommandId::Find => "Ctrl+F",
            CommandId::Replace => "Ctrl+R",
        }
    }

    /// コマンドの説明
    pub fn description(self) -> &'static str {
        match self {
            CommandId::Open => "Open a file",
            CommandId::Save => "Save the buffer to a file",
            CommandId::Exit => "Quit the editor",
            CommandId::Cut => "Cut the selection",
            CommandId::Copy => "Copy the selection",
            CommandId::Paste => "Paste from the clipboard",
            CommandId::Undo => "Undo the last edit",
            CommandId::Redo => "Redo the last undone edit",
            CommandId::Find => "Find text",
            CommandId::Replace => "Replace all occurrences of text",
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// メニュー項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Command(CommandId),
    Separator,
}

/// メニュー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub title: &'static str,
    pub items: Vec<MenuItem>,
}

impl Menu {
    /// 選択可能な項目のインデックス
    pub fn selectable(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| matches!(item, MenuItem::Command(_)))
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// メニューバーの構成
pub fn menu_bar() -> Vec<Menu> {
    use CommandId::*;
    use MenuItem::{Command as C, Separator as S};
    vec![
        Menu {
            title: "File",
            items: vec![C(Open), C(Save), S, C(Exit)],
        },
        Menu {
            title: "Edit",
            items: vec![
                C(Cut),
                C(Copy),
                C(Paste),
                S,
                C(Undo),
                C(Redo),
                S,
                C(Find),
                C(Replace),
            ],
        },
    ]
}

/// ツールバーの構成
pub fn toolbar() -> Vec<MenuItem> {
    use CommandId::*;
    use MenuItem::{Command as C, Separator as S};
    vec![
        C(Open),
        C(Save),
        S,
        C(Cut),
        C(Copy),
        C(Paste),
        S,
        C(Undo),
        C(Redo),
        S,
        C(Find),
        C(Replace),
    ]
}

/// コマンド実行の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// 実行が成功したか
    pub success: bool,
    /// ステータス行に表示するメッセージ
    pub message: Option<String>,
    /// アプリケーションを終了するか
    pub should_quit: bool,
}

impl CommandResult {
    /// 成功結果を作成
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
            should_quit: false,
        }
    }

    /// メッセージ付き成功結果を作成
    pub fn success_with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::success()
        }
    }

    /// エラー結果を作成
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            should_quit: false,
        }
    }

    /// 終了結果を作成
    pub fn quit() -> Self {
        Self {
            should_quit: true,
            ..Self::success()
        }
    }
}

/// コマンドハンドラ
pub type Handler<C> = Box<dyn Fn(&mut C) -> CommandResult>;

/// コマンド識別子からハンドラへの対応表
pub struct DispatchTable<C> {
    handlers: HashMap<CommandId, Handler<C>>,
}

impl<C> DispatchTable<C> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// ハンドラを登録（同じ識別子は上書き）
    pub fn register(&mut self, id: CommandId, handler: impl Fn(&mut C) -> CommandResult + 'static) {
        self.handlers.insert(id, Box::new(handler));
    }

    /// 登録済みか
    pub fn contains(&self, id: CommandId) -> bool {
        self.handlers.contains_key(&id)
    }

    /// 全コマンドが登録済みか
    pub fn is_complete(&self) -> bool {
        CommandId::ALL.iter().all(|id| self.contains(*id))
    }

    /// コマンドを実行
    pub fn dispatch(&self, id: CommandId, context: &mut C) -> CommandResult {
        match self.handlers.get(&id) {
            Some(handler) => handler(context),
            None => {
                log::warn!("no handler registered for {:?}", id);
                CommandResult::error(format!("Command not available: {}", id))
            }
        }
    }
}

impl<C> Default for DispatchTable<C> {
    fn default() -> Self {
        Self::new()
    }
}
