//! キーバインドシステム
//!
//! 固定のショートカット表。キー割り当ての変更はサポートしない

use crate::commands::CommandId;
use crate::editor::Movement;
use crossterm::event::{KeyCode as CrosstermKeyCode, KeyEvent, KeyEventKind, KeyModifiers as CrosstermModifiers};
use std::collections::HashMap;

/// キー入力の内部表現
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    /// 修飾キー
    pub modifiers: KeyModifiers,
    /// 基本キー
    pub code: KeyCode,
}

/// 修飾キーの組み合わせ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

/// 基本キーコード
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    Esc,
    Unknown,
}

impl Key {
    /// 修飾なし
    pub fn plain(code: KeyCode) -> Self {
        Self {
            modifiers: KeyModifiers::default(),
            code,
        }
    }

    /// Ctrl+文字
    pub fn ctrl(ch: char) -> Self {
        Self {
            modifiers: KeyModifiers { ctrl: true, ..KeyModifiers::default() },
            code: KeyCode::Char(ch),
        }
    }

    /// Alt+文字
    pub fn alt(ch: char) -> Self {
        Self {
            modifiers: KeyModifiers { alt: true, ..KeyModifiers::default() },
            code: KeyCode::Char(ch),
        }
    }

    /// Shift付き
    pub fn shift(code: KeyCode) -> Self {
        Self {
            modifiers: KeyModifiers { shift: true, ..KeyModifiers::default() },
            code,
        }
    }

    /// 挿入可能な文字かどうかを判定
    pub fn is_insertable_char(&self) -> bool {
        matches!(self.code, KeyCode::Char(_)) && !self.modifiers.ctrl && !self.modifiers.alt
    }

    /// 文字に変換
    pub fn to_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) => Some(c),
            _ => None,
        }
    }
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        let ctrl = event.modifiers.contains(CrosstermModifiers::CONTROL);
        let alt = event.modifiers.contains(CrosstermModifiers::ALT);
        let shift = event.modifiers.contains(CrosstermModifiers::SHIFT);

        let code = match event.code {
            // 文字キーは大文字小文字で Shift を表すので、Ctrl/Alt 併用時は小文字に揃える
            CrosstermKeyCode::Char(c) if ctrl || alt => KeyCode::Char(c.to_ascii_lowercase()),
            CrosstermKeyCode::Char(c) => KeyCode::Char(c),
            CrosstermKeyCode::Enter => KeyCode::Enter,
            CrosstermKeyCode::Backspace => KeyCode::Backspace,
            CrosstermKeyCode::Delete => KeyCode::Delete,
            CrosstermKeyCode::Tab => KeyCode::Tab,
            CrosstermKeyCode::Up => KeyCode::Up,
            CrosstermKeyCode::Down => KeyCode::Down,
            CrosstermKeyCode::Left => KeyCode::Left,
            CrosstermKeyCode::Right => KeyCode::Right,
            CrosstermKeyCode::Home => KeyCode::Home,
            CrosstermKeyCode::End => KeyCode::End,
            CrosstermKeyCode::PageUp => KeyCode::PageUp,
            CrosstermKeyCode::PageDown => KeyCode::PageDown,
            CrosstermKeyCode::F(n) => KeyCode::F(n),
            CrosstermKeyCode::Esc => KeyCode::Esc,
            _ => KeyCode::Unknown,
        };

        // 印字文字の Shift は文字自体に含まれている
        let shift = shift && !matches!(code, KeyCode::Char(_));

        Key {
            modifiers: KeyModifiers { ctrl, alt, shift },
            code,
        }
    }
}

/// キー押下イベントかどうか（リリース・リピートの区別がある端末向け）
pub fn is_press(event: &KeyEvent) -> bool {
    event.kind != KeyEventKind::Release
}

/// テキスト面への編集操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    InsertChar(char),
    Newline,
    Tab,
    Backspace,
    Delete,
    Move { movement: Movement, extend: bool },
    PageUp { extend: bool },
    PageDown { extend: bool },
    SelectAll,
}

/// キーに対応する動作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Command(CommandId),
    Edit(EditAction),
    /// メニューを開く（メニューバー上のインデックス）
    OpenMenu(usize),
}

/// 固定キーマップ
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<Key, KeyAction>,
}

impl KeyMap {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();

        for id in CommandId::ALL {
            let ch = match id {
                CommandId::Open => 'o',
                CommandId::Save => 's',
                CommandId::Exit => 'q',
                CommandId::Cut => 'x',
                CommandId::Copy => 'c',
                CommandId::Paste => 'v',
                CommandId::Undo => 'z',
                CommandId::Redo => 'y',
                CommandId::Find => 'f',
                CommandId::Replace => 'r',
            };
            bindings.insert(Key::ctrl(ch), KeyAction::Command(id));
        }

        bindings.insert(Key::ctrl('a'), KeyAction::Edit(EditAction::SelectAll));
        bindings.insert(Key::plain(KeyCode::F(10)), KeyAction::OpenMenu(0));
        bindings.insert(Key::alt('f'), KeyAction::OpenMenu(0));
        bindings.insert(Key::alt('e'), KeyAction::OpenMenu(1));

        bindings.insert(Key::plain(KeyCode::Enter), KeyAction::Edit(EditAction::Newline));
        bindings.insert(Key::plain(KeyCode::Tab), KeyAction::Edit(EditAction::Tab));
        bindings.insert(Key::plain(KeyCode::Backspace), KeyAction::Edit(EditAction::Backspace));
        bindings.insert(Key::plain(KeyCode::Delete), KeyAction::Edit(EditAction::Delete));

        let movements = [
            (KeyCode::Left, Movement::Left),
            (KeyCode::Right, Movement::Right),
            (KeyCode::Up, Movement::Up),
            (KeyCode::Down, Movement::Down),
            (KeyCode::Home, Movement::LineStart),
            (KeyCode::End, Movement::LineEnd),
        ];
        for (code, movement) in movements {
            bindings.insert(
                Key::plain(code.clone()),
                KeyAction::Edit(EditAction::Move { movement, extend: false }),
            );
            bindings.insert(
                Key::shift(code),
                KeyAction::Edit(EditAction::Move { movement, extend: true }),
            );
        }

        let ctrl_home = Key {
            modifiers: KeyModifiers { ctrl: true, ..KeyModifiers::default() },
            code: KeyCode::Home,
        };
        let ctrl_end = Key {
            modifiers: KeyModifiers { ctrl: true, ..KeyModifiers::default() },
            code: KeyCode::End,
        };
        bindings.insert(
            ctrl_home,
            KeyAction::Edit(EditAction::Move { movement: Movement::DocumentStart, extend: false }),
        );
        bindings.insert(
            ctrl_end,
            KeyAction::Edit(EditAction::Move { movement: Movement::DocumentEnd, extend: false }),
        );

        bindings.insert(Key::plain(KeyCode::PageUp), KeyAction::Edit(EditAction::PageUp { extend: false }));
        bindings.insert(Key::plain(KeyCode::PageDown), KeyAction::Edit(EditAction::PageDown { extend: false }));
        bindings.insert(Key::shift(KeyCode::PageUp), KeyAction::Edit(EditAction::PageUp { extend: true }));
        bindings.insert(Key::shift(KeyCode::PageDown), KeyAction::Edit(EditAction::PageDown { extend: true }));

        Self { bindings }
    }

    /// キーを動作へ変換。割り当てのない印字文字は文字挿入になる
    pub fn resolve(&self, key: &Key) -> Option<KeyAction> {
        if let Some(action) = self.bindings.get(key) {
            return Some(*action);
        }
        if key.is_insertable_char() {
            return key.to_char().map(|c| KeyAction::Edit(EditAction::InsertChar(c)));
        }
        None
    }

    /// コマンドに割り当てられたキー
    pub fn key_for(&self, id: CommandId) -> Option<&Key> {
        self.bindings
            .iter()
            .find(|(_, action)| **action == KeyAction::Command(id))
            .map(|(key, _)| key)
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_shortcuts_map_to_commands() {
        let keymap = KeyMap::new();
        assert_eq!(keymap.resolve(&Key::ctrl('o')), Some(KeyAction::Command(CommandId::Open)));
        assert_eq!(keymap.resolve(&Key::ctrl('z')), Some(KeyAction::Command(CommandId::Undo)));
        assert_eq!(keymap.resolve(&Key::ctrl('f')), Some(KeyAction::Command(CommandId::Find)));
        assert_eq!(keymap.resolve(&Key::ctrl('k')), None);
    }

    #[test]
    fn every_command_has_a_key() {
        let keymap = KeyMap::new();
        for id in CommandId::ALL {
            assert!(keymap.key_for(id).is_some(), "{:?} has no key", id);
        }
    }

    #[test]
    fn printable_chars_insert() {
        let keymap = KeyMap::new();
        assert_eq!(
            keymap.resolve(&Key::plain(KeyCode::Char('A'))),
            Some(KeyAction::Edit(EditAction::InsertChar('A')))
        );
    }

    #[test]
    fn shift_arrow_extends_selection() {
        let keymap = KeyMap::new();
        assert_eq!(
            keymap.resolve(&Key::shift(KeyCode::Right)),
            Some(KeyAction::Edit(EditAction::Move { movement: Movement::Right, extend: true }))
        );
    }

    #[test]
    fn crossterm_events_are_normalized() {
        let event = KeyEvent::new(CrosstermKeyCode::Char('S'), CrosstermModifiers::CONTROL | CrosstermModifiers::SHIFT);
        let key = Key::from(event);
        assert_eq!(key.code, KeyCode::Char('s'));
        assert!(key.modifiers.ctrl);

        let event = KeyEvent::new(CrosstermKeyCode::Char('A'), CrosstermModifiers::SHIFT);
        assert_eq!(Key::from(event), Key::plain(KeyCode::Char('A')));

        let event = KeyEvent::new(CrosstermKeyCode::Left, CrosstermModifiers::SHIFT);
        assert_eq!(Key::from(event), Key::shift(KeyCode::Left));
    }
}
