//! バッファ管理モジュール
//!
//! 文書テキスト、選択範囲、変更通知を提供

pub mod selection;
pub mod text;

pub use selection::Selection;
pub use text::{line_count, TextBuffer};

/// 変更イベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Insert { position: usize, content: String },
    Delete { position: usize, content: String },
}

/// 変更通知リスナー
pub trait ChangeListener {
    fn on_change(&mut self, event: &ChangeEvent);
}

/// 変更通知システム
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Vec<Box<dyn ChangeListener>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// リスナーを追加
    pub fn add_listener(&mut self, listener: Box<dyn ChangeListener>) {
        self.listeners.push(listener);
    }

    /// 変更を通知
    pub fn notify(&mut self, event: &ChangeEvent) {
        for listener in &mut self.listeners {
            listener.on_change(event);
        }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
