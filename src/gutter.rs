//! 行番号ガター
//!
//! 文書の行数から導出する表示。変更通知を受けると再計算を遅延キューへ
//! 予約し、同じフレーム内の連続した変更は1回の再計算にまとめる

use crate::buffer::{line_count, ChangeEvent, ChangeListener};
use crate::deferred::DeferredQueue;
use std::cell::Cell;
use std::rc::Rc;

/// ガターを持ち、再計算を実行できる側
pub trait GutterHost {
    fn refresh_gutter(&mut self);
}

/// 行番号ガター
#[derive(Debug, Clone)]
pub struct LineNumberGutter {
    line_count: usize,
    pending: Rc<Cell<bool>>,
}

impl LineNumberGutter {
    pub fn new() -> Self {
        Self {
            line_count: 1,
            pending: Rc::new(Cell::new(false)),
        }
    }

    /// 表示中の行数
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// 再計算待ちかどうか
    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// 文書テキストから行番号を再計算
    pub fn refresh(&mut self, text: &str) {
        self.line_count = line_count(text);
        self.pending.set(false);
    }

    /// 番号の表示桁数
    pub fn digits(&self) -> usize {
        self.line_count.to_string().len()
    }

    /// 表示幅（番号の右に1桁の余白）
    pub fn width(&self) -> u16 {
        (self.digits() + 1) as u16
    }

    /// 指定行（0始まり）の表示ラベル。文書外の行は空白
    pub fn label(&self, line: usize) -> String {
        if line < self.line_count {
            format!("{:>width$} ", line + 1, width = self.digits())
        } else {
            " ".repeat(self.digits() + 1)
        }
    }

    /// `1..N` の番号列（改行区切り）
    pub fn numbers(&self) -> String {
        (1..=self.line_count)
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 文書の変更通知を受けるリスナーを作成
    pub fn listener<C: GutterHost + 'static>(&self, queue: DeferredQueue<C>) -> GutterRefresh<C> {
        GutterRefresh {
            queue,
            pending: Rc::clone(&self.pending),
        }
    }
}

impl Default for LineNumberGutter {
    fn default() -> Self {
        Self::new()
    }
}

/// 変更通知でガターの再計算を予約するリスナー
pub struct GutterRefresh<C> {
    queue: DeferredQueue<C>,
    pending: Rc<Cell<bool>>,
}

impl<C: GutterHost + 'static> ChangeListener for GutterRefresh<C> {
    fn on_change(&mut self, _event: &ChangeEvent) {
        if self.pending.replace(true) {
            return;
        }
        self.queue.schedule(|host: &mut C| host.refresh_gutter());
    }
}
