//! フレーム後コールバックキュー
//!
//! イベント処理の完了後、描画の前にまとめて実行する処理を溜めておく。
//! スレッドは使わず、同じイベントループ上で順番を後ろへずらすだけ

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// 予約された処理
pub type Task<C> = Box<dyn FnOnce(&mut C)>;

/// 遅延実行キュー（複製はキューを共有する）
pub struct DeferredQueue<C> {
    tasks: Rc<RefCell<VecDeque<Task<C>>>>,
}

impl<C> DeferredQueue<C> {
    pub fn new() -> Self {
        Self {
            tasks: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// 処理を予約
    pub fn schedule(&self, task: impl FnOnce(&mut C) + 'static) {
        self.tasks.borrow_mut().push_back(Box::new(task));
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// 予約済みの処理を取り出す
    ///
    /// 実行中に予約された処理は次のフレームまで待つ
    pub fn take_pending(&self) -> Vec<Task<C>> {
        self.tasks.borrow_mut().drain(..).collect()
    }

    /// 予約済みの処理を順に実行し、実行数を返す
    pub fn run_pending(&self, context: &mut C) -> usize {
        let tasks = self.take_pending();
        let count = tasks.len();
        for task in tasks {
            task(context);
        }
        count
    }
}

impl<C> Clone for DeferredQueue<C> {
    fn clone(&self) -> Self {
        Self {
            tasks: Rc::clone(&self.tasks),
        }
    }
}

impl<C> Default for DeferredQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for DeferredQueue<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("pending", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_tasks_in_fifo_order() {
        let queue: DeferredQueue<Vec<u32>> = DeferredQueue::new();
        queue.schedule(|log| log.push(1));
        queue.clone().schedule(|log| log.push(2));

        let mut log = Vec::new();
        assert_eq!(queue.run_pending(&mut log), 2);
        assert_eq!(log, vec![1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn tasks_scheduled_while_running_wait_for_next_frame() {
        struct Ctx {
            queue: DeferredQueue<Ctx>,
            runs: u32,
        }

        let queue = DeferredQueue::new();
        let mut ctx = Ctx { queue: queue.clone(), runs: 0 };
        queue.schedule(|ctx: &mut Ctx| {
            ctx.runs += 1;
            ctx.queue.schedule(|ctx: &mut Ctx| ctx.runs += 10);
        });

        assert_eq!(queue.run_pending(&mut ctx), 1);
        assert_eq!(ctx.runs, 1);
        assert_eq!(queue.len(), 1);
        queue.run_pending(&mut ctx);
        assert_eq!(ctx.runs, 11);
    }
}
