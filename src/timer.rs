//! 重传定时器：可取消、可重置的周期性闹钟。
//! The retransmission timer: a cancelable, reschedulable periodic alarm.
//!
//! 定时器不直接回调进发送端状态，而是把到期事件作为消息投递进发送端
//! actor 的事件循环，由同一个独占作用域串行处理。
//!
//! The timer never calls back into sender state directly. Expirations are
//! delivered as messages into the sender actor's event loop, where the same
//! exclusive scope processes them serially.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// A timer expiration delivered to the sender actor.
///
/// The generation identifies which armed timer produced the tick. A tick
/// whose generation no longer matches the live timer was emitted just before
/// a cancel and must be discarded by the receiver.
///
/// 投递给发送端actor的定时器到期事件。
///
/// generation 标识产生该tick的是哪一次武装的定时器。generation 与当前存活
/// 定时器不一致的tick是在取消前一刻发出的，接收方必须丢弃它。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    /// The arming generation of the timer that fired.
    /// 触发的定时器的武装代数。
    pub generation: u64,
}

/// A handle to one armed retransmission timer.
///
/// At most one live handle exists per sender; its existence is the single
/// source of truth for "timer armed". Rearming always replaces the handle,
/// it never mutates a live one.
///
/// 指向一次武装的重传定时器的句柄。
///
/// 每个发送端最多存在一个存活句柄；句柄的存在就是"定时器已武装"的唯一
/// 事实来源。重置定时器总是替换句柄，从不修改存活的句柄。
#[derive(Debug)]
pub struct RetransmitTimer {
    generation: u64,
    task: JoinHandle<()>,
}

impl RetransmitTimer {
    /// Arms a new timer: after `initial_delay` it sends one `TimerTick`, then
    /// one every `period` until cancelled or until the receiver is gone.
    ///
    /// 武装一个新的定时器：经过 `initial_delay` 后发送一个 `TimerTick`，
    /// 此后每隔 `period` 发送一个，直到被取消或接收端消失。
    pub fn schedule(
        tick_tx: mpsc::Sender<TimerTick>,
        generation: u64,
        initial_delay: Duration,
        period: Duration,
    ) -> Self {
        trace!(generation, ?initial_delay, ?period, "Arming retransmission timer");
        let task = tokio::spawn(async move {
            tokio::time::sleep(initial_delay).await;
            loop {
                if tick_tx.send(TimerTick { generation }).await.is_err() {
                    // The actor is gone; nothing left to retransmit for.
                    // actor已消失，没有需要重传的对象了。
                    return;
                }
                tokio::time::sleep(period).await;
            }
        });
        Self { generation, task }
    }

    /// The arming generation of this timer.
    /// 该定时器的武装代数。
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cancels the timer. Idempotent: a tick already sitting in the actor's
    /// queue is not recalled, but its stale generation makes it inert.
    ///
    /// 取消定时器。幂等：已经位于actor队列中的tick不会被撤回，
    /// 但其过期的generation会使其失效。
    pub fn cancel(self) {
        // Dropping aborts the task; see the Drop impl.
        // 丢弃句柄即中止任务；见 Drop 实现。
    }
}

impl Drop for RetransmitTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{self, Duration};

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_initial_delay_then_periodically() {
        let (tick_tx, mut tick_rx) = mpsc::channel(8);
        let _timer = RetransmitTimer::schedule(
            tick_tx,
            1,
            Duration::from_millis(3000),
            Duration::from_millis(300),
        );

        time::advance(Duration::from_millis(2999)).await;
        assert!(tick_rx.try_recv().is_err());

        time::advance(Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(tick_rx.try_recv(), Ok(TimerTick { generation: 1 }));

        time::advance(Duration::from_millis(300)).await;
        tokio::task::yield_now().await;
        assert_eq!(tick_rx.try_recv(), Ok(TimerTick { generation: 1 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_future_ticks() {
        let (tick_tx, mut tick_rx) = mpsc::channel(8);
        let timer = RetransmitTimer::schedule(
            tick_tx,
            7,
            Duration::from_millis(1000),
            Duration::from_millis(1000),
        );

        timer.cancel();
        time::advance(Duration::from_millis(5000)).await;
        tokio::task::yield_now().await;
        assert!(tick_rx.try_recv().is_err());
    }
}
