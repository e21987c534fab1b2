//! 发送窗口：被actor独占持有的串行化状态机。
//! The send window: the serialized state machine exclusively owned by the actor.
//!
//! 所有字段只被发送端actor的事件循环触碰。定时器的取消与重置和触发它们
//! 的状态变更发生在同一次消息处理内，对外永远是一个原子步骤。
//!
//! Every field here is touched only by the sender actor's event loop. Timer
//! cancel/rearm happens within the same message-handling step as the state
//! mutation that triggered it, so the pair is externally one atomic step.

use crate::{
    config::Config,
    event::WindowEvent,
    reliability::{CongestionController, FlightStore},
    segment::Segment,
    timer::{RetransmitTimer, TimerTick},
    transport::TransportSink,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// The sender-side window state: congestion control, outstanding segments,
/// duplicate-ack bookkeeping and the retransmission timer handle.
///
/// 发送端窗口状态：拥塞控制、在途段、重复ACK记账以及重传定时器句柄。
pub(crate) struct SenderWindow<S: TransportSink> {
    config: Arc<Config>,
    congestion: CongestionController,
    store: FlightStore,
    transport: Arc<S>,
    /// Where armed timers deliver their expirations.
    /// 武装的定时器向何处投递到期事件。
    tick_tx: mpsc::Sender<TimerTick>,
    /// `Some` is the single source of truth for "timer armed".
    /// `Some` 是"定时器已武装"的唯一事实来源。
    timer: Option<RetransmitTimer>,
    /// Monotonic generation stamped onto each armed timer, so ticks from a
    /// cancelled timer still sitting in the queue are recognized as stale.
    ///
    /// 打在每次武装的定时器上的单调代数，使已取消定时器遗留在队列中的
    /// tick能被识别为过期。
    next_timer_generation: u64,
    /// The most recently accepted cumulative ack, if any.
    /// 最近被接受的累积ACK（如果有）。
    last_cumulative_ack: Option<u32>,
    /// The number of consecutive acks equal to `last_cumulative_ack`.
    /// 与 `last_cumulative_ack` 相等的连续ACK数量。
    duplicate_count: u32,
    events: mpsc::UnboundedSender<WindowEvent>,
}

impl<S: TransportSink> SenderWindow<S> {
    pub(crate) fn new(
        config: Arc<Config>,
        transport: Arc<S>,
        tick_tx: mpsc::Sender<TimerTick>,
        events: mpsc::UnboundedSender<WindowEvent>,
    ) -> Self {
        let congestion = CongestionController::new(&config.congestion_control);
        Self {
            config,
            congestion,
            store: FlightStore::new(),
            transport,
            tick_tx,
            timer: None,
            next_timer_generation: 0,
            last_cumulative_ack: None,
            duplicate_count: 0,
            events,
        }
    }

    /// Admits a newly formed segment into the window. The caller is expected
    /// to have consulted `is_window_full` first; this never rejects.
    ///
    /// 将新生成的段纳入窗口。调用方应先查询过 `is_window_full`；
    /// 本方法从不拒绝。
    pub(crate) fn submit(&mut self, segment: Segment) {
        let index = segment.index(self.config.reliability.segment_size);
        self.store.insert(index, segment);

        if self.timer.is_none() {
            self.arm_timer(
                self.config.reliability.rto_initial_delay,
                self.config.reliability.rto_period,
            );
        }
    }

    /// Whether the window has no room for another segment.
    /// 窗口是否已没有容纳新段的空间。
    pub(crate) fn is_window_full(&self) -> bool {
        self.congestion.congestion_window() as usize <= self.store.len()
    }

    /// Processes one acknowledgment from the receive path.
    /// 处理一个来自接收路径的确认。
    pub(crate) async fn on_ack(&mut self, ack_index: u32) {
        if self.last_cumulative_ack == Some(ack_index) {
            self.duplicate_count += 1;
            trace!(ack_index, count = self.duplicate_count, "Duplicate ack");
            if self.duplicate_count == self.config.reliability.duplicate_ack_threshold {
                self.fast_retransmit(ack_index).await;
            }
            return;
        }

        // New cumulative ack: everything at or below it leaves the window.
        // 新的累积ACK：其及以下的所有段离开窗口。
        let removed = self.store.remove_up_to(ack_index);
        debug!(ack_index, removed, outstanding = self.store.len(), "New cumulative ack");

        self.cancel_timer();
        if !self.store.is_empty() {
            self.arm_timer(
                self.config.reliability.rto_initial_delay,
                self.config.reliability.recovery_period,
            );
        }

        self.last_cumulative_ack = Some(ack_index);
        self.duplicate_count = 1;

        if self.congestion.on_new_ack() {
            self.emit(WindowEvent::WindowExpand {
                cwnd: self.congestion.congestion_window(),
            });
        }
    }

    /// Handles one timer expiration, ignoring ticks from cancelled timers.
    /// 处理一次定时器到期，忽略来自已取消定时器的tick。
    pub(crate) async fn on_tick(&mut self, tick: TimerTick) {
        let live = self.timer.as_ref().map(RetransmitTimer::generation);
        if live != Some(tick.generation) {
            trace!(generation = tick.generation, "Ignoring stale timer tick");
            return;
        }
        self.on_timeout().await;
    }

    /// The retransmission-timeout response: collapse the window, resend the
    /// lowest outstanding segments within the new window, rearm if anything
    /// is still outstanding.
    ///
    /// 重传超时响应：收缩窗口，在新窗口内重发索引最低的在途段，
    /// 若仍有在途段则重新武装定时器。
    pub(crate) async fn on_timeout(&mut self) {
        self.congestion.on_rto();
        self.emit(WindowEvent::RtoCollapse {
            cwnd: self.congestion.congestion_window(),
            ssthresh: self.congestion.slow_start_threshold(),
        });

        self.cancel_timer();

        let limit = self.congestion.congestion_window() as usize;
        let candidates: Vec<u32> = self.store.ascending_indices().take(limit).collect();
        for index in candidates {
            // A missing index means the segment was acknowledged in the
            // meantime; that is expected, not an error.
            // 索引缺失意味着该段在此期间已被确认；这是预期情况，不是错误。
            let Some(segment) = self.store.get(index).cloned() else {
                trace!(index, "Segment already acknowledged, skipping retransmit");
                continue;
            };
            debug!(index, "Timeout retransmit");
            self.transport.send(segment).await;
            self.emit(WindowEvent::Retransmit { index });
        }

        if !self.store.is_empty() {
            self.arm_timer(
                self.config.reliability.rto_initial_delay,
                self.config.reliability.rto_period,
            );
        }
    }

    /// The triple-duplicate-ack response: resend the suspected-lost segment
    /// (the one just above the repeated ack) if it is still outstanding, then
    /// apply fast recovery either way.
    ///
    /// 三重重复ACK响应：若疑似丢失的段（重复ACK之上的那个）仍在途则重发，
    /// 随后无论如何都执行快恢复。
    async fn fast_retransmit(&mut self, ack_index: u32) {
        let suspect = ack_index
            .checked_add(1)
            .and_then(|next| self.store.get(next).cloned().map(|segment| (next, segment)));

        match suspect {
            Some((index, segment)) => {
                debug!(index, "Fast retransmit");
                self.transport.send(segment).await;
                self.emit(WindowEvent::FastRetransmit { index });

                // Tighten the retransmission cadence while loss is suspected.
                // 在怀疑丢包期间收紧重传节奏。
                self.cancel_timer();
                self.arm_timer(
                    self.config.reliability.rto_initial_delay,
                    self.config.reliability.recovery_period,
                );
            }
            None => {
                trace!(ack_index, "Fast retransmit candidate already acknowledged, skipping");
            }
        }

        self.congestion.fast_recovery();
        self.emit(WindowEvent::FastRecovery {
            cwnd: self.congestion.congestion_window(),
            ssthresh: self.congestion.slow_start_threshold(),
        });
    }

    /// Whether a retransmission timer is currently armed.
    /// 重传定时器当前是否已武装。
    pub(crate) fn is_timer_armed(&self) -> bool {
        self.timer.is_some()
    }

    #[cfg(test)]
    pub(crate) fn outstanding(&self) -> usize {
        self.store.len()
    }

    #[cfg(test)]
    pub(crate) fn congestion(&self) -> &CongestionController {
        &self.congestion
    }

    fn arm_timer(&mut self, initial_delay: Duration, period: Duration) {
        self.next_timer_generation += 1;
        let timer = RetransmitTimer::schedule(
            self.tick_tx.clone(),
            self.next_timer_generation,
            initial_delay,
            period,
        );
        if let Some(old) = self.timer.replace(timer) {
            old.cancel();
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn emit(&self, event: WindowEvent) {
        // Best effort: a dropped event receiver must never stall the window.
        // 尽力而为：事件接收端被丢弃绝不能拖住窗口。
        let _ = self.events.send(event);
    }
}
