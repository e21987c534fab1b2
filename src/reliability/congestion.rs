//! 实现TCP Reno的拥塞窗口决策规则。
//!
//! 慢启动阶段每个新ACK使窗口加一；拥塞避免阶段按ACK累积信用，攒满一个
//! 窗口才加一；超时将窗口收缩到1并把阈值减半；快恢复只减半不收缩。
//!
//! Implements the TCP Reno congestion window decision rules.
//!
//! Slow start grows the window by one per new ack. Congestion avoidance
//! accrues one credit per ack and grows the window by one only once a full
//! window of credit has accumulated. A timeout collapses the window to one
//! segment and halves the threshold; fast recovery halves without collapsing.
//!
//! There is no explicit mode field: the controller is in slow start exactly
//! when `cwnd < ssthresh`, in congestion avoidance otherwise.

use crate::config::CongestionControlConfig;
use tracing::debug;

/// A Reno congestion controller.
///
/// Pure decision logic: no I/O, no timers, no knowledge of the segment store.
/// Invariants: `congestion_window >= 1` and `slow_start_threshold >= 2` in
/// every reachable state; both are integers, never fractional.
///
/// Reno拥塞控制器。
///
/// 纯决策逻辑：无I/O、无定时器、不感知段存储。
/// 不变量：任何可达状态下 `congestion_window >= 1` 且
/// `slow_start_threshold >= 2`；二者都是整数，永不为分数。
#[derive(Debug)]
pub struct CongestionController {
    /// The congestion window, in segments.
    /// 拥塞窗口（以段为单位）。
    pub(crate) congestion_window: u32,
    /// The slow start threshold, in segments.
    /// 慢启动阈值（以段为单位）。
    pub(crate) slow_start_threshold: u32,
    /// Congestion-avoidance credit: one unit per new ack, traded for a
    /// window increment once a full window has accumulated. This is the
    /// integer form of `cwnd += 1/cwnd` per ack.
    ///
    /// 拥塞避免信用：每个新ACK累积一个单位，攒满一个窗口后兑换一次窗口
    /// 增量。这是每ACK `cwnd += 1/cwnd` 的整数形式。
    pub(crate) avoidance_credit: u32,
    /// The floor applied when halving the threshold.
    /// 阈值减半时应用的下限。
    min_ssthresh: u32,
}

impl CongestionController {
    /// Creates a new `CongestionController`.
    /// 创建一个新的 `CongestionController`。
    pub fn new(config: &CongestionControlConfig) -> Self {
        Self {
            congestion_window: config.initial_cwnd_segments.max(1),
            slow_start_threshold: config.initial_ssthresh.max(config.min_ssthresh),
            avoidance_credit: 0,
            min_ssthresh: config.min_ssthresh,
        }
    }

    /// Gets the current congestion window size in segments.
    /// 获取当前的拥塞窗口大小（以段为单位）。
    pub fn congestion_window(&self) -> u32 {
        self.congestion_window
    }

    /// Gets the current slow start threshold in segments.
    /// 获取当前的慢启动阈值（以段为单位）。
    pub fn slow_start_threshold(&self) -> u32 {
        self.slow_start_threshold
    }

    /// Called once per accepted *new* cumulative ack. Returns `true` when the
    /// congestion window grew.
    ///
    /// 每个被接受的*新*累积ACK调用一次。当拥塞窗口增长时返回 `true`。
    pub fn on_new_ack(&mut self) -> bool {
        if self.congestion_window < self.slow_start_threshold {
            // Slow start: one increment per ack, exponential per RTT.
            // 慢启动：每ACK加一，按RTT呈指数增长。
            self.congestion_window += 1;
            debug!(cwnd = self.congestion_window, "Slow start window expand");
            true
        } else {
            // Congestion avoidance: one increment per window of acks.
            // 拥塞避免：每一个窗口的ACK才加一。
            self.avoidance_credit += 1;
            if self.avoidance_credit >= self.congestion_window {
                self.avoidance_credit -= self.congestion_window;
                self.congestion_window += 1;
                debug!(cwnd = self.congestion_window, "Congestion avoidance window expand");
                true
            } else {
                false
            }
        }
    }

    /// The retransmission-timeout response: halve the threshold (floored) and
    /// collapse the window to a single segment.
    ///
    /// 重传超时响应：阈值减半（受下限约束），窗口收缩到单个段。
    pub fn on_rto(&mut self) {
        self.slow_start_threshold = (self.congestion_window / 2).max(self.min_ssthresh);
        self.congestion_window = 1;
        debug!(
            cwnd = self.congestion_window,
            ssthresh = self.slow_start_threshold,
            "RTO collapse"
        );
    }

    /// The fast-recovery response to a triple-duplicate-ack signal: halve the
    /// threshold (floored) and resume from it, skipping the collapse to 1.
    ///
    /// 对三重重复ACK信号的快恢复响应：阈值减半（受下限约束）并从阈值处
    /// 继续，跳过收缩到1的阶段。
    pub fn fast_recovery(&mut self) {
        self.slow_start_threshold = (self.congestion_window / 2).max(self.min_ssthresh);
        self.congestion_window = self.slow_start_threshold;
        debug!(
            cwnd = self.congestion_window,
            ssthresh = self.slow_start_threshold,
            "Fast recovery"
        );
    }
}
