//! 定义了发送端对外暴露的结构化诊断事件流。
//! Defines the structured diagnostic event stream exposed by the sender.

/// A diagnostic event emitted by the send window.
///
/// Events are delivered best effort over an unbounded channel; a dropped
/// receiver never blocks or fails the sender. The variants mirror the
/// observable congestion decisions, not their wire effects.
///
/// 发送窗口发出的诊断事件。
///
/// 事件通过无界通道尽力投递；接收端被丢弃不会阻塞发送端，也不会使其出错。
/// 各变体对应可观察的拥塞决策，而非其线上效果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    /// The congestion window grew by one segment.
    /// 拥塞窗口增长了一个段。
    WindowExpand { cwnd: u32 },
    /// A triple-duplicate-ack signal triggered an immediate resend.
    /// 三重重复ACK信号触发了立即重发。
    FastRetransmit { index: u32 },
    /// Fast recovery halved the window without a full collapse.
    /// 快恢复将窗口减半，而没有完全收缩。
    FastRecovery { cwnd: u32, ssthresh: u32 },
    /// A retransmission timeout collapsed the window to one segment.
    /// 重传超时将窗口收缩到一个段。
    RtoCollapse { cwnd: u32, ssthresh: u32 },
    /// A segment was resent by the timeout path.
    /// 超时路径重发了一个段。
    Retransmit { index: u32 },
}
