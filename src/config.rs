//! 定义了发送窗口和拥塞控制的可配置参数。
//! Defines configurable parameters for the send window and congestion control.

use std::time::Duration;

/// A structure containing all configurable parameters for a sender.
///
/// 包含发送端所有可配置参数的结构体。
#[derive(Debug, Clone)]
pub struct Config {
    /// Reliability-related parameters.
    /// 可靠性相关参数。
    pub reliability: ReliabilityConfig,

    /// Congestion control-related parameters.
    /// 拥塞控制相关参数。
    pub congestion_control: CongestionControlConfig,
}

/// Reliability-related parameters.
///
/// 可靠性相关参数。
#[derive(Debug, Clone)]
pub struct ReliabilityConfig {
    /// The number of payload bytes carried by one segment. Segment indices
    /// are derived from raw byte sequence numbers with this divisor, so it
    /// must match whatever chunked the stream into segments.
    ///
    /// 单个段携带的载荷字节数。段索引通过该除数从原始字节序列号推导，
    /// 因此必须与对字节流进行分段的一方保持一致。
    pub segment_size: u32,
    /// The initial delay before the retransmission timer first fires.
    /// 重传定时器首次触发前的初始延迟。
    pub rto_initial_delay: Duration,
    /// The recurring period of the retransmission timer in normal operation.
    /// 正常运行时重传定时器的重复周期。
    pub rto_period: Duration,
    /// The tightened recurring period used once loss is suspected, i.e. after
    /// a new cumulative ack rearms the timer or a fast retransmit fires.
    ///
    /// 一旦怀疑丢包后使用的收紧重复周期，
    /// 即新的累积ACK重置定时器或触发快速重传之后。
    pub recovery_period: Duration,
    /// The number of identical consecutive acks (the original plus the
    /// duplicates) that triggers a fast retransmit.
    ///
    /// 触发快速重传所需的连续相同ACK数量（原始ACK加上重复ACK）。
    pub duplicate_ack_threshold: u32,
}

/// Congestion control-related parameters.
///
/// 拥塞控制相关参数。
#[derive(Debug, Clone)]
pub struct CongestionControlConfig {
    /// The initial congestion window size in segments.
    /// 初始拥塞窗口大小（以段为单位）。
    pub initial_cwnd_segments: u32,
    /// The initial slow start threshold in segments.
    /// 初始慢启动阈值（以段为单位）。
    pub initial_ssthresh: u32,
    /// The floor for the slow start threshold. Halving on a loss event never
    /// takes the threshold below this value.
    ///
    /// 慢启动阈值的下限。丢包事件导致的减半永远不会让阈值低于此值。
    pub min_ssthresh: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reliability: ReliabilityConfig::default(),
            congestion_control: CongestionControlConfig::default(),
        }
    }
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            segment_size: 100,
            rto_initial_delay: Duration::from_millis(3000),
            rto_period: Duration::from_millis(3000),
            recovery_period: Duration::from_millis(300),
            duplicate_ack_threshold: 4,
        }
    }
}

impl Default for CongestionControlConfig {
    fn default() -> Self {
        Self {
            initial_cwnd_segments: 1,
            initial_ssthresh: 16,
            min_ssthresh: 2,
        }
    }
}
