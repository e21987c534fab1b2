//! Commands used by the sender actor.

use crate::segment::Segment;
use tokio::sync::oneshot;

/// Commands sent to the sender actor.
///
/// This enum encapsulates the ack-ingress surface of the window: segment
/// admission, acknowledgment processing and the window-occupancy query.
/// Timer expirations reach the actor on their own channel, not as commands.
///
/// 发送给发送端actor的命令。
///
/// 此枚举封装了窗口的ACK入口面：段的纳入、确认处理以及窗口占用查询。
/// 定时器到期通过独立通道到达actor，不作为命令。
#[derive(Debug)]
pub(crate) enum SenderCommand {
    /// Admit a newly formed segment into the window.
    /// 将新生成的段纳入窗口。
    Submit { segment: Segment },
    /// Process a cumulative or duplicate acknowledgment.
    /// 处理一个累积或重复确认。
    Ack { ack_index: u32 },
    /// Query whether the window has room for another segment.
    /// 查询窗口是否还有容纳新段的空间。
    IsWindowFull { response_tx: oneshot::Sender<bool> },
}
