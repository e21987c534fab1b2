//! 对底层数据报传输的抽象。
//! Traits for abstracting over the underlying datagram transport.

use crate::segment::Segment;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// The sink through which segments leave the send window.
///
/// Fire and forget: the call queues (or attempts) one datagram send and says
/// nothing about delivery. Blocking transports must sit behind a queue so the
/// sender actor is never stalled by the wire.
///
/// 段离开发送窗口所经过的汇。
///
/// 即发即弃：调用只是排队（或尝试）一次数据报发送，不保证投递。
/// 会阻塞的传输必须置于队列之后，以免发送端actor被线路拖住。
#[async_trait]
pub trait TransportSink: Send + Sync + 'static {
    /// Sends a segment, best effort.
    /// 尽力发送一个段。
    async fn send(&self, segment: Segment);
}

#[async_trait]
impl TransportSink for mpsc::Sender<Segment> {
    async fn send(&self, segment: Segment) {
        // A closed datagram writer means the connection is being torn down;
        // there is nobody left to deliver to.
        // 数据报写入任务已关闭，说明连接正在拆除，没有投递对象了。
        let _ = mpsc::Sender::send(self, segment).await;
    }
}

#[async_trait]
impl TransportSink for mpsc::UnboundedSender<Segment> {
    async fn send(&self, segment: Segment) {
        let _ = mpsc::UnboundedSender::send(self, segment);
    }
}

#[cfg(test)]
pub use self::testing::MockSink;
