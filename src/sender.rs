//! 发送端可靠性引擎：公共句柄与单写者actor事件循环。
//! The sender reliability engine: public handle and single-writer actor loop.
//!
//! 两个执行上下文会触碰窗口状态：调用方（提交段、送入ACK）与重传定时器。
//! 二者都不直接持有状态——actor任务独占 `SenderWindow`，把命令和定时器
//! tick作为消息串行处理，因此每次状态变更连同其取消/重置定时器的动作都
//! 是一个原子步骤。
//!
//! Two execution contexts touch window state: the caller (submitting
//! segments, feeding acks) and the retransmission timer. Neither holds the
//! state directly. The actor task exclusively owns the `SenderWindow` and
//! processes commands and timer ticks as serialized messages, so every state
//! mutation, including the timer cancel/rearm it triggers, is one atomic step.

mod command;
mod window;

#[cfg(test)]
mod tests;

use crate::{
    config::Config,
    error::{Error, Result},
    event::WindowEvent,
    segment::Segment,
    timer::TimerTick,
    transport::TransportSink,
};
use command::SenderCommand;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;
use window::SenderWindow;

/// The public handle to a sender-side reliability engine.
///
/// Cheap to clone; all methods forward to the actor task. Every method
/// returns `Error::ChannelClosed` once the actor is gone, at which point
/// loss recovery is dead and the caller must tear the connection down.
///
/// 发送端可靠性引擎的公共句柄。
///
/// 克隆开销低；所有方法都转发给actor任务。一旦actor消失，所有方法返回
/// `Error::ChannelClosed`，此时丢包恢复已失效，调用方必须拆除连接。
#[derive(Debug, Clone)]
pub struct RenoSender {
    command_tx: mpsc::Sender<SenderCommand>,
}

impl RenoSender {
    /// Spawns the sender actor and returns the command handle together with
    /// the structured diagnostic event stream.
    ///
    /// 生成发送端actor，返回命令句柄以及结构化诊断事件流。
    pub fn spawn<S: TransportSink>(
        config: Config,
        transport: Arc<S>,
    ) -> (Self, mpsc::UnboundedReceiver<WindowEvent>) {
        let (command_tx, command_rx) = mpsc::channel(128);
        let (tick_tx, tick_rx) = mpsc::channel(8);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let window = SenderWindow::new(Arc::new(config), transport, tick_tx, event_tx);
        let mut actor = SenderActor {
            window,
            command_rx,
            tick_rx,
        };
        tokio::spawn(async move { actor.run().await });

        (Self { command_tx }, event_rx)
    }

    /// Admits a newly formed segment into the window and arms the
    /// retransmission timer if it is not already running.
    ///
    /// 将新生成的段纳入窗口，并在重传定时器未运行时将其武装。
    pub async fn submit(&self, segment: Segment) -> Result<()> {
        self.command_tx
            .send(SenderCommand::Submit { segment })
            .await
            .map_err(|_| Error::ChannelClosed)
    }

    /// Feeds one acknowledgment (cumulative or duplicate) from the receive
    /// path into the window.
    ///
    /// 将接收路径上的一个确认（累积或重复）送入窗口。
    pub async fn on_ack(&self, ack_index: u32) -> Result<()> {
        self.command_tx
            .send(SenderCommand::Ack { ack_index })
            .await
            .map_err(|_| Error::ChannelClosed)
    }

    /// Whether the window is full. Callers gate admission of new segments
    /// on this query.
    ///
    /// 窗口是否已满。调用方依据该查询决定是否纳入新段。
    pub async fn is_window_full(&self) -> Result<bool> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(SenderCommand::IsWindowFull { response_tx })
            .await
            .map_err(|_| Error::ChannelClosed)?;
        response_rx.await.map_err(|_| Error::ChannelClosed)
    }
}

/// The actor that exclusively owns the send window state.
///
/// 独占持有发送窗口状态的actor。
struct SenderActor<S: TransportSink> {
    window: SenderWindow<S>,
    command_rx: mpsc::Receiver<SenderCommand>,
    tick_rx: mpsc::Receiver<TimerTick>,
}

impl<S: TransportSink> SenderActor<S> {
    /// Runs the actor's main event loop until every handle is dropped.
    ///
    /// 运行actor的主事件循环，直到所有句柄都被丢弃。
    async fn run(&mut self) {
        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    // All handles dropped: the connection is being torn
                    // down. Dropping the window aborts any armed timer.
                    // 所有句柄已丢弃：连接正在拆除。丢弃窗口会中止
                    // 已武装的定时器。
                    None => {
                        debug!("Sender handle dropped, stopping actor");
                        break;
                    }
                },
                Some(tick) = self.tick_rx.recv() => {
                    self.window.on_tick(tick).await;
                }
            }
        }
    }

    async fn handle_command(&mut self, command: SenderCommand) {
        match command {
            SenderCommand::Submit { segment } => self.window.submit(segment),
            SenderCommand::Ack { ack_index } => self.window.on_ack(ack_index).await,
            SenderCommand::IsWindowFull { response_tx } => {
                // The requester may have given up; that is not our problem.
                // 请求方可能已放弃等待；这不是我们的问题。
                let _ = response_tx.send(self.window.is_window_full());
            }
        }
    }
}
