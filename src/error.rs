//! 定义了库中所有可能的错误类型。
//! Defines all possible error types in the library.

use thiserror::Error;

/// The primary error type for the Reno sender library.
/// Reno发送端库的主要错误类型。
#[derive(Debug, Error)]
pub enum Error {
    /// The sender actor task is gone, so neither ack processing nor timer
    /// scheduling can make progress. Loss recovery is dead at this point and
    /// the connection must be torn down by the caller.
    ///
    /// 发送端actor任务已不存在，ACK处理和定时器调度都无法继续。
    /// 此时丢包恢复已失效，调用方必须拆除连接。
    #[error("sender actor channel is closed")]
    ChannelClosed,
}

/// A specialized `Result` type for this library.
/// 本库专用的 `Result` 类型。
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        use std::io::ErrorKind;
        match err {
            Error::ChannelClosed => ErrorKind::BrokenPipe.into(),
        }
    }
}
