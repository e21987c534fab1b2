#![deny(clippy::expect_used, clippy::unwrap_used)]

//! The root of the Reno sender-side reliability library.
//! Reno发送端可靠性库的根。

pub mod config;
pub mod error;
pub mod event;
pub mod segment;
pub mod transport;

pub mod reliability;
pub mod sender;
pub mod timer;
