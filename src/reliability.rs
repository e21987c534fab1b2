//! 可靠性层：在途段存储与Reno拥塞控制。
//! The reliability layer: outstanding-segment storage and Reno congestion control.

pub mod congestion;
pub mod flight_store;

pub use congestion::CongestionController;
pub use flight_store::FlightStore;
