//! 定义了发送窗口管理的数据段。
//! Defines the data segments managed by the send window.

use bytes::Bytes;

/// A unit of the byte stream awaiting acknowledgment.
///
/// The payload is opaque to this crate; the raw sequence number is the byte
/// offset assigned by whatever chunked the stream, starting at 1.
///
/// 等待确认的字节流单元。
///
/// 载荷对本crate不透明；原始序列号是分段方分配的字节偏移，从1开始。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The raw byte sequence number of the first payload byte.
    /// 载荷首字节的原始字节序列号。
    pub sequence_number: u32,
    /// The segment payload.
    /// 段载荷。
    pub payload: Bytes,
}

impl Segment {
    /// Creates a new `Segment`.
    /// 创建一个新的 `Segment`。
    pub fn new(sequence_number: u32, payload: Bytes) -> Self {
        Self {
            sequence_number,
            payload,
        }
    }

    /// Derives the segment index used for all window bookkeeping.
    ///
    /// Sequence numbers start at 1, so the first segment maps to index 0.
    /// A zero sequence number saturates to index 0 rather than wrapping.
    ///
    /// 推导用于所有窗口记账的段索引。
    ///
    /// 序列号从1开始，因此第一个段映射到索引0。
    /// 序列号为0时饱和到索引0，而不是回绕。
    pub fn index(&self, segment_size: u32) -> u32 {
        self.sequence_number.saturating_sub(1) / segment_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_derivation() {
        let segment_size = 100;
        assert_eq!(Segment::new(1, Bytes::new()).index(segment_size), 0);
        assert_eq!(Segment::new(100, Bytes::new()).index(segment_size), 0);
        assert_eq!(Segment::new(101, Bytes::new()).index(segment_size), 1);
        assert_eq!(Segment::new(201, Bytes::new()).index(segment_size), 2);
    }

    #[test]
    fn test_index_saturates_at_zero() {
        assert_eq!(Segment::new(0, Bytes::new()).index(100), 0);
    }
}
