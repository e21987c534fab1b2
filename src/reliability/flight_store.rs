//! 在途段存储层 - 纯数据管理
//! Outstanding-Segment Store - Pure Data Management
//!
//! 职责：
//! - 按段索引存储等待确认的段
//! - 有序遍历与前缀删除
//! - 无业务逻辑，只管理数据；并发控制由调用方（发送端actor）负责
//!
//! Responsibilities: store segments awaiting acknowledgment keyed by segment
//! index, with ordered iteration and prefix removal. No business logic and no
//! locking of its own; the sender actor serializes all access.

use crate::segment::Segment;
use std::collections::BTreeMap;
use tracing::trace;

/// The store of segments that have been sent but not yet cumulatively acked.
///
/// 已发送但尚未被累积确认的段的存储。
#[derive(Debug, Default)]
pub struct FlightStore {
    /// Main storage: segment index -> segment.
    /// 主存储：段索引 -> 段。
    segments: BTreeMap<u32, Segment>,
}

impl FlightStore {
    /// Creates an empty store.
    /// 创建空的存储。
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a segment, overwriting any previous entry at the same index.
    /// 插入一个段，覆盖相同索引上的旧条目。
    pub fn insert(&mut self, index: u32, segment: Segment) {
        trace!(index, "Adding segment to flight store");
        self.segments.insert(index, segment);
    }

    /// Gets the segment at `index`, if it is still outstanding. A missing
    /// index is not an error: it was already acked and evicted.
    ///
    /// 获取 `index` 处仍在途的段。索引缺失不是错误：它已被确认并清除。
    pub fn get(&self, index: u32) -> Option<&Segment> {
        self.segments.get(&index)
    }

    /// Removes every entry whose index is `<= index`, in ascending order.
    /// Returns the number of entries removed.
    ///
    /// 按升序删除所有索引 `<= index` 的条目。返回删除的条目数。
    pub fn remove_up_to(&mut self, index: u32) -> usize {
        let before = self.segments.len();
        if let Some(boundary) = index.checked_add(1) {
            let kept = self.segments.split_off(&boundary);
            self.segments = kept;
        } else {
            self.segments.clear();
        }
        let removed = before - self.segments.len();
        trace!(index, removed, "Removed acknowledged segments from flight store");
        removed
    }

    /// The currently outstanding indices in increasing order.
    /// 当前在途的索引，按升序排列。
    pub fn ascending_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.segments.keys().copied()
    }

    /// The number of outstanding segments.
    /// 在途段的数量。
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the store holds no outstanding segments.
    /// 存储是否不含任何在途段。
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
