//! 数据包类型
//!
//! 定义网络数据包及其相关操作。

use super::id::Address;
use crate::sim::SimTime;

/// 网络数据包
///
/// 按值传递：任何时刻只有一个组件持有它。
#[derive(Debug)]
pub struct Packet {
    /// 注入网络时分配的全局序号
    pub id: u64,
    /// `pk-<src>-to-<dst>-#<n>`
    pub name: String,
    pub src: Address,
    pub dst: Address,
    /// 已经历的转发次数
    pub hop_count: u32,
    pub byte_length: u32,
    pub created_at: SimTime,
}

impl Packet {
    pub fn new(
        name: impl Into<String>,
        src: Address,
        dst: Address,
        byte_length: u32,
        created_at: SimTime,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            src,
            dst,
            hop_count: 0,
            byte_length,
            created_at,
        }
    }

    /// 记录一次转发
    pub(crate) fn record_hop(&mut self) {
        self.hop_count = self.hop_count.saturating_add(1);
    }
}
