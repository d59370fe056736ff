//! 链路类型
//!
//! 单向链路：只建模传播时延，不建模排队。

use super::id::NodeId;
use crate::sim::SimTime;

/// 网络链路
#[derive(Debug, Clone)]
pub struct Link {
    pub from: NodeId,
    pub to: NodeId,
    pub latency: SimTime,
}

impl Link {
    /// 创建新链路
    pub fn new(from: NodeId, to: NodeId, latency: SimTime) -> Self {
        Self { from, to, latency }
    }
}
