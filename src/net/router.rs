//! 路由器
//!
//! 两阶段：先安装一次路由表，之后对每个到达的包做确定性的转发决策。

use tracing::{trace, warn};

use super::id::Address;
use super::packet::Packet;
use super::routing::ForwardingTable;

/// 对一个包的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// 目的地址是本节点
    LocalDelivery,
    /// 从该接口转发（hop_count 已加一）
    Forward { iface: usize },
    /// 路由表中没有目的地址
    Drop,
}

#[derive(Debug)]
pub struct Router {
    address: Address,
    table: ForwardingTable,
    installed: bool,
}

impl Router {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            table: ForwardingTable::new(),
            installed: false,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// 安装路由表。路由表只安装一次，重复安装会被忽略。
    pub fn install(&mut self, table: ForwardingTable) {
        if self.installed {
            warn!(address = %self.address, "routing table already installed, ignoring");
            return;
        }
        trace!(address = %self.address, entries = table.len(), "installing routing table");
        self.table = table;
        self.installed = true;
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    pub fn table(&self) -> &ForwardingTable {
        &self.table
    }

    pub fn lookup(&self, dst: Address) -> Option<usize> {
        self.table.get(dst)
    }

    /// 转发决策。只有 `Forward` 会修改包（hop_count + 1）。
    pub fn route(&self, pkt: &mut Packet) -> RouteDecision {
        if pkt.dst == self.address {
            return RouteDecision::LocalDelivery;
        }
        match self.lookup(pkt.dst) {
            Some(iface) => {
                pkt.record_hop();
                RouteDecision::Forward { iface }
            }
            None => RouteDecision::Drop,
        }
    }
}
