//! 静态路由表
//!
//! 目的地址 -> 出接口下标。由拓扑快照一次性算出（按最短跳数），之后只读。
//! 不可达的目的地址不会出现在表里。

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::id::{Address, NodeId};
use super::topology::TopologySnapshot;
use crate::sim::SimError;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ForwardingTable {
    entries: BTreeMap<Address, usize>,
}

impl ForwardingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, dst: Address, iface: usize) {
        self.entries.insert(dst, iface);
    }

    /// 查询目的地址对应的出接口
    pub fn get(&self, dst: Address) -> Option<usize> {
        self.entries.get(&dst).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按目的地址升序遍历
    pub fn iter(&self) -> impl Iterator<Item = (Address, usize)> + '_ {
        self.entries.iter().map(|(a, i)| (*a, *i))
    }

    /// 以 `from` 为源，计算到快照中其它所有节点的路由（分布式模式下每个节点各算各的）。
    pub fn compute(snap: &TopologySnapshot, from: NodeId) -> Self {
        let mut table = Self::new();
        for dst in snap.node_ids() {
            if dst == from {
                continue;
            }
            let Some(paths) = snap.paths_to(dst) else {
                continue;
            };
            if let (Some(iface), Some(addr)) = (paths.first_interface(from), snap.address_of(dst)) {
                table.insert(addr, iface);
            }
        }
        table
    }

    /// 为快照中的每个节点计算路由表（集中式模式下由中心节点调用）。
    ///
    /// 每个目的节点只做一次 BFS；结果与逐个调用 `compute` 相同。
    pub fn compute_all(snap: &TopologySnapshot) -> BTreeMap<NodeId, ForwardingTable> {
        let mut tables: BTreeMap<NodeId, ForwardingTable> =
            snap.node_ids().map(|id| (id, Self::new())).collect();

        for dst in snap.node_ids() {
            let (Some(paths), Some(addr)) = (snap.paths_to(dst), snap.address_of(dst)) else {
                continue;
            };
            for (from, table) in tables.iter_mut() {
                if *from == dst {
                    continue;
                }
                if let Some(iface) = paths.first_interface(*from) {
                    table.insert(addr, iface);
                }
            }
        }
        tables
    }

    /// 文本形式：`dst:iface,dst:iface`
    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn decode(payload: &str) -> Result<Self, SimError> {
        payload.parse()
    }
}

impl fmt::Display for ForwardingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (dst, iface)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{dst}:{iface}")?;
        }
        Ok(())
    }
}

impl FromStr for ForwardingTable {
    type Err = SimError;

    fn from_str(payload: &str) -> Result<Self, Self::Err> {
        let bad = |reason: String| SimError::RoutePayload {
            payload: payload.to_string(),
            reason,
        };

        let mut table = Self::new();
        if payload.trim().is_empty() {
            return Ok(table);
        }
        for entry in payload.split(',') {
            let (dst, iface) = entry
                .split_once(':')
                .ok_or_else(|| bad(format!("entry {entry:?} is not dst:iface")))?;
            let dst: u32 = dst
                .trim()
                .parse()
                .map_err(|e| bad(format!("bad address {dst:?}: {e}")))?;
            let iface: usize = iface
                .trim()
                .parse()
                .map_err(|e| bad(format!("bad interface {iface:?}: {e}")))?;
            if table.entries.insert(Address(dst), iface).is_some() {
                return Err(bad(format!("duplicate destination {dst}")));
            }
        }
        Ok(table)
    }
}
