//! 拓扑快照
//!
//! 从网络的静态结构中一次性抽取节点与单向链路，只在计算路由表时使用，
//! 用完即丢弃；转发阶段不会再查询它。
//!
//! 最短路（按跳数、无权）对每个目的节点在反向图上做 BFS。
//! 反向邻接表按 (前驱下标, 接口下标) 排序，所以等长路径之间的取舍只取决于
//! 拓扑本身：先被 BFS 发现的那条链路胜出。

use std::collections::{HashMap, VecDeque};

use super::id::{Address, NodeId};
use super::network::Network;

#[derive(Debug, Clone)]
struct SnapNode {
    id: NodeId,
    address: Address,
    /// (本地接口下标, 邻居在快照中的下标)
    out: Vec<(usize, usize)>,
}

/// 只读拓扑视图
#[derive(Debug, Clone)]
pub struct TopologySnapshot {
    nodes: Vec<SnapNode>,
    index: HashMap<NodeId, usize>,
    /// rev[v] = 所有能一跳到达 v 的 (前驱下标, 前驱上的接口下标)
    rev: Vec<Vec<(usize, usize)>>,
}

/// 一条最短路：起点的出接口与途经节点（含两端）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub first_interface: usize,
    pub nodes: Vec<NodeId>,
}

impl Path {
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// 到某个目的节点的单源（反向）最短路结果
#[derive(Debug, Clone)]
pub struct ShortestPaths<'a> {
    snap: &'a TopologySnapshot,
    target: usize,
    /// next[u] = (u 上的出接口, 下一跳下标)
    next: Vec<Option<(usize, usize)>>,
    dist: Vec<Option<u32>>,
}

impl TopologySnapshot {
    /// 抽取类型名属于 `type_names` 的节点，以及两端都被选中的链路。
    ///
    /// 接口下标沿用节点自身的编号，即使部分链路因另一端未被选中而被略去。
    pub fn extract(net: &Network, type_names: &[&str]) -> Self {
        let selected: Vec<_> = net
            .nodes()
            .filter(|n| type_names.contains(&n.type_name()))
            .collect();

        let index: HashMap<NodeId, usize> = selected
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id(), i))
            .collect();

        let nodes: Vec<SnapNode> = selected
            .iter()
            .map(|n| {
                let out = n
                    .interfaces()
                    .iter()
                    .enumerate()
                    .filter_map(|(iface, link_id)| {
                        let link = net.link(*link_id)?;
                        index.get(&link.to).map(|&j| (iface, j))
                    })
                    .collect();
                SnapNode {
                    id: n.id(),
                    address: n.address(),
                    out,
                }
            })
            .collect();

        let mut rev = vec![Vec::new(); nodes.len()];
        for (u, n) in nodes.iter().enumerate() {
            for &(iface, v) in &n.out {
                rev[v].push((u, iface));
            }
        }

        Self { nodes, index, rev }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// 快照中的节点（按网络内部下标顺序）
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    pub fn address_of(&self, id: NodeId) -> Option<Address> {
        self.index.get(&id).map(|&i| self.nodes[i].address)
    }

    /// 计算所有节点到 `dst` 的最短路。`dst` 不在快照中时返回 None。
    pub fn paths_to(&self, dst: NodeId) -> Option<ShortestPaths<'_>> {
        let target = *self.index.get(&dst)?;
        let n = self.nodes.len();
        let mut next = vec![None; n];
        let mut dist = vec![None; n];
        let mut q = VecDeque::new();

        dist[target] = Some(0u32);
        q.push_back(target);
        while let Some(v) = q.pop_front() {
            let dv = dist[v].unwrap_or(0);
            for &(u, iface) in &self.rev[v] {
                if dist[u].is_none() {
                    dist[u] = Some(dv.saturating_add(1));
                    next[u] = Some((iface, v));
                    q.push_back(u);
                }
            }
        }

        Some(ShortestPaths {
            snap: self,
            target,
            next,
            dist,
        })
    }

    /// `from` 到 `to` 的一条最短路；不可达或 `from == to` 时返回 None。
    pub fn path(&self, from: NodeId, to: NodeId) -> Option<Path> {
        self.paths_to(to)?.path(from)
    }
}

impl ShortestPaths<'_> {
    pub fn target(&self) -> NodeId {
        self.snap.nodes[self.target].id
    }

    /// `from` 出发的第一跳接口
    pub fn first_interface(&self, from: NodeId) -> Option<usize> {
        let u = *self.snap.index.get(&from)?;
        self.next[u].map(|(iface, _)| iface)
    }

    /// `from` 到目的节点的跳数（目的节点自身为 0）
    pub fn hops(&self, from: NodeId) -> Option<u32> {
        let u = *self.snap.index.get(&from)?;
        self.dist[u]
    }

    pub fn path(&self, from: NodeId) -> Option<Path> {
        let mut u = *self.snap.index.get(&from)?;
        let (first_interface, _) = self.next[u]?;
        let mut nodes = vec![self.snap.nodes[u].id];
        while let Some((_, v)) = self.next[u] {
            nodes.push(self.snap.nodes[v].id);
            u = v;
        }
        Some(Path {
            first_interface,
            nodes,
        })
    }
}
