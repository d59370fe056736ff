//! 网络拓扑管理
//!
//! 定义网络拓扑结构，包含节点、链路、路由表构建、数据包转发和统计信息。

use std::collections::HashMap;

use super::deliver_packet::DeliverPacket;
use super::id::{Address, LinkId, NodeId};
use super::link::Link;
use super::node::{Node, NodeConfig};
use super::packet::Packet;
use super::route_update::RouteUpdate;
use super::routing::ForwardingTable;
use super::signals::SignalRecorder;
use super::stats::Stats;
use super::topology::TopologySnapshot;
use crate::app::TimerKind;
use crate::sim::{RoutingMode, RoutingSpec, SimError, SimTime, Simulator};
use tracing::{debug, info, trace};

/// 网络拓扑
#[derive(Default)]
pub struct Network {
    // 处理事件期间节点会被暂时取出（见 `with_node`）
    nodes: Vec<Option<Node>>,
    links: Vec<Link>,
    by_address: HashMap<Address, NodeId>,
    next_pkt_id: u64,
    pub stats: Stats,
    pub signals: SignalRecorder,
}

impl Network {
    /// 添加节点；地址必须唯一
    pub fn add_node(&mut self, cfg: NodeConfig) -> Result<NodeId, SimError> {
        if self.by_address.contains_key(&cfg.address) {
            return Err(SimError::Config(format!(
                "duplicate node address {}",
                cfg.address
            )));
        }
        let id = NodeId(self.nodes.len());
        self.by_address.insert(cfg.address, id);
        self.nodes.push(Some(Node::new(id, cfg)));
        Ok(id)
    }

    /// 连接两个节点（创建单向链路），链路成为 `from` 的下一个出接口
    pub fn connect(&mut self, from: NodeId, to: NodeId, latency: SimTime) -> Result<LinkId, SimError> {
        if self.node(to).is_none() {
            return Err(SimError::UnknownNode(to.0));
        }
        let id = LinkId(self.links.len());
        let node = self
            .nodes
            .get_mut(from.0)
            .and_then(Option::as_mut)
            .ok_or(SimError::UnknownNode(from.0))?;
        node.add_interface(id);
        self.links.push(Link::new(from, to, latency));
        Ok(id)
    }

    /// 双向连接（两条单向链路）
    pub fn connect_bidir(&mut self, a: NodeId, b: NodeId, latency: SimTime) -> Result<(), SimError> {
        self.connect(a, b, latency)?;
        self.connect(b, a, latency)?;
        Ok(())
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn node_by_address(&self, address: Address) -> Option<&Node> {
        self.by_address.get(&address).and_then(|id| self.node(*id))
    }

    /// 当前在网络中的节点（按下标顺序）
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter_map(Option::as_ref)
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.0)
    }

    /// 暂时把节点取出来，避免 &mut self 与 &mut node 的重叠借用。
    fn with_node<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut Node, &mut Self) -> Result<R, SimError>,
    ) -> Result<R, SimError> {
        let mut node = self
            .nodes
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(SimError::UnknownNode(id.0))?;
        trace!(node_name = %node.name(), "取出节点");
        let res = f(&mut node, self);
        self.nodes[id.0] = Some(node);
        res
    }

    /// 第一阶段：构建所有节点的路由表（在任何流量之前调用一次）
    #[tracing::instrument(skip(self, sim))]
    pub fn build_routes(&mut self, routing: &RoutingSpec, sim: &mut Simulator) -> Result<(), SimError> {
        match routing.mode {
            RoutingMode::Distributed => {
                info!("Distributed routing - calculating paths independently");
                for idx in 0..self.nodes.len() {
                    let Some(node) = self.node(NodeId(idx)) else {
                        continue;
                    };
                    let me = node.id();
                    let snap = TopologySnapshot::extract(self, &[node.type_name()]);
                    debug!(address = %node.address(), nodes = snap.num_nodes(), "topology snapshot");
                    let table = ForwardingTable::compute(&snap, me);
                    for (dst, iface) in table.iter() {
                        trace!(address = %node.address(), towards = %dst, iface, "route");
                    }
                    if let Some(node) = self.nodes[idx].as_mut() {
                        node.router_mut().install(table);
                    }
                }
            }
            RoutingMode::Centralized => {
                let central = Address(routing.central_address);
                let node = self.node_by_address(central).ok_or_else(|| {
                    SimError::Config(format!("central routing node {central} does not exist"))
                })?;
                let me = node.id();
                info!(%central, "Central routing node calculating paths for all nodes");

                let snap = TopologySnapshot::extract(self, &[node.type_name()]);
                debug!(nodes = snap.num_nodes(), "topology snapshot");
                let tables = ForwardingTable::compute_all(&snap);

                for (id, table) in tables {
                    if id == me {
                        if let Some(node) = self.nodes[id.0].as_mut() {
                            node.router_mut().install(table);
                        }
                    } else {
                        sim.schedule(
                            sim.now(),
                            RouteUpdate {
                                to: id,
                                origin: central,
                                payload: table.encode(),
                            },
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// 收到中心节点下发的路由表：原样安装
    pub(crate) fn on_route_update(&mut self, to: NodeId, payload: &str) -> Result<(), SimError> {
        let table = ForwardingTable::decode(payload)?;
        self.with_node(to, |node, _| {
            debug!(address = %node.address(), entries = table.len(), "installing distributed routing table");
            node.router_mut().install(table);
            Ok(())
        })
    }

    /// 启动所有流量源
    pub fn start_apps(&mut self, sim: &mut Simulator) {
        for node in self.nodes.iter_mut().flatten() {
            node.start(sim);
        }
    }

    /// 把一个新包交给 `from` 节点的路由器（零时延本地交接）
    #[tracing::instrument(skip(self, pkt, sim), fields(name = %pkt.name))]
    pub fn inject(&mut self, from: NodeId, mut pkt: Packet, sim: &mut Simulator) {
        pkt.id = self.next_pkt_id;
        self.next_pkt_id = self.next_pkt_id.wrapping_add(1);
        self.stats.generated_pkts += 1;
        debug!(pkt_id = pkt.id, "packet injected");
        sim.schedule(sim.now(), DeliverPacket { to: from, pkt });
    }

    /// 将数据包交付给节点处理
    #[tracing::instrument(skip(self, pkt, sim), fields(pkt_id = pkt.id, to = ?to))]
    pub fn deliver(&mut self, to: NodeId, pkt: Packet, sim: &mut Simulator) -> Result<(), SimError> {
        debug!("📬 将数据包交付给节点处理");
        self.with_node(to, |node, net| node.on_packet(pkt, sim, net))
    }

    /// 流量源定时器到期
    pub(crate) fn on_app_timer(
        &mut self,
        node: NodeId,
        timer: TimerKind,
        sim: &mut Simulator,
    ) -> Result<(), SimError> {
        self.with_node(node, |node, net| node.on_timer(timer, sim, net))
    }

    /// 在链路上发送：到达时间 = now + 传播时延
    #[tracing::instrument(skip(self, pkt, sim), fields(pkt_id = pkt.id, link = link_id.0))]
    pub(crate) fn transmit(&mut self, link_id: LinkId, pkt: Packet, sim: &mut Simulator) -> Result<(), SimError> {
        let link = self.links.get(link_id.0).ok_or(SimError::UnknownLink(link_id.0))?;
        let arrive = sim.now().after(link.latency);
        debug!(arrive = ?arrive, to = ?link.to, "调度数据包到达事件");
        sim.schedule(arrive, DeliverPacket { to: link.to, pkt });
        Ok(())
    }
}
