//! 节点类型
//!
//! 一个节点由路由器和流量源组成：流量源生成的包先交给本节点路由器，
//! 路由器把目的地址为本节点的包交回流量源。

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace};

use super::id::{Address, LinkId, NodeId};
use super::network::Network;
use super::packet::Packet;
use super::router::{RouteDecision, Router};
use super::signals::{OUTPUT_IF_LOCAL, Signal, SignalSink};
use crate::app::{BurstyApp, TimerKind, TrafficProfile};
use crate::sim::{SimError, Simulator};

/// 拓扑快照默认使用的节点类型名
pub const DEFAULT_NODE_TYPE: &str = "Node";

/// 创建节点所需的参数
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub name: String,
    pub address: Address,
    pub type_name: String,
    /// None 表示只路由、只收包
    pub traffic: Option<TrafficProfile>,
    pub collect_statistics: bool,
    pub rng_seed: u64,
}

impl NodeConfig {
    /// 只路由不发包的节点
    pub fn router(name: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            address,
            type_name: DEFAULT_NODE_TYPE.to_string(),
            traffic: None,
            collect_statistics: true,
            rng_seed: 0,
        }
    }
}

/// 网络节点
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    name: String,
    type_name: String,
    interfaces: Vec<LinkId>,
    router: Router,
    app: BurstyApp,
}

impl Node {
    pub(crate) fn new(id: NodeId, cfg: NodeConfig) -> Self {
        let NodeConfig {
            name,
            address,
            type_name,
            traffic,
            collect_statistics,
            rng_seed,
        } = cfg;
        let app = BurstyApp::new(
            id,
            address,
            traffic,
            collect_statistics,
            StdRng::seed_from_u64(rng_seed),
        );
        Self {
            id,
            name,
            type_name,
            interfaces: Vec::new(),
            router: Router::new(address),
            app,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Address {
        self.router.address()
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// 出接口（下标即接口编号）
    pub fn interfaces(&self) -> &[LinkId] {
        &self.interfaces
    }

    pub(crate) fn add_interface(&mut self, link: LinkId) -> usize {
        self.interfaces.push(link);
        self.interfaces.len() - 1
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub(crate) fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    pub fn app(&self) -> &BurstyApp {
        &self.app
    }

    pub(crate) fn start(&mut self, sim: &mut Simulator) {
        self.app.start(sim);
    }

    /// 处理到达的数据包（来自链路或本节点流量源）
    #[tracing::instrument(skip(self, pkt, sim, net), fields(node_name = %self.name, address = %self.address(), pkt_id = pkt.id))]
    pub(crate) fn on_packet(
        &mut self,
        mut pkt: Packet,
        sim: &mut Simulator,
        net: &mut Network,
    ) -> Result<(), SimError> {
        let now = sim.now();
        let address = self.address();

        match self.router.route(&mut pkt) {
            RouteDecision::LocalDelivery => {
                debug!(name = %pkt.name, "local delivery");
                net.signals.emit(now, address, Signal::OutputIf, OUTPUT_IF_LOCAL);
                net.stats.delivered_pkts += 1;
                net.stats.delivered_bytes += pkt.byte_length as u64;
                self.app.on_packet(pkt, now, &mut net.signals);
            }
            RouteDecision::Drop => {
                debug!(dst = %pkt.dst, name = %pkt.name, "address unreachable, discarding packet");
                net.signals.emit(now, address, Signal::Drop, pkt.byte_length as f64);
                net.stats.dropped_pkts += 1;
                net.stats.dropped_bytes += pkt.byte_length as u64;
            }
            RouteDecision::Forward { iface } => {
                trace!(name = %pkt.name, iface, hop_count = pkt.hop_count, "forwarding packet");
                let link = *self
                    .interfaces
                    .get(iface)
                    .ok_or_else(|| SimError::UnknownInterface {
                        node: self.name.clone(),
                        iface,
                    })?;
                net.signals.emit(now, address, Signal::OutputIf, iface as f64);
                net.stats.forwarded_pkts += 1;
                net.transmit(link, pkt, sim)?;
            }
        }
        Ok(())
    }

    /// 处理流量源定时器，把生成的包交给本节点路由器
    pub(crate) fn on_timer(
        &mut self,
        timer: TimerKind,
        sim: &mut Simulator,
        net: &mut Network,
    ) -> Result<(), SimError> {
        let address = self.address();
        let pkts = self
            .app
            .on_timer(timer, sim)
            .map_err(|source| SimError::Fsm { address, source })?;
        for pkt in pkts {
            net.inject(self.id, pkt, sim);
        }
        Ok(())
    }
}
