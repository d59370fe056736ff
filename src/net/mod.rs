//! 网络模拟模块
//!
//! 此模块包含节点、链路、数据包、拓扑快照、路由表与路由器，以及统计信号。

// 子模块声明
mod deliver_packet;
mod id;
mod link;
mod net_world;
mod network;
mod node;
mod packet;
mod route_update;
mod router;
mod routing;
mod signals;
mod stats;
mod topology;

// 重新导出公共接口
pub use deliver_packet::DeliverPacket;
pub use id::{Address, LinkId, NodeId};
pub use link::Link;
pub use net_world::NetWorld;
pub use network::Network;
pub use node::{DEFAULT_NODE_TYPE, Node, NodeConfig};
pub use packet::Packet;
pub use route_update::RouteUpdate;
pub use router::{RouteDecision, Router};
pub use routing::ForwardingTable;
pub use signals::{
    OUTPUT_IF_LOCAL, Signal, SignalRecord, SignalRecorder, SignalSink, SignalSummary,
};
pub use stats::Stats;
pub use topology::{Path, ShortestPaths, TopologySnapshot};
