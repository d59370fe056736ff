//! 拓扑构建
//!
//! 把场景配置变成可运行的网络：建节点、连链路、算路由、启动流量源。

mod scenario;
mod shapes;

pub use scenario::{build_scenario, default_ring_scenario, node_seed};
pub use shapes::edges;
