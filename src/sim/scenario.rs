//! 场景配置（JSON）
//!
//! 描述拓扑、节点地址、流量参数与路由模式。解析后由 `topo::build_scenario` 构建网络。

use serde::{Deserialize, Serialize};

use crate::app::DistSpec;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub schema_version: u32,
    /// 随机数种子；每个流量源用 (seed, address) 派生自己的 RNG
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub routing: RoutingSpec,
    pub topology: TopologySpec,
    /// 单向链路传播时延（微秒）
    #[serde(default)]
    pub link_latency_us: Option<u64>,
    #[serde(default)]
    pub defaults: Option<ScenarioDefaults>,
    /// 按拓扑下标覆盖节点参数；未列出的节点使用默认值
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologySpec {
    /// 0 - 1 - 2 - ... - (n-1)
    Line { n: usize },
    /// 环：i 与 (i+1) % n 相连
    Ring { n: usize },
    /// 任意双向链路集合（端点为节点下标）
    Links { n: usize, links: Vec<(usize, usize)> },
}

impl TopologySpec {
    pub fn num_nodes(&self) -> usize {
        match self {
            TopologySpec::Line { n } | TopologySpec::Ring { n } | TopologySpec::Links { n, .. } => {
                *n
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
    #[default]
    Distributed,
    Centralized,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingSpec {
    #[serde(default)]
    pub mode: RoutingMode,
    /// 集中式模式下负责计算并下发路由表的节点地址
    #[serde(default)]
    pub central_address: u32,
}

impl Default for RoutingSpec {
    fn default() -> Self {
        Self {
            mode: RoutingMode::Distributed,
            central_address: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioDefaults {
    #[serde(default)]
    pub traffic: Option<TrafficSpec>,
    #[serde(default)]
    pub collect_statistics: Option<bool>,
}

/// 突发流量源参数。所有时长以秒为单位。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficSpec {
    pub dest_addresses: Vec<u32>,
    pub sleep_time: DistSpec,
    pub burst_time: DistSpec,
    pub send_ia_time: DistSpec,
    /// 包长（字节）
    pub packet_length: DistSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    /// 拓扑中的节点下标
    pub index: usize,
    #[serde(default)]
    pub name: Option<String>,
    /// 默认等于下标
    #[serde(default)]
    pub address: Option<u32>,
    /// 拓扑快照的类型选择器，默认 "Node"
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub traffic: Option<TrafficSpec>,
    /// 显式关闭某个节点的流量（覆盖 defaults.traffic）
    #[serde(default)]
    pub idle: bool,
    #[serde(default)]
    pub collect_statistics: Option<bool>,
}
