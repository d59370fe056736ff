//! 场景构建

use std::collections::HashSet;

use tracing::info;

use super::shapes::edges;
use crate::app::{DistSpec, TrafficProfile};
use crate::net::{Address, DEFAULT_NODE_TYPE, NetWorld, NodeConfig};
use crate::sim::{
    NodeSpec, RoutingSpec, ScenarioDefaults, ScenarioSpec, SimError, SimTime, Simulator,
    TopologySpec, TrafficSpec,
};

/// 默认单向链路时延（微秒）
const DEFAULT_LINK_LATENCY_US: u64 = 100;

/// 由场景种子与节点地址派生节点 RNG 的种子（splitmix64）
pub fn node_seed(seed: u64, address: Address) -> u64 {
    let mut z = (seed ^ (address.0 as u64).wrapping_mul(0x9E3779B97F4A7C15))
        .wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// 构建场景：建网络、算路由表（集中式模式下会调度下发事件）、启动流量源。
///
/// 返回的仿真器已包含 t=0 的初始事件，直接 `run_until` 即可。
#[tracing::instrument(skip(spec), fields(seed = spec.seed, routing = ?spec.routing.mode))]
pub fn build_scenario(spec: &ScenarioSpec) -> Result<(Simulator, NetWorld), SimError> {
    let n = spec.topology.num_nodes();
    let latency = SimTime::from_micros(spec.link_latency_us.unwrap_or(DEFAULT_LINK_LATENCY_US));
    let defaults = spec.defaults.clone().unwrap_or_default();

    let mut overrides: Vec<Option<&NodeSpec>> = vec![None; n];
    for ns in &spec.nodes {
        let slot = overrides.get_mut(ns.index).ok_or_else(|| {
            SimError::Config(format!("node index {} out of range (n = {n})", ns.index))
        })?;
        if slot.is_some() {
            return Err(SimError::Config(format!("node index {} listed twice", ns.index)));
        }
        *slot = Some(ns);
    }

    let mut world = NetWorld::default();
    let mut ids = Vec::with_capacity(n);
    for (idx, ns) in overrides.iter().enumerate() {
        let cfg = node_config(idx, *ns, &defaults, spec.seed)?;
        ids.push(world.net.add_node(cfg)?);
    }

    let mut seen = HashSet::new();
    for (a, b) in edges(&spec.topology) {
        if a >= n || b >= n || a == b {
            return Err(SimError::Config(format!("invalid link ({a}, {b}) for {n} nodes")));
        }
        if !seen.insert((a.min(b), a.max(b))) {
            return Err(SimError::Config(format!("duplicate link ({a}, {b})")));
        }
        world.net.connect_bidir(ids[a], ids[b], latency)?;
    }

    info!(nodes = n, links = seen.len(), "network built");

    let mut sim = Simulator::default();
    world.net.build_routes(&spec.routing, &mut sim)?;
    world.net.start_apps(&mut sim);
    Ok((sim, world))
}

fn node_config(
    idx: usize,
    ns: Option<&NodeSpec>,
    defaults: &ScenarioDefaults,
    seed: u64,
) -> Result<NodeConfig, SimError> {
    let address = Address(ns.and_then(|s| s.address).unwrap_or(idx as u32));
    let name = ns
        .and_then(|s| s.name.clone())
        .unwrap_or_else(|| format!("node{idx}"));
    let type_name = ns
        .and_then(|s| s.type_name.clone())
        .unwrap_or_else(|| DEFAULT_NODE_TYPE.to_string());

    let idle = ns.is_some_and(|s| s.idle);
    let traffic_spec = ns
        .and_then(|s| s.traffic.as_ref())
        .or(defaults.traffic.as_ref());
    let traffic = match traffic_spec {
        Some(t) if !idle => Some(TrafficProfile::from_spec(t)?),
        _ => None,
    };

    let collect_statistics = ns
        .and_then(|s| s.collect_statistics)
        .or(defaults.collect_statistics)
        .unwrap_or(true);

    Ok(NodeConfig {
        name,
        address,
        type_name,
        traffic,
        collect_statistics,
        rng_seed: node_seed(seed, address),
    })
}

/// 内置场景：n 个节点成环，每个节点向其它所有节点发突发流量
pub fn default_ring_scenario(n: usize, seed: u64, routing: RoutingSpec) -> ScenarioSpec {
    let nodes = (0..n)
        .map(|i| NodeSpec {
            index: i,
            name: None,
            address: None,
            type_name: None,
            traffic: Some(TrafficSpec {
                dest_addresses: (0..n as u32).filter(|&a| a != i as u32).collect(),
                sleep_time: DistSpec::Exponential { mean: 1.0 },
                burst_time: DistSpec::Exponential { mean: 0.5 },
                send_ia_time: DistSpec::Exponential { mean: 0.01 },
                packet_length: DistSpec::Uniform {
                    min: 64.0,
                    max: 1500.0,
                },
            }),
            idle: false,
            collect_statistics: Some(true),
        })
        .collect();

    ScenarioSpec {
        schema_version: 1,
        seed,
        routing,
        topology: TopologySpec::Ring { n },
        link_latency_us: Some(DEFAULT_LINK_LATENCY_US),
        defaults: None,
        nodes,
    }
}

