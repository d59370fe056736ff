use crate::net::{Address, NetWorld, NodeConfig, NodeId};
use crate::sim::SimTime;

pub(super) const LATENCY: SimTime = SimTime(1_000_000);

/// 只路由的节点 + 双向链路；`addresses[i]` 是第 i 个节点的地址
pub(super) fn build_world(addresses: &[u32], links: &[(usize, usize)]) -> (NetWorld, Vec<NodeId>) {
    let mut world = NetWorld::default();
    world.net.signals.keep_records(true);
    let ids: Vec<NodeId> = addresses
        .iter()
        .enumerate()
        .map(|(i, a)| {
            world
                .net
                .add_node(NodeConfig::router(format!("n{i}"), Address(*a)))
                .expect("add node")
        })
        .collect();
    for &(a, b) in links {
        world
            .net
            .connect_bidir(ids[a], ids[b], LATENCY)
            .expect("connect");
    }
    (world, ids)
}
