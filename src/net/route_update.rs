//! 集中式路由的一次性下发事件

use super::id::{Address, NodeId};
use super::net_world::NetWorld;
use crate::sim::{Event, SimError, Simulator, World};

/// 事件：中心节点把某个节点的路由表（文本形式）下发给它。
#[derive(Debug)]
pub struct RouteUpdate {
    pub to: NodeId,
    /// 计算该路由表的中心节点
    pub origin: Address,
    /// `ForwardingTable::encode` 的输出
    pub payload: String,
}

impl Event for RouteUpdate {
    #[tracing::instrument(skip(self, _sim, world), fields(to = ?self.to, origin = %self.origin))]
    fn execute(self: Box<Self>, _sim: &mut Simulator, world: &mut dyn World) -> Result<(), SimError> {
        let RouteUpdate { to, payload, .. } = *self;
        let w = NetWorld::downcast(world)?;
        w.net.on_route_update(to, &payload)
    }
}
