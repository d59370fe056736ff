//! 数据包交付事件
//!
//! 定义网络模拟中的数据包交付事件。

use super::id::NodeId;
use super::net_world::NetWorld;
use super::packet::Packet;
use crate::sim::{Event, SimError, Simulator, World};
use tracing::{debug, trace};

/// 事件：把一个 packet 交给某个节点的路由器处理。
#[derive(Debug)]
pub struct DeliverPacket {
    pub to: NodeId,
    pub pkt: Packet,
}

impl Event for DeliverPacket {
    #[tracing::instrument(skip(self, sim, world), fields(pkt_id = self.pkt.id, to = ?self.to))]
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) -> Result<(), SimError> {
        let DeliverPacket { to, pkt } = *self;

        debug!(
            name = %pkt.name,
            byte_length = pkt.byte_length,
            dst = %pkt.dst,
            hop_count = pkt.hop_count,
            now = ?sim.now(),
            "数据包到达节点"
        );

        let w = NetWorld::downcast(world)?;
        w.net.deliver(to, pkt, sim)?;

        trace!("DeliverPacket::execute 完成");
        Ok(())
    }
}
