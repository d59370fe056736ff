//! 流量源定时器事件

use super::fsm::TimerKind;
use crate::net::{NetWorld, NodeId};
use crate::sim::{Event, SimError, Simulator, World};

/// 事件：某个节点的流量源定时器到期。
#[derive(Debug)]
pub struct AppTimer {
    pub node: NodeId,
    pub timer: TimerKind,
}

impl Event for AppTimer {
    #[tracing::instrument(skip(self, sim, world), fields(node = ?self.node, timer = %self.timer))]
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) -> Result<(), SimError> {
        let AppTimer { node, timer } = *self;
        let w = NetWorld::downcast(world)?;
        w.net.on_app_timer(node, timer, sim)
    }
}
