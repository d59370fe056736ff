//! 网络仿真世界
//!
//! 持有 `Network`；事件通过 `NetWorld::downcast` 从 `dyn World` 取回它。

use super::network::Network;
use crate::sim::{SimError, SimTime, World};
use std::any::Any;

#[derive(Default)]
pub struct NetWorld {
    pub net: Network,
    events: u64,
}

impl NetWorld {
    pub fn new(net: Network) -> Self {
        Self { net, events: 0 }
    }

    /// 已成功执行的事件数
    pub fn events_processed(&self) -> u64 {
        self.events
    }

    pub(crate) fn downcast(world: &mut dyn World) -> Result<&mut NetWorld, SimError> {
        world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .ok_or(SimError::WorldMismatch)
    }
}

impl World for NetWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn after_event(&mut self, _now: SimTime) {
        self.events += 1;
    }
}
