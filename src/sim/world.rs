//! 仿真世界
//!
//! 事件执行时可以修改的全部状态；仿真器只通过这个 trait 认识它。

use super::time::SimTime;
use std::any::Any;

pub trait World: Any {
    /// 供事件向下转型到具体的世界类型
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// 每个事件成功执行之后调用（失败的事件不会触发）
    fn after_event(&mut self, _now: SimTime) {}
}
