//! 仿真器
//!
//! 定义事件驱动仿真器，维护当前时间与事件队列，并支持取消尚未执行的事件。

use super::error::SimError;
use super::event::Event;
use super::scheduled_event::{EventId, ScheduledEvent};
use super::time::SimTime;
use super::world::World;
use std::collections::{BinaryHeap, HashSet};
use tracing::{debug, error, info, trace};

/// 事件驱动仿真器：维护当前时间与事件队列。
///
/// 同一时刻的事件按调度顺序（FIFO）执行。
#[derive(Default)]
pub struct Simulator {
    now: SimTime,
    next_seq: u64,
    q: BinaryHeap<ScheduledEvent>,
    /// 仍在队列中且未被取消的事件
    pending: HashSet<EventId>,
    /// 正在执行的事件
    current: Option<EventId>,
}

impl Simulator {
    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 调度事件在指定时间执行，返回可用于取消的句柄
    #[tracing::instrument(skip(self, ev), fields(event_type = std::any::type_name::<E>(), schedule_at = ?at))]
    pub fn schedule<E: Event>(&mut self, at: SimTime, ev: E) -> EventId {
        let seq = self.next_seq;
        trace!(now = ?self.now, seq, "调度事件");

        self.next_seq = self.next_seq.wrapping_add(1);
        self.q.push(ScheduledEvent {
            at,
            seq,
            ev: Box::new(ev),
        });
        self.pending.insert(EventId(seq));

        debug!(queue_size = self.q.len(), "事件已加入队列");
        EventId(seq)
    }

    /// 在当前时间之后 `delay` 调度事件
    pub fn schedule_in<E: Event>(&mut self, delay: SimTime, ev: E) -> EventId {
        let at = self.now.after(delay);
        self.schedule(at, ev)
    }

    /// 取消一个尚未执行的事件。对已执行/已取消的句柄是 no-op。
    ///
    /// 返回该事件此前是否仍处于 pending 状态。
    pub fn cancel(&mut self, id: EventId) -> bool {
        let was_pending = self.pending.remove(&id);
        trace!(seq = id.0, was_pending, "取消事件");
        was_pending
    }

    /// 事件是否仍在等待执行
    pub fn is_pending(&self, id: EventId) -> bool {
        self.pending.contains(&id)
    }

    /// 正在执行的事件句柄（事件处理函数之外为 None）
    pub fn current_event(&self) -> Option<EventId> {
        self.current
    }

    /// 等待执行的事件数（不含已取消的）
    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    /// 弹出下一个未被取消的事件（时间不超过 `until`）
    fn pop_live(&mut self, until: Option<SimTime>) -> Option<ScheduledEvent> {
        while let Some(top) = self.q.peek() {
            if until.is_some_and(|u| top.at > u) {
                return None;
            }
            let item = self.q.pop()?;
            if self.pending.remove(&item.id()) {
                return Some(item);
            }
            trace!(seq = item.seq, "跳过已取消事件");
        }
        None
    }

    fn dispatch(&mut self, item: ScheduledEvent, world: &mut dyn World) -> Result<(), SimError> {
        self.now = item.at;
        let seq = item.seq;
        self.current = Some(item.id());
        let res = item.ev.execute(self, world);
        self.current = None;
        if let Err(e) = res {
            error!(seq, now = ?self.now, error = %e, "事件执行失败，终止仿真");
            return Err(e);
        }
        world.after_event(self.now);
        Ok(())
    }

    /// 运行直到事件队列为空或到达 `until`。
    pub fn run_until(&mut self, until: SimTime, world: &mut dyn World) -> Result<(), SimError> {
        while let Some(item) = self.pop_live(Some(until)) {
            self.dispatch(item, world)?;
        }
        self.now = self.now.max(until);
        Ok(())
    }

    /// 运行所有事件直到队列为空。
    #[tracing::instrument(skip(self, world))]
    pub fn run(&mut self, world: &mut dyn World) -> Result<(), SimError> {
        info!("▶️  开始运行仿真");
        debug!(now = ?self.now, queue_size = self.q.len(), "初始状态");

        let mut event_count: u64 = 0;
        while let Some(item) = self.pop_live(None) {
            event_count += 1;

            debug!(
                event_num = event_count,
                scheduled_at = ?item.at,
                seq = item.seq,
                remaining_queue = self.q.len(),
                "执行事件"
            );

            self.dispatch(item, world)?;
        }

        info!(
            total_events = event_count,
            final_time = ?self.now,
            "✅ 仿真完成"
        );
        Ok(())
    }
}
