//! 流量源模块
//!
//! 由显式有限状态机驱动的突发流量发生器：在 Sleeping / Active 之间交替，
//! Active 期间按间隔发包。

mod bursty;
mod dist;
mod fsm;
mod timer;

pub use bursty::{BurstyApp, PHASE_HISTORY_LEN, TrafficProfile};
pub use dist::{Dist, DistSpec};
pub use fsm::{Action, FsmError, Phase, Span, TimerKind, Transition, step};
pub use timer::AppTimer;
