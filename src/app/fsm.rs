//! 突发流量源的状态机
//!
//! 状态转换是纯函数 `step(phase, timer)`：只决定下一个状态和需要执行的动作，
//! 不接触定时器或随机数。每个状态的进入/退出动作只在 `on_enter` / `on_exit` 中写一次。
//!
//! ```text
//!   Init --burst--> Sleeping --burst--> Active --burst--> Sleeping ...
//!                                        |  ^
//!                                        +--+ send（自环：发包并重新调度）
//! ```

use std::fmt;
use thiserror::Error;

/// 流量源所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// 初始瞬态：收到第一个事件即进入 Sleeping
    Init,
    Sleeping,
    Active,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Init => "init",
            Phase::Sleeping => "sleeping",
            Phase::Active => "active",
        };
        f.write_str(s)
    }
}

/// 流量源拥有的两个定时器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// 突发边界：Sleeping/Active 切换
    StartStopBurst,
    /// 突发内的发包间隔
    Send,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimerKind::StartStopBurst => "startStopBurst",
            TimerKind::Send => "sendMessage",
        };
        f.write_str(s)
    }
}

/// 突发边界定时器要等待的时长来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    Sleep,
    Burst,
}

/// 状态转换附带的副作用，由调用方按顺序执行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// 采样一个时长并调度突发边界定时器
    ArmStartStop(Span),
    /// 采样发包间隔，取消旧的发包定时器并重新调度
    ArmSend,
    /// 取消发包定时器（未调度时为 no-op）
    CancelSend,
    /// 立即生成并发送一个数据包
    Generate,
}

/// `step` 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    pub actions: Vec<Action>,
}

impl Transition {
    pub fn changes_phase(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FsmError {
    #[error("invalid event {timer} in state {phase}")]
    UnexpectedTimer { phase: Phase, timer: TimerKind },
    #[error("timer {timer} fired but was not armed")]
    TimerNotArmed { timer: TimerKind },
}

fn on_exit(phase: Phase) -> &'static [Action] {
    match phase {
        Phase::Init => &[],
        Phase::Sleeping => &[Action::ArmStartStop(Span::Burst)],
        Phase::Active => &[Action::CancelSend],
    }
}

fn on_enter(phase: Phase) -> &'static [Action] {
    match phase {
        Phase::Init => &[],
        Phase::Sleeping => &[Action::ArmStartStop(Span::Sleep)],
        // 突发开始时立即发第一个包，而不是先等一个间隔
        Phase::Active => &[Action::ArmSend, Action::Generate],
    }
}

fn on_stay(phase: Phase) -> &'static [Action] {
    match phase {
        Phase::Active => &[Action::Generate, Action::ArmSend],
        Phase::Init | Phase::Sleeping => &[],
    }
}

/// 状态转换函数
pub fn step(phase: Phase, timer: TimerKind) -> Result<Transition, FsmError> {
    let to = match (phase, timer) {
        (Phase::Init, TimerKind::StartStopBurst) => Phase::Sleeping,
        (Phase::Sleeping, TimerKind::StartStopBurst) => Phase::Active,
        (Phase::Active, TimerKind::StartStopBurst) => Phase::Sleeping,
        (Phase::Active, TimerKind::Send) => Phase::Active,
        (phase, timer) => return Err(FsmError::UnexpectedTimer { phase, timer }),
    };

    let actions = if to == phase {
        on_stay(phase).to_vec()
    } else {
        on_exit(phase).iter().chain(on_enter(to)).copied().collect()
    };

    Ok(Transition {
        from: phase,
        to,
        actions,
    })
}
