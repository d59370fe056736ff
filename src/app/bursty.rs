//! 突发流量发生器
//!
//! 每个节点一个。睡眠一段时间后进入突发期，突发期内按间隔向随机目的地址发包；
//! 同时作为本节点的本地交付终点，统计收到的包。

use std::collections::VecDeque;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace};

use super::dist::Dist;
use super::fsm::{self, Action, FsmError, Phase, Span, TimerKind};
use super::timer::AppTimer;
use crate::net::{Address, NodeId, Packet, Signal, SignalSink};
use crate::sim::{EventId, SimError, SimTime, Simulator, TrafficSpec};

/// 保留的最近阶段切换条数
pub const PHASE_HISTORY_LEN: usize = 64;

/// 校验过的流量参数
#[derive(Debug, Clone)]
pub struct TrafficProfile {
    pub dest_addresses: Vec<Address>,
    pub sleep_time: Dist,
    pub burst_time: Dist,
    pub send_ia_time: Dist,
    pub packet_length: Dist,
}

impl TrafficProfile {
    pub fn from_spec(spec: &TrafficSpec) -> Result<Self, SimError> {
        if spec.dest_addresses.is_empty() {
            return Err(SimError::Config(
                "traffic.dest_addresses must not be empty".to_string(),
            ));
        }
        Ok(Self {
            dest_addresses: spec.dest_addresses.iter().copied().map(Address).collect(),
            sleep_time: Dist::new(&spec.sleep_time)?,
            burst_time: Dist::new(&spec.burst_time)?,
            send_ia_time: Dist::new(&spec.send_ia_time)?,
            packet_length: Dist::new(&spec.packet_length)?,
        })
    }
}

/// 突发流量源
#[derive(Debug)]
pub struct BurstyApp {
    node: NodeId,
    address: Address,
    /// None 表示只收不发
    traffic: Option<TrafficProfile>,
    collect_statistics: bool,
    rng: StdRng,

    phase: Phase,
    phase_history: VecDeque<(SimTime, Phase)>,
    pk_counter: u64,
    start_stop_burst: Option<EventId>,
    send_message: Option<EventId>,

    num_sent: u64,
    num_received: u64,
}

impl BurstyApp {
    pub fn new(
        node: NodeId,
        address: Address,
        traffic: Option<TrafficProfile>,
        collect_statistics: bool,
        rng: StdRng,
    ) -> Self {
        Self {
            node,
            address,
            traffic,
            collect_statistics,
            rng,
            phase: Phase::Init,
            phase_history: VecDeque::with_capacity(PHASE_HISTORY_LEN),
            pk_counter: 0,
            start_stop_burst: None,
            send_message: None,
            num_sent: 0,
            num_received: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// 最近 `PHASE_HISTORY_LEN` 次阶段切换的 (时间, 新阶段)，从旧到新
    pub fn phase_history(&self) -> impl Iterator<Item = (SimTime, Phase)> + '_ {
        self.phase_history.iter().copied()
    }

    pub fn num_sent(&self) -> u64 {
        self.num_sent
    }

    pub fn num_received(&self) -> u64 {
        self.num_received
    }

    pub fn is_generator(&self) -> bool {
        self.traffic.is_some()
    }

    pub fn collects_statistics(&self) -> bool {
        self.collect_statistics
    }

    /// 状态栏文本
    pub fn status_text(&self) -> String {
        format!("sent:{} received:{}", self.num_sent, self.num_received)
    }

    /// 在当前时刻调度第一个突发边界事件（离开 Init）。只收不发的节点什么也不做。
    pub fn start(&mut self, sim: &mut Simulator) {
        if self.traffic.is_none() {
            return;
        }
        let id = sim.schedule(
            sim.now(),
            AppTimer {
                node: self.node,
                timer: TimerKind::StartStopBurst,
            },
        );
        self.start_stop_burst = Some(id);
    }

    fn slot(&mut self, timer: TimerKind) -> &mut Option<EventId> {
        match timer {
            TimerKind::StartStopBurst => &mut self.start_stop_burst,
            TimerKind::Send => &mut self.send_message,
        }
    }

    /// 处理定时器到期，返回本次生成的数据包（交给本节点路由）。
    #[tracing::instrument(skip(self, sim), fields(address = %self.address, phase = %self.phase))]
    pub fn on_timer(&mut self, timer: TimerKind, sim: &mut Simulator) -> Result<Vec<Packet>, FsmError> {
        let transition = fsm::step(self.phase, timer)?;
        // 只接受当前挂起的那个定时器
        let fired = sim.current_event();
        if fired.is_none() || *self.slot(timer) != fired {
            return Err(FsmError::TimerNotArmed { timer });
        }
        self.slot(timer).take();

        let mut out = Vec::new();
        for action in &transition.actions {
            self.apply(*action, sim, &mut out);
        }

        if transition.changes_phase() {
            self.phase = transition.to;
            if self.phase_history.len() == PHASE_HISTORY_LEN {
                self.phase_history.pop_front();
            }
            self.phase_history.push_back((sim.now(), transition.to));
            match transition.to {
                Phase::Active => info!(now = %sim.now(), "burst started"),
                Phase::Sleeping => info!(now = %sim.now(), "burst ended, sleeping"),
                Phase::Init => {}
            }
        }
        Ok(out)
    }

    fn apply(&mut self, action: Action, sim: &mut Simulator, out: &mut Vec<Packet>) {
        let Some(traffic) = &self.traffic else {
            return;
        };
        match action {
            Action::ArmStartStop(span) => {
                let d = match span {
                    Span::Sleep => traffic.sleep_time.sample_time(&mut self.rng),
                    Span::Burst => traffic.burst_time.sample_time(&mut self.rng),
                };
                debug!(?span, duration = %d, "arming burst boundary");
                let id = sim.schedule_in(
                    d,
                    AppTimer {
                        node: self.node,
                        timer: TimerKind::StartStopBurst,
                    },
                );
                self.start_stop_burst = Some(id);
            }
            Action::ArmSend => {
                let d = traffic.send_ia_time.sample_time(&mut self.rng);
                debug!(duration = %d, "next sending");
                if let Some(old) = self.send_message.take() {
                    sim.cancel(old);
                }
                let id = sim.schedule_in(
                    d,
                    AppTimer {
                        node: self.node,
                        timer: TimerKind::Send,
                    },
                );
                self.send_message = Some(id);
            }
            Action::CancelSend => {
                if let Some(old) = self.send_message.take() {
                    sim.cancel(old);
                }
            }
            Action::Generate => {
                let pkt = self.generate_packet(sim.now());
                out.push(pkt);
            }
        }
    }

    fn generate_packet(&mut self, now: SimTime) -> Packet {
        // 只在 traffic 为 Some 时由 apply 调用
        let (dst, byte_length) = match &self.traffic {
            Some(traffic) => {
                let idx = self.rng.gen_range(0..traffic.dest_addresses.len());
                (
                    traffic.dest_addresses[idx],
                    traffic.packet_length.sample_bytes(&mut self.rng),
                )
            }
            None => (self.address, 0),
        };

        let name = format!("pk-{}-to-{}-#{}", self.address, dst, self.pk_counter);
        self.pk_counter += 1;
        self.num_sent += 1;
        trace!(%name, byte_length, "generating packet");

        Packet::new(name, self.address, dst, byte_length, now)
    }

    /// 本地交付：记录统计信号后丢弃数据包。
    pub fn on_packet(&mut self, pkt: Packet, now: SimTime, signals: &mut dyn SignalSink) {
        debug!(
            name = %pkt.name,
            hops = pkt.hop_count,
            "received packet"
        );
        if self.collect_statistics {
            let delay = now.since(pkt.created_at).as_secs_f64();
            signals.emit(now, self.address, Signal::EndToEndDelay, delay);
            signals.emit(now, self.address, Signal::HopCount, pkt.hop_count as f64);
            signals.emit(now, self.address, Signal::SourceAddress, pkt.src.0 as f64);
        }
        self.num_received += 1;
    }
}
