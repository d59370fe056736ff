//! 突发流量 + 静态路由仿真
//!
//! 从 scenario.json 构建网络（不给则使用内置的环形拓扑），运行到指定时间，
//! 打印每个节点的状态与全局统计。

use clap::{Parser, ValueEnum};
use routesim_rs::net::{Address, NetWorld, SignalRecord, SignalSummary, Stats};
use routesim_rs::sim::{RoutingMode, RoutingSpec, ScenarioSpec, SimError, SimTime};
use routesim_rs::topo::{build_scenario, default_ring_scenario};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "bursty-net",
    about = "突发流量源 + 最短跳数静态路由的离散事件仿真"
)]
struct Args {
    /// scenario.json 路径；不给则使用内置环形拓扑
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// 内置环形拓扑的节点数
    #[arg(long, default_value_t = 6)]
    nodes: usize,

    /// 覆盖场景中的随机数种子
    #[arg(long)]
    seed: Option<u64>,

    /// 覆盖场景中的路由模式
    #[arg(long, value_enum)]
    routing: Option<RoutingArg>,

    /// 仿真运行到多少秒
    #[arg(long, default_value_t = 10.0)]
    until_s: f64,

    /// 输出信号汇总与节点状态的 JSON 文件
    #[arg(long)]
    signals_json: Option<PathBuf>,

    /// JSON 中包含每一条信号记录
    #[arg(long)]
    with_records: bool,
}

#[derive(Debug, Serialize)]
struct NodeReport {
    address: Address,
    name: String,
    phase: String,
    sent: u64,
    received: u64,
    routes: usize,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    until_ns: u64,
    stats: &'a Stats,
    summaries: BTreeMap<&'static str, &'a SignalSummary>,
    nodes: Vec<NodeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<&'a [SignalRecord]>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoutingArg {
    /// 每个节点各自计算路由表
    Distributed,
    /// 中心节点计算全部路由表并下发
    Centralized,
}

impl From<RoutingArg> for RoutingMode {
    fn from(arg: RoutingArg) -> Self {
        match arg {
            RoutingArg::Distributed => RoutingMode::Distributed,
            RoutingArg::Centralized => RoutingMode::Centralized,
        }
    }
}

fn load_scenario(args: &Args) -> Result<ScenarioSpec, SimError> {
    let mut spec = match &args.scenario {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            serde_json::from_str::<ScenarioSpec>(&raw)?
        }
        None => default_ring_scenario(args.nodes, 1, RoutingSpec::default()),
    };
    if let Some(seed) = args.seed {
        spec.seed = seed;
    }
    if let Some(mode) = args.routing {
        spec.routing.mode = mode.into();
    }
    Ok(spec)
}

fn report<'a>(world: &'a NetWorld, until: SimTime, with_records: bool) -> Report<'a> {
    let net = &world.net;
    Report {
        until_ns: until.0,
        stats: &net.stats,
        summaries: net
            .signals
            .summaries()
            .iter()
            .map(|(sig, sum)| (sig.name(), sum))
            .collect(),
        nodes: net
            .nodes()
            .map(|n| NodeReport {
                address: n.address(),
                name: n.name().to_string(),
                phase: n.app().phase().to_string(),
                sent: n.app().num_sent(),
                received: n.app().num_received(),
                routes: n.router().table().len(),
            })
            .collect(),
        records: with_records.then(|| net.signals.records()),
    }
}

fn run(args: Args) -> Result<(), SimError> {
    if !(args.until_s.is_finite() && args.until_s >= 0.0) {
        return Err(SimError::Config(format!(
            "--until-s must be >= 0, got {}",
            args.until_s
        )));
    }
    let spec = load_scenario(&args)?;
    let (mut sim, mut world) = build_scenario(&spec)?;
    world.net.signals.keep_records(args.with_records);

    let until = SimTime::from_secs_f64(args.until_s);
    sim.run_until(until, &mut world)?;

    for node in world.net.nodes() {
        println!(
            "node {} ({}) phase={} {}",
            node.address(),
            node.name(),
            node.app().phase(),
            node.app().status_text()
        );
    }

    let stats = &world.net.stats;
    println!(
        "done @ {:?}, events={}, generated_pkts={}, delivered_pkts={}, dropped_pkts={}, forwarded_pkts={}",
        sim.now(),
        world.events_processed(),
        stats.generated_pkts,
        stats.delivered_pkts,
        stats.dropped_pkts,
        stats.forwarded_pkts
    );

    if let Some(path) = &args.signals_json {
        let json = serde_json::to_string_pretty(&report(&world, until, args.with_records))?;
        fs::write(path, json)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
