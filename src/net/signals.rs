//! 统计信号
//!
//! 组件只向 `SignalSink` 写入命名的数值观测，不从中读取任何东西。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::id::Address;
use crate::sim::SimTime;

/// `outputIf` 信号中表示本地交付的值
pub const OUTPUT_IF_LOCAL: f64 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Signal {
    /// 端到端时延（秒）
    EndToEndDelay,
    HopCount,
    SourceAddress,
    /// 被丢弃包的字节数
    Drop,
    /// 转发所用接口；本地交付为 `OUTPUT_IF_LOCAL`
    OutputIf,
}

impl Signal {
    pub fn name(self) -> &'static str {
        match self {
            Signal::EndToEndDelay => "endToEndDelay",
            Signal::HopCount => "hopCount",
            Signal::SourceAddress => "sourceAddress",
            Signal::Drop => "drop",
            Signal::OutputIf => "outputIf",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 只写的信号接收端
pub trait SignalSink {
    fn emit(&mut self, at: SimTime, node: Address, signal: Signal, value: f64);
}

/// 一条观测记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub t_ns: u64,
    pub node: Address,
    pub signal: Signal,
    pub value: f64,
}

/// 某个信号的汇总（count/sum/min/max）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalSummary {
    pub count: u64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl SignalSummary {
    fn add(&mut self, v: f64) {
        if self.count == 0 {
            self.min = v;
            self.max = v;
        } else {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
        self.count += 1;
        self.sum += v;
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// 内存中的信号收集器（仿真结束后可写成 JSON）
///
/// 汇总总是更新；逐条记录只在 `keep_records(true)` 之后才保存。
#[derive(Debug, Default, Clone, Serialize)]
pub struct SignalRecorder {
    #[serde(skip)]
    keep_records: bool,
    records: Vec<SignalRecord>,
    summaries: BTreeMap<Signal, SignalSummary>,
}

impl SignalRecorder {
    /// 保留每一条记录（默认只保留汇总）
    pub fn with_records() -> Self {
        Self {
            keep_records: true,
            ..Self::default()
        }
    }

    pub fn keep_records(&mut self, keep: bool) {
        self.keep_records = keep;
    }

    pub fn keeps_records(&self) -> bool {
        self.keep_records
    }

    /// 保存下来的记录；未开启 `keep_records` 时为空
    pub fn records(&self) -> &[SignalRecord] {
        &self.records
    }

    pub fn summary(&self, signal: Signal) -> Option<&SignalSummary> {
        self.summaries.get(&signal)
    }

    pub fn summaries(&self) -> &BTreeMap<Signal, SignalSummary> {
        &self.summaries
    }

    /// 某节点某信号的所有 (时间, 值)；同样依赖 `keep_records`
    pub fn values(&self, node: Address, signal: Signal) -> Vec<(SimTime, f64)> {
        self.records
            .iter()
            .filter(|r| r.node == node && r.signal == signal)
            .map(|r| (SimTime(r.t_ns), r.value))
            .collect()
    }
}

impl SignalSink for SignalRecorder {
    fn emit(&mut self, at: SimTime, node: Address, signal: Signal, value: f64) {
        self.summaries.entry(signal).or_default().add(value);
        if self.keep_records {
            self.records.push(SignalRecord {
                t_ns: at.0,
                node,
                signal,
                value,
            });
        }
    }
}
