//! 可配置随机分布
//!
//! 睡眠时长、突发时长、发包间隔与包长都从这里采样。

use rand::Rng;
use rand_distr::{Distribution, Exp, Normal, Uniform};
use serde::{Deserialize, Serialize};

use crate::sim::{SimError, SimTime};

/// 分布的配置形式（JSON）。时长类参数以秒为单位。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistSpec {
    Const { value: f64 },
    Uniform { min: f64, max: f64 },
    Exponential { mean: f64 },
    /// 负的采样值截断为 0
    Normal { mean: f64, stddev: f64 },
}

#[derive(Debug, Clone)]
enum Sampler {
    Const(f64),
    Uniform(Uniform<f64>),
    Exp(Exp<f64>),
    Normal(Normal<f64>),
}

/// 校验过的分布，可重复采样。
#[derive(Debug, Clone)]
pub struct Dist {
    spec: DistSpec,
    sampler: Sampler,
}

fn check(ok: bool, what: &str, spec: &DistSpec) -> Result<(), SimError> {
    if ok {
        Ok(())
    } else {
        Err(SimError::Config(format!("{what}: {spec:?}")))
    }
}

impl Dist {
    pub fn new(spec: &DistSpec) -> Result<Self, SimError> {
        let sampler = match *spec {
            DistSpec::Const { value } => {
                check(value.is_finite() && value >= 0.0, "const value must be finite and >= 0", spec)?;
                Sampler::Const(value)
            }
            DistSpec::Uniform { min, max } => {
                check(
                    min.is_finite() && max.is_finite() && min >= 0.0 && min <= max,
                    "uniform bounds must satisfy 0 <= min <= max",
                    spec,
                )?;
                Sampler::Uniform(Uniform::new_inclusive(min, max))
            }
            DistSpec::Exponential { mean } => {
                check(mean.is_finite() && mean > 0.0, "exponential mean must be > 0", spec)?;
                let exp = Exp::new(1.0 / mean)
                    .map_err(|e| SimError::Config(format!("{e:?}: {spec:?}")))?;
                Sampler::Exp(exp)
            }
            DistSpec::Normal { mean, stddev } => {
                check(
                    mean.is_finite() && stddev.is_finite() && stddev >= 0.0,
                    "normal needs finite mean and stddev >= 0",
                    spec,
                )?;
                let normal = Normal::new(mean, stddev)
                    .map_err(|e| SimError::Config(format!("{e:?}: {spec:?}")))?;
                Sampler::Normal(normal)
            }
        };
        Ok(Self {
            spec: spec.clone(),
            sampler,
        })
    }

    pub fn spec(&self) -> &DistSpec {
        &self.spec
    }

    /// 采样一个非负值
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let v = match &self.sampler {
            Sampler::Const(v) => *v,
            Sampler::Uniform(d) => d.sample(rng),
            Sampler::Exp(d) => d.sample(rng),
            Sampler::Normal(d) => d.sample(rng),
        };
        v.max(0.0)
    }

    /// 采样一个时长（秒 -> SimTime）
    pub fn sample_time<R: Rng + ?Sized>(&self, rng: &mut R) -> SimTime {
        SimTime::from_secs_f64(self.sample(rng))
    }

    /// 采样一个字节数（四舍五入，饱和到 u32）
    pub fn sample_bytes<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.sample(rng).round().min(u32::MAX as f64) as u32
    }
}
