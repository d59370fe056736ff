//! 仿真错误类型

use crate::app::FsmError;
use crate::net::Address;
use thiserror::Error;

/// 仿真过程中可能出现的错误。
///
/// 不可达目的地不是错误（按丢包处理），因此不在这里出现。
#[derive(Debug, Error)]
pub enum SimError {
    /// 状态机收到与当前状态不一致的定时器：调度不变量被破坏，必须终止。
    #[error("node {address}: {source}")]
    Fsm {
        address: Address,
        #[source]
        source: FsmError,
    },

    /// 集中式路由下发的路由表文本无法解析
    #[error("invalid route payload {payload:?}: {reason}")]
    RoutePayload { payload: String, reason: String },

    /// 场景配置不合法（在仿真开始前检测）
    #[error("invalid scenario: {0}")]
    Config(String),

    #[error("node {node} has no interface {iface}")]
    UnknownInterface { node: String, iface: usize },

    #[error("unknown node {0}")]
    UnknownNode(usize),

    #[error("unknown link {0}")]
    UnknownLink(usize),

    #[error("world must be NetWorld")]
    WorldMismatch,

    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario: {0}")]
    Json(#[from] serde_json::Error),
}
