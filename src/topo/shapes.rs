//! 基本拓扑形状

use crate::sim::TopologySpec;

/// 拓扑中的双向边（节点下标对），按配置顺序给出。
///
/// 边的顺序决定各节点出接口的编号。
pub fn edges(spec: &TopologySpec) -> Vec<(usize, usize)> {
    match spec {
        TopologySpec::Line { n } => (1..*n).map(|i| (i - 1, i)).collect(),
        TopologySpec::Ring { n } => match *n {
            0 | 1 => Vec::new(),
            2 => vec![(0, 1)],
            n => (0..n).map(|i| (i, (i + 1) % n)).collect(),
        },
        TopologySpec::Links { links, .. } => links.clone(),
    }
}
