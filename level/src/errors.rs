use thiserror::Error;

/// Problems found while checking that a level graph is safe to walk
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level has no nodes or subsectors to render")]
    Empty,
    #[error("{kind} {index} refers to missing {target} {target_index}")]
    BadReference {
        kind: &'static str,
        index: usize,
        target: &'static str,
        target_index: usize,
    },
    #[error("subsector {subsector} seg run {start}+{count} exceeds {total} segs")]
    BadSegRun {
        subsector: usize,
        start: usize,
        count: usize,
        total: usize,
    },
    #[error("node {node} has child node {child} which is not built before it")]
    NodeOrder { node: usize, child: usize },
}
