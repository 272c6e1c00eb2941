/// Errors a `NodeClient` can report back to the `ClusterScheduler`.
///
/// Both kinds are logged and do not unwind the scheduling pass: the
/// optimistic location record is still written so later dependents become
/// runnable rather than stalling forever.
#[derive(Debug, thiserror::Error)]
pub enum NodeClientError {
    #[error("unknown node_id: {0}")]
    UnknownNode(String),
    #[error("dispatch to node {node_id} failed: {source}")]
    DispatchFailure {
        node_id: String,
        #[source]
        source: tonic::Status,
    },
}
