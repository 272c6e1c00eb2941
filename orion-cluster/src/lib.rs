pub mod client;
pub mod cluster_scheduler;
pub mod error;
pub mod node_registry;
pub mod node_runtime;

#[cfg(test)]
test_r::enable!();

pub use client::{GrpcNodeClient, InProcessNodeClient, NodeClient};
pub use cluster_scheduler::ClusterScheduler;
pub use error::NodeClientError;
pub use node_registry::{NodeInfo, NodeRegistry};
pub use node_runtime::NodeRuntime;
