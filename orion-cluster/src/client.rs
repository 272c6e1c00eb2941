use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use orion_common::ObjectRef;
use orion_core::Task;
use orion_rpc::node_service_client::NodeServiceClient;
use orion_rpc::TaskRequest;
use tonic::transport::{Channel, Endpoint};
use tracing::warn;

use crate::error::NodeClientError;
use crate::node_runtime::NodeRuntime;

/// Dispatches a task to a named node. On success, resolves to an
/// `ObjectRef` naming the task's eventual output, never the output itself.
pub trait NodeClient: Send + Sync {
    fn submit_task(&self, node_id: &str, task: Task) -> Result<ObjectRef, NodeClientError>;
}

/// Dispatches directly into a table of in-process `NodeRuntime`s, skipping
/// the network entirely. Used by single-process deployments and tests.
#[derive(Default)]
pub struct InProcessNodeClient {
    nodes: Mutex<HashMap<String, Arc<NodeRuntime>>>,
}

impl InProcessNodeClient {
    pub fn new() -> Self {
        InProcessNodeClient::default()
    }

    pub fn add_node(&self, node: Arc<NodeRuntime>) {
        self.nodes.lock().unwrap().insert(node.node_id().to_string(), node);
    }
}

impl NodeClient for InProcessNodeClient {
    fn submit_task(&self, node_id: &str, task: Task) -> Result<ObjectRef, NodeClientError> {
        let node = self.nodes.lock().unwrap().get(node_id).cloned();
        match node {
            Some(node) => Ok(node.local_runtime().submit(task)),
            None => Err(NodeClientError::UnknownNode(node_id.to_string())),
        }
    }
}

/// Dispatches over gRPC, maintaining a lazily-established, per-node-id
/// connection cache. `Channel::connect_lazy` defers the actual TCP connect
/// to first use, so adding a node never blocks.
pub struct GrpcNodeClient {
    handle: tokio::runtime::Handle,
    channels: Mutex<HashMap<String, Channel>>,
    addresses: Mutex<HashMap<String, String>>,
}

impl GrpcNodeClient {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        GrpcNodeClient {
            handle,
            channels: Mutex::new(HashMap::new()),
            addresses: Mutex::new(HashMap::new()),
        }
    }

    pub fn register_address(&self, node_id: impl Into<String>, address: impl Into<String>) {
        self.addresses.lock().unwrap().insert(node_id.into(), address.into());
    }

    fn channel_for(&self, node_id: &str) -> Result<Channel, NodeClientError> {
        if let Some(channel) = self.channels.lock().unwrap().get(node_id).cloned() {
            return Ok(channel);
        }
        let address = self
            .addresses
            .lock()
            .unwrap()
            .get(node_id)
            .cloned()
            .ok_or_else(|| NodeClientError::UnknownNode(node_id.to_string()))?;

        let endpoint = Endpoint::from_shared(address)
            .unwrap_or_else(|err| panic!("node {node_id} has an invalid address: {err}"));
        let channel = endpoint.connect_lazy();
        self.channels.lock().unwrap().insert(node_id.to_string(), channel.clone());
        Ok(channel)
    }
}

impl NodeClient for GrpcNodeClient {
    fn submit_task(&self, node_id: &str, task: Task) -> Result<ObjectRef, NodeClientError> {
        let object_ref = ObjectRef::new(task.id.clone());
        let channel = self.channel_for(node_id)?;

        let request = TaskRequest {
            task_id: task.id,
            function_name: task.function_name.unwrap_or_default(),
            dep_ids: task.deps.into_iter().map(|dep| dep.id).collect(),
            args: task.args,
        };

        let node_id = node_id.to_string();
        let result = self.handle.block_on(async move {
            let mut stub = NodeServiceClient::new(channel);
            stub.execute_task(request).await
        });

        match result {
            Ok(reply) => {
                if !reply.into_inner().accepted {
                    warn!(node_id, "node reported the task as not accepted");
                }
                // The caller gets an ObjectRef naming the eventual output
                // regardless of whether the remote accepted it.
                Ok(object_ref)
            }
            Err(status) => Err(NodeClientError::DispatchFailure { node_id, source: status }),
        }
    }
}
