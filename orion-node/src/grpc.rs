use std::sync::Arc;

use orion_cluster::NodeRuntime;
use orion_common::{ObjectRef, Value};
use orion_core::{decode_i32_arg, FunctionRegistry, Task};
use orion_rpc::node_service_server::NodeService;
use orion_rpc::{GetObjectRequest, ObjectData, TaskReply, TaskRequest};
use tonic::{Request, Response, Status};
use tracing::{error, info};

/// Receives remote task dispatch from the head, resolves `function_name`
/// against the local `FunctionRegistry`, and submits the task to the node's
/// local `Runtime`.
pub struct NodeServiceImpl {
    node: Arc<NodeRuntime>,
    functions: Arc<FunctionRegistry>,
}

impl NodeServiceImpl {
    pub fn new(node: Arc<NodeRuntime>, functions: Arc<FunctionRegistry>) -> Self {
        NodeServiceImpl { node, functions }
    }
}

#[tonic::async_trait]
impl NodeService for NodeServiceImpl {
    async fn execute_task(&self, request: Request<TaskRequest>) -> Result<Response<TaskReply>, Status> {
        let req = request.into_inner();
        info!(
            node_id = %self.node.node_id(),
            task_id = %req.task_id,
            function_name = %req.function_name,
            "ExecuteTask"
        );

        if !self.functions.exists(&req.function_name) {
            error!(function_name = %req.function_name, "unknown function");
            return Err(Status::not_found(format!("unknown function: {}", req.function_name)));
        }

        let deps: Vec<ObjectRef> = req.dep_ids.into_iter().map(ObjectRef::new).collect();
        let literal_args = req.args;
        let function_name = req.function_name;
        let functions = self.functions.clone();
        let node_id = self.node.node_id().to_string();

        // effective_args: prefer literal args sent over the wire; fall back
        // to dep values resolved by the worker from the local store when
        // none were provided.
        let task = Task::new(req.task_id, deps, move |dep_values: Vec<Value>| {
            let effective_args = if literal_args.is_empty() {
                dep_values
            } else {
                literal_args
                    .iter()
                    .map(|bytes| Value::new(decode_i32_arg(bytes).unwrap_or_default()))
                    .collect()
            };

            match functions.invoke(&function_name, effective_args) {
                Ok(value) => {
                    info!(node_id = %node_id, function_name = %function_name, "task complete");
                    value
                }
                Err(err) => panic!("function invocation failed: {err}"),
            }
        });

        self.node.local_runtime().submit(task);

        Ok(Response::new(TaskReply {
            accepted: true,
            node_id: self.node.node_id().to_string(),
        }))
    }

    /// Reserved cross-node object fetch; never called by the current design
    /// since placement co-locates dependents with their deps.
    async fn get_object(&self, request: Request<GetObjectRequest>) -> Result<Response<ObjectData>, Status> {
        let req = request.into_inner();
        Err(Status::unimplemented(format!(
            "cross-node object fetch not yet implemented: {}",
            req.object_id
        )))
    }
}
