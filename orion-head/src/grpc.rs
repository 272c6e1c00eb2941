use std::sync::Arc;

use orion_cluster::{ClusterScheduler, GrpcNodeClient, NodeInfo, NodeRegistry};
use orion_common::ObjectRef;
use orion_core::Task;
use orion_rpc::head_service_server::HeadService;
use orion_rpc::{
    Empty, ObjectLocationReply, ObjectLocationRequest, ObjectReport, RegisterNodeReply,
    RegisterNodeRequest, TaskReply, TaskRequest,
};
use tonic::{Request, Response, Status};
use tracing::info;

/// Default `available_workers` reported for a freshly registered node. The
/// wire contract doesn't carry worker counts over `RegisterNode`, so every
/// node is assumed to have the same capacity; a future heartbeat extension
/// could refine this.
const DEFAULT_AVAILABLE_WORKERS: i32 = 2;

/// Composes `NodeRegistry` + `ClusterScheduler` + `GrpcNodeClient` behind the
/// `HeadService` RPC surface.
pub struct HeadServiceImpl {
    registry: Arc<NodeRegistry>,
    scheduler: Arc<ClusterScheduler>,
    client: Arc<GrpcNodeClient>,
}

impl HeadServiceImpl {
    pub fn new(registry: Arc<NodeRegistry>, scheduler: Arc<ClusterScheduler>, client: Arc<GrpcNodeClient>) -> Self {
        HeadServiceImpl {
            registry,
            scheduler,
            client,
        }
    }
}

#[tonic::async_trait]
impl HeadService for HeadServiceImpl {
    async fn register_node(
        &self,
        request: Request<RegisterNodeRequest>,
    ) -> Result<Response<RegisterNodeReply>, Status> {
        let req = request.into_inner();
        info!(node_id = %req.node_id, address = %req.address, "RegisterNode");

        self.client.register_address(req.node_id.clone(), req.address.clone());
        self.registry.register_node(NodeInfo {
            node_id: req.node_id,
            address: req.address,
            available_workers: DEFAULT_AVAILABLE_WORKERS,
            alive: true,
        });

        Ok(Response::new(RegisterNodeReply { success: true }))
    }

    async fn submit_task(&self, request: Request<TaskRequest>) -> Result<Response<TaskReply>, Status> {
        let req = request.into_inner();
        info!(task_id = %req.task_id, function_name = %req.function_name, "SubmitTask");

        let task_id = req.task_id.clone();
        let task = Task::remote(
            req.task_id,
            req.function_name,
            req.args,
            req.dep_ids.into_iter().map(ObjectRef::new).collect(),
        );

        // `ClusterScheduler::submit` may synchronously dispatch through
        // `GrpcNodeClient`, which blocks the calling thread on a nested
        // `Handle::block_on`; move it off the async reactor thread so that
        // nested block_on lands on a tokio blocking-pool thread instead of
        // panicking on a runtime worker thread.
        let scheduler = self.scheduler.clone();
        let location = tokio::task::spawn_blocking(move || {
            scheduler.submit(task);
            scheduler.object_location(&task_id)
        })
        .await
        .map_err(|err| Status::internal(format!("scheduling pass panicked: {err}")))?;

        // Optimistic: accepted is reported as soon as admission completes,
        // not once the node confirms receipt. node_id reflects wherever the
        // scheduler placed the task during this submission.
        Ok(Response::new(TaskReply {
            accepted: true,
            node_id: location.unwrap_or_default(),
        }))
    }

    async fn report_object_created(&self, request: Request<ObjectReport>) -> Result<Response<Empty>, Status> {
        let req = request.into_inner();
        info!(object_id = %req.object_id, node_id = %req.node_id, "ReportObjectCreated");

        let scheduler = self.scheduler.clone();
        tokio::task::spawn_blocking(move || scheduler.on_object_created(&req.object_id, &req.node_id))
            .await
            .map_err(|err| Status::internal(format!("scheduling pass panicked: {err}")))?;

        Ok(Response::new(Empty {}))
    }

    async fn get_object_location(
        &self,
        request: Request<ObjectLocationRequest>,
    ) -> Result<Response<ObjectLocationReply>, Status> {
        let req = request.into_inner();

        let Some(node_id) = self.scheduler.object_location(&req.object_id) else {
            return Err(Status::not_found(format!("object not found: {}", req.object_id)));
        };

        let address = self
            .registry
            .nodes()
            .into_iter()
            .find(|n| n.node_id == node_id)
            .map(|n| n.address)
            .unwrap_or_default();

        Ok(Response::new(ObjectLocationReply { node_id, address }))
    }
}
