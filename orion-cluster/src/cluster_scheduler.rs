use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use orion_common::ObjectId;
use orion_core::Task;
use tracing::warn;

use crate::client::NodeClient;
use crate::node_registry::NodeRegistry;

struct State {
    pending: VecDeque<Task>,
    location_map: HashMap<ObjectId, String>,
}

/// Cluster-wide counterpart of `orion_core::Scheduler`: instead of handing a
/// runnable task to a local worker, it picks a node via the registry and
/// dispatches through a `NodeClient`, using the same two-pass drain/requeue
/// admission loop.
pub struct ClusterScheduler {
    registry: Arc<NodeRegistry>,
    client: Arc<dyn NodeClient>,
    state: Mutex<State>,
}

impl ClusterScheduler {
    pub fn new(registry: Arc<NodeRegistry>, client: Arc<dyn NodeClient>) -> Self {
        ClusterScheduler {
            registry,
            client,
            state: Mutex::new(State {
                pending: VecDeque::new(),
                location_map: HashMap::new(),
            }),
        }
    }

    /// Enqueues `task` and triggers a scheduling pass.
    pub fn submit(&self, task: Task) {
        self.state.lock().unwrap().pending.push_back(task);
        self.schedule();
    }

    /// Records that `object_id` now lives on `node_id`, then re-runs
    /// scheduling so tasks that were waiting on it can become runnable.
    pub fn on_object_created(&self, object_id: &str, node_id: &str) {
        self.state
            .lock()
            .unwrap()
            .location_map
            .insert(object_id.to_string(), node_id.to_string());
        self.schedule();
    }

    pub fn object_location(&self, object_id: &str) -> Option<String> {
        self.state.lock().unwrap().location_map.get(object_id).cloned()
    }

    fn deps_ready(&self, task: &Task) -> bool {
        let state = self.state.lock().unwrap();
        task.deps.iter().all(|dep| state.location_map.contains_key(&dep.id))
    }

    /// One admission pass: drains the pending queue in a single snapshot
    /// (so the loop always terminates even if nothing ever becomes ready),
    /// dispatches every task whose deps already have a known location, and
    /// requeues the rest ahead of anything submitted concurrently while
    /// this pass was dispatching.
    pub fn schedule(&self) {
        let batch: Vec<Task> = {
            let mut state = self.state.lock().unwrap();
            state.pending.drain(..).collect()
        };

        let mut still_pending = VecDeque::new();

        for task in batch {
            if !self.deps_ready(&task) {
                still_pending.push_back(task);
                continue;
            }

            let Some(node) = self.registry.pick_node() else {
                still_pending.push_back(task);
                continue;
            };

            let task_id = task.id.clone();
            if let Err(err) = self.client.submit_task(&node.node_id, task) {
                warn!(node_id = %node.node_id, %err, "dispatch failed, optimistic location kept anyway");
            }
            // Fire-and-forget: record the location regardless of whether the
            // client call reported success, so a later GetObjectLocation can
            // point at a node that never actually produced the object. The
            // alternative (deferring the location update to completion) would
            // leave every downstream task pending whenever the node is slow
            // to report back.
            self.state
                .lock()
                .unwrap()
                .location_map
                .insert(task_id, node.node_id);
        }

        let mut state = self.state.lock().unwrap();
        let mut merged = still_pending;
        merged.append(&mut state.pending);
        state.pending = merged;
    }

    #[cfg(test)]
    pub(crate) fn pending_len(&self) -> usize {
        self.state.lock().unwrap().pending.len()
    }
}

#[cfg(test)]
mod tests {
    use test_r::test;

    use orion_common::{ObjectRef, Value};

    use crate::client::InProcessNodeClient;
    use crate::node_registry::NodeInfo;
    use crate::node_runtime::NodeRuntime;

    use super::*;

    fn registry_with_one_node() -> (Arc<NodeRegistry>, Arc<InProcessNodeClient>, Arc<NodeRuntime>) {
        let registry = Arc::new(NodeRegistry::new());
        registry.register_node(NodeInfo {
            node_id: "node-1".to_string(),
            address: "127.0.0.1:9001".to_string(),
            available_workers: 1,
            alive: true,
        });
        let client = Arc::new(InProcessNodeClient::new());
        let node = Arc::new(NodeRuntime::new("node-1", 1));
        client.add_node(node.clone());
        (registry, client, node)
    }

    /// A dep-free task is runnable immediately and leaves no trace in the
    /// pending queue.
    #[test]
    fn dep_free_task_dispatches_immediately() {
        let (registry, client, node) = registry_with_one_node();
        let scheduler = ClusterScheduler::new(registry, client);

        scheduler.submit(Task::leaf("A", || Value::new(4i32)));

        assert_eq!(scheduler.pending_len(), 0);
        assert_eq!(scheduler.object_location("A").as_deref(), Some("node-1"));

        let value = node.local_runtime().get(&ObjectRef::new("A"));
        assert_eq!(value.downcast_ref::<i32>(), Some(&4));

        node.stop();
    }

    /// A task depending on an object whose location isn't known yet stays
    /// pending until `on_object_created` is reported for that dependency.
    #[test]
    fn task_with_unresolved_dep_stays_pending_until_location_is_reported() {
        let (registry, client, node) = registry_with_one_node();
        let scheduler = ClusterScheduler::new(registry, client);

        scheduler.submit(Task::new("B", vec![ObjectRef::new("A")], |_| Value::new(1i32)));
        assert_eq!(scheduler.pending_len(), 1);

        scheduler.on_object_created("A", "node-1");
        assert_eq!(scheduler.pending_len(), 0);

        node.stop();
    }

    /// An empty (no alive nodes) registry leaves every task pending forever
    /// rather than panicking.
    #[test]
    fn no_alive_nodes_leaves_tasks_pending_forever() {
        let registry = Arc::new(NodeRegistry::new());
        let client = Arc::new(InProcessNodeClient::new());
        let scheduler = ClusterScheduler::new(registry, client);

        scheduler.submit(Task::leaf("A", || Value::new(1i32)));
        assert_eq!(scheduler.pending_len(), 1);

        scheduler.schedule();
        assert_eq!(scheduler.pending_len(), 1);
    }

    /// Dispatching to a node the client doesn't know about is logged but
    /// still records an optimistic location (fire-and-forget semantics).
    #[test]
    fn dispatch_to_unregistered_client_entry_still_records_location() {
        let registry = Arc::new(NodeRegistry::new());
        registry.register_node(NodeInfo {
            node_id: "node-1".to_string(),
            address: "127.0.0.1:9001".to_string(),
            available_workers: 1,
            alive: true,
        });
        let client: Arc<dyn NodeClient> = Arc::new(InProcessNodeClient::new());
        let scheduler = ClusterScheduler::new(registry, client);

        scheduler.submit(Task::leaf("A", || Value::new(1i32)));

        assert_eq!(scheduler.pending_len(), 0);
        assert_eq!(scheduler.object_location("A").as_deref(), Some("node-1"));
    }
}
