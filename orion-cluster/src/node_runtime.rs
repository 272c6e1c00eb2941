use orion_core::Runtime;

/// A single cluster node: a node identity wrapped around a local,
/// single-machine `Runtime`. RPC hosting lives in the `orion-node` binary;
/// this type is the piece of it that's pure scheduling substrate and so is
/// shared with the in-process client used by tests and single-process
/// deployments.
pub struct NodeRuntime {
    node_id: String,
    runtime: Runtime,
}

impl NodeRuntime {
    pub fn new(node_id: impl Into<String>, num_workers: usize) -> Self {
        NodeRuntime {
            node_id: node_id.into(),
            runtime: Runtime::new(num_workers),
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn local_runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn stop(&self) {
        self.runtime.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use test_r::test;

    use orion_common::Value;
    use orion_core::Task;

    use super::*;

    #[test]
    fn submits_and_resolves_through_the_wrapped_runtime() {
        let node = NodeRuntime::new("node-1", 1);
        assert_eq!(node.node_id(), "node-1");

        let reference = node.local_runtime().submit(Task::leaf("A", || Value::new(5i32)));
        let value = node.local_runtime().get(&reference);
        assert_eq!(value.downcast_ref::<i32>(), Some(&5));

        node.stop();
    }
}
