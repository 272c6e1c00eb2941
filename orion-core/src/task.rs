use std::sync::Arc;

use orion_common::{ObjectId, ObjectRef, Value};

/// The local execution closure: always takes dependency values, in `deps`
/// order, and returns the task's output value.
pub type Work = dyn Fn(Vec<Value>) -> Value + Send + Sync;

/// An immutable description of one unit of work.
///
/// Either `work` is populated (the task executes locally, e.g. it was
/// submitted directly to a `Runtime`, or a node has already resolved
/// `function_name` into a closure) or `function_name` is set and resolvable
/// in a `FunctionRegistry` at the node that ultimately executes it. A task
/// dispatched to the cluster with only `function_name` set carries no
/// closure until a node builds one (see `orion-node`).
pub struct Task {
    pub id: ObjectId,
    pub function_name: Option<String>,
    pub args: Vec<Vec<u8>>,
    pub deps: Vec<ObjectRef>,
    pub work: Option<Arc<Work>>,
}

impl Task {
    /// A task with dependencies, executed locally via `work`.
    pub fn new(
        id: impl Into<ObjectId>,
        deps: Vec<ObjectRef>,
        work: impl Fn(Vec<Value>) -> Value + Send + Sync + 'static,
    ) -> Self {
        Task {
            id: id.into(),
            function_name: None,
            args: Vec::new(),
            deps,
            work: Some(Arc::new(work)),
        }
    }

    /// A dependency-free task whose closure ignores its (empty) argument
    /// vector.
    pub fn leaf(
        id: impl Into<ObjectId>,
        work: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        Task::new(id, Vec::new(), move |_deps: Vec<Value>| work())
    }

    /// A task meant for named (remote-capable) dispatch: no local closure,
    /// just a function name, literal byte args, and declared deps. The node
    /// that ultimately executes it resolves `function_name` via its
    /// `FunctionRegistry`.
    pub fn remote(
        id: impl Into<ObjectId>,
        function_name: impl Into<String>,
        args: Vec<Vec<u8>>,
        deps: Vec<ObjectRef>,
    ) -> Self {
        Task {
            id: id.into(),
            function_name: Some(function_name.into()),
            args,
            deps,
            work: None,
        }
    }
}

/// Encodes an `i32` using the 4-byte little-endian convention the node's
/// literal-arg decoder expects.
pub fn encode_i32_arg(value: i32) -> Vec<u8> {
    value.to_le_bytes().to_vec()
}

/// Decodes a 4-byte little-endian `i32`, returning `None` if `bytes` is
/// shorter than 4 bytes (the node simply skips such blobs).
pub fn decode_i32_arg(bytes: &[u8]) -> Option<i32> {
    let array: [u8; 4] = bytes.get(0..4)?.try_into().ok()?;
    Some(i32::from_le_bytes(array))
}
