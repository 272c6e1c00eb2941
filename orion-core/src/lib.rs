pub mod builtins;
pub mod function_registry;
pub mod object_store;
pub mod runtime;
pub mod scheduler;
pub mod task;
pub mod worker;

#[cfg(test)]
test_r::enable!();

pub use function_registry::{FunctionRegistry, FunctionRegistryError};
pub use object_store::ObjectStore;
pub use runtime::Runtime;
pub use scheduler::Scheduler;
pub use task::{decode_i32_arg, encode_i32_arg, Task, Work};
pub use worker::Worker;
