pub mod config;
pub mod ids;
pub mod tracing_init;
pub mod value;

#[cfg(test)]
test_r::enable!();

pub use ids::{ObjectId, ObjectRef};
pub use value::Value;
