pub mod config;
pub mod grpc;

#[cfg(test)]
test_r::enable!();

pub use config::{make_config_loader, HeadConfig};
pub use grpc::HeadServiceImpl;
