use serde::{Deserialize, Serialize};

use orion_common::config::ConfigLoader;

/// Node binary configuration. `head_port`/`node_port`/`node_id` mirror the
/// `node <head_port> <node_port> <node_id>` CLI positionals; `num_workers`
/// has no CLI positional equivalent, so it lives only in config/env.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeConfig {
    pub head_port: u16,
    pub node_port: u16,
    pub node_id: String,
    pub num_workers: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            head_port: 50050,
            node_port: 6001,
            node_id: "node-1".to_string(),
            num_workers: 2,
        }
    }
}

pub fn make_config_loader() -> ConfigLoader<NodeConfig> {
    ConfigLoader::new("orion-node.toml")
}
