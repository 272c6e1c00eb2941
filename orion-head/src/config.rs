use serde::{Deserialize, Serialize};

use orion_common::config::ConfigLoader;

/// Head binary configuration: just the listening port today, but kept as a
/// struct (rather than a bare `u16`) so an `orion-head.toml` overlay or
/// `ORION_PORT` env override has somewhere to land without changing the CLI
/// surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeadConfig {
    pub port: u16,
}

impl Default for HeadConfig {
    fn default() -> Self {
        HeadConfig { port: 50050 }
    }
}

pub fn make_config_loader() -> ConfigLoader<HeadConfig> {
    ConfigLoader::new("orion-head.toml")
}

#[cfg(test)]
mod tests {
    use test_r::test;

    use super::*;

    #[test]
    fn default_port_is_50050() {
        assert_eq!(HeadConfig::default().port, 50050);
    }
}
