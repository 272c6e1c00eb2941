use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global `tracing` subscriber for an Orion binary.
///
/// `RUST_LOG` (if set) takes precedence; otherwise every Orion crate logs at
/// `info` and everything else at `warn`, matching the default used across
/// the head and node services.
pub fn init_tracing(service_name: &str) {
    const DEFAULT_FILTER: &str =
        "warn,orion_core=info,orion_cluster=info,orion_head=info,orion_node=info,orion_cli=info,orion_common=info";
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer().with_target(true).with_level(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();

    tracing::info!(service = service_name, "tracing initialized");
}
