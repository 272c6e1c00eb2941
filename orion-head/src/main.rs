use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use orion_cluster::{ClusterScheduler, GrpcNodeClient, NodeRegistry};
use orion_common::tracing_init::init_tracing;
use orion_head::config::make_config_loader;
use orion_head::grpc::HeadServiceImpl;
use orion_rpc::head_service_server::HeadServiceServer;
use tonic::transport::Server;
use tracing::info;

/// `head [port]`, default port 50050. When omitted, the port comes from
/// `orion-head.toml` / `ORION_PORT` / the built-in default, in that order of
/// precedence (see `orion_common::config::ConfigLoader`).
#[derive(Parser, Debug)]
#[command(name = "orion-head", about = "Orion cluster head: node registry + scheduler + RPC surface")]
struct Args {
    port: Option<u16>,
}

fn main() -> anyhow::Result<()> {
    init_tracing("orion-head");
    let args = Args::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build the tokio runtime")?
        .block_on(run(args.port))
}

async fn run(port_override: Option<u16>) -> anyhow::Result<()> {
    let mut config = make_config_loader().load().context("failed to load head config")?;
    if let Some(port) = port_override {
        config.port = port;
    }

    let addr = format!("0.0.0.0:{}", config.port).parse().context("invalid bind address")?;

    let registry = Arc::new(NodeRegistry::new());
    let client = Arc::new(GrpcNodeClient::new(tokio::runtime::Handle::current()));
    let scheduler = Arc::new(ClusterScheduler::new(registry.clone(), client.clone()));

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<HeadServiceServer<HeadServiceImpl>>()
        .await;

    let head_service = HeadServiceImpl::new(registry, scheduler, client);

    info!(%addr, "head listening");

    tokio::select! {
        result = Server::builder()
            .add_service(health_service)
            .add_service(HeadServiceServer::new(head_service))
            .serve(addr) => {
            result.context("head gRPC server failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("received SIGINT, shutting down");
        }
    }

    Ok(())
}
