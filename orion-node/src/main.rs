use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use orion_cluster::NodeRuntime;
use orion_common::tracing_init::init_tracing;
use orion_core::{builtins, FunctionRegistry};
use orion_node::config::{make_config_loader, NodeConfig};
use orion_node::grpc::NodeServiceImpl;
use orion_rpc::head_service_client::HeadServiceClient;
use orion_rpc::node_service_server::NodeServiceServer;
use orion_rpc::RegisterNodeRequest;
use tonic::transport::Server;
use tracing::{info, warn};

/// `node <head_port> <node_port> <node_id>`; all three positional and
/// required. `num_workers` has no CLI positional and is sourced from
/// `orion-node.toml` / `ORION_NUM_WORKERS` / the built-in default instead.
#[derive(Parser, Debug)]
#[command(name = "orion-node", about = "Orion worker node: local runtime + NodeService RPC surface")]
struct Args {
    head_port: u16,
    node_port: u16,
    node_id: String,
}

fn main() -> anyhow::Result<()> {
    init_tracing("orion-node");
    let args = Args::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build the tokio runtime")?
        .block_on(run(args))
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = NodeConfig {
        head_port: args.head_port,
        node_port: args.node_port,
        node_id: args.node_id,
        ..make_config_loader().load().context("failed to load node config")?
    };

    let node = Arc::new(NodeRuntime::new(config.node_id.clone(), config.num_workers));

    let functions = Arc::new(FunctionRegistry::new());
    builtins::register_builtins(&functions);

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<NodeServiceServer<NodeServiceImpl>>()
        .await;

    let node_service = NodeServiceImpl::new(node.clone(), functions);
    let listen_addr = format!("0.0.0.0:{}", config.node_port)
        .parse()
        .context("invalid bind address")?;

    info!(node_id = %config.node_id, %listen_addr, "node listening");

    let server_task = tokio::spawn(async move {
        Server::builder()
            .add_service(health_service)
            .add_service(NodeServiceServer::new(node_service))
            .serve(listen_addr)
            .await
    });

    register_with_head(&config).await;

    tokio::select! {
        result = server_task => {
            result.context("node gRPC server task panicked")?.context("node gRPC server failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!(node_id = %config.node_id, "received SIGINT, shutting down");
        }
    }

    node.stop();
    Ok(())
}

/// Registers this node with the head. A registration failure is logged, not
/// fatal: the node keeps serving `NodeService` locally (e.g. reachable via
/// the in-process client in tests) even if the head is unreachable.
async fn register_with_head(config: &NodeConfig) {
    let head_address = format!("http://localhost:{}", config.head_port);
    let node_address = format!("http://127.0.0.1:{}", config.node_port);

    match HeadServiceClient::connect(head_address.clone()).await {
        Ok(mut client) => {
            let request = RegisterNodeRequest {
                node_id: config.node_id.clone(),
                address: node_address,
            };
            match client.register_node(request).await {
                Ok(reply) if reply.into_inner().success => {
                    info!(node_id = %config.node_id, head_address, "registration successful");
                }
                Ok(_) => warn!(node_id = %config.node_id, "head rejected registration"),
                Err(err) => warn!(node_id = %config.node_id, %err, "registration RPC failed"),
            }
        }
        Err(err) => warn!(node_id = %config.node_id, %err, "could not connect to head"),
    }
}
