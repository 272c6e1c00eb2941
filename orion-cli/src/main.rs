use anyhow::Context;
use clap::Parser;
use orion_cli::canonical_requests;
use orion_common::tracing_init::init_tracing;
use orion_rpc::head_service_client::HeadServiceClient;
use tracing::{error, info};

/// `submit_test [head_port]`, default port 50050.
#[derive(Parser, Debug)]
#[command(name = "submit-test", about = "Submits the canonical add/mul smoke-test tasks to an Orion head")]
struct Args {
    #[arg(default_value_t = 50050)]
    head_port: u16,
}

fn main() -> anyhow::Result<()> {
    init_tracing("submit-test");
    let args = Args::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build the tokio runtime")?
        .block_on(run(args.head_port))
}

async fn run(head_port: u16) -> anyhow::Result<()> {
    let head_address = format!("http://localhost:{head_port}");
    let mut client = HeadServiceClient::connect(head_address.clone())
        .await
        .with_context(|| format!("could not connect to head at {head_address}"))?;

    for request in canonical_requests() {
        let task_id = request.task_id.clone();
        let function_name = request.function_name.clone();

        match client.submit_task(request).await {
            Ok(reply) => {
                let reply = reply.into_inner();
                if reply.accepted {
                    info!(task_id, function_name, node_id = %reply.node_id, "task accepted");
                } else {
                    error!(task_id, function_name, "task rejected by head");
                }
            }
            Err(status) => error!(task_id, function_name, %status, "SubmitTask RPC failed"),
        }
    }

    info!("submit-test done");
    Ok(())
}
