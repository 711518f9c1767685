use std::io::Write;

use anyhow::{Context, Result};
use ccip_solana_txgen::cli::Cli;
use ccip_solana_txgen::models::ProgramInterface;
use ccip_solana_txgen::node::{ensure_reachable, RpcNode};
use ccip_solana_txgen::{generate, output};
use clap::Parser;
use env_logger::Builder;
use log::{debug, LevelFilter};

fn init_logger(level: LevelFilter) {
    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                buf.timestamp(),
                record.level(),
                record.args()
            )
        })
        .filter(None, level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config()?;
    init_logger(config.log_level);
    debug!("ccip-txgen v{} using {}", ccip_solana_txgen::VERSION, config.rpc_url);

    let resolved = cli.command.resolve()?;
    let interface = match &cli.idl {
        Some(path) => ProgramInterface::load(path)
            .with_context(|| format!("Failed to load IDL from {}", path.display()))?,
        None => resolved.request.family().interface(),
    };
    let lookup_tables = cli.lookup_tables()?;

    if config.probe {
        ensure_reachable(&config.rpc_url)
            .await
            .context("Node health check failed")?;
    }

    let node = RpcNode::new(&config.rpc_url, &config.commitment);
    let generated = generate(
        &node,
        &resolved.request,
        &resolved.program_id,
        &resolved.fee_payer,
        &interface,
        &lookup_tables,
    )
    .await?;

    println!("{}", output::render(&generated, cli.format)?);
    Ok(())
}
