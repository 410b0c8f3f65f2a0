//! nblm - NotebookLM batch-RPC client and MCP server
//!
//! Usage:
//!   nblm mcp                      Start MCP server on stdio
//!   nblm auth < cookies.txt       Save a browser Cookie header
//!   nblm notebooks list           List notebooks
//!   nblm ask <notebook> "query"   Ask a question over a notebook
//!   nblm --help                   Show all commands

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use nblm::cli::output::OutputMode;
use nblm::cli::{Cli, Commands};
use nblm::init::AppContext;
use nblm::mcp::server::run_mcp_server;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Tracing to stderr (safe for MCP stdio transport)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("nblm=info".parse()?),
        )
        .init();

    let mode = OutputMode::from_json_flag(cli.json);
    let ctx = AppContext::new(cli.data_path.clone()).await?;

    match &cli.command {
        Commands::Mcp => run_mcp_server(Arc::new(ctx)).await?,
        cmd => nblm::cli::execute(cmd, &ctx, mode).await?,
    }

    Ok(())
}
