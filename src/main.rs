//! MCP server for tabletop games.
//!
//! Run with `dnd-mcp` to serve every tool, or `dnd-mcp --tools dice` for a subset.

use clap::Parser;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

use dnd_mcp::{McpServer, McpSession, ToolRegistry, ToolSet};

/// MCP server for tabletop games.
///
/// Exposes dice rolling and character/monster bookkeeping as MCP tools for AI agents.
/// Communicates via JSON-RPC 2.0 over stdin/stdout.
#[derive(Parser)]
#[command(name = "dnd-mcp")]
#[command(version, about, long_about = None)]
struct Args {
    /// Tool sets to expose, comma separated.
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = ToolSet::ALL.to_vec())]
    tools: Vec<ToolSet>,

    /// Seed the dice RNG so that rolls are reproducible.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Enable debug logging to stderr.
    #[arg(long, short)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    // stdout carries the protocol, so logs always go to stderr.
    let filter = if verbose {
        let directive = "dnd_mcp=debug"
            .parse::<Directive>()
            .unwrap_or_else(|_| LevelFilter::DEBUG.into());
        EnvFilter::from_default_env().add_directive(directive)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let session = match args.seed {
        Some(seed) => McpSession::with_seed(seed),
        None => McpSession::new(),
    };
    let registry = ToolRegistry::with_sets(&args.tools);
    tracing::info!(tools = ?args.tools, seeded = args.seed.is_some(), "starting dnd-mcp");

    let mut server = McpServer::with_registry(session, registry);

    if let Err(e) = server.run().await {
        eprintln!("Error: Server error: {}", e);
        std::process::exit(1);
    }
}
