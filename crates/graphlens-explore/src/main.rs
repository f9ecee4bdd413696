//! CLI entry point for the graphlens exploration engine.
//!
//! Designed for subprocess invocation from the web frontend: query text on
//! stdin or flags, JSON results on stdout, logs on stderr.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use graphlens_core::types::Direction;
use graphlens_core::ExploreConfig;
use graphlens_explore::ExploreSession;

#[derive(Parser)]
#[command(name = "graphlens")]
#[command(about = "Incremental graph exploration over a remote query endpoint")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: graphlens).
    #[arg(short, long, default_value = "graphlens", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Execute a query read from stdin and print the normalized graph.
    Query,
    /// Introspect the store and print the schema.
    Schema,
    /// Run a base query, expand one node, and print the merged graph.
    Expand {
        /// Base query text.
        #[arg(long)]
        query: String,
        /// Id of the node to expand, as computed by normalization.
        #[arg(long)]
        node: String,
        /// Relationship type filter (default: all types).
        #[arg(long)]
        rel: Option<String>,
        /// Expansion direction: incoming, outgoing, or both.
        #[arg(long, default_value = "both")]
        direction: Direction,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = ExploreConfig::load(&cli.config);
    let session = ExploreSession::new(config)?;

    match cli.command {
        Command::Query => {
            let query = std::io::read_to_string(std::io::stdin())?;
            let graph = session.run_query(query.trim()).await?;
            println!("{}", serde_json::to_string(&graph)?);
        }
        Command::Schema => {
            let schema = session.schema().await?;
            println!("{}", serde_json::to_string(schema)?);
        }
        Command::Expand {
            ref query,
            ref node,
            ref rel,
            direction,
        } => {
            session.run_query(query).await?;
            session.expand(node, rel.as_deref(), direction).await?;
            println!("{}", serde_json::to_string(&session.current_graph())?);
        }
    }

    Ok(())
}
