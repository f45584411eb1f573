use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use typescope::cli::{self, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Reports go to stdout; logs stay on stderr so the MCP stdio transport
    // and piped JSON output are never polluted.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    cli::run(args).await
}
