//! CLI entry point - the composition root.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scribe_cli::handlers::{mcp::McpArgs, serve::ServeArgs};
use scribe_cli::{Cli, Commands, handlers};

/// Initialise logging. `RUST_LOG` overrides the default level.
///
/// In MCP mode stdout carries the protocol, so logs go to stderr.
fn init_logging(verbose: bool, to_stderr: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    if to_stderr {
        builder.with_writer(std::io::stderr).init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose, matches!(cli.command, Commands::Mcp { .. }));

    match cli.command {
        Commands::Serve {
            host,
            port,
            ollama_url,
            timeout,
            draft_extension,
            static_dir,
            cors_origins,
        } => {
            handlers::serve::execute(ServeArgs {
                host,
                port,
                ollama_url,
                timeout,
                draft_extension,
                static_dir,
                cors_origins,
            })
            .await?;
        }
        Commands::Mcp {
            api_url,
            ollama_url,
            timeout,
            draft_extension,
        } => {
            handlers::mcp::execute(McpArgs {
                api_url,
                ollama_url,
                timeout,
                draft_extension,
            })
            .await?;
        }
    }

    Ok(())
}
