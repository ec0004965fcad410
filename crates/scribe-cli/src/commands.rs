//! Subcommand definitions.

use std::path::PathBuf;

use clap::Subcommand;

use scribe_mcp::DEFAULT_API_URL;
use scribe_proxy::{DEFAULT_OLLAMA_URL, DEFAULT_PORT};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the OpenAI-compatible HTTP gateway
    Serve {
        /// Host to bind to
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,
        /// Port to bind the gateway to
        #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Base URL of the Ollama runtime
        #[arg(long, env = "OLLAMA_BASE_URL", default_value = DEFAULT_OLLAMA_URL)]
        ollama_url: String,
        /// Upstream request timeout in seconds (also bounds streams)
        #[arg(long, default_value_t = 120)]
        timeout: u64,
        /// File extension of drafted posts
        #[arg(long, default_value = "qmd")]
        draft_extension: String,
        /// Directory served under /static (defaults to ./static when present)
        #[arg(long)]
        static_dir: Option<PathBuf>,
        /// Origin allowed by CORS; repeat for several (default: any origin)
        #[arg(long = "cors-origin", env = "SCRIBE_CORS_ORIGINS", value_delimiter = ',')]
        cors_origins: Vec<String>,
    },

    /// Run the MCP server on stdin/stdout
    Mcp {
        /// Base URL of a running scribe gateway, read by the passthrough tools
        #[arg(long, env = "SCRIBE_API_URL", default_value = DEFAULT_API_URL)]
        api_url: String,
        /// Base URL of the Ollama runtime
        #[arg(long, env = "OLLAMA_BASE_URL", default_value = DEFAULT_OLLAMA_URL)]
        ollama_url: String,
        /// Request timeout in seconds
        #[arg(long, default_value_t = 120)]
        timeout: u64,
        /// File extension of drafted posts
        #[arg(long, default_value = "qmd")]
        draft_extension: String,
    },
}

#[cfg(test)]
mod tests {
    use crate::Cli;
    use crate::commands::Commands;
    use clap::Parser;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["scribe", "serve", "--port", "9000"]).unwrap();
        let Commands::Serve {
            port,
            timeout,
            draft_extension,
            static_dir,
            cors_origins,
            ..
        } = cli.command
        else {
            panic!("expected serve");
        };
        assert_eq!(port, 9000);
        assert_eq!(timeout, 120);
        assert_eq!(draft_extension, "qmd");
        assert!(static_dir.is_none());
        assert!(cors_origins.is_empty());
    }

    #[test]
    fn test_serve_cors_origins() {
        let cli = Cli::try_parse_from([
            "scribe",
            "serve",
            "--cors-origin",
            "http://localhost:3000",
            "--cors-origin",
            "http://a.test,http://b.test",
        ])
        .unwrap();
        let Commands::Serve { cors_origins, .. } = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(
            cors_origins,
            ["http://localhost:3000", "http://a.test", "http://b.test"]
        );
    }

    #[test]
    fn test_mcp_draft_extension() {
        let cli = Cli::try_parse_from(["scribe", "mcp"]).unwrap();
        let Commands::Mcp { draft_extension, .. } = cli.command else {
            panic!("expected mcp");
        };
        assert_eq!(draft_extension, "qmd");

        let cli = Cli::try_parse_from(["scribe", "mcp", "--draft-extension", "md"]).unwrap();
        let Commands::Mcp { draft_extension, .. } = cli.command else {
            panic!("expected mcp");
        };
        assert_eq!(draft_extension, "md");
    }

    #[test]
    fn test_mcp_urls() {
        let cli = Cli::try_parse_from([
            "scribe",
            "mcp",
            "--api-url",
            "http://127.0.0.1:5000",
            "--ollama-url",
            "http://gpu:11434",
        ])
        .unwrap();
        let Commands::Mcp {
            api_url, ollama_url, ..
        } = cli.command
        else {
            panic!("expected mcp");
        };
        assert_eq!(api_url, "http://127.0.0.1:5000");
        assert_eq!(ollama_url, "http://gpu:11434");
    }
}
