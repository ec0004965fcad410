//! `scribe mcp`: serve the MCP tools on stdio.

use std::sync::Arc;
use std::time::Duration;

use scribe_mcp::{ApiGateway, CommandDispatcher, HttpApiGateway, McpServer};
use scribe_proxy::{OllamaClient, ProxyConfig};

/// Options of the `mcp` command.
#[derive(Debug, Clone)]
pub struct McpArgs {
    pub api_url: String,
    pub ollama_url: String,
    pub timeout: u64,
    pub draft_extension: String,
}

pub async fn execute(args: McpArgs) -> anyhow::Result<()> {
    let timeout = Duration::from_secs(args.timeout);

    let upstream = ProxyConfig::new()
        .with_ollama_url(args.ollama_url)
        .with_timeout(timeout)
        .with_draft_extension(args.draft_extension.clone());
    upstream.validate()?;
    let ollama = Arc::new(OllamaClient::from_config(&upstream)?);

    let gateway = HttpApiGateway::new(args.api_url, timeout)?;
    let base_url = gateway.base_url().to_string();
    let api: Arc<dyn ApiGateway> = Arc::new(gateway);

    let dispatcher = CommandDispatcher::with_port(ollama, Arc::clone(&api))
        .with_draft_extension(args.draft_extension);
    let server = McpServer::new(dispatcher, api, base_url);

    server.serve_stdio().await?;
    Ok(())
}
