//! `scribe serve`: run the HTTP gateway until Ctrl-C.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use scribe_proxy::{CorsConfig, ProxyConfig};

/// Options of the `serve` command.
#[derive(Debug, Clone)]
pub struct ServeArgs {
    pub host: String,
    pub port: u16,
    pub ollama_url: String,
    pub timeout: u64,
    pub draft_extension: String,
    pub static_dir: Option<PathBuf>,
    pub cors_origins: Vec<String>,
}

/// Explicit directory, else `./static` if it exists.
fn resolve_static_dir(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        let default = Path::new("static");
        default.is_dir().then(|| default.to_path_buf())
    })
}

pub async fn execute(args: ServeArgs) -> anyhow::Result<()> {
    let config = ProxyConfig::new()
        .with_ollama_url(args.ollama_url)
        .with_timeout(Duration::from_secs(args.timeout))
        .with_draft_extension(args.draft_extension)
        .with_static_dir(resolve_static_dir(args.static_dir))
        .with_cors(CorsConfig::from_origins(args.cors_origins));
    config.validate()?;

    let listener = TcpListener::bind((args.host.as_str(), args.port)).await?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, shutting down");
        }
        on_signal.cancel();
    });

    scribe_proxy::serve(listener, config, cancel).await
}
