use hyperql_config::Loader;
use hyperql_lsp::HyperqlLanguageServer;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // stdout carries the protocol, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();

    let config = match Loader::new().with_optional_file("hyperql.toml").build() {
        Ok(config) => config.lsp,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring invalid configuration");
            Default::default()
        }
    };

    let stdin = stdin();
    let stdout = stdout();
    let (service, socket) =
        LspService::new(move |client| HyperqlLanguageServer::with_config(client, config.clone()));
    Server::new(stdin, stdout, socket).serve(service).await;
}
