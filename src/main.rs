use clap::Parser;
use codebin::{Codebin, Commands, Config, MemoryStore, SharedStore, SnippetClient};
use std::process;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let args = Codebin::parse();

    if let Err(e) = run(args.commands) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(command: Commands) -> codebin::Result<()> {
    match command {
        Commands::Serve { host, port } => {
            let mut config = Config::from_env()?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            init_logging(config.verbose);

            let store: SharedStore = Arc::new(MemoryStore::new());
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(codebin::start_server(config, store))
        }
        Commands::New { server } => {
            let client = SnippetClient::new(&server)?;
            codebin::run_editor(client)
        }
        Commands::View { id, server } => {
            let client = SnippetClient::new(&server)?;
            codebin::run_viewer(client, &id)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();
}
