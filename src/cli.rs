use crate::config::DEFAULT_SERVER_URL;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "codebin", about = "A code snippet sharing tool", version)]
pub struct Codebin {
    #[command(subcommand)]
    pub commands: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the codebin HTTP server
    Serve {
        /// Address to listen on, overrides CODEBIN_HOST
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on, overrides CODEBIN_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Open the snippet editor
    New {
        /// Server to save snippets to
        #[arg(long, default_value = DEFAULT_SERVER_URL)]
        server: String,
    },
    /// View a saved snippet
    View {
        /// Id of the snippet, as printed by the editor after a save
        id: String,
        /// Server to fetch the snippet from
        #[arg(long, default_value = DEFAULT_SERVER_URL)]
        server: String,
    },
}
