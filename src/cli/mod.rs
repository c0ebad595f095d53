use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Write the transcript to this file when the session ends
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Send a single message and print the reply
    Ask {
        prompt: String,
    },

    /// Check that the model backends accept the configured credentials
    Status,
}
