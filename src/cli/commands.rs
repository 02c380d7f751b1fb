// src/cli/commands.rs
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "arsipku")]
#[command(about = "Records management for incoming mail, outgoing mail, and invitations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory, database, and default settings
    Init {
        /// Directory to hold the database and uploads
        #[arg(long, env = "ARSIPKU_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
    },
    /// Run the HTTP server
    Serve {
        #[arg(long, env = "ARSIPKU_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
        /// Override the configured bind host
        #[arg(long, env = "ARSIPKU_HOST")]
        host: Option<String>,
        /// Override the configured port
        #[arg(long, env = "ARSIPKU_PORT")]
        port: Option<u16>,
        /// Override the base URL used in generated file links
        #[arg(long, env = "ARSIPKU_PUBLIC_URL")]
        public_url: Option<String>,
    },
}
