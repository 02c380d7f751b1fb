use clap::Parser;
use tracing_subscriber::EnvFilter;

use arsipku::cli::{handle_init, handle_serve, Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => handle_init(&data_dir),
        Commands::Serve {
            data_dir,
            host,
            port,
            public_url,
        } => handle_serve(data_dir, host, port, public_url),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
