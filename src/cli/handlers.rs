// src/cli/handlers.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::api;
use crate::config::Settings;
use crate::error::Result;
use crate::storage::SqliteStore;

pub fn handle_init(data_dir: &Path) -> Result<()> {
    let store = SqliteStore::init(data_dir)?;
    let settings = Settings {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    };
    settings.save()?;
    fs::create_dir_all(settings.upload_dir())?;
    println!("Initialized archive at {}", store.path().display());
    Ok(())
}

pub fn handle_serve(
    data_dir: PathBuf,
    host: Option<String>,
    port: Option<u16>,
    public_url: Option<String>,
) -> Result<()> {
    let mut settings = Settings::load(&data_dir)?;
    if let Some(host) = host {
        settings.host = host;
    }
    if let Some(port) = port {
        settings.port = port;
    }
    if let Some(public_url) = public_url {
        settings.public_url = public_url;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(api::serve(settings))
}
