pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod entity;
pub mod error;
pub mod storage;
pub mod table;
pub mod upload;

pub use config::Settings;
pub use error::{ArsipError, Result};
pub use storage::SqliteStore;
