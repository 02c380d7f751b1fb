mod sqlite_store;

pub use sqlite_store::{SqliteStore, SuratKeluarUpdate, SuratMasukUpdate, UndanganUpdate};

pub const DB_FILE: &str = "arsip.db";
