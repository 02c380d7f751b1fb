mod surat_keluar;
mod surat_masuk;
mod undangan;

pub use surat_keluar::{surat_keluar_columns, SuratKeluar, SuratKeluarDraft};
pub use surat_masuk::{surat_masuk_columns, SuratMasuk, SuratMasukDraft};
pub use undangan::{undangan_columns, Kehadiran, Undangan, UndanganDraft};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ArsipError, Result};

/// Default creator recorded when a request does not carry one.
pub const DEFAULT_CREATOR: &str = "Admin";

/// Base fields shared by all record types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBase {
    pub id: Uuid,
    pub no_surat: String,
    pub perihal: String,
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

impl RecordBase {
    pub fn new(no_surat: String, perihal: String, created_by: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            no_surat,
            perihal,
            file_url: None,
            created_at: Utc::now(),
            created_by: created_by.unwrap_or_else(|| DEFAULT_CREATOR.to_string()),
        }
    }
}

/// Confidentiality classification of a letter (sifat surat).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Sifat {
    #[default]
    Biasa,
    Penting,
    Rahasia,
}

impl std::fmt::Display for Sifat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sifat::Biasa => write!(f, "Biasa"),
            Sifat::Penting => write!(f, "Penting"),
            Sifat::Rahasia => write!(f, "Rahasia"),
        }
    }
}

impl std::str::FromStr for Sifat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "biasa" => Ok(Sifat::Biasa),
            "penting" => Ok(Sifat::Penting),
            "rahasia" => Ok(Sifat::Rahasia),
            _ => Err(format!("Invalid sifat: {}", s)),
        }
    }
}

/// Which document category a record belongs to. Used by the dashboard feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    Masuk,
    Keluar,
    Undangan,
}

impl std::fmt::Display for DocKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocKind::Masuk => write!(f, "masuk"),
            DocKind::Keluar => write!(f, "keluar"),
            DocKind::Undangan => write!(f, "undangan"),
        }
    }
}

pub(crate) fn require(field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ArsipError::Validation(format!("{} is required", field))),
    }
}
