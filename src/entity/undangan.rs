// src/entity/undangan.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{require, RecordBase};
use crate::error::{ArsipError, Result};
use crate::table::{CellFormat, CellValue, Column, TableRow};

/// Attendance response state for an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Kehadiran {
    #[default]
    Pending,
    Hadir,
    #[serde(rename = "Tidak Hadir")]
    TidakHadir,
}

impl std::fmt::Display for Kehadiran {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kehadiran::Pending => write!(f, "Pending"),
            Kehadiran::Hadir => write!(f, "Hadir"),
            Kehadiran::TidakHadir => write!(f, "Tidak Hadir"),
        }
    }
}

impl std::str::FromStr for Kehadiran {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', " ").as_str() {
            "pending" => Ok(Kehadiran::Pending),
            "hadir" => Ok(Kehadiran::Hadir),
            "tidak hadir" => Ok(Kehadiran::TidakHadir),
            _ => Err(format!("Invalid attendance status: {}", s)),
        }
    }
}

/// A meeting invitation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Undangan {
    #[serde(flatten)]
    pub base: RecordBase,
    pub tanggal_acara: NaiveDate,
    /// Event time as an HH:MM wall-clock string.
    pub waktu_acara: String,
    pub tempat: String,
    pub pengirim: String,
    pub status: Kehadiran,
}

/// Create payload for an invitation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndanganDraft {
    pub no_surat: Option<String>,
    pub tanggal_acara: Option<NaiveDate>,
    pub waktu_acara: Option<String>,
    pub tempat: Option<String>,
    pub pengirim: Option<String>,
    pub perihal: Option<String>,
    pub status: Option<Kehadiran>,
    pub file_url: Option<String>,
    pub created_by: Option<String>,
}

impl UndanganDraft {
    /// Check required fields and build a record ready for insertion.
    pub fn validate(self) -> Result<Undangan> {
        let no_surat = require("noSurat", self.no_surat)?;
        let perihal = require("perihal", self.perihal)?;
        let tanggal_acara = self
            .tanggal_acara
            .ok_or_else(|| ArsipError::Validation("tanggalAcara is required".to_string()))?;
        let waktu_acara = require("waktuAcara", self.waktu_acara)?;
        let tempat = require("tempat", self.tempat)?;
        let pengirim = require("pengirim", self.pengirim)?;

        let mut base = RecordBase::new(no_surat, perihal, self.created_by);
        base.file_url = self.file_url;

        Ok(Undangan {
            base,
            tanggal_acara,
            waktu_acara,
            tempat,
            pengirim,
            status: self.status.unwrap_or_default(),
        })
    }
}

/// Column descriptors for the invitation list view.
pub fn undangan_columns() -> Vec<Column> {
    vec![
        Column::new("noSurat", "No. Surat"),
        Column::new("tanggalAcara", "Tanggal Acara").format(CellFormat::Date),
        Column::new("waktuAcara", "Waktu"),
        Column::new("tempat", "Tempat"),
        Column::new("pengirim", "Pengirim"),
        Column::new("perihal", "Perihal"),
        Column::new("status", "Status").format(CellFormat::Badge),
        Column::new("fileUrl", "Lampiran")
            .format(CellFormat::Link)
            .fixed(),
    ]
}

impl TableRow for Undangan {
    fn cell(&self, key: &str) -> CellValue {
        match key {
            "noSurat" => CellValue::Text(self.base.no_surat.clone()),
            "tanggalAcara" => CellValue::Date(self.tanggal_acara),
            "waktuAcara" => CellValue::Text(self.waktu_acara.clone()),
            "tempat" => CellValue::Text(self.tempat.clone()),
            "pengirim" => CellValue::Text(self.pengirim.clone()),
            "perihal" => CellValue::Text(self.base.perihal.clone()),
            "status" => CellValue::Text(self.status.to_string()),
            "fileUrl" => self
                .base
                .file_url
                .clone()
                .map(CellValue::Text)
                .unwrap_or(CellValue::Empty),
            _ => CellValue::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kehadiran_wire_format() {
        let json = serde_json::to_string(&Kehadiran::TidakHadir).unwrap();
        assert_eq!(json, "\"Tidak Hadir\"");
        let parsed: Kehadiran = serde_json::from_str("\"Tidak Hadir\"").unwrap();
        assert_eq!(parsed, Kehadiran::TidakHadir);
    }

    #[test]
    fn test_kehadiran_parse() {
        assert_eq!("hadir".parse::<Kehadiran>().unwrap(), Kehadiran::Hadir);
        assert_eq!(
            "tidak_hadir".parse::<Kehadiran>().unwrap(),
            Kehadiran::TidakHadir
        );
        assert!("maybe".parse::<Kehadiran>().is_err());
    }

    #[test]
    fn test_validate_defaults_status_to_pending() {
        let draft = UndanganDraft {
            no_surat: Some("021/UND/2025".to_string()),
            tanggal_acara: NaiveDate::from_ymd_opt(2025, 5, 20),
            waktu_acara: Some("09:00".to_string()),
            tempat: Some("Aula Kantor".to_string()),
            pengirim: Some("Sekretariat Daerah".to_string()),
            perihal: Some("Rapat Evaluasi".to_string()),
            ..Default::default()
        };
        let record = draft.validate().unwrap();
        assert_eq!(record.status, Kehadiran::Pending);
    }

    #[test]
    fn test_validate_rejects_missing_venue() {
        let draft = UndanganDraft {
            no_surat: Some("021/UND/2025".to_string()),
            tanggal_acara: NaiveDate::from_ymd_opt(2025, 5, 20),
            waktu_acara: Some("09:00".to_string()),
            pengirim: Some("Sekretariat Daerah".to_string()),
            perihal: Some("Rapat Evaluasi".to_string()),
            ..Default::default()
        };
        assert!(draft.validate().is_err());
    }
}
