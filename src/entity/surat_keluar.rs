// src/entity/surat_keluar.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{require, RecordBase, Sifat};
use crate::error::{ArsipError, Result};
use crate::table::{CellFormat, CellValue, Column, TableRow};

/// An outgoing letter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuratKeluar {
    #[serde(flatten)]
    pub base: RecordBase,
    pub tanggal_surat: NaiveDate,
    pub penerima: String,
    pub sifat: Sifat,
    pub klasifikasi: Option<String>,
}

/// Create payload for an outgoing letter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuratKeluarDraft {
    pub no_surat: Option<String>,
    pub tanggal_surat: Option<NaiveDate>,
    pub penerima: Option<String>,
    pub perihal: Option<String>,
    pub sifat: Option<Sifat>,
    pub klasifikasi: Option<String>,
    pub file_url: Option<String>,
    pub created_by: Option<String>,
}

impl SuratKeluarDraft {
    /// Check required fields and build a record ready for insertion.
    pub fn validate(self) -> Result<SuratKeluar> {
        let no_surat = require("noSurat", self.no_surat)?;
        let perihal = require("perihal", self.perihal)?;
        let tanggal_surat = self
            .tanggal_surat
            .ok_or_else(|| ArsipError::Validation("tanggalSurat is required".to_string()))?;
        let penerima = require("penerima", self.penerima)?;

        let mut base = RecordBase::new(no_surat, perihal, self.created_by);
        base.file_url = self.file_url;

        Ok(SuratKeluar {
            base,
            tanggal_surat,
            penerima,
            sifat: self.sifat.unwrap_or_default(),
            klasifikasi: self.klasifikasi,
        })
    }
}

/// Column descriptors for the outgoing-mail list view.
pub fn surat_keluar_columns() -> Vec<Column> {
    vec![
        Column::new("noSurat", "No. Surat"),
        Column::new("tanggalSurat", "Tanggal Surat").format(CellFormat::Date),
        Column::new("penerima", "Penerima"),
        Column::new("perihal", "Perihal"),
        Column::new("sifat", "Sifat").format(CellFormat::Badge),
        Column::new("fileUrl", "Lampiran")
            .format(CellFormat::Link)
            .fixed(),
    ]
}

impl TableRow for SuratKeluar {
    fn cell(&self, key: &str) -> CellValue {
        match key {
            "noSurat" => CellValue::Text(self.base.no_surat.clone()),
            "tanggalSurat" => CellValue::Date(self.tanggal_surat),
            "penerima" => CellValue::Text(self.penerima.clone()),
            "perihal" => CellValue::Text(self.base.perihal.clone()),
            "sifat" => CellValue::Text(self.sifat.to_string()),
            "klasifikasi" => self
                .klasifikasi
                .clone()
                .map(CellValue::Text)
                .unwrap_or(CellValue::Empty),
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
    fn test_validate_minimal_draft() {
        let draft = SuratKeluarDraft {
            no_surat: Some("012/SK/2025".to_string()),
            tanggal_surat: NaiveDate::from_ymd_opt(2025, 4, 2),
            penerima: Some("Kecamatan Sukajadi".to_string()),
            perihal: Some("Balasan Surat".to_string()),
            ..Default::default()
        };
        let record = draft.validate().unwrap();
        assert_eq!(record.sifat, Sifat::Biasa);
        assert!(record.klasifikasi.is_none());
    }

    #[test]
    fn test_validate_rejects_missing_recipient() {
        let draft = SuratKeluarDraft {
            no_surat: Some("012/SK/2025".to_string()),
            tanggal_surat: NaiveDate::from_ymd_opt(2025, 4, 2),
            perihal: Some("Balasan Surat".to_string()),
            ..Default::default()
        };
        assert!(draft.validate().is_err());
    }
}
