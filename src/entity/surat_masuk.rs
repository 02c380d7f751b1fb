// src/entity/surat_masuk.rs
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{require, RecordBase, Sifat};
use crate::error::Result;
use crate::table::{CellFormat, CellValue, Column, TableRow};

/// An incoming letter. The agenda number is assigned by the store at insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuratMasuk {
    #[serde(flatten)]
    pub base: RecordBase,
    pub no_agenda: i64,
    pub tanggal_surat: NaiveDate,
    pub tanggal_terima: NaiveDate,
    pub pengirim: String,
    pub sifat: Sifat,
    pub klasifikasi: Option<String>,
}

/// Create payload for an incoming letter, as submitted by the entry form.
///
/// All fields are optional on the wire; `validate` enforces the required
/// subset and fills in the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuratMasukDraft {
    pub no_surat: Option<String>,
    pub tanggal_surat: Option<NaiveDate>,
    pub tanggal_terima: Option<NaiveDate>,
    pub pengirim: Option<String>,
    pub perihal: Option<String>,
    pub sifat: Option<Sifat>,
    pub klasifikasi: Option<String>,
    pub file_url: Option<String>,
    pub created_by: Option<String>,
}

impl SuratMasukDraft {
    /// Check required fields and build a record ready for insertion.
    /// The received date defaults to today, sifat to Biasa.
    pub fn validate(self, no_agenda: i64) -> Result<SuratMasuk> {
        let no_surat = require("noSurat", self.no_surat)?;
        let perihal = require("perihal", self.perihal)?;
        let tanggal_surat = self
            .tanggal_surat
            .ok_or_else(|| crate::ArsipError::Validation("tanggalSurat is required".to_string()))?;
        let pengirim = require("pengirim", self.pengirim)?;

        let mut base = RecordBase::new(no_surat, perihal, self.created_by);
        base.file_url = self.file_url;

        Ok(SuratMasuk {
            base,
            no_agenda,
            tanggal_surat,
            tanggal_terima: self
                .tanggal_terima
                .unwrap_or_else(|| Utc::now().date_naive()),
            pengirim,
            sifat: self.sifat.unwrap_or_default(),
            klasifikasi: self.klasifikasi,
        })
    }
}

/// Column descriptors for the incoming-mail list view.
pub fn surat_masuk_columns() -> Vec<Column> {
    vec![
        Column::new("noAgenda", "No. Agenda"),
        Column::new("noSurat", "No. Surat"),
        Column::new("tanggalSurat", "Tanggal Surat").format(CellFormat::Date),
        Column::new("pengirim", "Pengirim"),
        Column::new("perihal", "Perihal"),
        Column::new("sifat", "Sifat").format(CellFormat::Badge),
        Column::new("fileUrl", "Lampiran")
            .format(CellFormat::Link)
            .fixed(),
    ]
}

impl TableRow for SuratMasuk {
    fn cell(&self, key: &str) -> CellValue {
        match key {
            "noAgenda" => CellValue::Number(self.no_agenda),
            "noSurat" => CellValue::Text(self.base.no_surat.clone()),
            "tanggalSurat" => CellValue::Date(self.tanggal_surat),
            "tanggalTerima" => CellValue::Date(self.tanggal_terima),
            "pengirim" => CellValue::Text(self.pengirim.clone()),
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
