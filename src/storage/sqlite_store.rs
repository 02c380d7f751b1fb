// src/storage/sqlite_store.rs
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use super::DB_FILE;
use crate::entity::{
    require, Kehadiran, RecordBase, Sifat, SuratKeluar, SuratKeluarDraft, SuratMasuk,
    SuratMasukDraft, Undangan, UndanganDraft,
};
use crate::error::{ArsipError, Result};

/// SQLite-backed record store. One connection, guarded by the caller.
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

// Distinguishes "field absent" (keep current value) from "field null"
// (clear it) in update payloads.
fn double_option<'de, T, D>(de: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Partial update for an incoming letter. Absent fields keep their
/// current value; the agenda number is never updatable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuratMasukUpdate {
    pub no_surat: Option<String>,
    pub tanggal_surat: Option<NaiveDate>,
    pub tanggal_terima: Option<NaiveDate>,
    pub pengirim: Option<String>,
    pub perihal: Option<String>,
    pub sifat: Option<Sifat>,
    #[serde(default, deserialize_with = "double_option")]
    pub klasifikasi: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub file_url: Option<Option<String>>,
}

/// Partial update for an outgoing letter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuratKeluarUpdate {
    pub no_surat: Option<String>,
    pub tanggal_surat: Option<NaiveDate>,
    pub penerima: Option<String>,
    pub perihal: Option<String>,
    pub sifat: Option<Sifat>,
    #[serde(default, deserialize_with = "double_option")]
    pub klasifikasi: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub file_url: Option<Option<String>>,
}

/// Partial update for an invitation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndanganUpdate {
    pub no_surat: Option<String>,
    pub tanggal_acara: Option<NaiveDate>,
    pub waktu_acara: Option<String>,
    pub tempat: Option<String>,
    pub pengirim: Option<String>,
    pub perihal: Option<String>,
    pub status: Option<Kehadiran>,
    #[serde(default, deserialize_with = "double_option")]
    pub file_url: Option<Option<String>>,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS surat_masuk (
    id TEXT PRIMARY KEY,
    no_agenda INTEGER NOT NULL,
    no_surat TEXT NOT NULL,
    perihal TEXT NOT NULL,
    tanggal_surat TEXT NOT NULL,
    tanggal_terima TEXT NOT NULL,
    pengirim TEXT NOT NULL,
    sifat TEXT NOT NULL,
    klasifikasi TEXT,
    file_url TEXT,
    created_at TEXT NOT NULL,
    created_by TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS surat_keluar (
    id TEXT PRIMARY KEY,
    no_surat TEXT NOT NULL,
    perihal TEXT NOT NULL,
    tanggal_surat TEXT NOT NULL,
    penerima TEXT NOT NULL,
    sifat TEXT NOT NULL,
    klasifikasi TEXT,
    file_url TEXT,
    created_at TEXT NOT NULL,
    created_by TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS undangan (
    id TEXT PRIMARY KEY,
    no_surat TEXT NOT NULL,
    perihal TEXT NOT NULL,
    tanggal_acara TEXT NOT NULL,
    waktu_acara TEXT NOT NULL,
    tempat TEXT NOT NULL,
    pengirim TEXT NOT NULL,
    status TEXT NOT NULL,
    file_url TEXT,
    created_at TEXT NOT NULL,
    created_by TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_masuk_created ON surat_masuk(created_at);
CREATE INDEX IF NOT EXISTS idx_keluar_created ON surat_keluar(created_at);
CREATE INDEX IF NOT EXISTS idx_undangan_created ON undangan(created_at);
CREATE INDEX IF NOT EXISTS idx_undangan_acara ON undangan(tanggal_acara);
";

fn column_err(
    idx: usize,
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, err.into())
}

fn read_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|e| column_err(idx, e))
}

fn read_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| column_err(idx, e))
}

fn read_uuid(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(idx)?;
    Uuid::parse_str(&text).map_err(|e| column_err(idx, e))
}

fn row_to_masuk(row: &Row<'_>) -> rusqlite::Result<SuratMasuk> {
    let sifat: String = row.get(7)?;
    Ok(SuratMasuk {
        base: RecordBase {
            id: read_uuid(row, 0)?,
            no_surat: row.get(2)?,
            perihal: row.get(3)?,
            file_url: row.get(9)?,
            created_at: read_timestamp(row, 10)?,
            created_by: row.get(11)?,
        },
        no_agenda: row.get(1)?,
        tanggal_surat: read_date(row, 4)?,
        tanggal_terima: read_date(row, 5)?,
        pengirim: row.get(6)?,
        sifat: sifat.parse().map_err(|e: String| column_err(7, e))?,
        klasifikasi: row.get(8)?,
    })
}

fn row_to_keluar(row: &Row<'_>) -> rusqlite::Result<SuratKeluar> {
    let sifat: String = row.get(5)?;
    Ok(SuratKeluar {
        base: RecordBase {
            id: read_uuid(row, 0)?,
            no_surat: row.get(1)?,
            perihal: row.get(2)?,
            file_url: row.get(7)?,
            created_at: read_timestamp(row, 8)?,
            created_by: row.get(9)?,
        },
        tanggal_surat: read_date(row, 3)?,
        penerima: row.get(4)?,
        sifat: sifat.parse().map_err(|e: String| column_err(5, e))?,
        klasifikasi: row.get(6)?,
    })
}

fn row_to_undangan(row: &Row<'_>) -> rusqlite::Result<Undangan> {
    let status: String = row.get(7)?;
    Ok(Undangan {
        base: RecordBase {
            id: read_uuid(row, 0)?,
            no_surat: row.get(1)?,
            perihal: row.get(2)?,
            file_url: row.get(8)?,
            created_at: read_timestamp(row, 9)?,
            created_by: row.get(10)?,
        },
        tanggal_acara: read_date(row, 3)?,
        waktu_acara: row.get(4)?,
        tempat: row.get(5)?,
        pengirim: row.get(6)?,
        status: status.parse().map_err(|e: String| column_err(7, e))?,
    })
}

const MASUK_COLS: &str =
    "id, no_agenda, no_surat, perihal, tanggal_surat, tanggal_terima, pengirim, sifat, \
     klasifikasi, file_url, created_at, created_by";
const KELUAR_COLS: &str =
    "id, no_surat, perihal, tanggal_surat, penerima, sifat, klasifikasi, file_url, \
     created_at, created_by";
const UNDANGAN_COLS: &str =
    "id, no_surat, perihal, tanggal_acara, waktu_acara, tempat, pengirim, status, \
     file_url, created_at, created_by";

impl SqliteStore {
    /// Create a new database in `data_dir`. Fails if one already exists.
    pub fn init(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(DB_FILE);
        if path.exists() {
            return Err(ArsipError::AlreadyInitialized);
        }
        fs::create_dir_all(data_dir)?;
        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, path })
    }

    /// Open an existing database in `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(DB_FILE);
        if !path.exists() {
            return Err(ArsipError::NotInitialized);
        }
        let conn = Connection::open(&path)?;
        // Idempotent, covers databases created before an index was added.
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ========== Surat Masuk Methods ==========

    /// Validate a draft, assign the next agenda number, and insert.
    pub fn add_surat_masuk(&mut self, draft: SuratMasukDraft) -> Result<SuratMasuk> {
        let tx = self.conn.transaction()?;
        let no_agenda: i64 = tx.query_row(
            "SELECT COALESCE(MAX(no_agenda), 0) + 1 FROM surat_masuk",
            [],
            |row| row.get(0),
        )?;
        let record = draft.validate(no_agenda)?;
        tx.execute(
            "INSERT INTO surat_masuk (id, no_agenda, no_surat, perihal, tanggal_surat, \
             tanggal_terima, pengirim, sifat, klasifikasi, file_url, created_at, created_by) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                record.base.id.to_string(),
                record.no_agenda,
                record.base.no_surat,
                record.base.perihal,
                record.tanggal_surat.to_string(),
                record.tanggal_terima.to_string(),
                record.pengirim,
                record.sifat.to_string(),
                record.klasifikasi,
                record.base.file_url,
                record.base.created_at.to_rfc3339(),
                record.base.created_by,
            ],
        )?;
        tx.commit()?;
        Ok(record)
    }

    /// List incoming letters, newest first.
    pub fn list_surat_masuk(&self) -> Result<Vec<SuratMasuk>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM surat_masuk ORDER BY created_at DESC",
            MASUK_COLS
        ))?;
        let rows = stmt.query_map([], row_to_masuk)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_surat_masuk(&self, id: Uuid) -> Result<SuratMasuk> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM surat_masuk WHERE id = ?1",
            MASUK_COLS
        ))?;
        stmt.query_row(params![id.to_string()], row_to_masuk)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => ArsipError::RecordNotFound(id.to_string()),
                other => other.into(),
            })
    }

    /// Apply a partial update. The id, agenda number, and creation
    /// metadata never change.
    pub fn update_surat_masuk(&mut self, id: Uuid, upd: SuratMasukUpdate) -> Result<SuratMasuk> {
        let mut record = self.get_surat_masuk(id)?;
        if let Some(v) = upd.no_surat {
            record.base.no_surat = require("noSurat", Some(v))?;
        }
        if let Some(v) = upd.perihal {
            record.base.perihal = require("perihal", Some(v))?;
        }
        if let Some(v) = upd.tanggal_surat {
            record.tanggal_surat = v;
        }
        if let Some(v) = upd.tanggal_terima {
            record.tanggal_terima = v;
        }
        if let Some(v) = upd.pengirim {
            record.pengirim = require("pengirim", Some(v))?;
        }
        if let Some(v) = upd.sifat {
            record.sifat = v;
        }
        if let Some(v) = upd.klasifikasi {
            record.klasifikasi = v;
        }
        if let Some(v) = upd.file_url {
            record.base.file_url = v;
        }
        self.conn.execute(
            "UPDATE surat_masuk SET no_surat = ?2, perihal = ?3, tanggal_surat = ?4, \
             tanggal_terima = ?5, pengirim = ?6, sifat = ?7, klasifikasi = ?8, file_url = ?9 \
             WHERE id = ?1",
            params![
                id.to_string(),
                record.base.no_surat,
                record.base.perihal,
                record.tanggal_surat.to_string(),
                record.tanggal_terima.to_string(),
                record.pengirim,
                record.sifat.to_string(),
                record.klasifikasi,
                record.base.file_url,
            ],
        )?;
        Ok(record)
    }

    pub fn delete_surat_masuk(&mut self, id: Uuid) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM surat_masuk WHERE id = ?1", params![id.to_string()])?;
        if changed == 0 {
            return Err(ArsipError::RecordNotFound(id.to_string()));
        }
        Ok(())
    }

    // ========== Surat Keluar Methods ==========

    pub fn add_surat_keluar(&mut self, draft: SuratKeluarDraft) -> Result<SuratKeluar> {
        let record = draft.validate()?;
        self.conn.execute(
            "INSERT INTO surat_keluar (id, no_surat, perihal, tanggal_surat, penerima, sifat, \
             klasifikasi, file_url, created_at, created_by) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.base.id.to_string(),
                record.base.no_surat,
                record.base.perihal,
                record.tanggal_surat.to_string(),
                record.penerima,
                record.sifat.to_string(),
                record.klasifikasi,
                record.base.file_url,
                record.base.created_at.to_rfc3339(),
                record.base.created_by,
            ],
        )?;
        Ok(record)
    }

    /// List outgoing letters, newest first.
    pub fn list_surat_keluar(&self) -> Result<Vec<SuratKeluar>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM surat_keluar ORDER BY created_at DESC",
            KELUAR_COLS
        ))?;
        let rows = stmt.query_map([], row_to_keluar)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_surat_keluar(&self, id: Uuid) -> Result<SuratKeluar> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM surat_keluar WHERE id = ?1",
            KELUAR_COLS
        ))?;
        stmt.query_row(params![id.to_string()], row_to_keluar)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => ArsipError::RecordNotFound(id.to_string()),
                other => other.into(),
            })
    }

    pub fn update_surat_keluar(&mut self, id: Uuid, upd: SuratKeluarUpdate) -> Result<SuratKeluar> {
        let mut record = self.get_surat_keluar(id)?;
        if let Some(v) = upd.no_surat {
            record.base.no_surat = require("noSurat", Some(v))?;
        }
        if let Some(v) = upd.perihal {
            record.base.perihal = require("perihal", Some(v))?;
        }
        if let Some(v) = upd.tanggal_surat {
            record.tanggal_surat = v;
        }
        if let Some(v) = upd.penerima {
            record.penerima = require("penerima", Some(v))?;
        }
        if let Some(v) = upd.sifat {
            record.sifat = v;
        }
        if let Some(v) = upd.klasifikasi {
            record.klasifikasi = v;
        }
        if let Some(v) = upd.file_url {
            record.base.file_url = v;
        }
        self.conn.execute(
            "UPDATE surat_keluar SET no_surat = ?2, perihal = ?3, tanggal_surat = ?4, \
             penerima = ?5, sifat = ?6, klasifikasi = ?7, file_url = ?8 WHERE id = ?1",
            params![
                id.to_string(),
                record.base.no_surat,
                record.base.perihal,
                record.tanggal_surat.to_string(),
                record.penerima,
                record.sifat.to_string(),
                record.klasifikasi,
                record.base.file_url,
            ],
        )?;
        Ok(record)
    }

    pub fn delete_surat_keluar(&mut self, id: Uuid) -> Result<()> {
        let changed = self.conn.execute(
            "DELETE FROM surat_keluar WHERE id = ?1",
            params![id.to_string()],
        )?;
        if changed == 0 {
            return Err(ArsipError::RecordNotFound(id.to_string()));
        }
        Ok(())
    }

    // ========== Undangan Methods ==========

    pub fn add_undangan(&mut self, draft: UndanganDraft) -> Result<Undangan> {
        let record = draft.validate()?;
        self.conn.execute(
            "INSERT INTO undangan (id, no_surat, perihal, tanggal_acara, waktu_acara, tempat, \
             pengirim, status, file_url, created_at, created_by) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                record.base.id.to_string(),
                record.base.no_surat,
                record.base.perihal,
                record.tanggal_acara.to_string(),
                record.waktu_acara,
                record.tempat,
                record.pengirim,
                record.status.to_string(),
                record.base.file_url,
                record.base.created_at.to_rfc3339(),
                record.base.created_by,
            ],
        )?;
        Ok(record)
    }

    /// List invitations, newest first.
    pub fn list_undangan(&self) -> Result<Vec<Undangan>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM undangan ORDER BY created_at DESC",
            UNDANGAN_COLS
        ))?;
        let rows = stmt.query_map([], row_to_undangan)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_undangan(&self, id: Uuid) -> Result<Undangan> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM undangan WHERE id = ?1",
            UNDANGAN_COLS
        ))?;
        stmt.query_row(params![id.to_string()], row_to_undangan)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => ArsipError::RecordNotFound(id.to_string()),
                other => other.into(),
            })
    }

    pub fn update_undangan(&mut self, id: Uuid, upd: UndanganUpdate) -> Result<Undangan> {
        let mut record = self.get_undangan(id)?;
        if let Some(v) = upd.no_surat {
            record.base.no_surat = require("noSurat", Some(v))?;
        }
        if let Some(v) = upd.perihal {
            record.base.perihal = require("perihal", Some(v))?;
        }
        if let Some(v) = upd.tanggal_acara {
            record.tanggal_acara = v;
        }
        if let Some(v) = upd.waktu_acara {
            record.waktu_acara = require("waktuAcara", Some(v))?;
        }
        if let Some(v) = upd.tempat {
            record.tempat = require("tempat", Some(v))?;
        }
        if let Some(v) = upd.pengirim {
            record.pengirim = require("pengirim", Some(v))?;
        }
        if let Some(v) = upd.status {
            record.status = v;
        }
        if let Some(v) = upd.file_url {
            record.base.file_url = v;
        }
        self.conn.execute(
            "UPDATE undangan SET no_surat = ?2, perihal = ?3, tanggal_acara = ?4, \
             waktu_acara = ?5, tempat = ?6, pengirim = ?7, status = ?8, file_url = ?9 \
             WHERE id = ?1",
            params![
                id.to_string(),
                record.base.no_surat,
                record.base.perihal,
                record.tanggal_acara.to_string(),
                record.waktu_acara,
                record.tempat,
                record.pengirim,
                record.status.to_string(),
                record.base.file_url,
            ],
        )?;
        Ok(record)
    }

    pub fn delete_undangan(&mut self, id: Uuid) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM undangan WHERE id = ?1", params![id.to_string()])?;
        if changed == 0 {
            return Err(ArsipError::RecordNotFound(id.to_string()));
        }
        Ok(())
    }

    // ========== Dashboard Queries ==========

    fn count_since(&self, table: &str, since: DateTime<Utc>) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE created_at >= ?1", table),
            params![since.to_rfc3339()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    pub fn count_masuk_since(&self, since: DateTime<Utc>) -> Result<u64> {
        self.count_since("surat_masuk", since)
    }

    pub fn count_keluar_since(&self, since: DateTime<Utc>) -> Result<u64> {
        self.count_since("surat_keluar", since)
    }

    pub fn count_undangan_since(&self, since: DateTime<Utc>) -> Result<u64> {
        self.count_since("undangan", since)
    }

    /// Total records across all three collections.
    pub fn count_total(&self) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT (SELECT COUNT(*) FROM surat_masuk) + \
                    (SELECT COUNT(*) FROM surat_keluar) + \
                    (SELECT COUNT(*) FROM undangan)",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    pub fn latest_masuk(&self, limit: usize) -> Result<Vec<SuratMasuk>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM surat_masuk ORDER BY created_at DESC LIMIT ?1",
            MASUK_COLS
        ))?;
        let rows = stmt.query_map(params![limit as i64], row_to_masuk)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn latest_keluar(&self, limit: usize) -> Result<Vec<SuratKeluar>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM surat_keluar ORDER BY created_at DESC LIMIT ?1",
            KELUAR_COLS
        ))?;
        let rows = stmt.query_map(params![limit as i64], row_to_keluar)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn latest_undangan(&self, limit: usize) -> Result<Vec<Undangan>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM undangan ORDER BY created_at DESC LIMIT ?1",
            UNDANGAN_COLS
        ))?;
        let rows = stmt.query_map(params![limit as i64], row_to_undangan)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Invitations whose event falls on `date`, earliest start first.
    pub fn undangan_on(&self, date: NaiveDate) -> Result<Vec<Undangan>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM undangan WHERE tanggal_acara = ?1 ORDER BY waktu_acara ASC",
            UNDANGAN_COLS
        ))?;
        let rows = stmt.query_map(params![date.to_string()], row_to_undangan)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
