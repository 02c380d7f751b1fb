//! Dashboard summary: month-to-date counters, a recent-activity feed,
//! and today's meeting agenda.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::entity::DocKind;
use crate::error::Result;
use crate::storage::SqliteStore;

/// Activity feed and agenda are capped at this many entries.
pub const FEED_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub surat_masuk_bulan_ini: u64,
    pub surat_keluar_bulan_ini: u64,
    pub undangan_bulan_ini: u64,
    pub total_arsip: u64,
}

/// One line in the recent-activity feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: DocKind,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub user: String,
}

/// One of today's scheduled meetings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItem {
    pub id: Uuid,
    pub title: String,
    pub time: String,
    pub location: String,
    pub organizer: String,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub stats: DashboardStats,
    pub activities: Vec<ActivityEntry>,
    pub agenda: Vec<AgendaItem>,
}

fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    // First instant of the current month.
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// Build the dashboard view as of `now`.
///
/// The activity feed takes the latest records of each kind, merges them,
/// and keeps the five most recent overall. The agenda lists invitations
/// whose event date is today, earliest first.
pub fn summarize(store: &SqliteStore, now: DateTime<Utc>) -> Result<DashboardSummary> {
    let since = month_start(now);
    let stats = DashboardStats {
        surat_masuk_bulan_ini: store.count_masuk_since(since)?,
        surat_keluar_bulan_ini: store.count_keluar_since(since)?,
        undangan_bulan_ini: store.count_undangan_since(since)?,
        total_arsip: store.count_total()?,
    };

    let mut activities: Vec<ActivityEntry> = Vec::new();
    for record in store.latest_masuk(FEED_LIMIT)? {
        activities.push(ActivityEntry {
            id: record.base.id,
            kind: DocKind::Masuk,
            title: record.base.no_surat,
            description: record.base.perihal,
            timestamp: record.base.created_at,
            user: record.base.created_by,
        });
    }
    for record in store.latest_keluar(FEED_LIMIT)? {
        activities.push(ActivityEntry {
            id: record.base.id,
            kind: DocKind::Keluar,
            title: record.base.no_surat,
            description: record.base.perihal,
            timestamp: record.base.created_at,
            user: record.base.created_by,
        });
    }
    for record in store.latest_undangan(FEED_LIMIT)? {
        activities.push(ActivityEntry {
            id: record.base.id,
            kind: DocKind::Undangan,
            title: record.base.no_surat,
            description: record.base.perihal,
            timestamp: record.base.created_at,
            user: record.base.created_by,
        });
    }
    activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    activities.truncate(FEED_LIMIT);

    let agenda: Vec<AgendaItem> = store
        .undangan_on(now.date_naive())?
        .into_iter()
        .take(FEED_LIMIT)
        .map(|record| AgendaItem {
            id: record.base.id,
            title: record.base.perihal,
            time: record.waktu_acara,
            location: record.tempat,
            organizer: record.pengirim,
            status: "upcoming",
        })
        .collect();

    Ok(DashboardSummary {
        stats,
        activities,
        agenda,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{SuratKeluarDraft, SuratMasukDraft, UndanganDraft};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn store() -> (TempDir, SqliteStore) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::init(dir.path()).unwrap();
        (dir, store)
    }

    fn masuk(no: &str) -> SuratMasukDraft {
        SuratMasukDraft {
            no_surat: Some(no.to_string()),
            tanggal_surat: NaiveDate::from_ymd_opt(2025, 3, 10),
            pengirim: Some("Dinas".to_string()),
            perihal: Some("Perihal".to_string()),
            ..Default::default()
        }
    }

    fn keluar(no: &str) -> SuratKeluarDraft {
        SuratKeluarDraft {
            no_surat: Some(no.to_string()),
            tanggal_surat: NaiveDate::from_ymd_opt(2025, 3, 11),
            penerima: Some("Kecamatan".to_string()),
            perihal: Some("Perihal".to_string()),
            ..Default::default()
        }
    }

    fn undangan(no: &str, date: NaiveDate, time: &str) -> UndanganDraft {
        UndanganDraft {
            no_surat: Some(no.to_string()),
            tanggal_acara: Some(date),
            waktu_acara: Some(time.to_string()),
            tempat: Some("Aula".to_string()),
            pengirim: Some("Sekretariat".to_string()),
            perihal: Some("Rapat".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_store_summary() {
        let (_dir, store) = store();
        let summary = summarize(&store, Utc::now()).unwrap();
        assert_eq!(summary.stats.total_arsip, 0);
        assert!(summary.activities.is_empty());
        assert!(summary.agenda.is_empty());
    }

    #[test]
    fn test_month_counters() {
        let (_dir, mut store) = store();
        store.add_surat_masuk(masuk("001")).unwrap();
        store.add_surat_masuk(masuk("002")).unwrap();
        store.add_surat_keluar(keluar("003")).unwrap();

        let summary = summarize(&store, Utc::now()).unwrap();
        assert_eq!(summary.stats.surat_masuk_bulan_ini, 2);
        assert_eq!(summary.stats.surat_keluar_bulan_ini, 1);
        assert_eq!(summary.stats.undangan_bulan_ini, 0);
        assert_eq!(summary.stats.total_arsip, 3);
    }

    #[test]
    fn test_records_before_month_start_not_counted() {
        let (_dir, mut store) = store();
        store.add_surat_masuk(masuk("001")).unwrap();

        // Evaluate as of next month: nothing created then, but the
        // total still includes everything.
        let next_month = Utc::now() + chrono::Duration::days(40);
        let summary = summarize(&store, next_month).unwrap();
        assert_eq!(summary.stats.surat_masuk_bulan_ini, 0);
        assert_eq!(summary.stats.total_arsip, 1);
    }

    #[test]
    fn test_activity_feed_caps_at_five_newest_first() {
        let (_dir, mut store) = store();
        for i in 0..4 {
            store.add_surat_masuk(masuk(&format!("m{}", i))).unwrap();
        }
        for i in 0..4 {
            store.add_surat_keluar(keluar(&format!("k{}", i))).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(3));
        }

        let summary = summarize(&store, Utc::now()).unwrap();
        assert_eq!(summary.activities.len(), FEED_LIMIT);
        for pair in summary.activities.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
        // The most recent insert leads the feed.
        assert_eq!(summary.activities[0].title, "k3");
    }

    #[test]
    fn test_agenda_lists_todays_events_in_time_order() {
        let (_dir, mut store) = store();
        let today = Utc::now().date_naive();
        let tomorrow = today + chrono::Duration::days(1);
        store.add_undangan(undangan("a", today, "14:00")).unwrap();
        store.add_undangan(undangan("b", today, "09:00")).unwrap();
        store.add_undangan(undangan("c", tomorrow, "08:00")).unwrap();

        let summary = summarize(&store, Utc::now()).unwrap();
        assert_eq!(summary.agenda.len(), 2);
        assert_eq!(summary.agenda[0].time, "09:00");
        assert_eq!(summary.agenda[1].time, "14:00");
        assert_eq!(summary.agenda[0].status, "upcoming");
    }

    #[test]
    fn test_summary_wire_format() {
        let (_dir, mut store) = store();
        store.add_surat_masuk(masuk("001")).unwrap();
        let summary = summarize(&store, Utc::now()).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["stats"].get("suratMasukBulanIni").is_some());
        assert!(json["stats"].get("totalArsip").is_some());
        assert_eq!(json["activities"][0]["type"], "masuk");
        assert!(json["activities"][0].get("timestamp").is_some());
    }
}
