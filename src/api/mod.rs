//! HTTP server: JSON CRUD endpoints for the three record collections,
//! the dashboard summary, attachment upload and download, and settings.

mod error;
mod resource;

pub use error::{ApiError, ApiResult};
pub use resource::{document_routes, Document};

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::{Settings, Theme};
use crate::dashboard;
use crate::entity::{
    SuratKeluar, SuratKeluarDraft, SuratMasuk, SuratMasukDraft, Undangan, UndanganDraft,
};
use crate::error::{ArsipError, Result};
use crate::storage::{SqliteStore, SuratKeluarUpdate, SuratMasukUpdate, UndanganUpdate};
use crate::upload::{BlobStore, StoredFile, MAX_UPLOAD_BYTES};

/// Body limit for the upload route. Larger than the attachment cap so
/// the handler, not the transport, produces the descriptive error.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES as usize + 2 * 1024 * 1024;

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<SqliteStore>>,
    pub blobs: Arc<BlobStore>,
    pub settings: Arc<Mutex<Settings>>,
}

/// Standard response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn msg(message: &str) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.to_string()),
        }
    }
}

impl Document for SuratMasuk {
    type Draft = SuratMasukDraft;
    type Update = SuratMasukUpdate;
    const PATH: &'static str = "/api/surat-masuk";

    fn create(store: &mut SqliteStore, draft: Self::Draft) -> Result<Self> {
        store.add_surat_masuk(draft)
    }
    fn list(store: &SqliteStore) -> Result<Vec<Self>> {
        store.list_surat_masuk()
    }
    fn update(store: &mut SqliteStore, id: Uuid, upd: Self::Update) -> Result<Self> {
        store.update_surat_masuk(id, upd)
    }
    fn delete(store: &mut SqliteStore, id: Uuid) -> Result<()> {
        store.delete_surat_masuk(id)
    }
}

impl Document for SuratKeluar {
    type Draft = SuratKeluarDraft;
    type Update = SuratKeluarUpdate;
    const PATH: &'static str = "/api/surat-keluar";

    fn create(store: &mut SqliteStore, draft: Self::Draft) -> Result<Self> {
        store.add_surat_keluar(draft)
    }
    fn list(store: &SqliteStore) -> Result<Vec<Self>> {
        store.list_surat_keluar()
    }
    fn update(store: &mut SqliteStore, id: Uuid, upd: Self::Update) -> Result<Self> {
        store.update_surat_keluar(id, upd)
    }
    fn delete(store: &mut SqliteStore, id: Uuid) -> Result<()> {
        store.delete_surat_keluar(id)
    }
}

impl Document for Undangan {
    type Draft = UndanganDraft;
    type Update = UndanganUpdate;
    const PATH: &'static str = "/api/undangan";

    fn create(store: &mut SqliteStore, draft: Self::Draft) -> Result<Self> {
        store.add_undangan(draft)
    }
    fn list(store: &SqliteStore) -> Result<Vec<Self>> {
        store.list_undangan()
    }
    fn update(store: &mut SqliteStore, id: Uuid, upd: Self::Update) -> Result<Self> {
        store.update_undangan(id, upd)
    }
    fn delete(store: &mut SqliteStore, id: Uuid) -> Result<()> {
        store.delete_undangan(id)
    }
}

async fn dashboard_stats(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<dashboard::DashboardSummary>>> {
    let store = state.store.lock().await;
    let summary = dashboard::summarize(&store, chrono::Utc::now())?;
    Ok(Json(ApiResponse::ok(summary)))
}

#[derive(Debug, Default, Deserialize)]
struct UploadQuery {
    /// Optional override for the client-supplied file name.
    filename: Option<String>,
}

async fn upload_file(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> ApiResult<Json<ApiResponse<StoredFile>>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            let file_name = query
                .filename
                .clone()
                .or_else(|| field.file_name().map(str::to_string))
                .ok_or_else(|| ArsipError::Validation("File name missing".to_string()))?;
            let bytes = field.bytes().await?;
            // Read the base per request so settings updates apply
            // without a restart.
            let public_base = state.settings.lock().await.public_url.clone();
            let stored = state.blobs.put(&public_base, &file_name, &bytes)?;
            tracing::info!(name = %stored.file_name, size = bytes.len(), "stored attachment");
            return Ok(Json(ApiResponse::ok(stored)));
        }
    }
    Err(ArsipError::Validation("No file provided".to_string()).into())
}

fn content_type_for(name: &str) -> &'static str {
    match name.rsplit('.').next().map(str::to_lowercase).as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    }
}

async fn serve_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let path = state.blobs.resolve(&name)?;
    let bytes = tokio::fs::read(path).await.map_err(ArsipError::from)?;
    Ok((
        [(header::CONTENT_TYPE, content_type_for(&name))],
        bytes,
    ))
}

async fn get_settings(State(state): State<AppState>) -> Json<ApiResponse<Settings>> {
    let settings = state.settings.lock().await;
    Json(ApiResponse::ok(settings.clone()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsUpdate {
    page_size: Option<usize>,
    theme: Option<Theme>,
    public_url: Option<String>,
}

async fn put_settings(
    State(state): State<AppState>,
    Json(upd): Json<SettingsUpdate>,
) -> ApiResult<Json<ApiResponse<Settings>>> {
    let mut settings = state.settings.lock().await;
    if let Some(v) = upd.page_size {
        if v == 0 {
            return Err(ArsipError::Validation("pageSize must be positive".to_string()).into());
        }
        settings.page_size = v;
    }
    if let Some(v) = upd.theme {
        settings.theme = v;
    }
    if let Some(v) = upd.public_url {
        settings.public_url = v;
    }
    settings.save()?;
    Ok(Json(ApiResponse::ok(settings.clone())))
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"success": false, "error": "Not found"})),
    )
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let router = Router::new()
        .route("/api/dashboard/stats", get(dashboard_stats))
        .route(
            "/api/upload",
            post(upload_file).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/files/{name}", get(serve_file))
        .route("/api/settings", get(get_settings).put(put_settings));
    let router = document_routes::<SuratMasuk>(router);
    let router = document_routes::<SuratKeluar>(router);
    let router = document_routes::<Undangan>(router);
    router.fallback(not_found).with_state(state)
}

/// Open the store and serve until shutdown.
pub async fn serve(settings: Settings) -> Result<()> {
    let store = SqliteStore::open(&settings.data_dir)?;
    let blobs = BlobStore::new(settings.upload_dir());
    let addr = settings.bind_addr();

    let state = AppState {
        store: Arc::new(Mutex::new(store)),
        blobs: Arc::new(blobs),
        settings: Arc::new(Mutex::new(settings)),
    };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
