// src/api/resource.rs
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{ApiError, ApiResult};
use super::{ApiResponse, AppState};
use crate::error::{ArsipError, Result};
use crate::storage::SqliteStore;

/// A record collection exposed over the standard CRUD surface. One
/// implementation per document category; the handlers and routes are
/// shared.
pub trait Document: Serialize + Send + Sized + 'static {
    type Draft: DeserializeOwned + Send;
    type Update: DeserializeOwned + Send;

    /// Route path for this collection.
    const PATH: &'static str;

    fn create(store: &mut SqliteStore, draft: Self::Draft) -> Result<Self>;
    fn list(store: &SqliteStore) -> Result<Vec<Self>>;
    fn update(store: &mut SqliteStore, id: Uuid, upd: Self::Update) -> Result<Self>;
    fn delete(store: &mut SqliteStore, id: Uuid) -> Result<()>;
}

/// PUT payload: the record id plus the changed fields.
#[derive(Deserialize)]
struct UpdateBody<U> {
    id: Option<Uuid>,
    #[serde(flatten)]
    changes: U,
}

#[derive(Deserialize)]
struct IdQuery {
    id: Option<Uuid>,
}

async fn list_docs<D: Document>(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<D>>>> {
    let store = state.store.lock().await;
    let records = D::list(&store)?;
    Ok(Json(ApiResponse::ok(records)))
}

async fn create_doc<D: Document>(
    State(state): State<AppState>,
    Json(draft): Json<D::Draft>,
) -> ApiResult<impl IntoResponse> {
    let mut store = state.store.lock().await;
    let record = D::create(&mut store, draft)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(record))))
}

async fn update_doc<D: Document>(
    State(state): State<AppState>,
    Json(body): Json<UpdateBody<D::Update>>,
) -> ApiResult<Json<ApiResponse<D>>> {
    let id = body
        .id
        .ok_or_else(|| ApiError(ArsipError::Validation("id is required".to_string())))?;
    let mut store = state.store.lock().await;
    let record = D::update(&mut store, id, body.changes)?;
    Ok(Json(ApiResponse::ok(record)))
}

async fn delete_doc<D: Document>(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let id = query
        .id
        .ok_or_else(|| ApiError(ArsipError::Validation("id is required".to_string())))?;
    let mut store = state.store.lock().await;
    D::delete(&mut store, id)?;
    Ok(Json(ApiResponse::msg("Record deleted")))
}

/// Mount list/create/update/delete for one document category.
pub fn document_routes<D: Document>(router: Router<AppState>) -> Router<AppState> {
    router.route(
        D::PATH,
        get(list_docs::<D>)
            .post(create_doc::<D>)
            .put(update_doc::<D>)
            .delete(delete_doc::<D>),
    )
}
