//! Library routes, including segmentation, overview, and sync.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use dtl_core::entities::{Library, SegmentationSuggestion, SyncEvent, Unit};
use dtl_core::payloads::NewLibrary;
use dtl_core::responses::{OverviewSnapshot, SyncResponse};
use dtl_db::updates::library::LibraryUpdate;

use super::{ApiFailure, SharedState, json_body};

/// `?search=` filter shared by list routes.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

impl SearchParams {
    pub fn term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

pub async fn list_libraries(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Library>>, ApiFailure> {
    let svc = state.service().await?;
    Ok(Json(svc.list_libraries(params.term()).await?))
}

pub async fn create_library(
    State(state): State<SharedState>,
    payload: Result<Json<NewLibrary>, JsonRejection>,
) -> Result<(StatusCode, Json<Library>), ApiFailure> {
    let new = json_body(payload)?;
    let svc = state.service().await?;
    Ok((StatusCode::CREATED, Json(svc.create_library(&new).await?)))
}

pub async fn get_library(
    State(state): State<SharedState>,
    Path(library_id): Path<i64>,
) -> Result<Json<Library>, ApiFailure> {
    let svc = state.service().await?;
    Ok(Json(svc.get_library(library_id).await?))
}

pub async fn update_library(
    State(state): State<SharedState>,
    Path(library_id): Path<i64>,
    payload: Result<Json<LibraryUpdate>, JsonRejection>,
) -> Result<Json<Library>, ApiFailure> {
    let update = json_body(payload)?;
    let svc = state.service().await?;
    Ok(Json(svc.update_library(library_id, &update).await?))
}

pub async fn delete_library(
    State(state): State<SharedState>,
    Path(library_id): Path<i64>,
) -> Result<StatusCode, ApiFailure> {
    let svc = state.service().await?;
    svc.delete_library(library_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn segment_library(
    State(state): State<SharedState>,
    Path(library_id): Path<i64>,
) -> Result<Json<Vec<SegmentationSuggestion>>, ApiFailure> {
    let svc = state.service().await?;
    Ok(Json(
        state.orchestrator.segment_library(&svc, library_id).await?,
    ))
}

pub async fn list_suggestions(
    State(state): State<SharedState>,
    Path(library_id): Path<i64>,
) -> Result<Json<Vec<SegmentationSuggestion>>, ApiFailure> {
    let svc = state.service().await?;
    Ok(Json(svc.list_suggestions(library_id).await?))
}

pub async fn promote_suggestion(
    State(state): State<SharedState>,
    Path((library_id, suggestion_id)): Path<(i64, i64)>,
) -> Result<(StatusCode, Json<Unit>), ApiFailure> {
    let svc = state.service().await?;
    let unit = svc.promote_suggestion(library_id, suggestion_id).await?;
    Ok((StatusCode::CREATED, Json(unit)))
}

pub async fn overview(
    State(state): State<SharedState>,
    Path(library_id): Path<i64>,
) -> Result<Json<OverviewSnapshot>, ApiFailure> {
    let svc = state.service().await?;
    Ok(Json(svc.library_overview(library_id).await?))
}

pub async fn sync_library(
    State(state): State<SharedState>,
    Path(library_id): Path<i64>,
) -> Result<Json<SyncResponse>, ApiFailure> {
    let svc = state.service().await?;
    Ok(Json(svc.sync_library(library_id).await?))
}

pub async fn list_sync_events(
    State(state): State<SharedState>,
    Path(library_id): Path<i64>,
) -> Result<Json<Vec<SyncEvent>>, ApiFailure> {
    let svc = state.service().await?;
    Ok(Json(svc.list_sync_events(library_id).await?))
}
