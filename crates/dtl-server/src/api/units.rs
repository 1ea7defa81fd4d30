//! Unit routes plus the unit's review workflow and comments.

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use dtl_core::entities::{Comment, Review, Unit};
use dtl_core::payloads::{NewComment, NewUnit, ReviewPayload};
use dtl_db::updates::unit::UnitUpdate;

use super::libraries::SearchParams;
use super::{ApiFailure, SharedState, json_body};

/// Review actions accept an empty body, `null`, or a [`ReviewPayload`].
fn review_payload(body: &Bytes) -> Result<ReviewPayload, ApiFailure> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ReviewPayload::default());
    }
    serde_json::from_slice::<Option<ReviewPayload>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| ApiFailure::new(StatusCode::BAD_REQUEST, "invalid_json", e.to_string()))
}

pub async fn list_units(
    State(state): State<SharedState>,
    Path(library_id): Path<i64>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Unit>>, ApiFailure> {
    let svc = state.service().await?;
    Ok(Json(svc.list_units(library_id, params.term()).await?))
}

pub async fn create_unit(
    State(state): State<SharedState>,
    Path(library_id): Path<i64>,
    payload: Result<Json<NewUnit>, JsonRejection>,
) -> Result<(StatusCode, Json<Unit>), ApiFailure> {
    let new = json_body(payload)?;
    let svc = state.service().await?;
    Ok((StatusCode::CREATED, Json(svc.create_unit(library_id, &new).await?)))
}

pub async fn get_unit(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): Path<(i64, i64)>,
) -> Result<Json<Unit>, ApiFailure> {
    let svc = state.service().await?;
    Ok(Json(svc.get_unit(library_id, unit_id).await?))
}

pub async fn update_unit(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): Path<(i64, i64)>,
    payload: Result<Json<UnitUpdate>, JsonRejection>,
) -> Result<Json<Unit>, ApiFailure> {
    let update = json_body(payload)?;
    let svc = state.service().await?;
    Ok(Json(svc.update_unit(library_id, unit_id, &update).await?))
}

pub async fn delete_unit(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiFailure> {
    let svc = state.service().await?;
    svc.delete_unit(library_id, unit_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Review ─────────────────────────────────────────────────────────

pub async fn get_review(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): Path<(i64, i64)>,
) -> Result<Json<Review>, ApiFailure> {
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok(Json(svc.get_or_create_review(unit.id).await?))
}

pub async fn approve(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): Path<(i64, i64)>,
    body: Bytes,
) -> Result<Json<Review>, ApiFailure> {
    let payload = review_payload(&body)?;
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok(Json(svc.approve_unit(&unit, &payload).await?))
}

pub async fn request_revision(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): Path<(i64, i64)>,
    body: Bytes,
) -> Result<Json<Review>, ApiFailure> {
    let payload = review_payload(&body)?;
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok(Json(svc.request_revision(unit.id, &payload).await?))
}

// ── Comments ───────────────────────────────────────────────────────

pub async fn list_comments(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<Comment>>, ApiFailure> {
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok(Json(svc.list_comments(unit.id).await?))
}

pub async fn add_comment(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): Path<(i64, i64)>,
    payload: Result<Json<NewComment>, JsonRejection>,
) -> Result<(StatusCode, Json<Comment>), ApiFailure> {
    let new = json_body(payload)?;
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok((StatusCode::CREATED, Json(svc.add_comment(unit.id, &new).await?)))
}
