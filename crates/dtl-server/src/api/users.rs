use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use dtl_core::entities::User;
use dtl_core::payloads::NewUser;

use super::{ApiFailure, SharedState, json_body};

pub async fn list_users(State(state): State<SharedState>) -> Result<Json<Vec<User>>, ApiFailure> {
    let svc = state.service().await?;
    Ok(Json(svc.list_users().await?))
}

pub async fn create_user(
    State(state): State<SharedState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiFailure> {
    let new = json_body(payload)?;
    let svc = state.service().await?;
    Ok((StatusCode::CREATED, Json(svc.create_user(&new).await?)))
}

pub async fn get_user(
    State(state): State<SharedState>,
    Path(user_id): Path<i64>,
) -> Result<Json<User>, ApiFailure> {
    let svc = state.service().await?;
    Ok(Json(svc.get_user(user_id).await?))
}
