use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use dtl_core::entities::{TestCase, TestRun};
use dtl_core::payloads::NewTestCase;
use dtl_core::responses::RunTestsResponse;
use dtl_db::updates::test_case::TestCaseUpdate;

use super::{ApiFailure, SharedState, json_body};

pub async fn list_tests(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<TestCase>>, ApiFailure> {
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok(Json(svc.list_tests(unit.id).await?))
}

pub async fn create_test(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): Path<(i64, i64)>,
    payload: Result<Json<NewTestCase>, JsonRejection>,
) -> Result<(StatusCode, Json<TestCase>), ApiFailure> {
    let new = json_body(payload)?;
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok((StatusCode::CREATED, Json(svc.create_test(unit.id, &new).await?)))
}

pub async fn generate_tests(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<TestCase>>, ApiFailure> {
    let svc = state.service().await?;
    Ok(Json(
        state
            .orchestrator
            .generate_tests(&svc, library_id, unit_id)
            .await?,
    ))
}

pub async fn run_tests(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): Path<(i64, i64)>,
) -> Result<Json<RunTestsResponse>, ApiFailure> {
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok(Json(svc.run_tests(unit.id).await?))
}

pub async fn get_test(
    State(state): State<SharedState>,
    Path((library_id, unit_id, test_id)): Path<(i64, i64, i64)>,
) -> Result<Json<TestCase>, ApiFailure> {
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok(Json(svc.get_test(unit.id, test_id).await?))
}

pub async fn update_test(
    State(state): State<SharedState>,
    Path((library_id, unit_id, test_id)): Path<(i64, i64, i64)>,
    payload: Result<Json<TestCaseUpdate>, JsonRejection>,
) -> Result<Json<TestCase>, ApiFailure> {
    let update = json_body(payload)?;
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok(Json(svc.update_test(unit.id, test_id, &update).await?))
}

pub async fn delete_test(
    State(state): State<SharedState>,
    Path((library_id, unit_id, test_id)): Path<(i64, i64, i64)>,
) -> Result<StatusCode, ApiFailure> {
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    svc.delete_test(unit.id, test_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_runs(
    State(state): State<SharedState>,
    Path((library_id, unit_id, test_id)): Path<(i64, i64, i64)>,
) -> Result<Json<Vec<TestRun>>, ApiFailure> {
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok(Json(svc.list_test_runs(unit.id, test_id).await?))
}
