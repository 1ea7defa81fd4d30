//! Singleton artifact routes (get / save / generate) and generate-all.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};

use dtl_core::entities::{Configuration, Interface, Logic, Ontology};
use dtl_core::responses::GenerateAllResponse;

use super::{ApiFailure, SharedState, json_body};

type UnitPath = Path<(i64, i64)>;

// ── Ontology ───────────────────────────────────────────────────────

pub async fn get_ontology(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): UnitPath,
) -> Result<Json<Option<Ontology>>, ApiFailure> {
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok(Json(svc.get_ontology(unit.id).await?))
}

pub async fn save_ontology(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): UnitPath,
    payload: Result<Json<Ontology>, JsonRejection>,
) -> Result<Json<Ontology>, ApiFailure> {
    let ontology = json_body(payload)?;
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok(Json(svc.save_ontology(unit.id, &ontology).await?))
}

pub async fn generate_ontology(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): UnitPath,
) -> Result<Json<Ontology>, ApiFailure> {
    let svc = state.service().await?;
    Ok(Json(
        state
            .orchestrator
            .generate_ontology(&svc, library_id, unit_id)
            .await?,
    ))
}

// ── Interface ──────────────────────────────────────────────────────

pub async fn get_interface(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): UnitPath,
) -> Result<Json<Option<Interface>>, ApiFailure> {
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok(Json(svc.get_interface(unit.id).await?))
}

pub async fn save_interface(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): UnitPath,
    payload: Result<Json<Interface>, JsonRejection>,
) -> Result<Json<Interface>, ApiFailure> {
    let interface = json_body(payload)?;
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok(Json(svc.save_interface(unit.id, &interface).await?))
}

pub async fn generate_interface(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): UnitPath,
) -> Result<Json<Interface>, ApiFailure> {
    let svc = state.service().await?;
    Ok(Json(
        state
            .orchestrator
            .generate_interface(&svc, library_id, unit_id)
            .await?,
    ))
}

// ── Configuration ──────────────────────────────────────────────────

pub async fn get_configuration(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): UnitPath,
) -> Result<Json<Option<Configuration>>, ApiFailure> {
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok(Json(svc.get_configuration(unit.id).await?))
}

pub async fn save_configuration(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): UnitPath,
    payload: Result<Json<Configuration>, JsonRejection>,
) -> Result<Json<Configuration>, ApiFailure> {
    let configuration = json_body(payload)?;
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok(Json(svc.save_configuration(unit.id, &configuration).await?))
}

pub async fn generate_configuration(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): UnitPath,
) -> Result<Json<Configuration>, ApiFailure> {
    let svc = state.service().await?;
    Ok(Json(
        state
            .orchestrator
            .generate_configuration(&svc, library_id, unit_id)
            .await?,
    ))
}

// ── Logic ──────────────────────────────────────────────────────────

pub async fn get_logic(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): UnitPath,
) -> Result<Json<Option<Logic>>, ApiFailure> {
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok(Json(svc.get_logic(unit.id).await?))
}

pub async fn save_logic(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): UnitPath,
    payload: Result<Json<Logic>, JsonRejection>,
) -> Result<Json<Logic>, ApiFailure> {
    let logic = json_body(payload)?;
    let svc = state.service().await?;
    let unit = svc.get_unit(library_id, unit_id).await?;
    Ok(Json(svc.save_logic(unit.id, &logic).await?))
}

pub async fn generate_logic(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): UnitPath,
) -> Result<Json<Logic>, ApiFailure> {
    let svc = state.service().await?;
    Ok(Json(
        state
            .orchestrator
            .generate_logic(&svc, library_id, unit_id)
            .await?,
    ))
}

pub async fn generate_all(
    State(state): State<SharedState>,
    Path((library_id, unit_id)): UnitPath,
) -> Result<Json<GenerateAllResponse>, ApiFailure> {
    let svc = state.service().await?;
    Ok(Json(
        state
            .orchestrator
            .generate_all(&svc, library_id, unit_id)
            .await?,
    ))
}
