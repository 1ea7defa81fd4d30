//! Resource API: axum routing over `DtlService` and the orchestrator.
//!
//! Every handler acquires its own [`DtlService`] from [`AppState::service`];
//! the connection is dropped when the handler returns. Unit-scoped routes
//! first resolve the unit under its library, so a unit addressed through
//! the wrong library is a 404.

mod artifacts;
mod error;
mod libraries;
mod test_cases;
mod units;
mod users;


use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

use dtl_artifacts::Orchestrator;
use dtl_config::{LlmConfig, ServerConfig};
use dtl_core::responses::HealthResponse;
use dtl_db::DtlDb;
use dtl_db::service::DtlService;
use dtl_llm::GenerationClient;

pub use error::ApiFailure;

pub struct AppState {
    db: DtlDb,
    orchestrator: Orchestrator<GenerationClient>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(db: DtlDb, llm: &LlmConfig) -> anyhow::Result<SharedState> {
        let client =
            GenerationClient::new(llm.clone()).context("failed to build generation client")?;
        Ok(Arc::new(Self {
            db,
            orchestrator: Orchestrator::new(client),
        }))
    }

    async fn service(&self) -> Result<DtlService, ApiFailure> {
        Ok(self.db.connect().await?)
    }
}

/// Unwrap a JSON body, turning extractor rejections into `invalid_json`.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiFailure> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiFailure::invalid_json(&rejection))
}

const UNIT: &str = "/dtlibs/:library_id/dtls/:unit_id";

/// Build the API router under the configured prefix (`""` mounts at the
/// root), wrapped in the configured CORS policy.
pub fn router(state: SharedState, server: &ServerConfig) -> Router {
    let prefix = server.normalized_prefix();
    let unit = |suffix: &str| format!("{UNIT}{suffix}");

    let api = Router::new()
        .route("/health", get(health))
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:user_id", get(users::get_user))
        .route(
            "/dtlibs",
            get(libraries::list_libraries).post(libraries::create_library),
        )
        .route(
            "/dtlibs/:library_id",
            get(libraries::get_library)
                .put(libraries::update_library)
                .delete(libraries::delete_library),
        )
        .route("/dtlibs/:library_id/segment", post(libraries::segment_library))
        .route(
            "/dtlibs/:library_id/suggestions",
            get(libraries::list_suggestions),
        )
        .route(
            "/dtlibs/:library_id/suggestions/:suggestion_id/promote",
            post(libraries::promote_suggestion),
        )
        .route("/dtlibs/:library_id/overview", get(libraries::overview))
        .route("/dtlibs/:library_id/sync", post(libraries::sync_library))
        .route(
            "/dtlibs/:library_id/sync-events",
            get(libraries::list_sync_events),
        )
        .route(
            "/dtlibs/:library_id/dtls",
            get(units::list_units).post(units::create_unit),
        )
        .route(
            UNIT,
            get(units::get_unit)
                .put(units::update_unit)
                .delete(units::delete_unit),
        )
        .route(
            &unit("/ontology"),
            get(artifacts::get_ontology).put(artifacts::save_ontology),
        )
        .route(
            &unit("/ontology/generate"),
            post(artifacts::generate_ontology),
        )
        .route(
            &unit("/interface"),
            get(artifacts::get_interface).put(artifacts::save_interface),
        )
        .route(
            &unit("/interface/generate"),
            post(artifacts::generate_interface),
        )
        .route(
            &unit("/configuration"),
            get(artifacts::get_configuration).put(artifacts::save_configuration),
        )
        .route(
            &unit("/configuration/generate"),
            post(artifacts::generate_configuration),
        )
        .route(
            &unit("/logic"),
            get(artifacts::get_logic).put(artifacts::save_logic),
        )
        .route(&unit("/logic/generate"), post(artifacts::generate_logic))
        .route(&unit("/generate-all"), post(artifacts::generate_all))
        .route(
            &unit("/tests"),
            get(test_cases::list_tests).post(test_cases::create_test),
        )
        .route(&unit("/tests/generate"), post(test_cases::generate_tests))
        .route(&unit("/tests/run"), post(test_cases::run_tests))
        .route(
            &unit("/tests/:test_id"),
            get(test_cases::get_test)
                .put(test_cases::update_test)
                .delete(test_cases::delete_test),
        )
        .route(&unit("/tests/:test_id/runs"), get(test_cases::list_runs))
        .route(&unit("/review"), get(units::get_review))
        .route(&unit("/approve"), post(units::approve))
        .route(&unit("/request-revision"), post(units::request_revision))
        .route(
            &unit("/comments"),
            get(units::list_comments).post(units::add_comment),
        )
        .with_state(state);

    let app = if prefix.is_empty() {
        api
    } else {
        Router::new().nest(&prefix, api)
    };

    match cors_layer(server) {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

/// `None` when no origin is allowed.
fn cors_layer(server: &ServerConfig) -> Option<CorsLayer> {
    if server.allows_any_origin() {
        return Some(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    let origins: Vec<HeaderValue> = server
        .cors_allow_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(origin = %origin, %error, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true),
    )
}

async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        llm_configured: state.orchestrator.generator().is_configured(),
    })
}
