//! HTTP API v1 — REST surface over the decision pipeline.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use calmwing_core::error::Error;
use calmwing_core::flight::{FlightContext, FlightQuery};
use calmwing_core::state::EmotionalState;
use calmwing_core::support::{SupportEnvelope, SupportRequest};
use calmwing_flight::evaluate_flights;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::SharedApiState;

/// Build the v1 API router.
pub fn v1_router(state: SharedApiState) -> Router {
    Router::new()
        .route("/v1/support", post(support_handler))
        .route("/v1/flights/evaluate", post(evaluate_flights_handler))
        .route("/v1/state/{user_id}", get(get_state_handler))
        .route("/v1/status", get(status_handler))
        .with_state(state)
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Deserialize)]
struct EvaluateFlightsRequest {
    flights: Vec<FlightQuery>,
}

#[derive(Serialize, Deserialize)]
struct EvaluateFlightsResponse {
    results: Vec<FlightOutcomeDto>,
}

/// Per-item outcome: either a context or an error, never both.
#[derive(Serialize, Deserialize)]
struct FlightOutcomeDto {
    flight_number: String,
    ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<FlightContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct StatusResponse {
    name: String,
    version: String,
    uptime_secs: i64,
    generator: String,
    model: String,
    flight_source: String,
    tracked_travelers: usize,
}

// ── Handlers ──────────────────────────────────────────────────────────────

/// One support interaction. Input errors are 400; a failed generation
/// call is a 200 envelope carrying a structured error.
async fn support_handler(
    State(state): State<SharedApiState>,
    Json(request): Json<SupportRequest>,
) -> Result<Json<SupportEnvelope>, (StatusCode, Json<ErrorResponse>)> {
    info!(user_id = %request.user_id, "v1/support request");

    match state.orchestrator.process(request).await {
        Ok(envelope) => Ok(Json(envelope)),
        Err(Error::Input { message }) => {
            Err((StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })))
        }
        Err(e) => {
            error!(error = %e, "support pipeline failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "internal error".into(),
                }),
            ))
        }
    }
}

/// Batch evaluation. Always 200; failures are reported per item.
async fn evaluate_flights_handler(
    State(state): State<SharedApiState>,
    Json(request): Json<EvaluateFlightsRequest>,
) -> Json<EvaluateFlightsResponse> {
    info!(flights = request.flights.len(), "v1/flights/evaluate request");

    let outcomes = evaluate_flights(state.flight_source.as_ref(), &request.flights).await;

    let results = outcomes
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(context) => FlightOutcomeDto {
                flight_number: outcome.query.flight_number,
                ok: true,
                context: Some(context),
                error: None,
            },
            Err(e) => FlightOutcomeDto {
                flight_number: outcome.query.flight_number,
                ok: false,
                context: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    Json(EvaluateFlightsResponse { results })
}

/// Traveler state snapshot, or 404 before first contact.
async fn get_state_handler(
    State(state): State<SharedApiState>,
    Path(user_id): Path<String>,
) -> Result<Json<EmotionalState>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.read(&user_id).await {
        Some(snapshot) => Ok(Json(snapshot)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("no state for traveler '{}'", user_id),
            }),
        )),
    }
}

async fn status_handler(State(state): State<SharedApiState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        name: "calmwing".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_secs: (chrono::Utc::now() - state.start_time).num_seconds(),
        generator: state.generator_name.clone(),
        model: state.model.clone(),
        flight_source: state.flight_source.name().to_string(),
        tracked_travelers: state.store.len().await,
    })
}
