use axum::{extract::State, Json};
use service_core::error::AppError;
use service_core::utils::ValidatedJson;

use crate::dtos::{ItineraryResponse, StatusResponse, TripRequest};
use crate::startup::AppState;

pub async fn trip_planner_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Trip Planner Agent is running".to_string(),
    })
}

#[tracing::instrument(skip_all)]
pub async fn generate_itinerary(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TripRequest>,
) -> Result<Json<ItineraryResponse>, AppError> {
    tracing::debug!(
        destination = %request.destination,
        start_date = %request.start_date,
        end_date = %request.end_date,
        "Generating itinerary"
    );

    let itinerary = state
        .planner
        .plan(&request)
        .await
        .map_err(|e| AppError::InternalError(e.into()))?;

    Ok(Json(ItineraryResponse { itinerary }))
}
