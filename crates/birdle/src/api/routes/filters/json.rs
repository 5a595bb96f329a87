use std::sync::Arc;

use axum::{extract::State, response::ErrorResponse, Json};
use birdle_core::{FilterChoices, RegionFilter, RegionFilterSubmission};
use log::{debug, error};

use crate::{domain::Error, startup::AppState};

pub async fn get_filter_choices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FilterChoices>, ErrorResponse> {
    let choices = state.validator().choices().await.map_err(|e| {
        error!("Failed to populate filter choices: {}", e);
        e
    })?;

    Ok(Json(choices))
}

pub async fn validate_filter(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<RegionFilterSubmission>,
) -> Result<Json<RegionFilter>, ErrorResponse> {
    debug!("validating filter: {:?}", submission);

    match state.validator().validate_submission(&submission).await {
        Ok(filter) => Ok(Json(filter)),
        Err(e @ Error::Validation(_)) => Err(e.into()),
        Err(e) => {
            error!("Failed to validate filter: {}", e);
            Err(e.into())
        }
    }
}
