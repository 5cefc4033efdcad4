use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument};

use super::repo_types::{EnergyConsumption, EnergyGeneration};
use crate::{auth::extractors::AuthUser, error::ApiError, state::AppState};

pub fn energy_routes() -> Router<AppState> {
    Router::new()
        .route("/energy/generation", get(list_generation))
        .route("/energy/consumption", get(list_consumption))
}

#[instrument(skip_all)]
pub async fn list_generation(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
) -> Result<Json<Vec<EnergyGeneration>>, ApiError> {
    let rows = state.energy.list_generation().await?;
    info!(%email, count = rows.len(), "generation records retrieved");
    Ok(Json(rows))
}

#[instrument(skip_all)]
pub async fn list_consumption(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
) -> Result<Json<Vec<EnergyConsumption>>, ApiError> {
    let rows = state.energy.list_consumption().await?;
    info!(%email, count = rows.len(), "consumption records retrieved");
    Ok(Json(rows))
}
