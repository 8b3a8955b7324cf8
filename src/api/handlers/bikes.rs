//! Bike HTTP handlers

use axum::extract::State;
use axum::Json;

use crate::api::dto::{ApiResponse, BikeDto};
use crate::api::error::ApiError;

use super::RentalState;

/// List all bikes with their rental state
#[utoipa::path(
    get,
    path = "/bikes",
    tag = "Bikes",
    responses(
        (status = 200, description = "All bikes", body = ApiResponse<Vec<BikeDto>>),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn list_bikes(
    State(state): State<RentalState>,
) -> Result<Json<ApiResponse<Vec<BikeDto>>>, ApiError> {
    let bikes = state.rental.list_bikes().await?;
    Ok(Json(ApiResponse::success(BikeDto::project(bikes))))
}
