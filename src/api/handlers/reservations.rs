//! Reservation HTTP handlers

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Query, State};
use axum::Json;

use crate::api::dto::*;
use crate::api::error::ApiError;
use crate::api::extract::ValidatedJson;
use crate::domain::DomainError;

use super::RentalState;

/// The bike reserved by a user
///
/// Answers a list with zero or one bike.
#[utoipa::path(
    get,
    path = "/reservation",
    tag = "Reservations",
    params(ActiveReservationQuery),
    responses(
        (status = 200, description = "Reserved bike, if any", body = ApiResponse<Vec<BikeDto>>),
        (status = 400, description = "Missing user"),
        (status = 500, description = "User holds more than one reservation")
    )
)]
pub async fn active_reservation(
    State(state): State<RentalState>,
    Query(query): Query<ActiveReservationQuery>,
) -> Result<Json<ApiResponse<Vec<BikeDto>>>, ApiError> {
    let bike = state.rental.active_reservation(&query.user).await?;
    Ok(Json(ApiResponse::success(BikeDto::project(bike))))
}

/// Reserve a bike
#[utoipa::path(
    post,
    path = "/reservation",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 200, description = "Reservation created", body = ApiResponse<CreateReservationResponse>),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Unknown user or bike"),
        (status = 409, description = "Bike not available or user already holds a reservation"),
        (status = 500, description = "Storage left inconsistent, manual repair needed")
    )
)]
pub async fn create_reservation(
    State(state): State<RentalState>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> Result<Json<ApiResponse<CreateReservationResponse>>, ApiError> {
    let id = state
        .rental
        .create_reservation(&request.username, request.bike_id)
        .await?;
    Ok(Json(ApiResponse::success(CreateReservationResponse {
        reservation_id: id.into_inner(),
    })))
}

/// Release the reservation on a bike
#[utoipa::path(
    delete,
    path = "/reservation/bike/{bike_id}",
    tag = "Reservations",
    params(("bike_id" = i32, Path, description = "Bike ID")),
    responses(
        (status = 200, description = "Reservation deleted", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Bike ID is not an integer"),
        (status = 404, description = "Unknown bike"),
        (status = 409, description = "Bike is not rented")
    )
)]
pub async fn delete_reservation(
    State(state): State<RentalState>,
    bike_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let Path(bike_id) = bike_id.map_err(|rejection| {
        DomainError::Validation(format!("invalid bike id: {}", rejection.body_text()))
    })?;
    state.rental.delete_reservation(bike_id).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "Reservation for bike {} deleted",
        bike_id
    )))))
}
