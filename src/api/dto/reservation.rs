//! Reservation DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request to reserve a bike
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    /// Registered username
    #[validate(length(min = 1, message = "must not be empty"))]
    pub username: String,
    /// Bike to reserve
    #[serde(rename = "bikeid", alias = "bikeId", alias = "bike_id")]
    pub bike_id: i32,
}

/// Response from creating a reservation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateReservationResponse {
    pub reservation_id: String,
}

/// Query for a user's active reservation
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActiveReservationQuery {
    /// Username to look up
    #[serde(default)]
    pub user: String,
}
