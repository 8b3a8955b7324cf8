//! Bike repository interface

use async_trait::async_trait;

use super::model::Bike;
use crate::domain::reservation::ReservationId;
use crate::domain::DomainResult;

#[async_trait]
pub trait BikeRepository: Send + Sync {
    /// All bikes, in storage order
    async fn find_all(&self) -> DomainResult<Vec<Bike>>;

    /// Find bike by ID
    async fn find_by_id(&self, bike_id: i32) -> DomainResult<Option<Bike>>;

    /// Point the bike at `reservation_id` (or clear it with `None`).
    ///
    /// Fails with `NotFound` when no bike row was touched.
    async fn set_reservation(
        &self,
        bike_id: i32,
        reservation_id: Option<&ReservationId>,
    ) -> DomainResult<()>;
}
