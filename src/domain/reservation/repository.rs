//! Reservation repository interface

use async_trait::async_trait;

use super::model::Reservation;
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// All reservations held by `username`. More than one row means the
    /// storage is inconsistent; callers decide how to report it.
    async fn find_by_username(&self, username: &str) -> DomainResult<Vec<Reservation>>;

    /// Insert a reservation row.
    ///
    /// A duplicate `username` maps to `UserAlreadyReserved`, a duplicate
    /// `bikeid` to `BikeNotAvailable`.
    async fn insert(&self, reservation: &Reservation) -> DomainResult<()>;

    /// Delete the reservation for `bike_id`, returning the number of rows removed.
    /// The bike's reference is cleared by the `ON DELETE SET NULL` rule.
    async fn delete_by_bike(&self, bike_id: i32) -> DomainResult<u64>;

    /// Insert the reservation and link it from its bike in a single storage
    /// transaction. Nothing is persisted unless both writes succeed.
    ///
    /// The bike link only applies to an available bike; if the bike was taken
    /// in the meantime the transaction is rolled back with `BikeNotAvailable`.
    async fn insert_linked(&self, reservation: &Reservation) -> DomainResult<()>;
}
