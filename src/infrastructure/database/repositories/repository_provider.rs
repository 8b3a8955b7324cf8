//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::bike::BikeRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::ReservationRepository;
use crate::domain::user::UserRepository;

use super::bike_repository::SeaOrmBikeRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
/// Each repository call checks a connection out of the pool and returns it
/// when the call completes, whichever way it completes.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let bike = repos.bikes().find_by_id(1).await?;
/// let held = repos.reservations().find_by_username("alice").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    bikes: SeaOrmBikeRepository,
    reservations: SeaOrmReservationRepository,
    users: SeaOrmUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            bikes: SeaOrmBikeRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn bikes(&self) -> &dyn BikeRepository {
        &self.bikes
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}

// ── Tests ──────────────────────────────────────────────────────
