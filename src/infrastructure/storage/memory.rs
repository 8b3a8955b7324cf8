//! In-memory storage implementation
//!
//! Mirrors the relational schema's rules: unique username and bike per
//! reservation, and the bike reference nulled when its reservation is deleted.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::bike::{Bike, BikeRepository};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::{Reservation, ReservationId, ReservationRepository};
use crate::domain::user::UserRepository;
use crate::domain::{DomainError, DomainResult};

/// In-memory storage for development and testing
pub struct InMemoryRepositoryProvider {
    bikes: DashMap<i32, Bike>,
    /// Keyed by reservation ID
    reservations: DashMap<String, Reservation>,
    users: DashMap<String, ()>,
    bike_counter: AtomicI32,
    /// Serializes writes so constraint checks and the write are one step
    write_lock: Mutex<()>,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self {
            bikes: DashMap::new(),
            reservations: DashMap::new(),
            users: DashMap::new(),
            bike_counter: AtomicI32::new(1),
            write_lock: Mutex::new(()),
        }
    }

    pub fn add_user(&self, username: impl Into<String>) {
        self.users.insert(username.into(), ());
    }

    /// Provision an available bike and return its ID
    pub fn add_bike(
        &self,
        name: impl Into<String>,
        latitude: impl Into<String>,
        longitude: impl Into<String>,
    ) -> i32 {
        let id = self.bike_counter.fetch_add(1, Ordering::SeqCst);
        self.bikes.insert(id, Bike::new(id, name, latitude, longitude));
        id
    }

    /// Store a reservation row without any constraint check, as a database
    /// lacking the unique indexes would.
    pub fn insert_unchecked(&self, reservation: Reservation) {
        self.reservations
            .insert(reservation.id.as_str().to_string(), reservation);
    }

    /// Number of reservation rows held by `username`
    pub fn reservation_count(&self, username: &str) -> usize {
        self.reservations
            .iter()
            .filter(|r| r.value().username == username)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_unique(&self, r: &Reservation) -> DomainResult<()> {
        for existing in self.reservations.iter() {
            if existing.username == r.username {
                return Err(DomainError::UserAlreadyReserved(r.username.clone()));
            }
            if existing.bike_id == r.bike_id {
                return Err(DomainError::BikeNotAvailable(r.bike_id));
            }
        }
        Ok(())
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn bikes(&self) -> &dyn BikeRepository {
        self
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        self
    }

    fn users(&self) -> &dyn UserRepository {
        self
    }
}

#[async_trait]
impl BikeRepository for InMemoryRepositoryProvider {
    async fn find_all(&self) -> DomainResult<Vec<Bike>> {
        let mut bikes: Vec<Bike> = self.bikes.iter().map(|b| b.value().clone()).collect();
        bikes.sort_by_key(|b| b.id);
        Ok(bikes)
    }

    async fn find_by_id(&self, bike_id: i32) -> DomainResult<Option<Bike>> {
        Ok(self.bikes.get(&bike_id).map(|b| b.clone()))
    }

    async fn set_reservation(
        &self,
        bike_id: i32,
        reservation_id: Option<&ReservationId>,
    ) -> DomainResult<()> {
        let _guard = self.lock();
        match self.bikes.get_mut(&bike_id) {
            Some(mut bike) => {
                bike.reservation_id = reservation_id.cloned();
                Ok(())
            }
            None => Err(DomainError::unknown_bike(bike_id)),
        }
    }
}

#[async_trait]
impl ReservationRepository for InMemoryRepositoryProvider {
    async fn find_by_username(&self, username: &str) -> DomainResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .iter()
            .filter(|r| r.value().username == username)
            .map(|r| r.value().clone())
            .collect())
    }

    async fn insert(&self, reservation: &Reservation) -> DomainResult<()> {
        let _guard = self.lock();
        self.check_unique(reservation)?;
        self.insert_unchecked(reservation.clone());
        Ok(())
    }

    async fn delete_by_bike(&self, bike_id: i32) -> DomainResult<u64> {
        let _guard = self.lock();
        let doomed: Vec<String> = self
            .reservations
            .iter()
            .filter(|r| r.value().bike_id == bike_id)
            .map(|r| r.key().clone())
            .collect();

        for id in &doomed {
            self.reservations.remove(id);
            // ON DELETE SET NULL
            for mut bike in self.bikes.iter_mut() {
                if bike.reservation_id.as_ref().map(ReservationId::as_str) == Some(id.as_str()) {
                    bike.reservation_id = None;
                }
            }
        }
        Ok(doomed.len() as u64)
    }

    async fn insert_linked(&self, reservation: &Reservation) -> DomainResult<()> {
        let _guard = self.lock();
        self.check_unique(reservation)?;

        let mut bike = self
            .bikes
            .get_mut(&reservation.bike_id)
            .ok_or_else(|| DomainError::unknown_bike(reservation.bike_id))?;
        if bike.is_rented() {
            return Err(DomainError::BikeNotAvailable(reservation.bike_id));
        }
        bike.reservation_id = Some(reservation.id.clone());
        drop(bike);

        self.insert_unchecked(reservation.clone());
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepositoryProvider {
    async fn exists(&self, username: &str) -> DomainResult<bool> {
        Ok(self.users.contains_key(username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delete_nulls_bike_reference() {
        let store = InMemoryRepositoryProvider::new();
        let id = store.add_bike("Alpha", "52.0", "13.0");
        let r = Reservation::new(id, "alice");
        store.insert_linked(&r).await.unwrap();
        assert!(store.bikes().find_by_id(id).await.unwrap().unwrap().is_rented());

        assert_eq!(store.delete_by_bike(id).await.unwrap(), 1);
        assert!(!store.bikes().find_by_id(id).await.unwrap().unwrap().is_rented());
        assert_eq!(store.reservation_count("alice"), 0);
    }

    #[tokio::test]
    async fn unique_rules_hold() {
        let store = InMemoryRepositoryProvider::new();
        let a = store.add_bike("Alpha", "52.0", "13.0");
        let b = store.add_bike("Beta", "52.1", "13.1");
        store.insert(&Reservation::new(a, "alice")).await.unwrap();

        let same_user = store.insert(&Reservation::new(b, "alice")).await;
        assert!(matches!(same_user, Err(DomainError::UserAlreadyReserved(_))));

        let same_bike = store.insert(&Reservation::new(a, "bob")).await;
        assert!(matches!(same_bike, Err(DomainError::BikeNotAvailable(_))));
    }

    #[tokio::test]
    async fn insert_linked_refuses_rented_bike() {
        let store = InMemoryRepositoryProvider::new();
        let a = store.add_bike("Alpha", "52.0", "13.0");
        store
            .set_reservation(a, Some(&ReservationId::generate()))
            .await
            .unwrap();

        let err = store
            .insert_linked(&Reservation::new(a, "bob"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::BikeNotAvailable(_)));
        assert_eq!(store.reservation_count("bob"), 0);
    }

    #[tokio::test]
    async fn insert_linked_on_missing_bike_is_not_found() {
        let store = InMemoryRepositoryProvider::new();
        let err = store
            .insert_linked(&Reservation::new(42, "bob"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Bike", .. }));
        assert_eq!(store.reservation_count("bob"), 0);
    }
}
