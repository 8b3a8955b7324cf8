//! Bike rental business logic
//!
//! Keeps the bike and reservation tables consistent: a reservation row for a
//! bike exists exactly when that bike references it.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::domain::{
    Bike, DomainError, DomainResult, RepositoryProvider, Reservation, ReservationId,
};

/// How the two writes of a new reservation reach storage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Insert and bike link in one storage transaction
    #[default]
    Transactional,
    /// Insert, then link; a failed link deletes the inserted row again
    Compensating,
}

/// Service for bike rental operations
pub struct RentalService {
    repos: Arc<dyn RepositoryProvider>,
    write_mode: WriteMode,
}

impl RentalService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, write_mode: WriteMode) -> Self {
        Self { repos, write_mode }
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    /// All bikes in storage order
    pub async fn list_bikes(&self) -> DomainResult<Vec<Bike>> {
        self.repos.bikes().find_all().await
    }

    /// The bike currently reserved by `username`, if any
    pub async fn active_reservation(&self, username: &str) -> DomainResult<Option<Bike>> {
        require_username(username)?;

        let held = self.repos.reservations().find_by_username(username).await?;
        let reservation = match held.as_slice() {
            [] => return Ok(None),
            [one] => one,
            many => {
                return Err(DomainError::DataInconsistency(format!(
                    "user {} holds {} reservations",
                    username,
                    many.len()
                )))
            }
        };

        match self.repos.bikes().find_by_id(reservation.bike_id).await? {
            Some(bike) => Ok(Some(bike)),
            None => Err(DomainError::DataInconsistency(format!(
                "reservation {} references missing bike {}",
                reservation.id, reservation.bike_id
            ))),
        }
    }

    /// Reserve `bike_id` for `username` and return the new reservation ID
    pub async fn create_reservation(
        &self,
        username: &str,
        bike_id: i32,
    ) -> DomainResult<ReservationId> {
        match self.try_create(username, bike_id).await {
            Ok(id) => {
                metrics::counter!("reservations_created_total").increment(1);
                info!(bike_id, username, reservation_id = %id, "Reservation created");
                Ok(id)
            }
            Err(e) => {
                metrics::counter!("reservations_failed_total", "kind" => e.kind().as_str())
                    .increment(1);
                if let DomainError::InconsistencyWarning { .. } = e {
                    error!(bike_id, username, "{}", e);
                } else {
                    debug!(bike_id, username, "Reservation refused: {}", e);
                }
                Err(e)
            }
        }
    }

    /// Release the reservation held on `bike_id`
    pub async fn delete_reservation(&self, bike_id: i32) -> DomainResult<()> {
        if self.bike_availability(bike_id).await? {
            return Err(DomainError::BikeNotRented(bike_id));
        }

        // The bike reference is nulled by the foreign key rule.
        let removed = self.repos.reservations().delete_by_bike(bike_id).await?;
        if removed == 0 {
            return Err(DomainError::BikeNotRented(bike_id));
        }

        metrics::counter!("reservations_deleted_total").increment(1);
        info!(bike_id, "Reservation deleted");
        Ok(())
    }

    async fn try_create(&self, username: &str, bike_id: i32) -> DomainResult<ReservationId> {
        require_username(username)?;

        if !self.repos.users().exists(username).await? {
            return Err(DomainError::unknown_user(username));
        }
        if !self.bike_availability(bike_id).await? {
            return Err(DomainError::BikeNotAvailable(bike_id));
        }

        let reservation = Reservation::new(bike_id, username);
        match self.write_mode {
            WriteMode::Transactional => {
                self.repos.reservations().insert_linked(&reservation).await?
            }
            WriteMode::Compensating => self.insert_then_link(&reservation).await?,
        }
        Ok(reservation.id)
    }

    async fn insert_then_link(&self, reservation: &Reservation) -> DomainResult<()> {
        let bike_id = reservation.bike_id;
        self.repos.reservations().insert(reservation).await?;

        let link_err = match self
            .repos
            .bikes()
            .set_reservation(bike_id, Some(&reservation.id))
            .await
        {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };

        warn!(bike_id, "Linking reservation failed, removing it: {}", link_err);
        match self.repos.reservations().delete_by_bike(bike_id).await {
            Ok(_) => {
                metrics::counter!("reservation_compensations_total", "outcome" => "rolled_back")
                    .increment(1);
                Err(link_err)
            }
            Err(delete_err) => {
                metrics::counter!("reservation_compensations_total", "outcome" => "failed")
                    .increment(1);
                Err(DomainError::InconsistencyWarning {
                    bike_id,
                    cause: format!("{}; then {}", link_err, delete_err),
                })
            }
        }
    }

    /// `true` when the bike exists and has no reservation. A missing bike is
    /// `NotFound`, never "unavailable".
    async fn bike_availability(&self, bike_id: i32) -> DomainResult<bool> {
        self.repos
            .bikes()
            .find_by_id(bike_id)
            .await?
            .map(|bike| bike.is_available())
            .ok_or_else(|| DomainError::unknown_bike(bike_id))
    }
}

fn require_username(username: &str) -> DomainResult<()> {
    if username.is_empty() {
        return Err(DomainError::Validation("username must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::domain::{BikeRepository, ErrorKind, ReservationRepository, UserRepository};
    use crate::infrastructure::InMemoryRepositoryProvider;

    /// Wraps the in-memory store and fails chosen writes
    struct FaultyRepos {
        inner: InMemoryRepositoryProvider,
        fail_link: bool,
        fail_delete: bool,
    }

    impl RepositoryProvider for FaultyRepos {
        fn bikes(&self) -> &dyn BikeRepository {
            self
        }

        fn reservations(&self) -> &dyn ReservationRepository {
            self
        }

        fn users(&self) -> &dyn UserRepository {
            self.inner.users()
        }
    }

    #[async_trait]
    impl BikeRepository for FaultyRepos {
        async fn find_all(&self) -> DomainResult<Vec<Bike>> {
            self.inner.bikes().find_all().await
        }

        async fn find_by_id(&self, bike_id: i32) -> DomainResult<Option<Bike>> {
            self.inner.bikes().find_by_id(bike_id).await
        }

        async fn set_reservation(
            &self,
            bike_id: i32,
            reservation_id: Option<&ReservationId>,
        ) -> DomainResult<()> {
            if self.fail_link {
                return Err(DomainError::StorageUnavailable("bike update lost".into()));
            }
            self.inner
                .bikes()
                .set_reservation(bike_id, reservation_id)
                .await
        }
    }

    #[async_trait]
    impl ReservationRepository for FaultyRepos {
        async fn find_by_username(&self, username: &str) -> DomainResult<Vec<Reservation>> {
            self.inner.reservations().find_by_username(username).await
        }

        async fn insert(&self, reservation: &Reservation) -> DomainResult<()> {
            self.inner.reservations().insert(reservation).await
        }

        async fn delete_by_bike(&self, bike_id: i32) -> DomainResult<u64> {
            if self.fail_delete {
                return Err(DomainError::StorageUnavailable("delete lost".into()));
            }
            self.inner.reservations().delete_by_bike(bike_id).await
        }

        async fn insert_linked(&self, reservation: &Reservation) -> DomainResult<()> {
            self.inner.reservations().insert_linked(reservation).await
        }
    }

    fn store() -> InMemoryRepositoryProvider {
        let store = InMemoryRepositoryProvider::new();
        store.add_user("alice");
        store.add_user("bob");
        store.add_bike("Alpha", "52.0", "13.0");
        store.add_bike("Beta", "52.1", "13.1");
        store
    }

    fn service(mode: WriteMode) -> (Arc<InMemoryRepositoryProvider>, RentalService) {
        let repos = Arc::new(store());
        (repos.clone(), RentalService::new(repos, mode))
    }

    fn faulty(fail_link: bool, fail_delete: bool) -> (Arc<FaultyRepos>, RentalService) {
        let repos = Arc::new(FaultyRepos {
            inner: store(),
            fail_link,
            fail_delete,
        });
        (
            repos.clone(),
            RentalService::new(repos, WriteMode::Compensating),
        )
    }

    #[tokio::test]
    async fn alpha_scenario() {
        for mode in [WriteMode::Transactional, WriteMode::Compensating] {
            let (_repos, svc) = service(mode);

            let id = svc.create_reservation("alice", 1).await.unwrap();
            let bikes = svc.list_bikes().await.unwrap();
            assert_eq!(bikes[0].reservation_id.as_ref(), Some(&id));
            assert!(bikes[0].is_rented());

            let err = svc.create_reservation("bob", 1).await.unwrap_err();
            assert!(matches!(err, DomainError::BikeNotAvailable(1)));

            svc.delete_reservation(1).await.unwrap();
            assert!(!svc.list_bikes().await.unwrap()[0].is_rented());

            let err = svc.delete_reservation(1).await.unwrap_err();
            assert!(matches!(err, DomainError::BikeNotRented(1)));
        }
    }

    #[tokio::test]
    async fn create_then_lookup_returns_reserved_bike() {
        let (_repos, svc) = service(WriteMode::Transactional);
        svc.create_reservation("alice", 2).await.unwrap();

        let bike = svc.active_reservation("alice").await.unwrap().unwrap();
        assert_eq!(bike.id, 2);
        assert_eq!(bike.name, "Beta");
        assert!(svc.active_reservation("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_reservation_for_user_is_refused() {
        for mode in [WriteMode::Transactional, WriteMode::Compensating] {
            let (repos, svc) = service(mode);
            svc.create_reservation("alice", 1).await.unwrap();

            let err = svc.create_reservation("alice", 2).await.unwrap_err();
            assert!(matches!(err, DomainError::UserAlreadyReserved(ref u) if u == "alice"));
            assert_eq!(repos.reservation_count("alice"), 1);
            assert!(!svc.list_bikes().await.unwrap()[1].is_rented());
        }
    }

    #[tokio::test]
    async fn validation_order() {
        let (_repos, svc) = service(WriteMode::Transactional);

        let err = svc.create_reservation("", 999).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = svc.create_reservation("mallory", 999).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "User", .. }));

        let err = svc.create_reservation("alice", 999).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Bike", .. }));
    }

    #[tokio::test]
    async fn unknown_bike_on_delete_touches_nothing() {
        let (repos, svc) = service(WriteMode::Transactional);
        svc.create_reservation("alice", 1).await.unwrap();

        let err = svc.delete_reservation(999).await.unwrap_err();
        assert_eq!(err.to_string(), "Not found: Bike with bikeid=999");
        assert_eq!(repos.reservation_count("alice"), 1);
    }

    #[tokio::test]
    async fn empty_username_lookup_is_validation_error() {
        let (_repos, svc) = service(WriteMode::Transactional);
        let err = svc.active_reservation("").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn multiple_reservations_for_user_is_inconsistency() {
        let (repos, svc) = service(WriteMode::Transactional);
        repos.insert_unchecked(Reservation::new(1, "alice"));
        repos.insert_unchecked(Reservation::new(2, "alice"));

        let err = svc.active_reservation("alice").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataInconsistency);
    }

    #[tokio::test]
    async fn reservation_for_missing_bike_is_inconsistency() {
        let (repos, svc) = service(WriteMode::Transactional);
        repos.insert_unchecked(Reservation::new(42, "bob"));

        let err = svc.active_reservation("bob").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataInconsistency);
    }

    #[tokio::test]
    async fn failed_link_is_compensated() {
        let (repos, svc) = faulty(true, false);

        let err = svc.create_reservation("alice", 1).await.unwrap_err();
        assert!(matches!(err, DomainError::StorageUnavailable(_)));
        assert_eq!(repos.inner.reservation_count("alice"), 0);
        let alpha = repos.inner.bikes().find_by_id(1).await.unwrap().unwrap();
        assert!(!alpha.is_rented());
    }

    #[tokio::test]
    async fn failed_compensation_warns_with_bike_id() {
        let (repos, svc) = faulty(true, true);

        let err = svc.create_reservation("alice", 1).await.unwrap_err();
        assert!(matches!(err, DomainError::InconsistencyWarning { bike_id: 1, .. }));
        assert_eq!(err.kind(), ErrorKind::InconsistencyWarning);
        assert!(err.to_string().contains("bike 1"));
        // The orphan row is still there, waiting for manual repair
        assert_eq!(repos.inner.reservation_count("alice"), 1);
    }

    #[tokio::test]
    async fn transactional_mode_ignores_compensation_path() {
        let repos = Arc::new(FaultyRepos {
            inner: store(),
            fail_link: true,
            fail_delete: true,
        });
        let svc = RentalService::new(repos.clone(), WriteMode::Transactional);

        svc.create_reservation("alice", 1).await.unwrap();
        assert_eq!(repos.inner.reservation_count("alice"), 1);
    }

    #[tokio::test]
    async fn concurrent_creates_for_one_bike_have_one_winner() {
        let (repos, svc) = service(WriteMode::Transactional);
        let svc = Arc::new(svc);

        let a = tokio::spawn({
            let svc = svc.clone();
            async move { svc.create_reservation("alice", 1).await }
        });
        let b = tokio::spawn({
            let svc = svc.clone();
            async move { svc.create_reservation("bob", 1).await }
        });

        let results = [a.await.unwrap(), b.await.unwrap()];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            repos.reservation_count("alice") + repos.reservation_count("bob"),
            1
        );
    }

    #[tokio::test]
    async fn holder_cannot_reserve_own_bike_again() {
        for mode in [WriteMode::Transactional, WriteMode::Compensating] {
            let (repos, svc) = service(mode);
            svc.create_reservation("alice", 1).await.unwrap();

            let err = svc.create_reservation("alice", 1).await.unwrap_err();
            assert!(matches!(err, DomainError::BikeNotAvailable(1)));
            assert_eq!(repos.reservation_count("alice"), 1);
        }
    }

    mod on_sqlite {
        use super::*;
        use crate::config::{SeedBike, SeedSettings};
        use crate::infrastructure::database::seed::seed_if_empty;
        use crate::infrastructure::database::test_database;
        use crate::infrastructure::SeaOrmRepositoryProvider;

        async fn sqlite_service(mode: WriteMode) -> RentalService {
            let db = test_database().await;
            let seed = SeedSettings {
                users: vec!["alice".into(), "bob".into()],
                bikes: vec![
                    SeedBike {
                        name: "Alpha".into(),
                        latitude: "52.0".into(),
                        longitude: "13.0".into(),
                    },
                    SeedBike {
                        name: "Beta".into(),
                        latitude: "52.1".into(),
                        longitude: "13.1".into(),
                    },
                ],
            };
            seed_if_empty(&db, &seed).await.unwrap();
            RentalService::new(Arc::new(SeaOrmRepositoryProvider::new(db)), mode)
        }

        #[tokio::test]
        async fn compensating_mode_round_trip() {
            let svc = sqlite_service(WriteMode::Compensating).await;

            let id = svc.create_reservation("alice", 1).await.unwrap();
            let held = svc.active_reservation("alice").await.unwrap().unwrap();
            assert_eq!(held.id, 1);
            assert_eq!(held.reservation_id.as_ref(), Some(&id));

            let err = svc.create_reservation("bob", 1).await.unwrap_err();
            assert!(matches!(err, DomainError::BikeNotAvailable(1)));

            svc.delete_reservation(1).await.unwrap();
            assert!(svc.active_reservation("alice").await.unwrap().is_none());
            assert!(!svc.list_bikes().await.unwrap()[0].is_rented());

            let err = svc.delete_reservation(1).await.unwrap_err();
            assert!(matches!(err, DomainError::BikeNotRented(1)));
        }

        #[tokio::test]
        async fn compensating_mode_refuses_second_reservation() {
            let svc = sqlite_service(WriteMode::Compensating).await;
            svc.create_reservation("alice", 1).await.unwrap();

            let err = svc.create_reservation("alice", 2).await.unwrap_err();
            assert!(matches!(err, DomainError::UserAlreadyReserved(ref u) if u == "alice"));

            let bikes = svc.list_bikes().await.unwrap();
            assert!(!bikes[1].is_rented());
            assert_eq!(
                svc.active_reservation("alice").await.unwrap().map(|b| b.id),
                Some(1)
            );
        }

        #[tokio::test]
        async fn transactional_mode_round_trip() {
            let svc = sqlite_service(WriteMode::Transactional).await;

            svc.create_reservation("bob", 2).await.unwrap();
            let err = svc.create_reservation("alice", 2).await.unwrap_err();
            assert!(matches!(err, DomainError::BikeNotAvailable(2)));

            svc.delete_reservation(2).await.unwrap();
            assert!(svc.active_reservation("bob").await.unwrap().is_none());
        }
    }
}
