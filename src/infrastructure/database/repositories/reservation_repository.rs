//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use log::{debug, warn};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Set, SqlErr,
    TransactionTrait,
};

use crate::domain::reservation::{Reservation, ReservationId, ReservationRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{bike, reservation};
use crate::infrastructure::database::gateway::{self, storage_error};

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: ReservationId::from(m.reservation_id),
        bike_id: m.bike_id,
        username: m.username,
    }
}

/// Classify a failed reservation insert. A unique violation is the storage
/// telling us a concurrent (or earlier) reservation won.
fn insert_err(r: &Reservation, e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            if detail.contains("bikeid") && !detail.contains("username") {
                DomainError::BikeNotAvailable(r.bike_id)
            } else {
                DomainError::UserAlreadyReserved(r.username.clone())
            }
        }
        _ => storage_error(reservation::TABLE_NAME, "insert")(e),
    }
}

async fn insert_row<C: ConnectionTrait>(db: &C, r: &Reservation) -> DomainResult<()> {
    let model = reservation::ActiveModel {
        reservation_id: Set(r.id.as_str().to_string()),
        bike_id: Set(r.bike_id),
        username: Set(r.username.clone()),
    };
    reservation::Entity::insert(model)
        .exec_without_returning(db)
        .await
        .map_err(|e| insert_err(r, e))?;
    Ok(())
}

/// Both writes of a reservation. The bike is only linked while its
/// reference is still empty; zero rows touched means someone else has it,
/// or the bike row is gone.
async fn insert_and_link<C: ConnectionTrait>(db: &C, r: &Reservation) -> DomainResult<()> {
    insert_row(db, r).await?;

    let linked = gateway::update_column::<bike::Entity, _, _>(
        db,
        bike::TABLE_NAME,
        bike::Column::ReservationId,
        Some(r.id.as_str().to_string()),
        Condition::all()
            .add(bike::Column::BikeId.eq(r.bike_id))
            .add(bike::Column::ReservationId.is_null()),
    )
    .await?;

    if linked == 0 {
        let bike = gateway::select_one_where::<bike::Entity, _, _>(
            db,
            bike::TABLE_NAME,
            bike::Column::BikeId,
            r.bike_id,
        )
        .await?;
        return Err(match bike {
            Some(_) => DomainError::BikeNotAvailable(r.bike_id),
            None => DomainError::unknown_bike(r.bike_id),
        });
    }
    Ok(())
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn find_by_username(&self, username: &str) -> DomainResult<Vec<Reservation>> {
        let models = gateway::select_where::<reservation::Entity, _, _>(
            &self.db,
            reservation::TABLE_NAME,
            reservation::Column::Username,
            username,
        )
        .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn insert(&self, r: &Reservation) -> DomainResult<()> {
        debug!("Inserting reservation {} for bike {}", r.id, r.bike_id);
        insert_row(&self.db, r).await
    }

    async fn delete_by_bike(&self, bike_id: i32) -> DomainResult<u64> {
        debug!("Deleting reservation for bike {}", bike_id);
        gateway::delete_where::<reservation::Entity, _, _>(
            &self.db,
            reservation::TABLE_NAME,
            reservation::Column::BikeId,
            bike_id,
        )
        .await
    }

    async fn insert_linked(&self, r: &Reservation) -> DomainResult<()> {
        debug!(
            "Reserving bike {} for {} as {} (transactional)",
            r.bike_id, r.username, r.id
        );

        let txn = self
            .db
            .begin()
            .await
            .map_err(storage_error(reservation::TABLE_NAME, "begin"))?;

        match insert_and_link(&txn, r).await {
            Ok(()) => txn
                .commit()
                .await
                .map_err(storage_error(reservation::TABLE_NAME, "commit")),
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(
                        "Rollback of reservation {} for bike {} failed: {}",
                        r.id, r.bike_id, rollback_err
                    );
                }
                Err(e)
            }
        }
    }
}
