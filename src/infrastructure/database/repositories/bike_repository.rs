//! SeaORM implementation of BikeRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryOrder};

use crate::domain::bike::{Bike, BikeRepository};
use crate::domain::reservation::ReservationId;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::bike;
use crate::infrastructure::database::gateway::{self, storage_error};

pub struct SeaOrmBikeRepository {
    db: DatabaseConnection,
}

impl SeaOrmBikeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(crate) fn model_to_domain(m: bike::Model) -> Bike {
    Bike {
        id: m.bike_id,
        name: m.name,
        latitude: m.latitude,
        longitude: m.longitude,
        reservation_id: m.reservation_id.map(ReservationId::from),
    }
}

// ── BikeRepository impl ─────────────────────────────────────────

#[async_trait]
impl BikeRepository for SeaOrmBikeRepository {
    async fn find_all(&self) -> DomainResult<Vec<Bike>> {
        let models = bike::Entity::find()
            .order_by_asc(bike::Column::BikeId)
            .all(&self.db)
            .await
            .map_err(storage_error(bike::TABLE_NAME, "select"))?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_id(&self, bike_id: i32) -> DomainResult<Option<Bike>> {
        let model = gateway::select_one_where::<bike::Entity, _, _>(
            &self.db,
            bike::TABLE_NAME,
            bike::Column::BikeId,
            bike_id,
        )
        .await?;
        Ok(model.map(model_to_domain))
    }

    async fn set_reservation(
        &self,
        bike_id: i32,
        reservation_id: Option<&ReservationId>,
    ) -> DomainResult<()> {
        debug!("Linking bike {} to reservation {:?}", bike_id, reservation_id);

        let updated = gateway::update_column::<bike::Entity, _, _>(
            &self.db,
            bike::TABLE_NAME,
            bike::Column::ReservationId,
            reservation_id.map(|id| id.as_str().to_string()),
            Condition::all().add(bike::Column::BikeId.eq(bike_id)),
        )
        .await?;

        if updated == 0 {
            return Err(DomainError::unknown_bike(bike_id));
        }
        Ok(())
    }
}
