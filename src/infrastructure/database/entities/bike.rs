//! Bike entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const TABLE_NAME: &str = "bike";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bike")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "bikeid")]
    pub bike_id: i32,

    pub name: String,
    pub latitude: String,
    pub longitude: String,

    /// Set while the bike is rented; nulled by the database when the
    /// referenced reservation is deleted
    #[sea_orm(column_name = "reservationid", nullable, unique)]
    pub reservation_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::reservation::Entity",
        from = "Column::ReservationId",
        to = "super::reservation::Column::ReservationId",
        on_delete = "SetNull"
    )]
    Reservation,
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
