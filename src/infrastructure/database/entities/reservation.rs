//! Reservation entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const TABLE_NAME: &str = "reservation";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "reservationid")]
    pub reservation_id: String,

    /// One reservation per bike
    #[sea_orm(column_name = "bikeid", unique)]
    pub bike_id: i32,

    /// One reservation per user
    #[sea_orm(unique)]
    pub username: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::bike::Entity")]
    Bike,
}

impl Related<super::bike::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bike.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
