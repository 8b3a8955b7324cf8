//! User entity for database

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const TABLE_NAME: &str = "users";

/// Registered user. Only presence matters to the rental flow.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
