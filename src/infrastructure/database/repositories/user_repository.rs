//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::domain::user::UserRepository;
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::user;
use crate::infrastructure::database::gateway;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn exists(&self, username: &str) -> DomainResult<bool> {
        let found = gateway::select_one_where::<user::Entity, _, _>(
            &self.db,
            user::TABLE_NAME,
            user::Column::Username,
            username,
        )
        .await?;
        Ok(found.is_some())
    }
}
