//! User repository interface

use async_trait::async_trait;

use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Whether a user with this username is registered
    async fn exists(&self, username: &str) -> DomainResult<bool>;
}
