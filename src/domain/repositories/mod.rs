//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::bike::BikeRepository;
use super::reservation::ReservationRepository;
use super::user::UserRepository;
use crate::support::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let bike = repos.bikes().find_by_id(1).await?;
///     let held = repos.reservations().find_by_username("alice").await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn bikes(&self) -> &dyn BikeRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn users(&self) -> &dyn UserRepository;
}
