pub mod bike;
pub mod repositories;
pub mod reservation;
pub mod user;

// Re-export commonly used types
pub use bike::{Bike, BikeRepository};
pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{Reservation, ReservationId, ReservationRepository};
pub use user::UserRepository;

// Re-export DomainError from support for convenience
pub use crate::support::errors::{DomainError, ErrorKind};
