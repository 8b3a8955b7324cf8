//! Reservation aggregate
//!
//! Contains the Reservation entity, its identifier type, and repository interface.

pub mod model;
pub mod repository;

pub use model::{Reservation, ReservationId};
pub use repository::ReservationRepository;
