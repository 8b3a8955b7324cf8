//! Bike aggregate
//!
//! Contains the Bike entity and its repository interface.

pub mod model;
pub mod repository;

pub use model::Bike;
pub use repository::BikeRepository;
