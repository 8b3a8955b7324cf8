//! Application services

mod rental;

pub use rental::{RentalService, WriteMode};
