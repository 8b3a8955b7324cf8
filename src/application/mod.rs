pub mod services;

pub use services::{RentalService, WriteMode};
