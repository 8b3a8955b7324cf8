//! API Handlers

pub mod bikes;
pub mod health;
pub mod metrics;
pub mod reservations;

use std::sync::Arc;

use crate::application::RentalService;

/// State shared by the rental handlers
#[derive(Clone)]
pub struct RentalState {
    pub rental: Arc<RentalService>,
}
