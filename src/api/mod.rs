//! REST API
//!
//! HTTP endpoints for listing bikes and managing reservations.

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use router::{create_api_router, ApiState};
