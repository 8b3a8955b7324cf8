//! API Data Transfer Objects

mod bike;
mod common;
mod reservation;

pub use bike::*;
pub use common::*;
pub use reservation::*;
