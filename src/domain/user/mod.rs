//! User aggregate
//!
//! Users are only looked up for existence; no attributes beyond the username.

pub mod repository;

pub use repository::UserRepository;
