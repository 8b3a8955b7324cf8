//! Reservation domain entity

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a reservation: a UUID rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(String);

impl ReservationId {
    /// Fresh, globally unique identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for ReservationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user's claim on a bike. Created and deleted, never updated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: ReservationId,
    pub bike_id: i32,
    pub username: String,
}

impl Reservation {
    /// New reservation with a freshly generated ID
    pub fn new(bike_id: i32, username: impl Into<String>) -> Self {
        Self {
            id: ReservationId::generate(),
            bike_id,
            username: username.into(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
