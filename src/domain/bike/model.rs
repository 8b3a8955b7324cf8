//! Bike domain entity

use crate::domain::reservation::ReservationId;

/// A shared eBike.
///
/// Bikes are provisioned out of band; the reservation reference is the only
/// field this service changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bike {
    /// Storage-assigned identifier
    pub id: i32,
    pub name: String,
    /// Stored verbatim, never parsed
    pub latitude: String,
    /// Stored verbatim, never parsed
    pub longitude: String,
    /// Active reservation, `None` when the bike is available
    pub reservation_id: Option<ReservationId>,
}

impl Bike {
    pub fn new(
        id: i32,
        name: impl Into<String>,
        latitude: impl Into<String>,
        longitude: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            latitude: latitude.into(),
            longitude: longitude.into(),
            reservation_id: None,
        }
    }

    pub fn is_rented(&self) -> bool {
        self.reservation_id.is_some()
    }

    pub fn is_available(&self) -> bool {
        !self.is_rented()
    }

    /// A record with no name and no coordinates carries no information and
    /// is treated as "no such bike".
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.latitude.is_empty() && self.longitude.is_empty()
    }
}
