//! Bike DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Bike;

/// A bike as shown to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BikeDto {
    pub bike_id: i32,
    pub name: String,
    pub latitude: String,
    pub longitude: String,
    /// `true` while the bike has an active reservation
    pub rented: bool,
}

impl BikeDto {
    /// Project storage records for a response, dropping blank ones.
    pub fn project(bikes: impl IntoIterator<Item = Bike>) -> Vec<Self> {
        bikes
            .into_iter()
            .filter(|b| !b.is_blank())
            .map(Self::from)
            .collect()
    }
}

impl From<Bike> for BikeDto {
    fn from(bike: Bike) -> Self {
        Self {
            bike_id: bike.id,
            rented: bike.is_rented(),
            name: bike.name,
            latitude: bike.latitude,
            longitude: bike.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReservationId;

    #[test]
    fn rented_follows_reservation_reference() {
        let mut bike = Bike::new(1, "Alpha", "52.0", "13.0");
        assert!(!BikeDto::from(bike.clone()).rented);

        bike.reservation_id = Some(ReservationId::generate());
        assert!(BikeDto::from(bike).rented);
    }

    #[test]
    fn blank_records_are_dropped() {
        let bikes = vec![Bike::new(1, "Alpha", "52.0", "13.0"), Bike::new(0, "", "", "")];
        let projected = BikeDto::project(bikes);
        assert_eq!(projected.len(), 1);
        assert_eq!(projected[0].bike_id, 1);
    }

    #[test]
    fn serializes_with_camel_case_id() {
        let json = serde_json::to_value(BikeDto::from(Bike::new(7, "Gamma", "1", "2"))).unwrap();
        assert_eq!(json["bikeId"], 7);
        assert_eq!(json["rented"], false);
    }
}
