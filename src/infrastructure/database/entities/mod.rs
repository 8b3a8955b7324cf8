//! Database entities module
//!
//! Table and column names live here and nowhere else.

pub mod bike;
pub mod reservation;
pub mod user;

pub use bike::Entity as Bike;
pub use reservation::Entity as Reservation;
pub use user::Entity as User;

#[cfg(test)]
mod tests {
    use sea_orm::{EntityName, IdenStatic};

    use super::*;

    #[test]
    fn table_name_constants_match_entities() {
        assert_eq!(Bike.table_name(), bike::TABLE_NAME);
        assert_eq!(Reservation.table_name(), reservation::TABLE_NAME);
        assert_eq!(User.table_name(), user::TABLE_NAME);
    }

    #[test]
    fn column_names_follow_the_schema() {
        assert_eq!(bike::Column::BikeId.as_str(), "bikeid");
        assert_eq!(bike::Column::ReservationId.as_str(), "reservationid");
        assert_eq!(reservation::Column::ReservationId.as_str(), "reservationid");
        assert_eq!(reservation::Column::BikeId.as_str(), "bikeid");
        assert_eq!(user::Column::Username.as_str(), "username");
    }
}
