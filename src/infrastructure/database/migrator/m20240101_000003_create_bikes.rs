//! Create bike table
//!
//! `reservationid` references the reservation row and is nulled when that
//! row is deleted, so returning a bike is a single delete.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_reservations::Reservation;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bike::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bike::BikeId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bike::Name).string().not_null())
                    .col(ColumnDef::new(Bike::Latitude).string().not_null())
                    .col(ColumnDef::new(Bike::Longitude).string().not_null())
                    .col(ColumnDef::new(Bike::ReservationId).string().null().unique_key())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bike_reservation")
                            .from(Bike::Table, Bike::ReservationId)
                            .to(Reservation::Table, Reservation::ReservationId)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bike::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bike {
    Table,
    #[iden = "bikeid"]
    BikeId,
    Name,
    Latitude,
    Longitude,
    #[iden = "reservationid"]
    ReservationId,
}
