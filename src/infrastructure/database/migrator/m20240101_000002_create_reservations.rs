//! Create reservation table
//!
//! The unique indexes on `username` and `bikeid` are what actually stops two
//! concurrent requests from both winning; the application-level checks race.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservation::ReservationId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservation::BikeId).integer().not_null())
                    .col(ColumnDef::new(Reservation::Username).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservation_username")
                    .table(Reservation::Table)
                    .col(Reservation::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservation_bikeid")
                    .table(Reservation::Table)
                    .col(Reservation::BikeId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservation::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservation {
    Table,
    #[iden = "reservationid"]
    ReservationId,
    #[iden = "bikeid"]
    BikeId,
    Username,
}
