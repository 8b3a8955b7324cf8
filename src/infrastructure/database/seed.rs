//! Optional demo data
//!
//! Bikes and users are normally provisioned out of band. For local runs the
//! `[seed]` config section fills empty tables once.

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use tracing::info;

use crate::config::SeedSettings;
use crate::infrastructure::database::entities::{bike, user};

/// Insert configured users and bikes into tables that are still empty.
/// Returns `(users_inserted, bikes_inserted)`.
pub async fn seed_if_empty(
    db: &DatabaseConnection,
    seed: &SeedSettings,
) -> Result<(usize, usize), sea_orm::DbErr> {
    let mut users_inserted = 0;
    if !seed.users.is_empty() && user::Entity::find().count(db).await? == 0 {
        for username in &seed.users {
            user::ActiveModel {
                username: Set(username.clone()),
            }
            .insert(db)
            .await?;
            users_inserted += 1;
        }
        info!("Seeded {} users", users_inserted);
    }

    let mut bikes_inserted = 0;
    if !seed.bikes.is_empty() && bike::Entity::find().count(db).await? == 0 {
        for b in &seed.bikes {
            bike::ActiveModel {
                name: Set(b.name.clone()),
                latitude: Set(b.latitude.clone()),
                longitude: Set(b.longitude.clone()),
                reservation_id: Set(None),
                ..Default::default()
            }
            .insert(db)
            .await?;
            bikes_inserted += 1;
        }
        info!("Seeded {} bikes", bikes_inserted);
    }

    Ok((users_inserted, bikes_inserted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeedBike;
    use crate::infrastructure::database::test_database;

    fn demo() -> SeedSettings {
        SeedSettings {
            users: vec!["alice".into(), "bob".into()],
            bikes: vec![SeedBike {
                name: "Alpha".into(),
                latitude: "52.0".into(),
                longitude: "13.0".into(),
            }],
        }
    }

    #[tokio::test]
    async fn seeds_empty_tables_once() {
        let db = test_database().await;

        assert_eq!(seed_if_empty(&db, &demo()).await.unwrap(), (2, 1));
        assert_eq!(seed_if_empty(&db, &demo()).await.unwrap(), (0, 0));

        let alpha = bike::Entity::find_by_id(1).one(&db).await.unwrap().unwrap();
        assert_eq!(alpha.name, "Alpha");
        assert!(alpha.reservation_id.is_none());
    }
}
