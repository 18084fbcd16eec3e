#![cfg(test)]
use configs::{DatabaseConfig, Limits};
use migration::MigratorTrait;
use models::recipe::{self, RecipeFields};
use models::user;
use sea_orm::DatabaseConnection;

use crate::context::CurrentUser;

/// Fresh migrated in-memory database; every call gets its own.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = models::db::connect_with_config(&DatabaseConfig::in_memory()).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn limits() -> Limits { Limits::default() }

/// Inserts a user with a placeholder hash; auth tests hash for real.
pub async fn user(db: &DatabaseConnection, username: &str) -> Result<CurrentUser, anyhow::Error> {
    let created = user::create(db, username, "not-a-real-hash").await?;
    Ok(CurrentUser::new(created.id))
}

pub fn fields(name: &str, category_id: i32) -> RecipeFields {
    RecipeFields {
        name: name.to_string(),
        ingredients: "2 eggs, 1 cup flour".to_string(),
        directions: "Whisk, rest, then cook.".to_string(),
        category_id,
    }
}

/// Inserts a recipe directly, bypassing validation.
pub async fn recipe(db: &DatabaseConnection, owner: CurrentUser, name: &str, category_id: i32) -> Result<i32, anyhow::Error> {
    Ok(recipe::create(db, owner.user_id, &fields(name, category_id)).await?.id)
}

pub const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
pub const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
