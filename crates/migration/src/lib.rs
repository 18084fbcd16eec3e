//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users;
mod m20240101_000002_create_categories;
mod m20240101_000003_create_recipes;
mod m20240101_000004_create_recipe_images;
mod m20240101_000005_create_ratings;
mod m20240101_000006_create_comments;
mod m20240101_000007_create_visits;
mod m20240101_000008_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users::Migration),
            Box::new(m20240101_000002_create_categories::Migration),
            Box::new(m20240101_000003_create_recipes::Migration),
            Box::new(m20240101_000004_create_recipe_images::Migration),
            Box::new(m20240101_000005_create_ratings::Migration),
            Box::new(m20240101_000006_create_comments::Migration),
            Box::new(m20240101_000007_create_visits::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000008_add_indexes::Migration),
        ]
    }
}
