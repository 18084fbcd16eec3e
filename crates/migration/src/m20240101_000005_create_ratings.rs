//! Create `ratings` table.
//!
//! The composite unique index on (recipe_id, user_id) is the target of the
//! rating upsert; it is created here rather than with the other indexes so the
//! table is never usable without it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ratings::Table)
                    .if_not_exists()
                    .col(pk_auto(Ratings::Id))
                    .col(integer(Ratings::RecipeId).not_null())
                    .col(integer(Ratings::UserId).not_null())
                    .col(integer(Ratings::Rating).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ratings_recipe")
                            .from(Ratings::Table, Ratings::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ratings_user")
                            .from(Ratings::Table, Ratings::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_ratings_recipe_user")
                    .table(Ratings::Table)
                    .col(Ratings::RecipeId)
                    .col(Ratings::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_ratings_recipe_user").table(Ratings::Table).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(Ratings::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Ratings { Table, Id, RecipeId, UserId, Rating }

#[derive(DeriveIden)]
enum Recipes { Table, Id }

#[derive(DeriveIden)]
enum Users { Table, Id }
