//! Create `recipes` table with FKs to `users` and `categories`.
//!
//! The category reference is a hard foreign key; deleting a category that is
//! still in use is refused.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(pk_auto(Recipes::Id))
                    .col(string_len(Recipes::Name, 255).not_null())
                    .col(text(Recipes::Ingredients).not_null())
                    .col(text(Recipes::Directions).not_null())
                    .col(integer(Recipes::UserId).not_null())
                    .col(integer(Recipes::CategoryId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipes_user")
                            .from(Recipes::Table, Recipes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipes_category")
                            .from(Recipes::Table, Recipes::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Recipes::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Recipes { Table, Id, Name, Ingredients, Directions, UserId, CategoryId }

#[derive(DeriveIden)]
enum Users { Table, Id }

#[derive(DeriveIden)]
enum Categories { Table, Id }
