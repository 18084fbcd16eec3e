//! Create `recipe_images` table: at most one cover image per recipe.
//!
//! `recipe_id` is the primary key, so re-uploads replace the row in place.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RecipeImages::Table)
                    .if_not_exists()
                    .col(integer(RecipeImages::RecipeId).primary_key())
                    .col(ColumnDef::new(RecipeImages::Image).blob().not_null())
                    .col(string_len(RecipeImages::MimeType, 64).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_images_recipe")
                            .from(RecipeImages::Table, RecipeImages::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(RecipeImages::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum RecipeImages { Table, RecipeId, Image, MimeType }

#[derive(DeriveIden)]
enum Recipes { Table, Id }
