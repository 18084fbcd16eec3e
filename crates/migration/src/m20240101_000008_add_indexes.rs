use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Recipes: owner lookups (account page) and category filter
        manager
            .create_index(
                Index::create()
                    .name("idx_recipes_user")
                    .table(Recipes::Table)
                    .col(Recipes::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_recipes_category")
                    .table(Recipes::Table)
                    .col(Recipes::CategoryId)
                    .to_owned(),
            )
            .await?;

        // Comments: listed per recipe
        manager
            .create_index(
                Index::create()
                    .name("idx_comments_recipe")
                    .table(Comments::Table)
                    .col(Comments::RecipeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_recipes_user").table(Recipes::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_recipes_category").table(Recipes::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_comments_recipe").table(Comments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Recipes { Table, UserId, CategoryId }

#[derive(DeriveIden)]
enum Comments { Table, RecipeId }
