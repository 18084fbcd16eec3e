use sea_orm::{
    entity::prelude::*,
    sea_query::{OnConflict, Query},
    ConnectionTrait, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::recipe;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe_images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub recipe_id: i32,
    #[sea_orm(column_type = "Blob")]
    #[serde(skip)]
    pub image: Vec<u8>,
    pub mime_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Recipe }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Recipe => Entity::belongs_to(recipe::Entity)
                .from(Column::RecipeId)
                .to(recipe::Column::Id)
                .into(),
        }
    }
}

impl Related<recipe::Entity> for Entity {
    fn to() -> RelationDef { Relation::Recipe.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert or replace the single image attached to a recipe.
pub async fn upsert<C: ConnectionTrait>(db: &C, recipe_id: i32, image: Vec<u8>, mime_type: &str) -> Result<(), ModelError> {
    let am = ActiveModel {
        recipe_id: Set(recipe_id),
        image: Set(image),
        mime_type: Set(mime_type.to_string()),
    };
    Entity::insert(am)
        .on_conflict(
            OnConflict::column(Column::RecipeId)
                .update_columns([Column::Image, Column::MimeType])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Insert or replace the image only if `owner_id` owns the recipe, as one
/// `INSERT .. SELECT .. ON CONFLICT` statement. Returns the rows written, 0 when
/// the recipe is missing or owned by someone else.
pub async fn upsert_owned<C: ConnectionTrait>(
    db: &C,
    recipe_id: i32,
    owner_id: i32,
    image: Vec<u8>,
    mime_type: &str,
) -> Result<u64, ModelError> {
    let owned = Query::select()
        .expr(Expr::val(recipe_id))
        .expr(Expr::val(image))
        .expr(Expr::val(mime_type))
        .from(recipe::Entity)
        .and_where(recipe::Column::Id.eq(recipe_id))
        .and_where(recipe::Column::UserId.eq(owner_id))
        .to_owned();
    let mut insert = Query::insert();
    insert
        .into_table(Entity)
        .columns([Column::RecipeId, Column::Image, Column::MimeType])
        .select_from(owned)
        .map_err(|e| ModelError::Db(e.to_string()))?
        .on_conflict(
            OnConflict::column(Column::RecipeId)
                .update_columns([Column::Image, Column::MimeType])
                .to_owned(),
        );
    let res = db.execute(db.get_database_backend().build(&insert)).await?;
    Ok(res.rows_affected())
}

pub async fn exists<C: ConnectionTrait>(db: &C, recipe_id: i32) -> Result<bool, ModelError> {
    let found = Entity::find_by_id(recipe_id)
        .select_only()
        .column(Column::RecipeId)
        .into_tuple::<i32>()
        .one(db)
        .await?;
    Ok(found.is_some())
}
