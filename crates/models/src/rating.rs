use sea_orm::{entity::prelude::*, sea_query::{Expr, OnConflict}, ConnectionTrait, FromQueryResult, QuerySelect, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{recipe, user};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ratings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub recipe_id: i32,
    pub user_id: i32,
    pub rating: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Recipe,
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Recipe => Entity::belongs_to(recipe::Entity).from(Column::RecipeId).to(recipe::Column::Id).into(),
            Relation::User => Entity::belongs_to(user::Entity).from(Column::UserId).to(user::Column::Id).into(),
        }
    }
}

impl Related<recipe::Entity> for Entity {
    fn to() -> RelationDef { Relation::Recipe.def() }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert-on-conflict-update keyed by the (recipe_id, user_id) unique index,
/// so concurrent submissions from one user can never produce two rows.
pub async fn upsert<C: ConnectionTrait>(db: &C, recipe_id: i32, user_id: i32, value: i32) -> Result<(), ModelError> {
    let am = ActiveModel {
        recipe_id: Set(recipe_id),
        user_id: Set(user_id),
        rating: Set(value),
        ..Default::default()
    };
    Entity::insert(am)
        .on_conflict(
            OnConflict::columns([Column::RecipeId, Column::UserId])
                .update_column(Column::Rating)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn find_for_user<C: ConnectionTrait>(db: &C, recipe_id: i32, user_id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::RecipeId.eq(recipe_id))
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await?)
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct AggregateRow {
    pub average: Option<f64>,
    pub count: i64,
}

/// Raw mean and count of a recipe's ratings; `average` is `None` when unrated.
pub async fn aggregate<C: ConnectionTrait>(db: &C, recipe_id: i32) -> Result<AggregateRow, ModelError> {
    let row = Entity::find()
        .select_only()
        .column_as(Expr::cust("AVG(CAST(ratings.rating AS DOUBLE PRECISION))"), "average")
        .column_as(Expr::cust("COUNT(ratings.id)"), "count")
        .filter(Column::RecipeId.eq(recipe_id))
        .into_model::<AggregateRow>()
        .one(db)
        .await?;
    Ok(row.unwrap_or(AggregateRow { average: None, count: 0 }))
}
