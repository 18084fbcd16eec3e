use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{category, comment, rating, recipe_image, user};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub ingredients: String,
    #[sea_orm(column_type = "Text")]
    pub directions: String,
    pub user_id: i32,
    pub category_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Category,
    Image,
    Ratings,
    Comments,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity).from(Column::UserId).to(user::Column::Id).into(),
            Relation::Category => Entity::belongs_to(category::Entity).from(Column::CategoryId).to(category::Column::Id).into(),
            Relation::Image => Entity::has_one(recipe_image::Entity).into(),
            Relation::Ratings => Entity::has_many(rating::Entity).into(),
            Relation::Comments => Entity::has_many(comment::Entity).into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef { Relation::Category.def() }
}

impl Related<recipe_image::Entity> for Entity {
    fn to() -> RelationDef { Relation::Image.def() }
}

impl Related<rating::Entity> for Entity {
    fn to() -> RelationDef { Relation::Ratings.def() }
}

impl Related<comment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Comments.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Editable columns of a recipe. The owner is fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFields {
    pub name: String,
    pub ingredients: String,
    pub directions: String,
    pub category_id: i32,
}

pub async fn create<C: ConnectionTrait>(db: &C, owner_id: i32, fields: &RecipeFields) -> Result<Model, ModelError> {
    let am = ActiveModel {
        name: Set(fields.name.clone()),
        ingredients: Set(fields.ingredients.clone()),
        directions: Set(fields.directions.clone()),
        user_id: Set(owner_id),
        category_id: Set(fields.category_id),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Single conditioned UPDATE; returns the number of rows touched (0 when the
/// recipe is missing or owned by someone else).
pub async fn update_owned<C: ConnectionTrait>(db: &C, id: i32, owner_id: i32, fields: &RecipeFields) -> Result<u64, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Name, Expr::value(fields.name.clone()))
        .col_expr(Column::Ingredients, Expr::value(fields.ingredients.clone()))
        .col_expr(Column::Directions, Expr::value(fields.directions.clone()))
        .col_expr(Column::CategoryId, Expr::value(fields.category_id))
        .filter(Column::Id.eq(id))
        .filter(Column::UserId.eq(owner_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

/// Single conditioned DELETE; image, ratings and comments go with it via FK cascade.
pub async fn delete_owned<C: ConnectionTrait>(db: &C, id: i32, owner_id: i32) -> Result<u64, ModelError> {
    let res = Entity::delete_many()
        .filter(Column::Id.eq(id))
        .filter(Column::UserId.eq(owner_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn owner_of<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<i32>, ModelError> {
    let owner = Entity::find_by_id(id)
        .select_only()
        .column(Column::UserId)
        .into_tuple::<i32>()
        .one(db)
        .await?;
    Ok(owner)
}

pub async fn list_by_owner<C: ConnectionTrait>(db: &C, owner_id: i32) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(owner_id))
        .order_by_desc(Column::Id)
        .all(db)
        .await?)
}
