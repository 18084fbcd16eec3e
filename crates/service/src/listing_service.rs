//! Read side: search/filter/paginate, top-rated recipes, categories.

use sea_orm::{
    sea_query::{Alias, Expr, Func, LikeExpr, Order},
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
};
use serde::Serialize;
use tracing::debug;

use models::{category, recipe, user};

use crate::errors::ServiceError;
use crate::pagination::{Page, Pagination};
use crate::rating_service::round_one_decimal;

/// Recipes shown on the home page.
pub const TOP_RECIPES_DEFAULT: u64 = 3;

/// A recipe row with its owner's username and category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct RecipeSummary {
    pub id: i32,
    pub name: String,
    pub ingredients: String,
    pub directions: String,
    pub user_id: i32,
    pub username: String,
    pub category_id: i32,
    pub category_name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromQueryResult)]
pub struct TopRecipe {
    pub id: i32,
    pub name: String,
    pub user_id: i32,
    pub username: String,
    pub category_id: i32,
    pub category_name: String,
    pub avg_rating: f64,
    pub ratings_count: i64,
}

/// Listing filters as they arrive from a query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecipeQuery {
    pub search: Option<String>,
    pub category_id: Option<i32>,
}

impl RecipeQuery {
    /// Blank search terms and non-numeric categories are dropped.
    pub fn from_params(search: Option<&str>, category: Option<&str>) -> Self {
        let search = search.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        let category_id = category.and_then(|c| c.trim().parse::<i32>().ok());
        Self { search, category_id }
    }

    fn condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(term) = &self.search {
            let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
            let mut any = Condition::any();
            for col in [recipe::Column::Name, recipe::Column::Ingredients, recipe::Column::Directions] {
                any = any.add(
                    Expr::expr(Func::lower(Expr::col((recipe::Entity, col))))
                        .like(LikeExpr::new(pattern.clone()).escape('\\')),
                );
            }
            cond = cond.add(any);
        }
        if let Some(category_id) = self.category_id {
            cond = cond.add(recipe::Column::CategoryId.eq(category_id));
        }
        cond
    }
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn summary_select() -> Select<recipe::Entity> {
    recipe::Entity::find()
        .select_only()
        .column_as(recipe::Column::Id, "id")
        .column_as(recipe::Column::Name, "name")
        .column_as(recipe::Column::Ingredients, "ingredients")
        .column_as(recipe::Column::Directions, "directions")
        .column_as(recipe::Column::UserId, "user_id")
        .column_as(user::Column::Username, "username")
        .column_as(recipe::Column::CategoryId, "category_id")
        .column_as(category::Column::Name, "category_name")
        .join(JoinType::InnerJoin, recipe::Relation::User.def())
        .join(JoinType::InnerJoin, recipe::Relation::Category.def())
}

pub(crate) async fn find_summary(db: &DatabaseConnection, recipe_id: i32) -> Result<Option<RecipeSummary>, ServiceError> {
    Ok(summary_select()
        .filter(recipe::Column::Id.eq(recipe_id))
        .into_model::<RecipeSummary>()
        .one(db)
        .await?)
}

/// Newest first; out-of-range pages resolve to the nearest valid page.
pub async fn list_recipes(
    db: &DatabaseConnection,
    query: &RecipeQuery,
    pagination: Pagination,
) -> Result<Page<RecipeSummary>, ServiceError> {
    let cond = query.condition();
    let total = recipe::Entity::find().filter(cond.clone()).count(db).await?;
    let window = pagination.window(total);
    debug!(total, page = window.page, total_pages = window.total_pages, "recipe_listing");

    let items = summary_select()
        .filter(cond)
        .order_by_desc(recipe::Column::Id)
        .offset(window.offset)
        .limit(window.limit)
        .into_model::<RecipeSummary>()
        .all(db)
        .await?;
    Ok(Page { items, total_count: total, total_pages: window.total_pages, page: window.page })
}

/// Ordered by mean rating (unrated counts as 0), then rating count, then newest.
pub async fn top_recipes(db: &DatabaseConnection, limit: u64) -> Result<Vec<TopRecipe>, ServiceError> {
    let rows = recipe::Entity::find()
        .select_only()
        .column_as(recipe::Column::Id, "id")
        .column_as(recipe::Column::Name, "name")
        .column_as(recipe::Column::UserId, "user_id")
        .column_as(user::Column::Username, "username")
        .column_as(recipe::Column::CategoryId, "category_id")
        .column_as(category::Column::Name, "category_name")
        .column_as(Expr::cust("COALESCE(AVG(CAST(ratings.rating AS DOUBLE PRECISION)), 0.0)"), "avg_rating")
        .column_as(Expr::cust("COUNT(ratings.id)"), "ratings_count")
        .join(JoinType::InnerJoin, recipe::Relation::User.def())
        .join(JoinType::InnerJoin, recipe::Relation::Category.def())
        .join(JoinType::LeftJoin, recipe::Relation::Ratings.def())
        .group_by(recipe::Column::Id)
        .group_by(user::Column::Username)
        .group_by(category::Column::Name)
        .order_by(Expr::col(Alias::new("avg_rating")), Order::Desc)
        .order_by(Expr::col(Alias::new("ratings_count")), Order::Desc)
        .order_by_desc(recipe::Column::Id)
        .limit(limit)
        .into_model::<TopRecipe>()
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|r| TopRecipe { avg_rating: round_one_decimal(r.avg_rating), ..r })
        .collect())
}

pub async fn categories(db: &DatabaseConnection) -> Result<Vec<category::Model>, ServiceError> {
    Ok(category::list_by_name(db).await?)
}
