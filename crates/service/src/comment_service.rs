use chrono::{DateTime, Utc};
use configs::LengthBounds;
use sea_orm::{
    entity::prelude::DateTimeWithTimeZone, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use serde::Serialize;
use tracing::{debug, info, instrument};

use models::errors::ModelError;
use models::{comment, user};

use crate::context::CurrentUser;
use crate::errors::ServiceError;
use crate::validation::validate_comment;

/// A comment with its author's username.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub id: i32,
    pub content: String,
    pub user_id: i32,
    pub username: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(FromQueryResult)]
struct CommentRow {
    id: i32,
    content: String,
    user_id: i32,
    username: String,
    created_at: Option<DateTimeWithTimeZone>,
}

/// Store `content` trimmed; returns the new comment id.
#[instrument(skip(db, bounds, content), fields(user_id = actor.user_id))]
pub async fn add_comment(
    db: &DatabaseConnection,
    actor: CurrentUser,
    bounds: LengthBounds,
    recipe_id: i32,
    content: &str,
) -> Result<i32, ServiceError> {
    if recipe_id <= 0 {
        return Err(ServiceError::Validation("Recipe is required".into()));
    }
    let content = validate_comment(content, bounds)?;
    let created = match comment::create(db, recipe_id, actor.user_id, content).await {
        Ok(c) => c,
        Err(ModelError::ForeignKeyViolation(_)) => return Err(ServiceError::not_found("recipe")),
        Err(e) => return Err(e.into()),
    };
    info!(recipe_id, comment_id = created.id, "comment_added");
    Ok(created.id)
}

/// Author-only and scoped to the recipe; anything else is a silent no-op.
#[instrument(skip(db), fields(user_id = actor.user_id))]
pub async fn delete_comment(
    db: &DatabaseConnection,
    actor: CurrentUser,
    recipe_id: i32,
    comment_id: i32,
) -> Result<(), ServiceError> {
    let touched = comment::delete_owned(db, comment_id, recipe_id, actor.user_id).await?;
    if touched == 0 {
        debug!(recipe_id, comment_id, "comment_delete_noop");
    } else {
        info!(recipe_id, comment_id, "comment_deleted");
    }
    Ok(())
}

/// Oldest first.
pub async fn list_comments(db: &DatabaseConnection, recipe_id: i32) -> Result<Vec<CommentView>, ServiceError> {
    let rows = comment::Entity::find()
        .select_only()
        .column_as(comment::Column::Id, "id")
        .column_as(comment::Column::Content, "content")
        .column_as(comment::Column::UserId, "user_id")
        .column_as(user::Column::Username, "username")
        .column_as(comment::Column::CreatedAt, "created_at")
        .join(JoinType::InnerJoin, comment::Relation::User.def())
        .filter(comment::Column::RecipeId.eq(recipe_id))
        .order_by_asc(comment::Column::CreatedAt)
        .order_by_asc(comment::Column::Id)
        .into_model::<CommentRow>()
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|r| CommentView {
            id: r.id,
            content: r.content,
            user_id: r.user_id,
            username: r.username,
            created_at: r.created_at.map(|t| t.with_timezone(&Utc)),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, limits, recipe, user};

    #[tokio::test]
    async fn comments_are_trimmed_and_listed_in_order() -> anyhow::Result<()> {
        let db = get_db().await?;
        let alice = user(&db, "alice").await?;
        let bob = user(&db, "bobby").await?;
        let r = recipe(&db, alice, "Soup", 3).await?;
        let bounds = limits().comment;

        let first = add_comment(&db, bob, bounds, r, "  Lovely!  ").await?;
        let second = add_comment(&db, alice, bounds, r, "Thanks").await?;

        let listed = list_comments(&db, r).await?;
        assert_eq!(listed.iter().map(|c| c.id).collect::<Vec<_>>(), vec![first, second]);
        assert_eq!(listed[0].content, "Lovely!");
        assert_eq!(listed[0].username, "bobby");
        assert!(listed[0].created_at.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn blank_or_oversized_comments_are_rejected() -> anyhow::Result<()> {
        let db = get_db().await?;
        let alice = user(&db, "alice").await?;
        let r = recipe(&db, alice, "Soup", 3).await?;
        let bounds = limits().comment;

        assert!(matches!(add_comment(&db, alice, bounds, r, "   ").await, Err(ServiceError::Validation(_))));
        let long = "a".repeat(bounds.max + 1);
        assert!(matches!(add_comment(&db, alice, bounds, r, &long).await, Err(ServiceError::Validation(_))));
        assert!(matches!(add_comment(&db, alice, bounds, 0, "hi").await, Err(ServiceError::Validation(_))));
        assert!(list_comments(&db, r).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn comment_on_missing_recipe_is_not_found() -> anyhow::Result<()> {
        let db = get_db().await?;
        let alice = user(&db, "alice").await?;
        let err = add_comment(&db, alice, limits().comment, 404, "hello").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn only_author_deletes_and_only_within_recipe() -> anyhow::Result<()> {
        let db = get_db().await?;
        let alice = user(&db, "alice").await?;
        let bob = user(&db, "bobby").await?;
        let r1 = recipe(&db, alice, "Soup", 3).await?;
        let r2 = recipe(&db, alice, "Stew", 3).await?;
        let c = add_comment(&db, bob, limits().comment, r1, "Nice").await?;

        delete_comment(&db, alice, r1, c).await?;
        delete_comment(&db, bob, r2, c).await?;
        assert_eq!(list_comments(&db, r1).await?.len(), 1);

        delete_comment(&db, bob, r1, c).await?;
        assert!(list_comments(&db, r1).await?.is_empty());
        delete_comment(&db, bob, r1, c).await?;
        Ok(())
    }
}
