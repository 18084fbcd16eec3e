//! Recipe mutations (create, update, delete, cover replacement) and the
//! single-recipe read side.
//!
//! Mutations by someone other than the owner are expressed as conditioned
//! statements: update reports `NotFound`, delete is a silent no-op.

use configs::Limits;
use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use models::errors::ModelError;
use models::recipe::{self, RecipeFields};
use models::{category, recipe_image};

use crate::context::CurrentUser;
use crate::errors::ServiceError;
use crate::images::{self, ImageUpload};
use crate::listing_service::{self, RecipeSummary};
use crate::rating_service::{self, RatingSummary};
use crate::validation::validate_recipe_fields;

/// Everything the recipe page shows besides comments.
#[derive(Clone, Debug, Serialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: RecipeSummary,
    pub has_image: bool,
    pub rating: RatingSummary,
}

/// Cover bytes plus the MIME type to serve them with.
#[derive(Clone, Debug)]
pub struct StoredImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

fn require_id(recipe_id: i32) -> Result<(), ServiceError> {
    if recipe_id <= 0 {
        return Err(ServiceError::InvalidInput("recipe id must be a positive integer".into()));
    }
    Ok(())
}

fn category_violation(e: ModelError) -> ServiceError {
    match e {
        ModelError::ForeignKeyViolation(_) => ServiceError::InvalidCategory,
        other => other.into(),
    }
}

/// Create a recipe owned by `actor`, optionally with a cover image.
///
/// Checks run in order and the first failure is returned: category, image
/// size, image signature, field minimums, field maximums. The recipe row and
/// its image are written in one transaction.
#[instrument(skip(db, limits, fields, image), fields(user_id = actor.user_id, category_id = fields.category_id))]
pub async fn create_recipe(
    db: &DatabaseConnection,
    actor: CurrentUser,
    limits: &Limits,
    fields: RecipeFields,
    image: Option<ImageUpload>,
) -> Result<i32, ServiceError> {
    if !category::exists(db, fields.category_id).await? {
        return Err(ServiceError::InvalidCategory);
    }
    let image = match image {
        Some(upload) => {
            let format = images::inspect(&upload.bytes)?;
            if let Some(declared) = upload.declared_type.as_deref() {
                if declared != format.mime_type() {
                    debug!(declared, sniffed = format.mime_type(), "declared_type_ignored");
                }
            }
            Some((upload.bytes, format))
        }
        None => None,
    };
    validate_recipe_fields(&fields, limits)?;

    let txn = db.begin().await?;
    let created = recipe::create(&txn, actor.user_id, &fields).await.map_err(category_violation)?;
    if let Some((bytes, format)) = image {
        recipe_image::upsert(&txn, created.id, bytes, format.mime_type()).await?;
    }
    txn.commit().await?;

    info!(recipe_id = created.id, "recipe_created");
    Ok(created.id)
}

fn stripped(fields: RecipeFields) -> RecipeFields {
    RecipeFields {
        name: fields.name.trim().to_string(),
        ingredients: fields.ingredients.trim().to_string(),
        directions: fields.directions.trim().to_string(),
        category_id: fields.category_id,
    }
}

/// Overwrite the editable fields of an owned recipe. Unlike create, the text
/// fields are stripped before validation and storage.
#[instrument(skip(db, limits, fields), fields(user_id = actor.user_id))]
pub async fn update_recipe(
    db: &DatabaseConnection,
    actor: CurrentUser,
    limits: &Limits,
    recipe_id: i32,
    fields: RecipeFields,
) -> Result<(), ServiceError> {
    require_id(recipe_id)?;
    let fields = stripped(fields);
    validate_recipe_fields(&fields, limits)?;
    if !category::exists(db, fields.category_id).await? {
        return Err(ServiceError::InvalidCategory);
    }
    let touched = recipe::update_owned(db, recipe_id, actor.user_id, &fields)
        .await
        .map_err(category_violation)?;
    if touched == 0 {
        warn!(recipe_id, "update_not_applied");
        return Err(ServiceError::not_found("recipe"));
    }
    info!(recipe_id, "recipe_updated");
    Ok(())
}

/// Idempotent: deleting a missing or foreign recipe succeeds without effect.
#[instrument(skip(db), fields(user_id = actor.user_id))]
pub async fn delete_recipe(db: &DatabaseConnection, actor: CurrentUser, recipe_id: i32) -> Result<(), ServiceError> {
    require_id(recipe_id)?;
    let touched = recipe::delete_owned(db, recipe_id, actor.user_id).await?;
    if touched == 0 {
        debug!(recipe_id, "delete_noop");
    } else {
        info!(recipe_id, "recipe_deleted");
    }
    Ok(())
}

/// Replace (or add) the cover of an owned recipe.
#[instrument(skip(db, upload), fields(user_id = actor.user_id, size = upload.bytes.len()))]
pub async fn replace_image(
    db: &DatabaseConnection,
    actor: CurrentUser,
    recipe_id: i32,
    upload: ImageUpload,
) -> Result<(), ServiceError> {
    require_id(recipe_id)?;
    let format = images::inspect(&upload.bytes)?;

    let written = recipe_image::upsert_owned(db, recipe_id, actor.user_id, upload.bytes, format.mime_type()).await?;
    if written == 0 {
        warn!(recipe_id, "image_replace_not_applied");
        return Err(ServiceError::not_found("recipe"));
    }

    info!(recipe_id, mime_type = format.mime_type(), "recipe_image_replaced");
    Ok(())
}

pub async fn get_recipe(db: &DatabaseConnection, recipe_id: i32) -> Result<RecipeDetail, ServiceError> {
    let recipe = listing_service::find_summary(db, recipe_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("recipe"))?;
    let has_image = recipe_image::exists(db, recipe_id).await?;
    let rating = rating_service::average(db, recipe_id).await?;
    Ok(RecipeDetail { recipe, has_image, rating })
}

/// Stored cover for serving; legacy octet-stream rows are re-sniffed.
pub async fn recipe_image(db: &DatabaseConnection, recipe_id: i32) -> Result<StoredImage, ServiceError> {
    let row = recipe_image::Entity::find_by_id(recipe_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("image"))?;
    let mime_type = images::served_mime_type(&row.mime_type, &row.image);
    Ok(StoredImage { bytes: row.image, mime_type })
}

/// The account page: the caller's recipes, newest first.
pub async fn recipes_by_owner(db: &DatabaseConnection, owner: CurrentUser) -> Result<Vec<recipe::Model>, ServiceError> {
    Ok(recipe::list_by_owner(db, owner.user_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fields, get_db, limits, recipe, user, JPEG_HEADER, PNG_HEADER};
    use sea_orm::PaginatorTrait;

    fn upload(bytes: &[u8], declared: &str) -> Option<ImageUpload> {
        Some(ImageUpload { bytes: bytes.to_vec(), declared_type: Some(declared.to_string()) })
    }

    #[tokio::test]
    async fn create_then_update_round_trips() -> anyhow::Result<()> {
        let db = get_db().await?;
        let alice = user(&db, "alice").await?;
        let id = create_recipe(&db, alice, &limits(), fields("Pancakes", 1), None).await?;

        let new = RecipeFields {
            name: "  Crepes ".into(),
            ingredients: "milk, flour, eggs".into(),
            directions: "Thin batter, hot pan.".into(),
            category_id: 4,
        };
        update_recipe(&db, alice, &limits(), id, new.clone()).await?;

        let stored = recipe::Entity::find_by_id(id).one(&db).await?.unwrap();
        assert_eq!(stored.name, "Crepes");
        assert_eq!(stored.ingredients, new.ingredients);
        assert_eq!(stored.directions, new.directions);
        assert_eq!(stored.category_id, 4);
        assert_eq!(stored.user_id, alice.user_id);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_category_is_checked_first() -> anyhow::Result<()> {
        let db = get_db().await?;
        let alice = user(&db, "alice").await?;
        let mut bad = fields("x", 99);
        bad.ingredients = String::new();
        let err = create_recipe(&db, alice, &limits(), bad, upload(b"nope", "image/png")).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCategory));
        Ok(())
    }

    #[tokio::test]
    async fn image_is_checked_before_fields() -> anyhow::Result<()> {
        let db = get_db().await?;
        let alice = user(&db, "alice").await?;
        let err = create_recipe(&db, alice, &limits(), fields("x", 1), upload(b"plain text", "image/jpeg"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::UnsupportedImageFormat));

        let huge = vec![0xFF; images::MAX_IMAGE_BYTES + 1];
        let err = create_recipe(&db, alice, &limits(), fields("Pancakes", 1), upload(&huge, "image/jpeg"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ImageTooLarge { .. }));
        assert_eq!(recipe::Entity::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn sniffed_type_is_stored_not_declared() -> anyhow::Result<()> {
        let db = get_db().await?;
        let alice = user(&db, "alice").await?;
        let id = create_recipe(&db, alice, &limits(), fields("Pancakes", 1), upload(JPEG_HEADER, "image/png")).await?;
        let img = recipe_image(&db, id).await?;
        assert_eq!(img.mime_type, "image/jpeg");
        assert_eq!(img.bytes, JPEG_HEADER);
        Ok(())
    }

    #[tokio::test]
    async fn field_errors_name_the_first_failing_field() -> anyhow::Result<()> {
        let db = get_db().await?;
        let alice = user(&db, "alice").await?;
        let mut f = fields("  ab  ", 1);
        f.directions = String::new();
        match create_recipe(&db, alice, &limits(), f, None).await {
            Err(ServiceError::Validation(msg)) => assert!(msg.contains("name"), "{msg}"),
            other => panic!("unexpected: {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn update_of_foreign_or_missing_recipe_is_not_found() -> anyhow::Result<()> {
        let db = get_db().await?;
        let alice = user(&db, "alice").await?;
        let bob = user(&db, "bobby").await?;
        let id = recipe(&db, bob, "Bob's stew", 3).await?;

        let err = update_recipe(&db, alice, &limits(), id, fields("Stolen stew", 3)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        let err = update_recipe(&db, alice, &limits(), 4242, fields("Ghost stew", 3)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        let err = update_recipe(&db, alice, &limits(), 0, fields("Zero stew", 3)).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let stored = recipe::Entity::find_by_id(id).one(&db).await?.unwrap();
        assert_eq!(stored.name, "Bob's stew");
        Ok(())
    }

    #[tokio::test]
    async fn update_validates_fields_before_category() -> anyhow::Result<()> {
        let db = get_db().await?;
        let alice = user(&db, "alice").await?;
        let id = recipe(&db, alice, "Soup", 3).await?;
        let err = update_recipe(&db, alice, &limits(), id, fields("x", 99)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = update_recipe(&db, alice, &limits(), id, fields("Soup", 99)).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCategory));
        Ok(())
    }

    #[tokio::test]
    async fn update_strips_before_measuring_maximums() -> anyhow::Result<()> {
        let db = get_db().await?;
        let alice = user(&db, "alice").await?;
        let id = recipe(&db, alice, "Soup", 3).await?;
        let padded = format!("  {}  ", "n".repeat(100));

        let err = create_recipe(&db, alice, &limits(), fields(&padded, 3), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        update_recipe(&db, alice, &limits(), id, fields(&padded, 3)).await?;
        let stored = recipe::Entity::find_by_id(id).one(&db).await?.unwrap();
        assert_eq!(stored.name, "n".repeat(100));
        Ok(())
    }

    #[tokio::test]
    async fn delete_of_foreign_recipe_is_silent_noop() -> anyhow::Result<()> {
        let db = get_db().await?;
        let alice = user(&db, "alice").await?;
        let bob = user(&db, "bobby").await?;
        let id = recipe(&db, bob, "Bob's stew", 3).await?;

        delete_recipe(&db, alice, id).await?;
        delete_recipe(&db, alice, 4242).await?;
        assert!(recipe::Entity::find_by_id(id).one(&db).await?.is_some());

        delete_recipe(&db, bob, id).await?;
        assert!(recipe::Entity::find_by_id(id).one(&db).await?.is_none());
        delete_recipe(&db, bob, id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn replace_image_requires_ownership() -> anyhow::Result<()> {
        let db = get_db().await?;
        let alice = user(&db, "alice").await?;
        let bob = user(&db, "bobby").await?;
        let id = create_recipe(&db, alice, &limits(), fields("Pancakes", 1), upload(JPEG_HEADER, "image/jpeg")).await?;

        let err = replace_image(&db, bob, id, ImageUpload::new(PNG_HEADER.to_vec())).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(recipe_image(&db, id).await?.mime_type, "image/jpeg");

        replace_image(&db, alice, id, ImageUpload::new(PNG_HEADER.to_vec())).await?;
        let img = recipe_image(&db, id).await?;
        assert_eq!(img.mime_type, "image/png");
        assert_eq!(img.bytes, PNG_HEADER);
        Ok(())
    }

    #[tokio::test]
    async fn octet_stream_rows_are_resniffed() -> anyhow::Result<()> {
        let db = get_db().await?;
        let alice = user(&db, "alice").await?;
        let id = recipe(&db, alice, "Soup", 3).await?;
        recipe_image::upsert(&db, id, PNG_HEADER.to_vec(), images::OCTET_STREAM).await?;
        assert_eq!(recipe_image(&db, id).await?.mime_type, "image/png");
        Ok(())
    }

    #[tokio::test]
    async fn missing_image_is_not_found() -> anyhow::Result<()> {
        let db = get_db().await?;
        let alice = user(&db, "alice").await?;
        let id = recipe(&db, alice, "Soup", 3).await?;
        assert!(matches!(recipe_image(&db, id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn detail_joins_owner_category_and_rating() -> anyhow::Result<()> {
        let db = get_db().await?;
        let alice = user(&db, "alice").await?;
        let bob = user(&db, "bobby").await?;
        let id = recipe(&db, alice, "Soup", 3).await?;
        rating_service::rate(&db, bob, id, 4).await?;

        let detail = get_recipe(&db, id).await?;
        assert_eq!(detail.recipe.username, "alice");
        assert_eq!(detail.recipe.category_name, "Dinner");
        assert!(!detail.has_image);
        assert_eq!(detail.rating, RatingSummary { average: 4.0, count: 1 });
        assert!(matches!(get_recipe(&db, 777).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn owner_listing_is_newest_first() -> anyhow::Result<()> {
        let db = get_db().await?;
        let alice = user(&db, "alice").await?;
        let bob = user(&db, "bobby").await?;
        let first = recipe(&db, alice, "First", 1).await?;
        recipe(&db, bob, "Other", 1).await?;
        let second = recipe(&db, alice, "Second", 2).await?;

        let ids: Vec<_> = recipes_by_owner(&db, alice).await?.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second, first]);
        Ok(())
    }
}
