use std::ops::RangeInclusive;

use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{info, instrument, warn};

use models::errors::ModelError;
use models::{rating, recipe};

use crate::context::CurrentUser;
use crate::errors::ServiceError;

/// Accepted star values.
pub const RATING_RANGE: RangeInclusive<i32> = 1..=5;

/// Mean rounded to one decimal; `(0.0, 0)` for an unrated recipe.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RatingSummary {
    pub average: f64,
    pub count: i64,
}

impl RatingSummary {
    pub const NONE: RatingSummary = RatingSummary { average: 0.0, count: 0 };
}

pub(crate) fn round_one_decimal(v: f64) -> f64 { (v * 10.0).round() / 10.0 }

/// Rate someone else's recipe; a repeat rating replaces the previous value.
#[instrument(skip(db), fields(user_id = actor.user_id))]
pub async fn rate(db: &DatabaseConnection, actor: CurrentUser, recipe_id: i32, value: i32) -> Result<(), ServiceError> {
    if recipe_id <= 0 {
        return Err(ServiceError::InvalidInput("recipe id required".into()));
    }
    if !RATING_RANGE.contains(&value) {
        return Err(ServiceError::InvalidInput(format!(
            "rating must be between {} and {}",
            RATING_RANGE.start(),
            RATING_RANGE.end()
        )));
    }
    match recipe::owner_of(db, recipe_id).await? {
        None => return Err(ServiceError::not_found("recipe")),
        Some(owner) if owner == actor.user_id => {
            warn!(recipe_id, "self_rating_rejected");
            return Err(ServiceError::Forbidden("you cannot rate your own recipe".into()));
        }
        Some(_) => {}
    }
    match rating::upsert(db, recipe_id, actor.user_id, value).await {
        Ok(()) => {}
        Err(ModelError::ForeignKeyViolation(_)) => return Err(ServiceError::not_found("recipe")),
        Err(e) => return Err(e.into()),
    }
    info!(recipe_id, value, "rating_upserted");
    Ok(())
}

pub async fn average(db: &DatabaseConnection, recipe_id: i32) -> Result<RatingSummary, ServiceError> {
    let row = rating::aggregate(db, recipe_id).await?;
    Ok(match row.average {
        Some(avg) if row.count > 0 => RatingSummary { average: round_one_decimal(avg), count: row.count },
        _ => RatingSummary::NONE,
    })
}

/// The caller's own rating of a recipe, if any.
pub async fn user_rating(db: &DatabaseConnection, actor: CurrentUser, recipe_id: i32) -> Result<Option<i32>, ServiceError> {
    Ok(rating::find_for_user(db, recipe_id, actor.user_id).await?.map(|r| r.rating))
}
