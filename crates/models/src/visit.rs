use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "visits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub visited_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Append one visit stamped with the current time.
pub async fn record<C: ConnectionTrait>(db: &C) -> Result<(), ModelError> {
    let am = ActiveModel { visited_at: Set(Utc::now().into()), ..Default::default() };
    Entity::insert(am).exec_without_returning(db).await?;
    Ok(())
}
