use axum::{extract::State, Json};
use serde::Serialize;

use service::listing_service::{self, TopRecipe, TOP_RECIPES_DEFAULT};
use service::visit_service;

use crate::errors::JsonApiError;
use crate::metrics::HOME_VISITS_TOTAL;
use crate::routes::auth::ServerState;

#[derive(Serialize)]
pub struct HomeOutput {
    pub top_recipes: Vec<TopRecipe>,
}

/// Counts the visit, then returns the top rated recipes.
pub async fn home(State(state): State<ServerState>) -> Result<Json<HomeOutput>, JsonApiError> {
    visit_service::record_visit(&state.db).await;
    HOME_VISITS_TOTAL.inc();
    let top_recipes = listing_service::top_recipes(&state.db, TOP_RECIPES_DEFAULT).await?;
    Ok(Json(HomeOutput { top_recipes }))
}
