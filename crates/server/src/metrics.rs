use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static HOME_VISITS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("recipe_hub_home_visits_total", "Home page views").expect("register home_visits_total")
});

pub static RECIPES_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("recipe_hub_recipes_created_total", "Recipes created").expect("register recipes_created_total")
});

pub static RATINGS_UPSERTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("recipe_hub_ratings_upserted_total", "Ratings inserted or replaced")
        .expect("register ratings_upserted_total")
});

pub static COMMENTS_ADDED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("recipe_hub_comments_added_total", "Comments added").expect("register comments_added_total")
});

pub static FAILED_LOGINS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("recipe_hub_failed_logins_total", "Rejected login attempts")
        .expect("register failed_logins_total")
});

/// Touch every counter so `/metrics` lists them before their first increment.
pub fn init() {
    Lazy::force(&HOME_VISITS_TOTAL);
    Lazy::force(&RECIPES_CREATED_TOTAL);
    Lazy::force(&RATINGS_UPSERTED_TOTAL);
    Lazy::force(&COMMENTS_ADDED_TOTAL);
    Lazy::force(&FAILED_LOGINS_TOTAL);
}

pub async fn metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}
