use sea_orm::DatabaseConnection;
use tracing::warn;

use models::visit;

/// Append a home-page visit. Never fails the caller; errors are only logged.
pub async fn record_visit(db: &DatabaseConnection) {
    if let Err(e) = visit::record(db).await {
        warn!(error = %e, "visit_not_recorded");
    }
}
