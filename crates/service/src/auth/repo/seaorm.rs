use sea_orm::DatabaseConnection;

use models::errors::ModelError;
use models::user;

use crate::auth::domain::{AuthUser, StoredUser};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<StoredUser>, AuthError> {
        let res = user::find_by_username(&self.db, username)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|u| StoredUser { id: u.id, username: u.username, password_hash: u.password_hash }))
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<AuthUser, AuthError> {
        match user::create(&self.db, username, password_hash).await {
            Ok(created) => Ok(AuthUser { id: created.id, username: created.username }),
            Err(ModelError::UniqueViolation(_)) => Err(AuthError::Conflict),
            Err(ModelError::Validation(msg)) => Err(AuthError::Validation(msg)),
            Err(e) => Err(AuthError::Repository(e.to_string())),
        }
    }
}
