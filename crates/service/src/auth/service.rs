use std::sync::Arc;

use configs::Limits;
use once_cell::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use super::domain::{AuthUser, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::hasher::{Argon2Hasher, CredentialHasher};
use super::repository::AuthRepository;
use crate::validation::validate_credentials;

const DUMMY_PASSWORD: &str = "recipe-hub-dummy-password";

/// Credential service independent of web framework and session mechanics.
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    hasher: Arc<dyn CredentialHasher>,
    limits: Arc<Limits>,
    dummy_hash: OnceCell<String>,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, limits: Arc<Limits>) -> Self {
        Self { repo, hasher: Arc::new(Argon2Hasher), limits, dummy_hash: OnceCell::new() }
    }

    pub fn with_hasher(mut self, hasher: Arc<dyn CredentialHasher>) -> Self {
        self.hasher = hasher;
        self.dummy_hash = OnceCell::new();
        self
    }

    fn dummy_hash(&self) -> Result<&str, AuthError> {
        self.dummy_hash
            .get_or_try_init(|| self.hasher.hash(DUMMY_PASSWORD))
            .map(String::as_str)
    }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockAuthRepository::default()), Arc::new(configs::Limits::default()));
    /// let input = RegisterInput { username: "chef".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.username, "chef");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        validate_credentials(&input.username, &input.password, &self.limits).map_err(AuthError::Validation)?;

        let hash = self.hasher.hash(&input.password)?;
        let user = self.repo.create_user(&input.username, &hash).await?;
        info!(user_id = user.id, algorithm = self.hasher.algorithm(), "user_registered");
        Ok(user)
    }

    /// Match username and password; `None` for an unknown user or a wrong password alike.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{LoginInput, RegisterInput};
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockAuthRepository::default()), Arc::new(configs::Limits::default()));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { username: "chef".into(), password: "Passw0rd".into() }));
    /// let ok = tokio_test::block_on(svc.authenticate(LoginInput { username: "chef".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(ok.map(|u| u.username).as_deref(), Some("chef"));
    /// let bad = tokio_test::block_on(svc.authenticate(LoginInput { username: "chef".into(), password: "nope".into() })).unwrap();
    /// assert!(bad.is_none());
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn authenticate(&self, input: LoginInput) -> Result<Option<AuthUser>, AuthError> {
        let dummy = self.dummy_hash()?;
        match self.repo.find_by_username(&input.username).await? {
            Some(stored) => {
                if self.hasher.verify(&input.password, &stored.password_hash) {
                    debug!(user_id = stored.id, "credentials_matched");
                    Ok(Some(stored.into()))
                } else {
                    warn!("login_rejected");
                    Ok(None)
                }
            }
            None => {
                let _ = self.hasher.verify(&input.password, dummy);
                warn!("login_rejected");
                Ok(None)
            }
        }
    }
}
