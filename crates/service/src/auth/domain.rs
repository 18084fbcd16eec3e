use serde::{Deserialize, Serialize};

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Domain user (business view)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
}

/// User row including the stored hash; never leaves the service.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

impl From<StoredUser> for AuthUser {
    fn from(u: StoredUser) -> Self { AuthUser { id: u.id, username: u.username } }
}
