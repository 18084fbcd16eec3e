//! Request-scoped identity handed to every mutation by the session layer.

use serde::{Deserialize, Serialize};

/// The authenticated caller. Trusted as-is; token checks happen before a
/// value of this type is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user_id: i32,
}

impl CurrentUser {
    pub fn new(user_id: i32) -> Self { Self { user_id } }
}
