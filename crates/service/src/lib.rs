//! Service layer: the recipe site's business rules on top of `models`.
//! - Every mutation takes the caller's [`context::CurrentUser`] and the configured bounds explicitly.
//! - Ownership is enforced inside the mutating statement, never by a separate read.
//! - Errors use the [`errors::ServiceError`] taxonomy; credentials use [`auth::errors::AuthError`].

pub mod errors;
pub mod context;
pub mod validation;
pub mod images;
pub mod pagination;
pub mod auth;
pub mod recipe_service;
pub mod rating_service;
pub mod comment_service;
pub mod listing_service;
pub mod visit_service;
#[cfg(test)]
pub mod test_support;
