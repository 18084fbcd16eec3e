//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration and credential checks live here; session minting belongs to
//! the HTTP layer, which only receives the matched identity.

pub mod domain;
pub mod errors;
pub mod hasher;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
