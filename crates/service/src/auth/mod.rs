//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration and login business logic lives here, independent of the web
//! framework. Registration also provisions the user's wallet and records a
//! pending referral when a code is supplied.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
