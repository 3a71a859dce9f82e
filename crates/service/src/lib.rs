//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod pagination;
pub mod auth;
pub mod user_service;
pub mod vendor_service;
pub mod catalog_service;
pub mod booking_service;
pub mod payment_service;
pub mod dispute_service;
pub mod chat_service;
pub mod review_service;
pub mod referral_service;
pub mod subscription_service;
pub mod notification_service;
pub mod analytics_service;
#[cfg(test)]
pub mod test_support;
