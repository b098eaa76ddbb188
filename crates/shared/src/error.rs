//! Error types for entitlement lookups

use thiserror::Error;

/// Errors raised by the entitlement tables and resolver.
///
/// Most lookups are total and fail soft; these variants surface only on the
/// strict paths (catalog lookups, parsing untyped input).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntitlementError {
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    #[error("Invalid plan tier: {0}")]
    InvalidTier(String),

    #[error("Invalid feature category: {0}")]
    InvalidCategory(String),

    #[error("Invalid limit key: {0}")]
    InvalidLimitKey(String),

    #[error("Invalid subscription status: {0}")]
    InvalidStatus(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type EntitlementResult<T> = Result<T, EntitlementError>;
