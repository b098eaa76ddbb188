// Test code patterns (expected in test files):
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! AchievingCoach Shared Types
//!
//! The compiled-in entitlement tables: plan tiers, the feature catalog, the
//! plan-to-feature map and per-tier limits. Everything here is static
//! configuration, built once and never mutated.

pub mod catalog;
pub mod config;
pub mod error;
pub mod features;
pub mod limits;
pub mod plans;
pub mod types;

pub use catalog::FeatureDefinition;
pub use config::{is_self_hosted, EntitlementConfig};
pub use error::{EntitlementError, EntitlementResult};
pub use features::{sku, FeatureSku};
pub use limits::{
    limit_for, CustomLimits, EffectiveLimits, LimitKey, LimitSource, PlanLimits,
};
pub use plans::{features_for, minimum_tier_for, PlanFeatureSet};
pub use types::{FeatureCategory, PlanTier, Subscription, SubscriptionStatus};
