// Test code patterns (expected in test files):
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! AchievingCoach Billing Module
//!
//! Decides what a coach's plan unlocks. Nothing here talks to a payment
//! provider; subscription records are handed in by the caller.
//!
//! ## Features
//!
//! - **Resolver**: Feature and limit lookups with fallback-tier handling
//! - **Entitlements**: Subscription status to effective plan, with grace periods
//! - **Feature Gate**: Granted / upgrade prompt / unavailable decisions for UI
//! - **Invariants**: Consistency checks over the compiled-in tables

pub mod entitlement;
pub mod gate;
pub mod invariants;
pub mod resolver;


// Resolver
pub use resolver::EntitlementResolver;

// Entitlement
pub use entitlement::{Entitlement, EntitlementSource, EntitlementState, PAST_DUE_GRACE};

// Gate
pub use gate::{FeatureGate, GateDecision, LimitCheck, UpgradePrompt};

// Invariants
pub use invariants::{
    EntitlementTables, InvariantCheckSummary, InvariantChecker, InvariantViolation, TierTable,
    ViolationSeverity,
};
