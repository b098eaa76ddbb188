// Test code patterns:
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! AchievingCoach API Library
//!
//! HTTP surface over the entitlement resolver: catalog and plan browsing,
//! feature checks, gate decisions and subscription resolution.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
