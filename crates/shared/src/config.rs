//! Entitlement configuration
//!
//! Deployment-level switches for how plans resolve. Values come from the
//! environment so they can differ per environment without a code change.

use serde::{Deserialize, Serialize};

use crate::error::{EntitlementError, EntitlementResult};
use crate::types::PlanTier;

/// Env var naming the tier used when a caller has no plan
pub const FALLBACK_TIER_ENV: &str = "ENTITLEMENT_FALLBACK_TIER";

/// Env var enabling self-hosted mode (everything unlocked)
pub const SELF_HOSTED_ENV: &str = "ACHIEVINGCOACH_SELF_HOSTED";

/// Tier granted to callers without a plan until billing goes live.
///
/// TODO: switch the default to `None` once paid checkout is enabled for all
/// coaches.
pub const DEFAULT_FALLBACK_TIER: Option<PlanTier> = Some(PlanTier::Pro);

/// How the resolver treats missing plans and deployment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementConfig {
    /// Tier substituted when no plan is known. `None` grants nothing.
    pub fallback_tier: Option<PlanTier>,
    /// Self-hosted deployments resolve every plan to Enterprise
    pub self_hosted: bool,
}

impl Default for EntitlementConfig {
    fn default() -> Self {
        Self {
            fallback_tier: DEFAULT_FALLBACK_TIER,
            self_hosted: false,
        }
    }
}

impl EntitlementConfig {
    /// Fail-closed configuration: no plan means no entitlements
    pub fn strict() -> Self {
        Self {
            fallback_tier: None,
            self_hosted: false,
        }
    }

    pub fn with_fallback_tier(mut self, tier: Option<PlanTier>) -> Self {
        self.fallback_tier = tier;
        self
    }

    pub fn with_self_hosted(mut self, self_hosted: bool) -> Self {
        self.self_hosted = self_hosted;
        self
    }

    /// Load from environment variables, defaulting anything unset
    pub fn from_env() -> EntitlementResult<Self> {
        let fallback_tier = match std::env::var(FALLBACK_TIER_ENV) {
            Ok(value) => parse_fallback_tier(&value)?,
            Err(_) => DEFAULT_FALLBACK_TIER,
        };

        Ok(Self {
            fallback_tier,
            self_hosted: is_self_hosted(),
        })
    }
}

/// Parse a fallback tier setting; `none`/empty disables the fallback
pub fn parse_fallback_tier(value: &str) -> EntitlementResult<Option<PlanTier>> {
    match value.trim().to_lowercase().as_str() {
        "" | "none" | "off" => Ok(None),
        other => other.parse::<PlanTier>().map(Some).map_err(|_| {
            EntitlementError::Config(format!(
                "{} must be one of core, pro, enterprise, none (got {:?})",
                FALLBACK_TIER_ENV, value
            ))
        }),
    }
}

/// Check if running in self-hosted mode (unlimited access)
/// Set ACHIEVINGCOACH_SELF_HOSTED=true for self-hosted deployments
pub fn is_self_hosted() -> bool {
    std::env::var(SELF_HOSTED_ENV)
        .map(|v| v.to_lowercase() == "true" || v == "1")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_falls_back_to_pro() {
        let config = EntitlementConfig::default();
        assert_eq!(config.fallback_tier, Some(PlanTier::Pro));
        assert!(!config.self_hosted);
    }

    #[test]
    fn test_parse_fallback_tier() {
        assert_eq!(parse_fallback_tier("core").unwrap(), Some(PlanTier::Core));
        assert_eq!(parse_fallback_tier("NONE").unwrap(), None);
        assert_eq!(parse_fallback_tier("").unwrap(), None);
        assert!(matches!(
            parse_fallback_tier("platinum"),
            Err(EntitlementError::Config(_))
        ));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        std::env::remove_var(FALLBACK_TIER_ENV);
        std::env::remove_var(SELF_HOSTED_ENV);
        assert_eq!(EntitlementConfig::from_env().unwrap(), EntitlementConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        std::env::set_var(FALLBACK_TIER_ENV, "none");
        std::env::set_var(SELF_HOSTED_ENV, "1");
        let config = EntitlementConfig::from_env().unwrap();
        std::env::remove_var(FALLBACK_TIER_ENV);
        std::env::remove_var(SELF_HOSTED_ENV);

        assert_eq!(config.fallback_tier, None);
        assert!(config.self_hosted);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_unknown_tier() {
        std::env::set_var(FALLBACK_TIER_ENV, "gold");
        let result = EntitlementConfig::from_env();
        std::env::remove_var(FALLBACK_TIER_ENV);
        assert!(result.is_err());
    }
}
