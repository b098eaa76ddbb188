//! Server configuration

use achievingcoach_shared::{EntitlementConfig, EntitlementError};

/// Env var for the listen address
pub const BIND_ADDRESS_ENV: &str = "BIND_ADDRESS";

/// Env var for the comma-separated CORS allowlist
pub const CORS_ALLOWED_ORIGINS_ENV: &str = "CORS_ALLOWED_ORIGINS";

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    /// Fallback tier and self-hosted switch handed to the resolver
    pub entitlements: EntitlementConfig,
    /// Allowed CORS origins; empty allows any origin
    pub cors_allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            entitlements: EntitlementConfig::default(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, EntitlementError> {
        let bind_address = std::env::var(BIND_ADDRESS_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let cors_allowed_origins = std::env::var(CORS_ALLOWED_ORIGINS_ENV)
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        Ok(Self {
            bind_address,
            entitlements: EntitlementConfig::from_env()?,
            cors_allowed_origins,
        })
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use achievingcoach_shared::config::{FALLBACK_TIER_ENV, SELF_HOSTED_ENV};
    use achievingcoach_shared::PlanTier;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            BIND_ADDRESS_ENV,
            CORS_ALLOWED_ORIGINS_ENV,
            FALLBACK_TIER_ENV,
            SELF_HOSTED_ENV,
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.entitlements.fallback_tier, Some(PlanTier::Pro));
        assert!(!config.entitlements.self_hosted);
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    #[serial]
    fn test_reads_overrides() {
        clear_env();
        std::env::set_var(BIND_ADDRESS_ENV, "127.0.0.1:9000");
        std::env::set_var(
            CORS_ALLOWED_ORIGINS_ENV,
            "https://app.achievingcoach.com, ,http://localhost:3000",
        );
        std::env::set_var(FALLBACK_TIER_ENV, "none");

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://app.achievingcoach.com", "http://localhost:3000"]
        );
        assert_eq!(config.entitlements.fallback_tier, None);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_bad_fallback_tier_rejected() {
        clear_env();
        std::env::set_var(FALLBACK_TIER_ENV, "gold");
        assert!(matches!(
            Config::from_env(),
            Err(EntitlementError::Config(_))
        ));
        clear_env();
    }
}
