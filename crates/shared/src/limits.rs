//! Plan Limits
//!
//! Numeric ceilings per tier. `None` always means unlimited: callers must
//! treat it as +infinity, never as zero.

use serde::{Deserialize, Serialize};

use crate::error::EntitlementError;
use crate::types::PlanTier;

/// A numeric limit a plan can impose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimitKey {
    #[serde(rename = "maxClients", alias = "max_clients")]
    MaxClients,
    #[serde(rename = "maxSessionsPerMonth", alias = "max_sessions_per_month")]
    MaxSessionsPerMonth,
    #[serde(rename = "maxToolsAccess", alias = "max_tools_access")]
    MaxToolsAccess,
    #[serde(rename = "maxStorageGB", alias = "max_storage_gb")]
    MaxStorageGb,
}

impl LimitKey {
    pub const ALL: [LimitKey; 4] = [
        LimitKey::MaxClients,
        LimitKey::MaxSessionsPerMonth,
        LimitKey::MaxToolsAccess,
        LimitKey::MaxStorageGb,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaxClients => "maxClients",
            Self::MaxSessionsPerMonth => "maxSessionsPerMonth",
            Self::MaxToolsAccess => "maxToolsAccess",
            Self::MaxStorageGb => "maxStorageGB",
        }
    }
}

impl std::fmt::Display for LimitKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LimitKey {
    type Err = EntitlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "maxClients" | "max_clients" => Ok(Self::MaxClients),
            "maxSessionsPerMonth" | "max_sessions_per_month" => Ok(Self::MaxSessionsPerMonth),
            "maxToolsAccess" | "max_tools_access" => Ok(Self::MaxToolsAccess),
            "maxStorageGB" | "maxStorageGb" | "max_storage_gb" => Ok(Self::MaxStorageGb),
            _ => Err(EntitlementError::InvalidLimitKey(s.to_string())),
        }
    }
}

/// Ceilings for one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanLimits {
    pub max_clients: Option<u64>,
    pub max_sessions_per_month: Option<u64>,
    pub max_tools_access: Option<u64>,
    pub max_storage_gb: Option<u64>,
}

const CORE_LIMITS: PlanLimits = PlanLimits {
    max_clients: Some(15),
    max_sessions_per_month: Some(50),
    max_tools_access: Some(5),
    max_storage_gb: Some(5),
};

const PRO_LIMITS: PlanLimits = PlanLimits {
    max_clients: None,
    max_sessions_per_month: None,
    max_tools_access: None,
    max_storage_gb: Some(50),
};

const ENTERPRISE_LIMITS: PlanLimits = PlanLimits {
    max_clients: None,
    max_sessions_per_month: None,
    max_tools_access: None,
    max_storage_gb: None,
};

impl PlanLimits {
    /// Standard limits for a tier
    pub fn for_tier(tier: PlanTier) -> Self {
        match tier {
            PlanTier::Core => CORE_LIMITS,
            PlanTier::Pro => PRO_LIMITS,
            PlanTier::Enterprise => ENTERPRISE_LIMITS,
        }
    }

    /// Limits that grant nothing, used when no plan applies
    pub const fn none() -> Self {
        Self {
            max_clients: Some(0),
            max_sessions_per_month: Some(0),
            max_tools_access: Some(0),
            max_storage_gb: Some(0),
        }
    }

    pub fn get(&self, key: LimitKey) -> Option<u64> {
        match key {
            LimitKey::MaxClients => self.max_clients,
            LimitKey::MaxSessionsPerMonth => self.max_sessions_per_month,
            LimitKey::MaxToolsAccess => self.max_tools_access,
            LimitKey::MaxStorageGb => self.max_storage_gb,
        }
    }

    /// Merge tier defaults with per-account overrides.
    /// Override values (Some) win; None keeps the tier default.
    pub fn with_overrides(&self, custom: &CustomLimits) -> EffectiveLimits {
        let source = if custom.is_empty() {
            LimitSource::Tier
        } else if custom.is_complete() {
            LimitSource::Custom
        } else {
            LimitSource::Mixed
        };

        EffectiveLimits {
            max_clients: custom.max_clients.or(self.max_clients),
            max_sessions_per_month: custom
                .max_sessions_per_month
                .or(self.max_sessions_per_month),
            max_tools_access: custom.max_tools_access.or(self.max_tools_access),
            max_storage_gb: custom.max_storage_gb.or(self.max_storage_gb),
            source,
        }
    }
}

/// Limit for one key under one tier; `None` is unlimited
pub fn limit_for(tier: PlanTier, key: LimitKey) -> Option<u64> {
    PlanLimits::for_tier(tier).get(key)
}

/// Whether current usage is at or under the limit
pub fn within_limit(limit: Option<u64>, usage: u64) -> bool {
    limit.map_or(true, |max| usage <= max)
}

/// Whether one more unit fits under the limit
pub fn has_capacity(limit: Option<u64>, usage: u64) -> bool {
    limit.map_or(true, |max| usage < max)
}

/// Per-account overrides negotiated outside the standard tiers.
///
/// An override can only set a finite ceiling; leave it `None` to keep the
/// tier value (which may itself be unlimited).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomLimits {
    pub max_clients: Option<u64>,
    pub max_sessions_per_month: Option<u64>,
    pub max_tools_access: Option<u64>,
    #[serde(rename = "maxStorageGB", alias = "maxStorageGb")]
    pub max_storage_gb: Option<u64>,
}

impl CustomLimits {
    pub fn is_empty(&self) -> bool {
        self.max_clients.is_none()
            && self.max_sessions_per_month.is_none()
            && self.max_tools_access.is_none()
            && self.max_storage_gb.is_none()
    }

    fn is_complete(&self) -> bool {
        self.max_clients.is_some()
            && self.max_sessions_per_month.is_some()
            && self.max_tools_access.is_some()
            && self.max_storage_gb.is_some()
    }
}

/// Where the effective limits came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitSource {
    Tier,
    Custom,
    Mixed,
}

/// Tier limits after overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveLimits {
    pub max_clients: Option<u64>,
    pub max_sessions_per_month: Option<u64>,
    pub max_tools_access: Option<u64>,
    pub max_storage_gb: Option<u64>,
    pub source: LimitSource,
}

impl EffectiveLimits {
    pub fn get(&self, key: LimitKey) -> Option<u64> {
        match key {
            LimitKey::MaxClients => self.max_clients,
            LimitKey::MaxSessionsPerMonth => self.max_sessions_per_month,
            LimitKey::MaxToolsAccess => self.max_tools_access,
            LimitKey::MaxStorageGb => self.max_storage_gb,
        }
    }
}

impl From<PlanLimits> for EffectiveLimits {
    fn from(limits: PlanLimits) -> Self {
        limits.with_overrides(&CustomLimits::default())
    }
}
