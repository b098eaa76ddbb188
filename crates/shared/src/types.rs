//! Common types used across AchievingCoach

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::EntitlementError;
use crate::limits::CustomLimits;

// =============================================================================
// Plan Tiers
// =============================================================================

/// Subscription tier for billing.
///
/// Declaration order is the upgrade order: `Core < Pro < Enterprise`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Core,
    Pro,
    Enterprise,
}

impl PlanTier {
    /// Every tier, lowest first
    pub const ALL: [PlanTier; 3] = [PlanTier::Core, PlanTier::Pro, PlanTier::Enterprise];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }

    /// Human-readable plan name shown on pricing and upgrade screens
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Core => "Core",
            Self::Pro => "Pro",
            Self::Enterprise => "Enterprise",
        }
    }

    /// Position in the upgrade order (0 = lowest)
    pub fn rank(&self) -> usize {
        match self {
            Self::Core => 0,
            Self::Pro => 1,
            Self::Enterprise => 2,
        }
    }

    /// The tier directly above this one, if any
    pub fn next(&self) -> Option<PlanTier> {
        match self {
            Self::Core => Some(Self::Pro),
            Self::Pro => Some(Self::Enterprise),
            Self::Enterprise => None,
        }
    }

    /// Whether this tier grants at least the access of `other`
    pub fn includes(&self, other: PlanTier) -> bool {
        *self >= other
    }
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlanTier {
    type Err = EntitlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "core" => Ok(Self::Core),
            "pro" => Ok(Self::Pro),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(EntitlementError::InvalidTier(s.to_string())),
        }
    }
}

// =============================================================================
// Feature Categories
// =============================================================================

/// Grouping for features on pricing pages and upgrade prompts.
///
/// The string form doubles as the SKU namespace prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureCategory {
    Clients,
    Sessions,
    Tools,
    IcfSimulator,
    Analytics,
    Crm,
    Directory,
    Messaging,
    Branding,
    Support,
    Enterprise,
}

impl FeatureCategory {
    pub const ALL: [FeatureCategory; 11] = [
        FeatureCategory::Clients,
        FeatureCategory::Sessions,
        FeatureCategory::Tools,
        FeatureCategory::IcfSimulator,
        FeatureCategory::Analytics,
        FeatureCategory::Crm,
        FeatureCategory::Directory,
        FeatureCategory::Messaging,
        FeatureCategory::Branding,
        FeatureCategory::Support,
        FeatureCategory::Enterprise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Sessions => "sessions",
            Self::Tools => "tools",
            Self::IcfSimulator => "icf_simulator",
            Self::Analytics => "analytics",
            Self::Crm => "crm",
            Self::Directory => "directory",
            Self::Messaging => "messaging",
            Self::Branding => "branding",
            Self::Support => "support",
            Self::Enterprise => "enterprise",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Clients => "Client Management",
            Self::Sessions => "Sessions",
            Self::Tools => "Coaching Tools",
            Self::IcfSimulator => "ICF Exam Simulator",
            Self::Analytics => "Analytics",
            Self::Crm => "CRM",
            Self::Directory => "Coach Directory",
            Self::Messaging => "Messaging",
            Self::Branding => "Branding",
            Self::Support => "Support",
            Self::Enterprise => "Enterprise",
        }
    }
}

impl std::fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeatureCategory {
    type Err = EntitlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| EntitlementError::InvalidCategory(s.to_string()))
    }
}

// =============================================================================
// Subscriptions
// =============================================================================

/// Billing status of a subscription record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    #[serde(alias = "cancelled")]
    Canceled,
    Unpaid,
    #[serde(alias = "incomplete_expired")]
    Incomplete,
    Paused,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Trialing => "trialing",
            Self::PastDue => "past_due",
            Self::Canceled => "canceled",
            Self::Unpaid => "unpaid",
            Self::Incomplete => "incomplete",
            Self::Paused => "paused",
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = EntitlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "trialing" => Ok(Self::Trialing),
            "past_due" => Ok(Self::PastDue),
            // Stripe spells it both ways depending on API version
            "canceled" | "cancelled" => Ok(Self::Canceled),
            "unpaid" => Ok(Self::Unpaid),
            "incomplete" | "incomplete_expired" => Ok(Self::Incomplete),
            "paused" => Ok(Self::Paused),
            _ => Err(EntitlementError::InvalidStatus(s.to_string())),
        }
    }
}

/// A coach's subscription as stored in the document store.
///
/// This crate never loads or persists it; callers hand it in. Field names
/// follow the stored document (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub plan_id: PlanTier,
    pub status: SubscriptionStatus,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub current_period_start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub current_period_end: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub trial_end: Option<OffsetDateTime>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    /// Per-account limit overrides negotiated outside the standard tiers
    #[serde(default)]
    pub custom_limits: Option<CustomLimits>,
}

impl Subscription {
    /// A plain active subscription with no period information
    pub fn active(plan_id: PlanTier) -> Self {
        Self {
            plan_id,
            status: SubscriptionStatus::Active,
            current_period_start: None,
            current_period_end: None,
            trial_end: None,
            cancel_at_period_end: false,
            custom_limits: None,
        }
    }

    pub fn with_status(mut self, status: SubscriptionStatus) -> Self {
        self.status = status;
        self
    }
}
