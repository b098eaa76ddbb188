//! Feature SKUs
//!
//! A SKU names one gatable capability as `<category>.<capability>`, e.g.
//! `crm.leads`. The constants in [`sku`] are the only SKUs the product knows
//! about; anything else arriving from untyped input is resolved through the
//! catalog and rejected if absent.

use std::borrow::Borrow;

use serde::Serialize;

use crate::catalog;
use crate::error::EntitlementError;

/// Identifier for a single gatable capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FeatureSku(&'static str);

impl FeatureSku {
    pub const fn new(sku: &'static str) -> Self {
        Self(sku)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Namespace part before the first `.`
    pub fn namespace(&self) -> Option<&'static str> {
        split_sku(self.0).map(|(ns, _)| ns)
    }
}

/// Split `<category>.<capability>`; both halves must be non-empty
pub fn split_sku(sku: &str) -> Option<(&str, &str)> {
    let (ns, cap) = sku.split_once('.')?;
    if ns.is_empty() || cap.is_empty() {
        return None;
    }
    Some((ns, cap))
}

impl Borrow<str> for FeatureSku {
    fn borrow(&self) -> &str {
        self.0
    }
}

impl AsRef<str> for FeatureSku {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl std::fmt::Display for FeatureSku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl std::str::FromStr for FeatureSku {
    type Err = EntitlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        catalog::definition(s.trim()).map(|def| def.sku)
    }
}

/// Every SKU the product gates on
pub mod sku {
    use super::FeatureSku;

    // Clients
    pub const CLIENTS_MANAGEMENT: FeatureSku = FeatureSku::new("clients.management");
    pub const CLIENTS_PROFILES: FeatureSku = FeatureSku::new("clients.profiles");
    pub const CLIENTS_UNLIMITED: FeatureSku = FeatureSku::new("clients.unlimited");
    pub const CLIENTS_STAKEHOLDER_PORTAL: FeatureSku =
        FeatureSku::new("clients.stakeholder_portal");
    pub const CLIENTS_BULK_IMPORT: FeatureSku = FeatureSku::new("clients.bulk_import");

    // Sessions
    pub const SESSIONS_SCHEDULING: FeatureSku = FeatureSku::new("sessions.scheduling");
    pub const SESSIONS_NOTES: FeatureSku = FeatureSku::new("sessions.notes");
    pub const SESSIONS_BOOKING_PAGE: FeatureSku = FeatureSku::new("sessions.booking_page");
    pub const SESSIONS_RECURRING: FeatureSku = FeatureSku::new("sessions.recurring");
    pub const SESSIONS_VIDEO: FeatureSku = FeatureSku::new("sessions.video_integration");

    // Coaching tools
    pub const TOOLS_WHEEL_OF_LIFE: FeatureSku = FeatureSku::new("tools.wheel_of_life");
    pub const TOOLS_GROW_MODEL: FeatureSku = FeatureSku::new("tools.grow_model");
    pub const TOOLS_SMART_GOALS: FeatureSku = FeatureSku::new("tools.smart_goals");
    pub const TOOLS_VALUES_ASSESSMENT: FeatureSku = FeatureSku::new("tools.values_assessment");
    pub const TOOLS_DISC_ASSESSMENT: FeatureSku = FeatureSku::new("tools.disc_assessment");
    pub const TOOLS_ALL_TOOLS: FeatureSku = FeatureSku::new("tools.all_tools");
    pub const TOOLS_PDF_REPORTS: FeatureSku = FeatureSku::new("tools.pdf_reports");
    pub const TOOLS_CUSTOM_TOOLS: FeatureSku = FeatureSku::new("tools.custom_tools");

    // ICF exam simulator
    pub const ICF_SIMULATOR_ACCESS: FeatureSku = FeatureSku::new("icf_simulator.access");
    pub const ICF_SIMULATOR_UNLIMITED_ATTEMPTS: FeatureSku =
        FeatureSku::new("icf_simulator.unlimited_attempts");
    pub const ICF_SIMULATOR_COMPETENCY_BREAKDOWN: FeatureSku =
        FeatureSku::new("icf_simulator.competency_breakdown");

    // Analytics
    pub const ANALYTICS_BASIC: FeatureSku = FeatureSku::new("analytics.basic");
    pub const ANALYTICS_ADVANCED: FeatureSku = FeatureSku::new("analytics.advanced");
    pub const ANALYTICS_ORGANIZATION_REPORTS: FeatureSku =
        FeatureSku::new("analytics.organization_reports");

    // CRM
    pub const CRM_LEADS: FeatureSku = FeatureSku::new("crm.leads");
    pub const CRM_PIPELINE: FeatureSku = FeatureSku::new("crm.pipeline");
    pub const CRM_EMAIL_CAMPAIGNS: FeatureSku = FeatureSku::new("crm.email_campaigns");

    // Coach directory
    pub const DIRECTORY_BASIC_LISTING: FeatureSku = FeatureSku::new("directory.basic_listing");
    pub const DIRECTORY_FEATURED_LISTING: FeatureSku =
        FeatureSku::new("directory.featured_listing");
    pub const DIRECTORY_REVIEWS: FeatureSku = FeatureSku::new("directory.reviews");

    // Messaging
    pub const MESSAGING_BASIC: FeatureSku = FeatureSku::new("messaging.basic");
    pub const MESSAGING_UNLIMITED: FeatureSku = FeatureSku::new("messaging.unlimited");
    pub const MESSAGING_FILE_SHARING: FeatureSku = FeatureSku::new("messaging.file_sharing");

    // Branding
    pub const BRANDING_CUSTOM_LOGO: FeatureSku = FeatureSku::new("branding.custom_logo");
    pub const BRANDING_CUSTOM_COLORS: FeatureSku = FeatureSku::new("branding.custom_colors");
    pub const BRANDING_WHITE_LABEL: FeatureSku = FeatureSku::new("branding.white_label");
    pub const BRANDING_CUSTOM_DOMAIN: FeatureSku = FeatureSku::new("branding.custom_domain");

    // Support
    pub const SUPPORT_EMAIL: FeatureSku = FeatureSku::new("support.email");
    pub const SUPPORT_PRIORITY: FeatureSku = FeatureSku::new("support.priority");
    pub const SUPPORT_DEDICATED_MANAGER: FeatureSku =
        FeatureSku::new("support.dedicated_manager");
    pub const SUPPORT_ONBOARDING: FeatureSku = FeatureSku::new("support.onboarding");

    // Enterprise
    pub const ENTERPRISE_MULTI_COACH: FeatureSku = FeatureSku::new("enterprise.multi_coach");
    pub const ENTERPRISE_TEAM_MANAGEMENT: FeatureSku =
        FeatureSku::new("enterprise.team_management");
    pub const ENTERPRISE_SSO: FeatureSku = FeatureSku::new("enterprise.sso");
    pub const ENTERPRISE_API_ACCESS: FeatureSku = FeatureSku::new("enterprise.api_access");
    pub const ENTERPRISE_AUDIT_LOG: FeatureSku = FeatureSku::new("enterprise.audit_log");
}
