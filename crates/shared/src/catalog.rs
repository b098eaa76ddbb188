//! Feature Catalog
//!
//! Canonical display metadata for every SKU. Plan tables reference SKUs only;
//! names, descriptions and categories come from here.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

use crate::error::{EntitlementError, EntitlementResult};
use crate::features::{sku, split_sku, FeatureSku};
use crate::types::FeatureCategory;
use crate::types::FeatureCategory as C;

/// Descriptive metadata for a single SKU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureDefinition {
    pub sku: FeatureSku,
    pub name: &'static str,
    pub description: &'static str,
    pub category: FeatureCategory,
}

const fn def(
    sku: FeatureSku,
    name: &'static str,
    description: &'static str,
    category: FeatureCategory,
) -> FeatureDefinition {
    FeatureDefinition {
        sku,
        name,
        description,
        category,
    }
}

#[rustfmt::skip]
static CATALOG: &[FeatureDefinition] = &[
    // Clients
    def(sku::CLIENTS_MANAGEMENT, "Client Management", "Add, edit and archive coaching clients", C::Clients),
    def(sku::CLIENTS_PROFILES, "Client Profiles", "Goals, notes and history on each client profile", C::Clients),
    def(sku::CLIENTS_UNLIMITED, "Unlimited Clients", "No cap on the number of active clients", C::Clients),
    def(sku::CLIENTS_STAKEHOLDER_PORTAL, "Stakeholder Portal", "Share progress with sponsors and managers of your clients", C::Clients),
    def(sku::CLIENTS_BULK_IMPORT, "Bulk Client Import", "Import clients from CSV in one step", C::Clients),
    // Sessions
    def(sku::SESSIONS_SCHEDULING, "Session Scheduling", "Schedule one-off coaching sessions", C::Sessions),
    def(sku::SESSIONS_NOTES, "Session Notes", "Private and shared notes per session", C::Sessions),
    def(sku::SESSIONS_BOOKING_PAGE, "Public Booking Page", "Let clients book open slots from your profile", C::Sessions),
    def(sku::SESSIONS_RECURRING, "Recurring Sessions", "Weekly and monthly recurring session series", C::Sessions),
    def(sku::SESSIONS_VIDEO, "Video Integration", "Generate meeting links for every session", C::Sessions),
    // Coaching tools
    def(sku::TOOLS_WHEEL_OF_LIFE, "Wheel of Life", "Balance assessment across life areas", C::Tools),
    def(sku::TOOLS_GROW_MODEL, "GROW Model", "Goal, Reality, Options, Will worksheets", C::Tools),
    def(sku::TOOLS_SMART_GOALS, "SMART Goals", "Structured goal setting with tracking", C::Tools),
    def(sku::TOOLS_VALUES_ASSESSMENT, "Values Assessment", "Identify and rank core personal values", C::Tools),
    def(sku::TOOLS_DISC_ASSESSMENT, "DISC Assessment", "Behavioural style profiling with results report", C::Tools),
    def(sku::TOOLS_ALL_TOOLS, "Full Tool Library", "Every coaching tool in the library", C::Tools),
    def(sku::TOOLS_PDF_REPORTS, "PDF Reports", "Export tool results as branded PDF reports", C::Tools),
    def(sku::TOOLS_CUSTOM_TOOLS, "Custom Tools", "Build your own questionnaires and worksheets", C::Tools),
    // ICF exam simulator
    def(sku::ICF_SIMULATOR_ACCESS, "ICF Exam Simulator", "Practice exams for ICF credentialing", C::IcfSimulator),
    def(sku::ICF_SIMULATOR_UNLIMITED_ATTEMPTS, "Unlimited Attempts", "Retake practice exams without limits", C::IcfSimulator),
    def(sku::ICF_SIMULATOR_COMPETENCY_BREAKDOWN, "Competency Breakdown", "Scores per ICF competency and domain", C::IcfSimulator),
    // Analytics
    def(sku::ANALYTICS_BASIC, "Basic Analytics", "Session and client activity overview", C::Analytics),
    def(sku::ANALYTICS_ADVANCED, "Advanced Analytics", "Retention, outcomes and revenue trends", C::Analytics),
    def(sku::ANALYTICS_ORGANIZATION_REPORTS, "Organization Reports", "Roll-up reporting across every coach in the organization", C::Analytics),
    // CRM
    def(sku::CRM_LEADS, "Lead Management", "Capture and track prospective clients", C::Crm),
    def(sku::CRM_PIPELINE, "Sales Pipeline", "Move leads through customizable pipeline stages", C::Crm),
    def(sku::CRM_EMAIL_CAMPAIGNS, "Email Campaigns", "Nurture leads with scheduled email sequences", C::Crm),
    // Coach directory
    def(sku::DIRECTORY_BASIC_LISTING, "Directory Listing", "Public profile in the coach directory", C::Directory),
    def(sku::DIRECTORY_FEATURED_LISTING, "Featured Listing", "Priority placement in directory search", C::Directory),
    def(sku::DIRECTORY_REVIEWS, "Client Reviews", "Collect and display client testimonials", C::Directory),
    // Messaging
    def(sku::MESSAGING_BASIC, "Client Messaging", "Direct messages with clients", C::Messaging),
    def(sku::MESSAGING_UNLIMITED, "Unlimited Messaging", "No monthly message cap", C::Messaging),
    def(sku::MESSAGING_FILE_SHARING, "File Sharing", "Attach documents and worksheets to messages", C::Messaging),
    // Branding
    def(sku::BRANDING_CUSTOM_LOGO, "Custom Logo", "Your logo on the client portal and reports", C::Branding),
    def(sku::BRANDING_CUSTOM_COLORS, "Custom Colors", "Match the client portal to your brand colors", C::Branding),
    def(sku::BRANDING_WHITE_LABEL, "White Label", "Remove AchievingCoach branding everywhere", C::Branding),
    def(sku::BRANDING_CUSTOM_DOMAIN, "Custom Domain", "Serve the client portal from your own domain", C::Branding),
    // Support
    def(sku::SUPPORT_EMAIL, "Email Support", "Help via email within two business days", C::Support),
    def(sku::SUPPORT_PRIORITY, "Priority Support", "Responses within one business day", C::Support),
    def(sku::SUPPORT_DEDICATED_MANAGER, "Dedicated Account Manager", "A named contact for your organization", C::Support),
    def(sku::SUPPORT_ONBOARDING, "Guided Onboarding", "Live onboarding sessions for your team", C::Support),
    // Enterprise
    def(sku::ENTERPRISE_MULTI_COACH, "Multi-Coach Organization", "Several coaches under one organization", C::Enterprise),
    def(sku::ENTERPRISE_TEAM_MANAGEMENT, "Team Management", "Roles and permissions for coaching teams", C::Enterprise),
    def(sku::ENTERPRISE_SSO, "Single Sign-On", "SAML and OIDC sign-in for your organization", C::Enterprise),
    def(sku::ENTERPRISE_API_ACCESS, "API Access", "Programmatic access to clients and sessions", C::Enterprise),
    def(sku::ENTERPRISE_AUDIT_LOG, "Audit Log", "Track every change made in the organization", C::Enterprise),
];

/// Returned by [`definition_or_placeholder`] for SKUs missing from the catalog
static PLACEHOLDER: FeatureDefinition = def(
    FeatureSku::new("support.unavailable_feature"),
    "Unavailable Feature",
    "This feature is not currently available",
    C::Support,
);

static INDEX: LazyLock<HashMap<&'static str, &'static FeatureDefinition>> =
    LazyLock::new(|| CATALOG.iter().map(|d| (d.sku.as_str(), d)).collect());

/// Every definition, in catalog order
pub fn all() -> &'static [FeatureDefinition] {
    CATALOG
}

/// Look up the definition for a SKU
pub fn definition(sku: &str) -> EntitlementResult<&'static FeatureDefinition> {
    INDEX
        .get(sku)
        .copied()
        .ok_or_else(|| EntitlementError::UnknownFeature(sku.to_string()))
}

/// Look up a definition without failing.
///
/// Missing SKUs are logged and mapped to a generic placeholder so a page
/// render never fails over a missing description string.
pub fn definition_or_placeholder(sku: &str) -> &'static FeatureDefinition {
    match definition(sku) {
        Ok(def) => def,
        Err(_) => {
            tracing::warn!(
                sku,
                namespace = ?split_sku(sku).map(|(ns, _)| ns),
                "Feature SKU missing from catalog, using placeholder"
            );
            &PLACEHOLDER
        }
    }
}

/// Whether the SKU exists in the catalog
pub fn contains(sku: &str) -> bool {
    INDEX.contains_key(sku)
}

/// Definitions in one category, in catalog order
pub fn by_category(category: FeatureCategory) -> impl Iterator<Item = &'static FeatureDefinition> {
    CATALOG.iter().filter(move |d| d.category == category)
}
