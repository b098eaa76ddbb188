//! Plan-to-Feature Map
//!
//! Each tier is declared as the features it adds on top of the tier below it,
//! so a higher tier can never lose a feature a lower tier has. The cumulative
//! sets are built once on first use.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::features::{sku, FeatureSku};
use crate::types::PlanTier;

/// Features included in Core
const CORE_FEATURES: &[FeatureSku] = &[
    sku::CLIENTS_MANAGEMENT,
    sku::CLIENTS_PROFILES,
    sku::SESSIONS_SCHEDULING,
    sku::SESSIONS_NOTES,
    sku::SESSIONS_BOOKING_PAGE,
    sku::TOOLS_WHEEL_OF_LIFE,
    sku::TOOLS_GROW_MODEL,
    sku::TOOLS_SMART_GOALS,
    sku::TOOLS_VALUES_ASSESSMENT,
    sku::ANALYTICS_BASIC,
    sku::DIRECTORY_BASIC_LISTING,
    sku::MESSAGING_BASIC,
    sku::SUPPORT_EMAIL,
];

/// Features Pro adds over Core
const PRO_ADDITIONS: &[FeatureSku] = &[
    sku::CLIENTS_UNLIMITED,
    sku::CLIENTS_STAKEHOLDER_PORTAL,
    sku::CLIENTS_BULK_IMPORT,
    sku::SESSIONS_RECURRING,
    sku::SESSIONS_VIDEO,
    sku::TOOLS_DISC_ASSESSMENT,
    sku::TOOLS_ALL_TOOLS,
    sku::TOOLS_PDF_REPORTS,
    sku::ICF_SIMULATOR_ACCESS,
    sku::ICF_SIMULATOR_UNLIMITED_ATTEMPTS,
    sku::ICF_SIMULATOR_COMPETENCY_BREAKDOWN,
    sku::ANALYTICS_ADVANCED,
    sku::CRM_LEADS,
    sku::CRM_PIPELINE,
    sku::CRM_EMAIL_CAMPAIGNS,
    sku::DIRECTORY_FEATURED_LISTING,
    sku::DIRECTORY_REVIEWS,
    sku::MESSAGING_UNLIMITED,
    sku::MESSAGING_FILE_SHARING,
    sku::BRANDING_CUSTOM_LOGO,
    sku::BRANDING_CUSTOM_COLORS,
    sku::SUPPORT_PRIORITY,
];

/// Features Enterprise adds over Pro
const ENTERPRISE_ADDITIONS: &[FeatureSku] = &[
    sku::TOOLS_CUSTOM_TOOLS,
    sku::ANALYTICS_ORGANIZATION_REPORTS,
    sku::BRANDING_WHITE_LABEL,
    sku::BRANDING_CUSTOM_DOMAIN,
    sku::SUPPORT_DEDICATED_MANAGER,
    sku::SUPPORT_ONBOARDING,
    sku::ENTERPRISE_MULTI_COACH,
    sku::ENTERPRISE_TEAM_MANAGEMENT,
    sku::ENTERPRISE_SSO,
    sku::ENTERPRISE_API_ACCESS,
    sku::ENTERPRISE_AUDIT_LOG,
];

/// The full feature set one tier unlocks
#[derive(Debug, Clone)]
pub struct PlanFeatureSet {
    tier: PlanTier,
    ordered: Vec<FeatureSku>,
    members: HashSet<FeatureSku>,
}

impl PlanFeatureSet {
    pub fn tier(&self) -> PlanTier {
        self.tier
    }

    pub fn contains(&self, sku: &str) -> bool {
        self.members.contains(sku)
    }

    /// SKUs in declaration order, lower-tier features first
    pub fn iter(&self) -> impl Iterator<Item = FeatureSku> + '_ {
        self.ordered.iter().copied()
    }

    pub fn as_slice(&self) -> &[FeatureSku] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Whether every feature in `self` is also in `other`
    pub fn is_subset(&self, other: &PlanFeatureSet) -> bool {
        self.members.is_subset(&other.members)
    }
}

static PLAN_FEATURES: LazyLock<[PlanFeatureSet; 3]> = LazyLock::new(|| {
    let core = accumulate(PlanTier::Core, None, additions_for(PlanTier::Core));
    let pro = accumulate(PlanTier::Pro, Some(&core), additions_for(PlanTier::Pro));
    let enterprise = accumulate(
        PlanTier::Enterprise,
        Some(&pro),
        additions_for(PlanTier::Enterprise),
    );
    [core, pro, enterprise]
});

fn accumulate(
    tier: PlanTier,
    base: Option<&PlanFeatureSet>,
    additions: &[FeatureSku],
) -> PlanFeatureSet {
    let mut set = match base {
        Some(base) => PlanFeatureSet {
            tier,
            ordered: base.ordered.clone(),
            members: base.members.clone(),
        },
        None => PlanFeatureSet {
            tier,
            ordered: Vec::with_capacity(additions.len()),
            members: HashSet::with_capacity(additions.len()),
        },
    };
    for &sku in additions {
        // Re-listing a lower-tier feature is harmless; keep the first position
        if set.members.insert(sku) {
            set.ordered.push(sku);
        }
    }
    set
}

/// SKUs a tier introduces on top of the tier below it
pub fn additions_for(tier: PlanTier) -> &'static [FeatureSku] {
    match tier {
        PlanTier::Core => CORE_FEATURES,
        PlanTier::Pro => PRO_ADDITIONS,
        PlanTier::Enterprise => ENTERPRISE_ADDITIONS,
    }
}

/// Every feature a tier unlocks
pub fn features_for(tier: PlanTier) -> &'static PlanFeatureSet {
    &PLAN_FEATURES[tier.rank()]
}

/// Whether `tier` unlocks `sku`
pub fn tier_has(tier: PlanTier, sku: &str) -> bool {
    features_for(tier).contains(sku)
}

/// Lowest tier that unlocks `sku`, or `None` if no tier does
pub fn minimum_tier_for(sku: &str) -> Option<PlanTier> {
    PlanTier::ALL.into_iter().find(|tier| tier_has(*tier, sku))
}
