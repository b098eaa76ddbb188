//! Entitlement Resolver
//!
//! The single decision point UI gates consult. Every operation is a pure
//! lookup over the static tables in `achievingcoach_shared`; the only state
//! is the injected [`EntitlementConfig`].
//!
//! Lookups fail soft: unknown SKUs answer `false`, unknown tiers grant
//! nothing. The `check_*` variants are the strict counterparts for callers
//! that want to distinguish a typo from a missing entitlement.

use achievingcoach_shared::{
    catalog, features_for, limits, CustomLimits, EffectiveLimits, EntitlementConfig,
    EntitlementError, EntitlementResult, FeatureCategory, FeatureDefinition, FeatureSku, LimitKey,
    PlanLimits, PlanTier,
};

/// Answers "what does this plan unlock?"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntitlementResolver {
    config: EntitlementConfig,
}

impl EntitlementResolver {
    pub fn new(config: EntitlementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EntitlementConfig {
        &self.config
    }

    /// The plan actually used for a lookup.
    ///
    /// Self-hosted deployments always resolve to Enterprise; a missing plan
    /// resolves to the configured fallback tier (which may be none).
    pub fn effective_plan(&self, plan: Option<PlanTier>) -> Option<PlanTier> {
        if self.config.self_hosted {
            return Some(PlanTier::Enterprise);
        }
        plan.or(self.config.fallback_tier)
    }

    /// Whether the plan unlocks `feature`. Unknown SKUs are simply not granted.
    pub fn has_feature(&self, plan: Option<PlanTier>, feature: &str) -> bool {
        match self.effective_plan(plan) {
            Some(tier) => features_for(tier).contains(feature),
            None => false,
        }
    }

    /// Like [`has_feature`](Self::has_feature), but an SKU missing from the
    /// catalog is an error instead of `false`.
    pub fn check_feature(&self, plan: Option<PlanTier>, feature: &str) -> EntitlementResult<bool> {
        catalog::definition(feature)?;
        Ok(self.has_feature(plan, feature))
    }

    /// Ceiling for `limit` under the plan; `None` is unlimited.
    ///
    /// With no effective plan the answer is `Some(0)`: nothing is granted,
    /// and "no plan" is never reported as unlimited.
    pub fn get_plan_limit(&self, plan: Option<PlanTier>, limit: LimitKey) -> Option<u64> {
        match self.effective_plan(plan) {
            Some(tier) => limits::limit_for(tier, limit),
            None => Some(0),
        }
    }

    /// All limits for the plan, with per-account overrides applied
    pub fn get_effective_limits(
        &self,
        plan: Option<PlanTier>,
        custom: Option<&CustomLimits>,
    ) -> EffectiveLimits {
        let base = match self.effective_plan(plan) {
            Some(tier) => PlanLimits::for_tier(tier),
            None => return PlanLimits::none().into(),
        };
        match custom {
            Some(custom) => base.with_overrides(custom),
            None => base.into(),
        }
    }

    /// Features the plan unlocks within one category, with display metadata.
    /// Order follows the tier's feature list.
    pub fn get_features_by_category(
        &self,
        plan: PlanTier,
        category: FeatureCategory,
    ) -> Vec<&'static FeatureDefinition> {
        features_for(plan)
            .iter()
            .filter_map(|sku| match catalog::definition(sku.as_str()) {
                Ok(def) => Some(def),
                Err(_) => {
                    tracing::warn!(%sku, tier = %plan, "Plan references SKU missing from catalog");
                    None
                }
            })
            .filter(|def| def.category == category)
            .collect()
    }

    /// What upgrading from `from` to `to` would add. Empty for downgrades
    /// and same-tier moves.
    pub fn get_missing_features(&self, from: PlanTier, to: PlanTier) -> Vec<FeatureSku> {
        if from.includes(to) {
            return Vec::new();
        }
        let current = features_for(from);
        features_for(to)
            .iter()
            .filter(|sku| !current.contains(sku.as_str()))
            .collect()
    }

    /// [`has_feature`](Self::has_feature) for untyped input.
    ///
    /// A missing plan takes the fallback tier; a plan string that is not a
    /// known tier grants nothing.
    pub fn has_feature_raw(&self, plan: Option<&str>, feature: &str) -> bool {
        match parse_plan(plan) {
            Ok(plan) => self.has_feature(plan, feature),
            Err(_) => false,
        }
    }

    /// [`get_plan_limit`](Self::get_plan_limit) for untyped plan input
    pub fn get_plan_limit_raw(&self, plan: Option<&str>, limit: LimitKey) -> Option<u64> {
        match parse_plan(plan) {
            Ok(plan) => self.get_plan_limit(plan, limit),
            Err(_) => Some(0),
        }
    }
}

/// Parse an optional plan string, logging anything that isn't a tier
pub(crate) fn parse_plan(plan: Option<&str>) -> Result<Option<PlanTier>, EntitlementError> {
    match plan.map(str::trim).filter(|p| !p.is_empty()) {
        None => Ok(None),
        Some(raw) => raw.parse::<PlanTier>().map(Some).map_err(|e| {
            tracing::warn!(plan = raw, "Unrecognized plan tier, granting no entitlements");
            e
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use achievingcoach_shared::sku;

    fn resolver() -> EntitlementResolver {
        EntitlementResolver::default()
    }

    #[test]
    fn test_core_lacks_crm() {
        assert!(!resolver().has_feature(Some(PlanTier::Core), "crm.leads"));
    }

    #[test]
    fn test_pro_has_crm() {
        assert!(resolver().has_feature(Some(PlanTier::Pro), "crm.leads"));
    }

    #[test]
    fn test_core_client_limit() {
        assert_eq!(
            resolver().get_plan_limit(Some(PlanTier::Core), LimitKey::MaxClients),
            Some(15)
        );
    }

    #[test]
    fn test_pro_clients_unlimited() {
        assert_eq!(
            resolver().get_plan_limit(Some(PlanTier::Pro), LimitKey::MaxClients),
            None
        );
    }

    #[test]
    fn test_upgrade_to_pro_adds_icf_simulator() {
        let missing = resolver().get_missing_features(PlanTier::Core, PlanTier::Pro);
        assert!(missing.contains(&sku::ICF_SIMULATOR_ACCESS));
    }

    #[test]
    fn test_no_plan_uses_pro_fallback() {
        assert!(resolver().has_feature(None, "crm.leads"));
        assert_eq!(resolver().effective_plan(None), Some(PlanTier::Pro));
    }

    #[test]
    fn test_strict_config_grants_nothing_without_plan() {
        let strict = EntitlementResolver::new(EntitlementConfig::strict());
        assert!(!strict.has_feature(None, "clients.management"));
        assert_eq!(strict.get_plan_limit(None, LimitKey::MaxClients), Some(0));
        assert_eq!(
            strict.get_effective_limits(None, None).max_storage_gb,
            Some(0)
        );
    }

    #[test]
    fn test_explicit_plan_ignores_fallback() {
        let resolver = EntitlementResolver::new(
            EntitlementConfig::default().with_fallback_tier(Some(PlanTier::Enterprise)),
        );
        assert!(!resolver.has_feature(Some(PlanTier::Core), "enterprise.sso"));
        assert!(resolver.has_feature(None, "enterprise.sso"));
    }

    #[test]
    fn test_self_hosted_unlocks_everything() {
        let resolver =
            EntitlementResolver::new(EntitlementConfig::default().with_self_hosted(true));
        assert!(resolver.has_feature(Some(PlanTier::Core), "enterprise.audit_log"));
        assert_eq!(
            resolver.get_plan_limit(Some(PlanTier::Core), LimitKey::MaxClients),
            None
        );
    }

    #[test]
    fn test_unknown_sku_soft_and_strict() {
        let r = resolver();
        assert!(!r.has_feature(Some(PlanTier::Enterprise), "crm.telepathy"));
        assert_eq!(
            r.check_feature(Some(PlanTier::Enterprise), "crm.telepathy"),
            Err(EntitlementError::UnknownFeature("crm.telepathy".to_string()))
        );
        assert_eq!(r.check_feature(Some(PlanTier::Core), "crm.leads"), Ok(false));
    }

    #[test]
    fn test_raw_plan_input() {
        let r = resolver();
        assert!(r.has_feature_raw(Some("PRO"), "crm.leads"));
        assert!(r.has_feature_raw(None, "crm.leads"));
        assert!(r.has_feature_raw(Some("  "), "crm.leads"));
        assert!(!r.has_feature_raw(Some("platinum"), "clients.management"));
        assert_eq!(
            r.get_plan_limit_raw(Some("platinum"), LimitKey::MaxClients),
            Some(0)
        );
        assert_eq!(r.get_plan_limit_raw(Some("core"), LimitKey::MaxClients), Some(15));
    }

    #[test]
    fn test_features_by_category() {
        let crm = resolver().get_features_by_category(PlanTier::Pro, FeatureCategory::Crm);
        let skus: Vec<_> = crm.iter().map(|d| d.sku).collect();
        assert_eq!(skus, vec![sku::CRM_LEADS, sku::CRM_PIPELINE, sku::CRM_EMAIL_CAMPAIGNS]);

        let core_crm = resolver().get_features_by_category(PlanTier::Core, FeatureCategory::Crm);
        assert!(core_crm.is_empty());
    }

    #[test]
    fn test_missing_features_empty_on_downgrade() {
        let r = resolver();
        assert!(r.get_missing_features(PlanTier::Enterprise, PlanTier::Core).is_empty());
        assert!(r.get_missing_features(PlanTier::Pro, PlanTier::Pro).is_empty());
    }

    #[test]
    fn test_effective_limits_with_overrides() {
        let custom = CustomLimits {
            max_clients: Some(25),
            ..Default::default()
        };
        let limits = resolver().get_effective_limits(Some(PlanTier::Core), Some(&custom));
        assert_eq!(limits.max_clients, Some(25));
        assert_eq!(limits.max_sessions_per_month, Some(50));
    }
}
