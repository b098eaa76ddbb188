//! Feature Gate
//!
//! Turns resolver answers into what a page should render: the feature itself,
//! an upgrade prompt, or nothing at all. A gate never errors; unknown SKUs
//! and unknown plans simply render no feature.

use achievingcoach_shared::{
    catalog, features_for, limits, minimum_tier_for, FeatureDefinition, LimitKey, PlanTier,
};
use serde::Serialize;

use crate::resolver::EntitlementResolver;

/// Content for an upgrade prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpgradePrompt {
    /// The feature the user tried to reach
    pub feature: FeatureDefinition,
    /// Plan the check ran against, after fallback substitution
    pub current_plan: Option<PlanTier>,
    /// Lowest plan that unlocks the feature
    pub required_plan: PlanTier,
    /// Everything the user would gain by moving to `required_plan`
    pub gained_features: Vec<FeatureDefinition>,
}

/// Render decision for a gated feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    /// Render the feature
    Granted,
    /// Render an upgrade prompt instead
    UpgradeRequired(UpgradePrompt),
    /// No plan offers this feature; render nothing
    Unavailable,
}

impl GateDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, GateDecision::Granted)
    }
}

/// Result of checking usage against a plan limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LimitCheck {
    Unlimited,
    WithinLimit {
        limit: u64,
        remaining: u64,
    },
    LimitReached {
        limit: u64,
        /// Lowest higher plan with more room, if any
        upgrade_to: Option<PlanTier>,
    },
    /// Usage already exceeds the ceiling, e.g. after a downgrade
    OverLimit {
        limit: u64,
        over_by: u64,
        upgrade_to: Option<PlanTier>,
    },
}

impl LimitCheck {
    /// Whether one more unit may be created
    pub fn allows(&self) -> bool {
        matches!(self, LimitCheck::Unlimited | LimitCheck::WithinLimit { .. })
    }
}

/// UI-facing wrapper around the resolver
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureGate {
    resolver: EntitlementResolver,
}

impl FeatureGate {
    pub fn new(resolver: EntitlementResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &EntitlementResolver {
        &self.resolver
    }

    /// Decide what to render for `feature` under `plan`
    pub fn evaluate(&self, plan: Option<PlanTier>, feature: &str) -> GateDecision {
        self.decide(self.resolver.effective_plan(plan), feature)
    }

    /// [`evaluate`](Self::evaluate) for untyped plan input. A plan string
    /// that isn't a known tier is treated as having no entitlements.
    pub fn evaluate_raw(&self, plan: Option<&str>, feature: &str) -> GateDecision {
        match crate::resolver::parse_plan(plan) {
            Ok(plan) => self.evaluate(plan, feature),
            Err(_) => self.decide(None, feature),
        }
    }

    fn decide(&self, effective: Option<PlanTier>, feature: &str) -> GateDecision {
        if effective.is_some_and(|tier| features_for(tier).contains(feature)) {
            return GateDecision::Granted;
        }

        let (Ok(definition), Some(required_plan)) =
            (catalog::definition(feature), minimum_tier_for(feature))
        else {
            tracing::debug!(feature, "Gate hit for feature no plan offers");
            return GateDecision::Unavailable;
        };

        let gained_features = match effective {
            Some(current) => self.resolver.get_missing_features(current, required_plan),
            None => features_for(required_plan).iter().collect(),
        }
        .into_iter()
        .map(|sku| *catalog::definition_or_placeholder(sku.as_str()))
        .collect();

        GateDecision::UpgradeRequired(UpgradePrompt {
            feature: *definition,
            current_plan: effective,
            required_plan,
            gained_features,
        })
    }

    /// Check current usage of a limited resource
    pub fn check_limit(&self, plan: Option<PlanTier>, key: LimitKey, usage: u64) -> LimitCheck {
        match self.resolver.get_plan_limit(plan, key) {
            None => LimitCheck::Unlimited,
            Some(limit) if limits::has_capacity(Some(limit), usage) => LimitCheck::WithinLimit {
                limit,
                remaining: limit - usage,
            },
            Some(limit) if limits::within_limit(Some(limit), usage) => LimitCheck::LimitReached {
                limit,
                upgrade_to: self.next_tier_with_room(plan, key, limit),
            },
            Some(limit) => LimitCheck::OverLimit {
                limit,
                over_by: usage - limit,
                upgrade_to: self.next_tier_with_room(plan, key, limit),
            },
        }
    }

    fn next_tier_with_room(
        &self,
        plan: Option<PlanTier>,
        key: LimitKey,
        current_limit: u64,
    ) -> Option<PlanTier> {
        let first = match self.resolver.effective_plan(plan) {
            Some(current) => current.next(),
            None => Some(PlanTier::Core),
        };
        std::iter::successors(first, PlanTier::next).find(|tier| {
            match limits::limit_for(*tier, key) {
                None => true,
                Some(limit) => limit > current_limit,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use achievingcoach_shared::{sku, EntitlementConfig};

    #[test]
    fn test_granted() {
        let gate = FeatureGate::default();
        assert!(gate.evaluate(Some(PlanTier::Pro), "crm.leads").is_granted());
    }

    #[test]
    fn test_upgrade_prompt_for_core() {
        let gate = FeatureGate::default();
        let GateDecision::UpgradeRequired(prompt) = gate.evaluate(Some(PlanTier::Core), "crm.leads")
        else {
            panic!("expected upgrade prompt");
        };
        assert_eq!(prompt.required_plan, PlanTier::Pro);
        assert_eq!(prompt.current_plan, Some(PlanTier::Core));
        assert_eq!(prompt.feature.sku, sku::CRM_LEADS);
        assert!(prompt.gained_features.iter().any(|d| d.sku == sku::ICF_SIMULATOR_ACCESS));
        assert!(!prompt.gained_features.iter().any(|d| d.sku == sku::ENTERPRISE_SSO));
    }

    #[test]
    fn test_enterprise_feature_from_core_requires_enterprise() {
        let gate = FeatureGate::default();
        let decision = gate.evaluate(Some(PlanTier::Core), "enterprise.sso");
        match decision {
            GateDecision::UpgradeRequired(prompt) => {
                assert_eq!(prompt.required_plan, PlanTier::Enterprise);
                assert!(prompt.gained_features.iter().any(|d| d.sku == sku::CRM_LEADS));
            }
            other => panic!("unexpected decision {:?}", other),
        }
    }

    #[test]
    fn test_unknown_feature_unavailable() {
        let gate = FeatureGate::default();
        assert_eq!(
            gate.evaluate(Some(PlanTier::Enterprise), "crm.mind_reading"),
            GateDecision::Unavailable
        );
    }

    #[test]
    fn test_strict_no_plan_prompts_with_full_tier() {
        let gate = FeatureGate::new(EntitlementResolver::new(EntitlementConfig::strict()));
        let GateDecision::UpgradeRequired(prompt) = gate.evaluate(None, "clients.management")
        else {
            panic!("expected upgrade prompt");
        };
        assert_eq!(prompt.current_plan, None);
        assert_eq!(prompt.required_plan, PlanTier::Core);
        assert_eq!(
            prompt.gained_features.len(),
            features_for(PlanTier::Core).len()
        );
    }

    #[test]
    fn test_raw_unknown_plan_fails_closed() {
        let gate = FeatureGate::default();
        assert!(!gate.evaluate_raw(Some("diamond"), "clients.management").is_granted());
        assert_eq!(
            gate.evaluate_raw(Some("diamond"), "crm.mind_reading"),
            GateDecision::Unavailable
        );
        assert!(gate.evaluate_raw(None, "crm.leads").is_granted());
    }

    #[test]
    fn test_limit_within() {
        let gate = FeatureGate::default();
        assert_eq!(
            gate.check_limit(Some(PlanTier::Core), LimitKey::MaxClients, 10),
            LimitCheck::WithinLimit {
                limit: 15,
                remaining: 5
            }
        );
    }

    #[test]
    fn test_limit_reached_suggests_upgrade() {
        let gate = FeatureGate::default();
        let check = gate.check_limit(Some(PlanTier::Core), LimitKey::MaxClients, 15);
        assert_eq!(
            check,
            LimitCheck::LimitReached {
                limit: 15,
                upgrade_to: Some(PlanTier::Pro)
            }
        );
        assert!(!check.allows());

        let storage = gate.check_limit(Some(PlanTier::Pro), LimitKey::MaxStorageGb, 50);
        assert_eq!(
            storage,
            LimitCheck::LimitReached {
                limit: 50,
                upgrade_to: Some(PlanTier::Enterprise)
            }
        );
    }

    #[test]
    fn test_over_limit_after_downgrade() {
        let gate = FeatureGate::default();
        let check = gate.check_limit(Some(PlanTier::Core), LimitKey::MaxClients, 22);
        assert_eq!(
            check,
            LimitCheck::OverLimit {
                limit: 15,
                over_by: 7,
                upgrade_to: Some(PlanTier::Pro)
            }
        );
        assert!(!check.allows());
    }

    #[test]
    fn test_no_plan_limit_suggests_lowest_tier() {
        let gate = FeatureGate::new(EntitlementResolver::new(EntitlementConfig::strict()));
        assert_eq!(
            gate.check_limit(None, LimitKey::MaxClients, 0),
            LimitCheck::LimitReached {
                limit: 0,
                upgrade_to: Some(PlanTier::Core)
            }
        );
    }

    #[test]
    fn test_unlimited() {
        let gate = FeatureGate::default();
        let check = gate.check_limit(Some(PlanTier::Pro), LimitKey::MaxClients, 10_000);
        assert_eq!(check, LimitCheck::Unlimited);
        assert!(check.allows());
    }

    #[test]
    fn test_decision_serialization() {
        let json = serde_json::to_value(GateDecision::Granted).unwrap();
        assert_eq!(json, serde_json::json!({ "decision": "granted" }));

        let json = serde_json::to_value(LimitCheck::WithinLimit {
            limit: 5,
            remaining: 2,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "status": "within_limit", "limit": 5, "remaining": 2 })
        );
    }
}
