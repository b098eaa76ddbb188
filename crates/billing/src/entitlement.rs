//! Entitlement Module
//!
//! Provides a unified view of what a coach can do based on their subscription.
//! This module answers the question: "What features/limits does this account
//! have right now?"
//!
//! The subscription record is loaded by the caller; computing the entitlement
//! is a pure function of that record, the resolver config and `now`.

use achievingcoach_shared::{
    features_for, EffectiveLimits, FeatureSku, LimitKey, PlanLimits, PlanTier, Subscription,
    SubscriptionStatus,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::resolver::EntitlementResolver;

/// How long a past-due subscription keeps its plan after the period ends
pub const PAST_DUE_GRACE: Duration = Duration::days(3);

/// Unified entitlement state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementState {
    /// Trial period active
    Trialing,
    /// Subscription active and in good standing
    Active,
    /// Payment past due but within the grace period
    PastDueGrace,
    /// Payment past due and grace period expired
    PastDueLocked,
    /// Subscription canceled but still in the paid period
    CanceledGrace,
    /// Subscription fully canceled
    Canceled,
    /// Unpaid, incomplete or paused subscription
    Inactive,
    /// No subscription on record, fallback tier applied
    Fallback,
    /// No subscription and no fallback tier configured
    Unentitled,
    /// Self-hosted deployment, everything unlocked
    SelfHosted,
}

impl EntitlementState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntitlementState::Trialing => "trialing",
            EntitlementState::Active => "active",
            EntitlementState::PastDueGrace => "past_due_grace",
            EntitlementState::PastDueLocked => "past_due_locked",
            EntitlementState::CanceledGrace => "canceled_grace",
            EntitlementState::Canceled => "canceled",
            EntitlementState::Inactive => "inactive",
            EntitlementState::Fallback => "fallback",
            EntitlementState::Unentitled => "unentitled",
            EntitlementState::SelfHosted => "self_hosted",
        }
    }

    /// Whether the subscription's own plan is honored in this state
    pub fn uses_subscription_plan(&self) -> bool {
        matches!(
            self,
            EntitlementState::Trialing
                | EntitlementState::Active
                | EntitlementState::PastDueGrace
                | EntitlementState::CanceledGrace
        )
    }
}

impl std::fmt::Display for EntitlementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source that determined the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementSource {
    /// Based on the subscription's plan
    Subscription,
    /// Trial period
    Trial,
    /// Configured fallback tier
    Fallback,
    /// Self-hosted deployment
    SelfHosted,
}

/// Complete entitlement information for an account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entitlement {
    pub state: EntitlementState,
    pub source: EntitlementSource,
    /// Plan used for gating; `None` grants nothing
    pub plan: Option<PlanTier>,
    /// Effective limits (tier defaults + custom overrides)
    pub limits: EffectiveLimits,
    /// Every SKU the plan unlocks
    pub features: Vec<FeatureSku>,
    #[serde(with = "time::serde::rfc3339")]
    pub computed_at: OffsetDateTime,
    /// When this entitlement lapses (trial end, grace end, period end)
    #[serde(with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
    /// Human-readable explanation when the subscription plan isn't honored
    pub reason: Option<String>,
}

impl Entitlement {
    /// Check if a specific feature is enabled
    pub fn has_feature(&self, feature: &str) -> bool {
        self.plan
            .map(|tier| features_for(tier).contains(feature))
            .unwrap_or(false)
    }

    pub fn limit(&self, key: LimitKey) -> Option<u64> {
        self.limits.get(key)
    }
}

/// Outcome of classifying a subscription record
struct Classification {
    state: EntitlementState,
    source: EntitlementSource,
    expires_at: Option<OffsetDateTime>,
    reason: Option<String>,
}

impl Classification {
    fn new(state: EntitlementState, source: EntitlementSource) -> Self {
        Self {
            state,
            source,
            expires_at: None,
            reason: None,
        }
    }

    fn expires(mut self, at: Option<OffsetDateTime>) -> Self {
        self.expires_at = at;
        self
    }

    fn reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }
}

impl EntitlementResolver {
    /// Compute the complete entitlement for an account.
    /// This is THE function that answers "what can this coach do?"
    pub fn compute_entitlement(
        &self,
        subscription: Option<&Subscription>,
        now: OffsetDateTime,
    ) -> Entitlement {
        let class = self.classify(subscription, now);

        let plan = match class.source {
            EntitlementSource::SelfHosted => Some(PlanTier::Enterprise),
            EntitlementSource::Fallback => self.config().fallback_tier,
            EntitlementSource::Subscription | EntitlementSource::Trial => {
                subscription.map(|s| s.plan_id)
            }
        };

        // Account overrides only apply while the subscription itself is honored
        let custom = subscription
            .filter(|_| class.state.uses_subscription_plan())
            .and_then(|s| s.custom_limits.as_ref());

        let limits = match plan {
            Some(tier) => self.get_effective_limits(Some(tier), custom),
            None => PlanLimits::none().into(),
        };

        let features: Vec<FeatureSku> = plan
            .map(|tier| features_for(tier).iter().collect())
            .unwrap_or_default();

        tracing::debug!(
            state = %class.state,
            plan = ?plan,
            status = ?subscription.map(|s| s.status),
            "Computed entitlement"
        );

        Entitlement {
            state: class.state,
            source: class.source,
            plan,
            limits,
            features,
            computed_at: now,
            expires_at: class.expires_at,
            reason: class.reason,
        }
    }

    fn classify(&self, subscription: Option<&Subscription>, now: OffsetDateTime) -> Classification {
        use self::EntitlementSource as Src;
        use self::EntitlementState as St;

        if self.config().self_hosted {
            return Classification::new(St::SelfHosted, Src::SelfHosted);
        }

        let Some(sub) = subscription else {
            return match self.config().fallback_tier {
                Some(_) => Classification::new(St::Fallback, Src::Fallback)
                    .reason("No subscription on record"),
                None => Classification::new(St::Unentitled, Src::Fallback)
                    .reason("No subscription on record"),
            };
        };

        // An unexpired trial wins regardless of status
        if let Some(trial_end) = sub.trial_end {
            if trial_end > now {
                return Classification::new(St::Trialing, Src::Trial).expires(Some(trial_end));
            }
        }

        match sub.status {
            SubscriptionStatus::Trialing => {
                Classification::new(St::Trialing, Src::Trial).expires(sub.trial_end)
            }
            SubscriptionStatus::Active if sub.cancel_at_period_end => match sub.current_period_end {
                Some(end) if end <= now => Classification::new(St::Canceled, Src::Fallback)
                    .reason("Subscription canceled at period end"),
                end => Classification::new(St::CanceledGrace, Src::Subscription).expires(end),
            },
            SubscriptionStatus::Active => Classification::new(St::Active, Src::Subscription),
            SubscriptionStatus::PastDue => {
                let grace_end = sub.current_period_end.map(|end| end + PAST_DUE_GRACE);
                match grace_end {
                    Some(end) if now >= end => {
                        Classification::new(St::PastDueLocked, Src::Fallback)
                            .reason("Payment past due and grace period expired")
                    }
                    _ => Classification::new(St::PastDueGrace, Src::Subscription)
                        .expires(grace_end)
                        .reason("Payment past due - please update payment method"),
                }
            }
            SubscriptionStatus::Canceled => match sub.current_period_end {
                Some(end) if end > now => {
                    Classification::new(St::CanceledGrace, Src::Subscription).expires(Some(end))
                }
                _ => Classification::new(St::Canceled, Src::Fallback)
                    .reason("Subscription canceled"),
            },
            SubscriptionStatus::Unpaid
            | SubscriptionStatus::Incomplete
            | SubscriptionStatus::Paused => Classification::new(St::Inactive, Src::Fallback)
                .reason("Subscription is not active"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use achievingcoach_shared::{CustomLimits, EntitlementConfig, LimitSource};
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2026-10-18 12:00 UTC);

    fn sub(plan: PlanTier, status: SubscriptionStatus) -> Subscription {
        Subscription::active(plan).with_status(status)
    }

    #[test]
    fn test_entitlement_state_display() {
        assert_eq!(EntitlementState::Active.to_string(), "active");
        assert_eq!(EntitlementState::PastDueGrace.to_string(), "past_due_grace");
        assert_eq!(EntitlementState::SelfHosted.to_string(), "self_hosted");
    }

    #[test]
    fn test_active_subscription() {
        let resolver = EntitlementResolver::default();
        let ent = resolver.compute_entitlement(Some(&Subscription::active(PlanTier::Core)), NOW);
        assert_eq!(ent.state, EntitlementState::Active);
        assert_eq!(ent.plan, Some(PlanTier::Core));
        assert!(!ent.has_feature("crm.leads"));
        assert_eq!(ent.limit(LimitKey::MaxClients), Some(15));
        assert!(ent.reason.is_none());
    }

    #[test]
    fn test_missing_subscription_uses_fallback() {
        let resolver = EntitlementResolver::default();
        let ent = resolver.compute_entitlement(None, NOW);
        assert_eq!(ent.state, EntitlementState::Fallback);
        assert_eq!(ent.source, EntitlementSource::Fallback);
        assert_eq!(ent.plan, Some(PlanTier::Pro));
        assert!(ent.has_feature("crm.leads"));
    }

    #[test]
    fn test_missing_subscription_strict() {
        let resolver = EntitlementResolver::new(EntitlementConfig::strict());
        let ent = resolver.compute_entitlement(None, NOW);
        assert_eq!(ent.state, EntitlementState::Unentitled);
        assert_eq!(ent.plan, None);
        assert!(ent.features.is_empty());
        assert_eq!(ent.limit(LimitKey::MaxClients), Some(0));
    }

    #[test]
    fn test_trial_end_in_future_wins() {
        let mut record = sub(PlanTier::Pro, SubscriptionStatus::Incomplete);
        record.trial_end = Some(datetime!(2026-10-25 00:00 UTC));
        let ent = EntitlementResolver::default().compute_entitlement(Some(&record), NOW);
        assert_eq!(ent.state, EntitlementState::Trialing);
        assert_eq!(ent.source, EntitlementSource::Trial);
        assert_eq!(ent.expires_at, record.trial_end);
    }

    #[test]
    fn test_cancel_at_period_end_is_grace() {
        let mut record = Subscription::active(PlanTier::Enterprise);
        record.cancel_at_period_end = true;
        record.current_period_end = Some(datetime!(2026-11-01 00:00 UTC));
        let ent = EntitlementResolver::default().compute_entitlement(Some(&record), NOW);
        assert_eq!(ent.state, EntitlementState::CanceledGrace);
        assert_eq!(ent.plan, Some(PlanTier::Enterprise));
        assert_eq!(ent.expires_at, record.current_period_end);
    }

    #[test]
    fn test_cancel_at_period_end_after_period_falls_back() {
        let mut record = Subscription::active(PlanTier::Enterprise);
        record.cancel_at_period_end = true;
        record.current_period_end = Some(datetime!(2026-09-01 00:00 UTC));
        record.custom_limits = Some(CustomLimits {
            max_storage_gb: Some(500),
            ..Default::default()
        });

        let strict = EntitlementResolver::new(EntitlementConfig::strict());
        let ent = strict.compute_entitlement(Some(&record), NOW);
        assert_eq!(ent.state, EntitlementState::Canceled);
        assert_eq!(ent.source, EntitlementSource::Fallback);
        assert_eq!(ent.plan, None);
        assert!(ent.features.is_empty());
        assert_eq!(ent.limit(LimitKey::MaxStorageGb), Some(0));

        let ent = EntitlementResolver::default().compute_entitlement(Some(&record), NOW);
        assert_eq!(ent.plan, Some(PlanTier::Pro));
        assert_eq!(ent.limit(LimitKey::MaxStorageGb), Some(50));
    }

    #[test]
    fn test_cancel_at_period_end_exactly_at_period_end() {
        let mut record = Subscription::active(PlanTier::Pro);
        record.cancel_at_period_end = true;
        record.current_period_end = Some(NOW);
        let ent = EntitlementResolver::new(EntitlementConfig::strict())
            .compute_entitlement(Some(&record), NOW);
        assert_eq!(ent.state, EntitlementState::Canceled);
        assert_eq!(ent.plan, None);
    }

    #[test]
    fn test_past_due_within_grace() {
        let mut record = sub(PlanTier::Pro, SubscriptionStatus::PastDue);
        record.current_period_end = Some(datetime!(2026-10-17 00:00 UTC));
        let ent = EntitlementResolver::default().compute_entitlement(Some(&record), NOW);
        assert_eq!(ent.state, EntitlementState::PastDueGrace);
        assert_eq!(ent.plan, Some(PlanTier::Pro));
        assert_eq!(ent.expires_at, Some(datetime!(2026-10-20 00:00 UTC)));
    }

    #[test]
    fn test_past_due_after_grace_falls_back() {
        let mut record = sub(PlanTier::Enterprise, SubscriptionStatus::PastDue);
        record.current_period_end = Some(datetime!(2026-10-01 00:00 UTC));
        let resolver = EntitlementResolver::new(
            EntitlementConfig::default().with_fallback_tier(Some(PlanTier::Core)),
        );
        let ent = resolver.compute_entitlement(Some(&record), NOW);
        assert_eq!(ent.state, EntitlementState::PastDueLocked);
        assert_eq!(ent.plan, Some(PlanTier::Core));
    }

    #[test]
    fn test_canceled_keeps_paid_period() {
        let mut record = sub(PlanTier::Pro, SubscriptionStatus::Canceled);
        record.current_period_end = Some(datetime!(2026-10-30 00:00 UTC));
        let ent = EntitlementResolver::default().compute_entitlement(Some(&record), NOW);
        assert_eq!(ent.state, EntitlementState::CanceledGrace);

        record.current_period_end = Some(datetime!(2026-10-01 00:00 UTC));
        let strict = EntitlementResolver::new(EntitlementConfig::strict());
        let ent = strict.compute_entitlement(Some(&record), NOW);
        assert_eq!(ent.state, EntitlementState::Canceled);
        assert_eq!(ent.plan, None);
        assert!(!ent.has_feature("clients.management"));
    }

    #[test]
    fn test_inactive_statuses_fall_back() {
        for status in [
            SubscriptionStatus::Unpaid,
            SubscriptionStatus::Incomplete,
            SubscriptionStatus::Paused,
        ] {
            let ent = EntitlementResolver::default()
                .compute_entitlement(Some(&sub(PlanTier::Enterprise, status)), NOW);
            assert_eq!(ent.state, EntitlementState::Inactive, "{}", status);
            assert_eq!(ent.plan, Some(PlanTier::Pro), "{}", status);
        }
    }

    #[test]
    fn test_custom_limits_only_while_honored() {
        let mut record = Subscription::active(PlanTier::Core);
        record.custom_limits = Some(CustomLimits {
            max_clients: Some(30),
            ..Default::default()
        });
        let ent = EntitlementResolver::default().compute_entitlement(Some(&record), NOW);
        assert_eq!(ent.limit(LimitKey::MaxClients), Some(30));
        assert_eq!(ent.limits.source, LimitSource::Mixed);

        let record = record.with_status(SubscriptionStatus::Unpaid);
        let strict = EntitlementResolver::new(
            EntitlementConfig::strict().with_fallback_tier(Some(PlanTier::Core)),
        );
        let ent = strict.compute_entitlement(Some(&record), NOW);
        assert_eq!(ent.limit(LimitKey::MaxClients), Some(15));
        assert_eq!(ent.limits.source, LimitSource::Tier);
    }

    #[test]
    fn test_self_hosted_overrides_everything() {
        let resolver = EntitlementResolver::new(EntitlementConfig::default().with_self_hosted(true));
        let ent = resolver
            .compute_entitlement(Some(&sub(PlanTier::Core, SubscriptionStatus::Canceled)), NOW);
        assert_eq!(ent.state, EntitlementState::SelfHosted);
        assert_eq!(ent.plan, Some(PlanTier::Enterprise));
        assert!(ent.has_feature("enterprise.sso"));
    }

    #[test]
    fn test_entitlement_serializes() {
        let ent = EntitlementResolver::default()
            .compute_entitlement(Some(&Subscription::active(PlanTier::Pro)), NOW);
        let json = serde_json::to_value(&ent).unwrap();
        assert_eq!(json["state"], "active");
        assert_eq!(json["plan"], "pro");
        assert_eq!(json["computed_at"], "2026-10-18T12:00:00Z");
        assert!(json["limits"]["max_clients"].is_null());
    }
}
